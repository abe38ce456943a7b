use crate::core::StreamError;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// The error returned when a tag cannot be decoded.
///
/// Decoding is fail-fast: any of these aborts the whole tag, and no partial tag is ever returned.
#[derive(Debug)]
pub enum ParseError {
    /// The data violates the ID3v2.3 grammar. The message names the offending value.
    BadFormat(String),
    /// The data is well-formed, but uses a feature that is deliberately not implemented,
    /// such as unsynchronization.
    Unsupported(String),
    /// The underlying stream failed or ended before the tag did.
    IoError(io::Error),
}

impl ParseError {
    pub(crate) fn bad_format<S: Into<String>>(msg: S) -> Self {
        Self::BadFormat(msg.into())
    }

    pub(crate) fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::Unsupported(msg.into())
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::BadFormat(msg) => write![f, "bad format: {}", msg],
            Self::Unsupported(msg) => write![f, "unsupported: {}", msg],
            Self::IoError(err) => write![f, "{}", err],
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(other: io::Error) -> Self {
        Self::IoError(other)
    }
}

// A stream error means that the in-memory tag data was shorter than one of its own fields
// claimed, which is a problem with the tag and not with the underlying file.
impl From<StreamError> for ParseError {
    fn from(other: StreamError) -> Self {
        Self::BadFormat(other.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

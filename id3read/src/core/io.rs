use std::error;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// A simple ergonomics layer around an internal slice, created primarily to automate bounds checking.
///
/// The tag reader uses the stream's `remaining()` count as its byte budget, so a stream can never
/// be read past the end of the data it was created from.
pub struct BufStream<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> BufStream<'a> {
    /// Construct a new `BufStream` from `src`.
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Read this stream into a buffer. If the buffer cannot be completely filled, then
    /// an error will be returned and the stream will not be advanced.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        if self.remaining() < buf.len() {
            return Err(StreamError::BufferUnderread);
        }

        buf.copy_from_slice(&self.src[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();

        Ok(())
    }

    /// Read this stream into an array of size `N`, returning an error when the array
    /// cannot be filled.
    pub fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]> {
        let mut arr = [0; N];
        self.read_exact(&mut arr)?;
        Ok(arr)
    }

    /// Read exactly one byte from this stream. If there is no data remaining in the stream then
    /// an error will be returned.
    pub fn read_u8(&mut self) -> StreamResult<u8> {
        if self.is_empty() {
            return Err(StreamError::EndOfStream);
        }

        self.pos += 1;

        Ok(self.src[self.pos - 1])
    }

    /// Read a big-endian u16 from this stream.
    pub fn read_u16(&mut self) -> StreamResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u32 from this stream.
    pub fn read_u32(&mut self) -> StreamResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Skip `n` bytes in this stream. If this skip is beyond the stream length then an error will be
    /// returned.
    pub fn skip(&mut self, n: usize) -> StreamResult<()> {
        if self.remaining() < n {
            return Err(StreamError::OutOfBounds);
        }

        self.pos += n;

        Ok(())
    }

    /// Consumes the stream and returns a slice of size n. If the slice cannot be created, then an error is returned.
    pub fn slice(&mut self, n: usize) -> StreamResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(StreamError::BufferUnderread);
        }

        self.pos += n;

        Ok(&self.src[self.pos - n..self.pos])
    }

    /// Peek at a portion of this stream relative to the current position. This does not consume the stream.
    pub fn peek(&self, range: Range<usize>) -> StreamResult<&'a [u8]> {
        let start = range.start + self.pos;
        let end = range.end + self.pos;

        if start > end || end > self.len() {
            return Err(StreamError::OutOfBounds);
        }

        Ok(&self.src[start..end])
    }

    /// Searches for `needle` in steps of `needle.len()` and returns the data before it, consuming
    /// the data and the needle. Stepping by the needle width keeps multi-byte code units aligned.
    /// If the needle cannot be found, `None` is returned and the stream is left untouched.
    pub fn search(&mut self, needle: &[u8]) -> Option<&'a [u8]> {
        let start = self.pos;
        let mut begin = self.pos;
        let mut end = self.pos + needle.len();

        while end <= self.len() {
            if &self.src[begin..end] == needle {
                self.pos = end;
                return Some(&self.src[start..begin]);
            }

            begin += needle.len();
            end += needle.len();
        }

        None
    }

    /// Takes the rest of the streams data into a slice, leaving the stream in an fully consumed state.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.src[self.pos..];
        self.pos = self.len();
        rest
    }

    /// Returns the length of this stream
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Returns the stream position
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the remaining length of this stream.
    pub fn remaining(&self) -> usize {
        self.len() - self.pos()
    }

    /// Returns if this stream has been fully consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamError {
    EndOfStream,
    BufferUnderread,
    OutOfBounds,
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let msg = match self {
            Self::EndOfStream => "unexpected end of data",
            Self::BufferUnderread => "not enough data to fill buffer",
            Self::OutOfBounds => "read out of bounds",
        };

        write![f, "{}", msg]
    }
}

impl error::Error for StreamError {
    // Nothing to implement
}

pub type StreamResult<T> = Result<T, StreamError>;

use crate::{errorln, print_entry, print_header};

use id3read::err::ParseError;
use id3read::id3v2::frames::{Frame, FrameBody};
use id3read::id3v2::Tag;

use clap::Values;
use log::debug;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, ErrorKind};
use std::path::Path;

#[derive(Debug)]
pub enum ShowError {
    IoError(io::Error),
    ParseError(ParseError),
}

impl Display for ShowError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::IoError(err) => write![f, "{}", err],
            Self::ParseError(err) => write![f, "{}", err],
        }
    }
}

impl error::Error for ShowError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
        }
    }
}

impl From<io::Error> for ShowError {
    fn from(other: io::Error) -> Self {
        Self::IoError(other)
    }
}

impl From<ParseError> for ShowError {
    fn from(other: ParseError) -> Self {
        match other {
            ParseError::IoError(err) => Self::IoError(err),
            err => Self::ParseError(err),
        }
    }
}

pub type ShowResult = Result<(), ShowError>;

/// Prints the tags of every file in `paths`, restricted to the frame ids in `filter` if there
/// are any. Returns whether every file could be read.
pub fn show(paths: Values, filter: &[&str]) -> bool {
    let mut ok = true;

    for path in paths {
        if let Err(err) = show_file(path, filter) {
            // It's okay if a file fails to parse here, just log the problem and move on.
            errorln!("{}: {}", path, err);
            ok = false;
        }
    }

    ok
}

fn show_file(path: &str, filter: &[&str]) -> ShowResult {
    // Validate that this path exists and isn't a directory here, so that a directory
    // isn't cryptically reported as a read failure.
    let path = new_path_safe(path)?;
    let tag = Tag::open(path)?;

    let (major, minor) = tag.version();
    print_header!("Metadata for {} (ID3v2.{}.{}):", path.display(), major, minor);

    let mut shown = 0;

    for frame in tag.frames().frames() {
        if filter.is_empty() || filter.iter().any(|id| frame.id().as_str() == Some(*id)) {
            print_frame(frame);
            shown += 1;
        }
    }

    debug!("showed {} frames of {}", shown, path.display());

    Ok(())
}

fn print_frame(frame: &Frame) {
    match frame.body() {
        FrameBody::CustomText {
            description, value, ..
        } => {
            print_entry!("  {} ({}):", frame.id(), description);
            print_value(value);
        }

        body => {
            print_entry!("  {}:", frame.id());
            print_value(&body.to_string());
        }
    }
}

fn print_value(value: &str) {
    let lines: Vec<&str> = value.lines().filter(|line| !line.is_empty()).collect();

    if lines.len() <= 1 {
        println!(" {}", lines.first().unwrap_or(&""));
    } else {
        println!();

        for line in lines {
            println!("    {}", line);
        }
    }
}

fn new_path_safe(string: &str) -> Result<&Path, io::Error> {
    let path = Path::new(string);

    path.metadata()?;

    if path.is_dir() {
        return Err(io::Error::new(ErrorKind::Other, "Is a directory"));
    }

    Ok(path)
}

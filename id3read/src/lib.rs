//! ID3v2.3 tag decoding.
//!
//! id3read reads the ID3v2.3 tag at the start of an MP3 file and decodes its text and URL
//! frames. Tags are read whole or not at all: anything that does not follow the format is
//! reported as an [`err::ParseError`](err::ParseError) instead of being skipped.
//!
//! The entry point is [`id3v2::Tag`](id3v2::Tag).

#![forbid(unsafe_code)]

mod core;

pub mod err;
pub mod id3v2;
pub mod string;

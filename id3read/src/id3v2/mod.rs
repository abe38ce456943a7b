//! ID3v2.3 tag reading.
//!
//! A tag is a 10-byte [`TagHeader`](TagHeader), an optional [`ExtendedHeader`](ExtendedHeader),
//! and then a run of frames that fills the size the header declares, possibly followed by zero
//! padding. Decoding is all-or-nothing: a single bad frame fails the whole tag.
//!
//! ```no_run
//! use id3read::id3v2::Tag;
//!
//! let tag = Tag::open("song.mp3").unwrap();
//!
//! if let Some(title) = tag.frames().get("TIT2") {
//!     println!("{}", title);
//! }
//! ```

pub mod frame_map;
pub mod frames;
pub mod header;
pub mod syncdata;

pub use frame_map::{FrameEntry, FrameMap};
pub use header::{ExtendedFlags, ExtendedHeader, TagFlags, TagHeader};

use crate::core::BufStream;
use crate::err::{ParseError, ParseResult};
use log::{debug, error, trace, warn};
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

const FRAME_HEADER_SIZE: usize = 10;

/// A decoded ID3v2.3 tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    header: TagHeader,
    extended_header: Option<ExtendedHeader>,
    frames: FrameMap,
}

impl Tag {
    /// Opens the file at `path` and reads a tag from the start of it.
    pub fn open<P: AsRef<Path>>(path: P) -> ParseResult<Self> {
        let file = File::open(path)?;
        Self::read(&mut BufReader::new(file))
    }

    /// Reads a tag from a stream positioned at the start of it. The stream is left right
    /// after the tag, and is never closed.
    pub fn read<R: Read>(reader: &mut R) -> ParseResult<Self> {
        let header = TagHeader::read(reader)?;

        if header.major() != 3 {
            error!("ID3v2.{} tags are not supported", header.major());

            return Err(ParseError::unsupported(format![
                "ID3v2.{}.{} tags are not supported",
                header.major(),
                header.minor()
            ]));
        }

        // Read out the entire tag data based on the header size, so that the rest of the tag
        // can be parsed with the byte budget held in a single stream.
        let size = header.size() as usize;
        let mut data = Vec::new();
        reader.by_ref().take(size as u64).read_to_end(&mut data)?;

        if data.len() < size {
            error!("tag ended after {} of {} bytes", data.len(), size);

            return Err(ParseError::IoError(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!["tag ended after {} of {} bytes", data.len(), size],
            )));
        }

        Self::parse(header, &data)
    }

    /// Parses the data that follows `header`, which must be exactly the size it declares.
    pub(crate) fn parse(header: TagHeader, data: &[u8]) -> ParseResult<Self> {
        let mut stream = BufStream::new(data);

        let extended_header = if header.flags().extended_header {
            let extended_header = ExtendedHeader::parse(&mut stream)?;
            debug!("found extended header of {} bytes", extended_header.size());
            Some(extended_header)
        } else {
            None
        };

        let frames = parse_frames(&mut stream, extended_header.as_ref())?;

        debug!("read tag with {} frame ids", frames.len());

        Ok(Tag {
            header,
            extended_header,
            frames,
        })
    }

    pub fn header(&self) -> &TagHeader {
        &self.header
    }

    pub fn extended_header(&self) -> Option<&ExtendedHeader> {
        self.extended_header.as_ref()
    }

    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    pub fn version(&self) -> (u8, u8) {
        (self.header.major(), self.header.minor())
    }

    /// The size of the tag, not counting the tag header.
    pub fn size(&self) -> u32 {
        self.header.size()
    }
}

fn parse_frames(
    stream: &mut BufStream,
    extended_header: Option<&ExtendedHeader>,
) -> ParseResult<FrameMap> {
    let mut frames = FrameMap::new();

    while !stream.is_empty() {
        // Its assumed the moment we've hit a zero, we've reached the padding
        if stream.peek(0..1)? == [0] {
            check_padding(stream, extended_header)?;
            break;
        }

        if stream.remaining() < FRAME_HEADER_SIZE {
            error!("{} bytes left over after the last frame", stream.remaining());

            return Err(ParseError::bad_format(format![
                "{} trailing bytes are too short to be a frame",
                stream.remaining()
            ]));
        }

        let frame = frames::parse(stream)?;

        trace!("read frame {}, {} bytes left", frame.id(), stream.remaining());

        frames.add(frame)?;
    }

    Ok(frames)
}

fn check_padding(stream: &mut BufStream, extended_header: Option<&ExtendedHeader>) -> ParseResult<()> {
    let pos = stream.pos();
    let padding = stream.take_rest();

    if let Some(offset) = padding.iter().position(|&byte| byte != 0) {
        error!("found data at offset {} in the tag padding", pos + offset);

        return Err(ParseError::bad_format(format![
            "padding contains non-zero data at offset {}",
            pos + offset
        ]));
    }

    if let Some(extended_header) = extended_header {
        if extended_header.padding_size() as usize != padding.len() {
            warn!(
                "extended header declares {} bytes of padding, found {}",
                extended_header.padding_size(),
                padding.len()
            );
        }
    }

    debug!("skipped {} bytes of padding", padding.len());

    Ok(())
}

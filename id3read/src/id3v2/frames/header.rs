use crate::core::{raw, BufStream};
use crate::err::ParseResult;
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// A raw 4-byte frame identifier.
///
/// Nothing is validated here, as whether an id is legal depends on what the frame table
/// knows about, not on the header.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct FrameId([u8; 4]);

impl FrameId {
    pub fn new(id: &[u8; 4]) -> Self {
        Self(*id)
    }

    pub fn inner(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Display for FrameId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        // Frame ids can be arbitrary bytes when they are malformed, so escape anything that
        // isn't printable instead of hiding it.
        for &byte in &self.0 {
            if byte.is_ascii_graphic() {
                write![f, "{}", char::from(byte)]?;
            } else {
                write![f, "\\x{:02X}", byte]?;
            }
        }

        Ok(())
    }
}

// Arrays hash the same as the slice they contain, so this keeps map lookups by &[u8]
// consistent with lookups by FrameId.
impl Borrow<[u8]> for FrameId {
    fn borrow(&self) -> &[u8] {
        &self.0[..]
    }
}

impl PartialEq<[u8; 4]> for FrameId {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0.eq(other)
    }
}

impl PartialEq<&[u8; 4]> for FrameId {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        self.0.eq(*other)
    }
}

/// The 10-byte header in front of every frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameHeader {
    frame_id: FrameId,
    frame_size: u32,
    flags: FrameFlags,
}

impl FrameHeader {
    /// Reads the id, the plain big-endian body size and the two flag bytes.
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let frame_id = FrameId::new(&stream.read_array()?);
        let frame_size = stream.read_u32()?;
        let flags = FrameFlags::parse(stream.read_array()?);

        Ok(FrameHeader {
            frame_id,
            frame_size,
            flags,
        })
    }

    pub fn id(&self) -> FrameId {
        self.frame_id
    }

    /// The size of the frame body, not counting this header.
    pub fn size(&self) -> u32 {
        self.frame_size
    }

    pub fn flags(&self) -> &FrameFlags {
        &self.flags
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FrameFlags {
    pub tag_alter_preservation: bool,
    pub file_alter_preservation: bool,
    pub read_only: bool,
    pub compression: bool,
    pub encryption: bool,
    pub grouping_identity: bool,
}

impl FrameFlags {
    fn parse([status, format]: [u8; 2]) -> Self {
        let [tag_alter_preservation, file_alter_preservation, read_only] =
            raw::bits(status, [0, 1, 2]);

        let [compression, encryption, grouping_identity] = raw::bits(format, [0, 1, 2]);

        FrameFlags {
            tag_alter_preservation,
            file_alter_preservation,
            read_only,
            compression,
            encryption,
            grouping_identity,
        }
    }
}

use crate::core::{raw, BufStream};
use crate::err::{ParseError, ParseResult};
use crate::id3v2::syncdata;
use log::{debug, error, warn};
use std::io::Read;

pub(crate) const ID_HEADER: &[u8] = b"ID3";

/// The 10-byte header every ID3v2 tag starts with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagHeader {
    major: u8,
    minor: u8,
    tag_size: u32,
    flags: TagFlags,
}

impl TagHeader {
    /// Reads exactly 10 bytes from `reader` and parses them as a tag header.
    pub fn read<R: Read>(reader: &mut R) -> ParseResult<Self> {
        let mut raw = [0; 10];
        reader.read_exact(&mut raw)?;
        Self::parse(raw)
    }

    pub(crate) fn parse(raw: [u8; 10]) -> ParseResult<Self> {
        // Verify that this header has a valid ID3 Identifier
        if &raw[0..3] != ID_HEADER {
            error!("expected tag to start with ID3, found {:02X?}", &raw[0..3]);

            return Err(ParseError::bad_format(format![
                "expected tag to start with 'ID3' but found '{}'",
                String::from_utf8_lossy(&raw[0..3])
            ]));
        }

        let major = raw[3];
        let minor = raw[4];

        let flags = TagFlags::parse(raw[5]);

        if flags.unsync {
            error!("tag is unsynchronized");
            return Err(ParseError::unsupported("unsynchronized tags are not supported"));
        }

        let tag_size = syncdata::to_u32([raw[6], raw[7], raw[8], raw[9]]);

        debug!(
            "found ID3v2.{}.{} tag of {} bytes (extended header: {})",
            major, minor, tag_size, flags.extended_header
        );

        Ok(TagHeader {
            major,
            minor,
            tag_size,
            flags,
        })
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// The size of the tag data following this header, in bytes.
    pub fn size(&self) -> u32 {
        self.tag_size
    }

    pub fn flags(&self) -> &TagFlags {
        &self.flags
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TagFlags {
    pub unsync: bool,
    pub extended_header: bool,
    pub experimental: bool,
}

impl TagFlags {
    fn parse(flags: u8) -> Self {
        if flags & 0x1F != 0 {
            warn!("ignoring reserved tag header flags {:#010b}", flags);
        }

        let [unsync, extended_header, experimental] = raw::bits(flags, [0, 1, 2]);

        TagFlags {
            unsync,
            extended_header,
            experimental,
        }
    }
}

/// The optional ID3v2.3 extended header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendedHeader {
    size: u32,
    flags: ExtendedFlags,
    padding_size: u32,
    crc: Option<u32>,
}

const EXT_SIZE_NO_CRC: u32 = 6;
const EXT_SIZE_CRC: u32 = 10;

impl ExtendedHeader {
    /// Parses an extended header, leaving the stream positioned right after it. The stream
    /// is advanced by the 4-byte size field plus exactly the size it declares.
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let size = stream.read_u32()?;

        // The extended header should be 6 or 10 bytes
        if size != EXT_SIZE_NO_CRC && size != EXT_SIZE_CRC {
            error!("invalid extended header size {}", size);

            return Err(ParseError::bad_format(format![
                "extended header size must be 6 or 10, found {}",
                size
            ]));
        }

        let flags = ExtendedFlags::parse(stream.read_u16()?);

        if flags.crc_present != (size == EXT_SIZE_CRC) {
            error!(
                "extended header size {} disagrees with crc flag {}",
                size, flags.crc_present
            );

            return Err(ParseError::bad_format(format![
                "extended header of size {} cannot have crc_present = {}",
                size, flags.crc_present
            ]));
        }

        let padding_size = stream.read_u32()?;

        let crc = if flags.crc_present {
            Some(stream.read_u32()?)
        } else {
            None
        };

        Ok(ExtendedHeader {
            size,
            flags,
            padding_size,
            crc,
        })
    }

    /// The declared size of this header, not counting the size field itself.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn flags(&self) -> &ExtendedFlags {
        &self.flags
    }

    pub fn padding_size(&self) -> u32 {
        self.padding_size
    }

    pub fn crc(&self) -> Option<u32> {
        self.crc
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExtendedFlags {
    pub crc_present: bool,
}

impl ExtendedFlags {
    fn parse(flags: u16) -> Self {
        let [hi, lo] = flags.to_be_bytes();

        if hi & 0x7F != 0 || lo != 0 {
            warn!("ignoring reserved extended header flags {:#06X}", flags);
        }

        let [crc_present] = raw::bits(hi, [0]);

        ExtendedFlags { crc_present }
    }
}

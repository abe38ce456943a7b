//! Tag string handling.

use crate::core::BufStream;
use log::warn;
use std::fmt::{self, Display, Formatter};

/// The text encodings an ID3v2.3 text frame can declare.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encoding {
    /// Single-byte text. Bytes above 0x7F are read as ISO-8859-1, which ASCII is a subset of.
    Ascii,
    /// UTF-16 with a leading BOM that decides the byte order.
    Utf16,
    /// UTF-16BE with no BOM.
    Utf16Be,
    /// UTF-8.
    Utf8,
}

impl Encoding {
    /// The canonical name of this encoding, as reported alongside decoded text.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf8 => "UTF-8",
        }
    }

    /// The width of a single code unit, which is also the width of a NUL terminator.
    pub(crate) fn nul_size(&self) -> usize {
        match self {
            Self::Ascii | Self::Utf8 => 1,
            Self::Utf16 | Self::Utf16Be => 2,
        }
    }

    // Only ASCII and BOM-prefixed UTF-16 text is trimmed of surrounding whitespace.
    // UTF-16BE and UTF-8 text is handed back as it was written.
    fn trims(&self) -> bool {
        matches!(self, Self::Ascii | Self::Utf16)
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.name()]
    }
}

/// Consumes the rest of this stream and decodes it into a string according
/// to the encoding.
pub(crate) fn read(encoding: Encoding, stream: &mut BufStream) -> String {
    decode(encoding, stream.take_rest())
}

/// Decodes a description/value pair that was split out of the same frame. With UTF-16,
/// writers often only put a BOM in front of the first string, so the second one inherits
/// the byte order of the first when it has no BOM of its own.
pub(crate) fn decode_pair(encoding: Encoding, first: &[u8], second: &[u8]) -> (String, String) {
    let first_str = decode(encoding, first);

    let second_str = match (encoding, bom(first), bom(second)) {
        (Encoding::Utf16, Some(order), None) if !second.is_empty() => {
            normalize(encoding, decode_utf16_with(order, second))
        }
        _ => decode(encoding, second),
    };

    (first_str, second_str)
}

/// Decodes `data` according to the encoding, dropping any trailing NUL terminators and trimming
/// whitespace where the encoding calls for it.
pub(crate) fn decode(encoding: Encoding, data: &[u8]) -> String {
    // All our decode operations will copy into owned string, as pretty much every piece of code
    // calling this function will need to own their data.
    let string = match encoding {
        Encoding::Ascii => decode_latin1(data),
        Encoding::Utf16 => decode_utf16(data),
        Encoding::Utf16Be => decode_utf16be(data),
        Encoding::Utf8 => String::from_utf8_lossy(data).into_owned(),
    };

    normalize(encoding, string)
}

fn normalize(encoding: Encoding, string: String) -> String {
    // A lot of text is NUL-terminated even when the format doesn't ask for it. The terminator
    // is not whitespace, so it goes no matter what the encoding is.
    let string = string.trim_end_matches('\0');

    if encoding.trims() {
        string.trim().to_string()
    } else {
        string.to_string()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ByteOrder {
    Little,
    Big,
}

fn bom(data: &[u8]) -> Option<ByteOrder> {
    match data {
        [0xFF, 0xFE, ..] => Some(ByteOrder::Little),
        [0xFE, 0xFF, ..] => Some(ByteOrder::Big),
        _ => None,
    }
}

fn decode_latin1(data: &[u8]) -> String {
    // UTF-8 expresses high bits as two bytes instead of one, so we cannot convert directly.
    // Instead, we simply reinterpret the bytes as chars to make sure the code-points line up.
    data.iter().map(|&byte| char::from(byte)).collect()
}

fn decode_utf16(data: &[u8]) -> String {
    // There must be at least 2 bytes.
    if data.len() < 2 {
        return String::new();
    }

    match bom(data) {
        Some(order) => decode_utf16_with(order, &data[2..]),
        None => {
            warn!("could not determine UTF-16 BOM, defaulting to UTF-16BE");
            decode_utf16be(data)
        }
    }
}

fn decode_utf16_with(order: ByteOrder, data: &[u8]) -> String {
    match order {
        ByteOrder::Little => decode_utf16le(data),
        ByteOrder::Big => decode_utf16be(data),
    }
}

fn decode_utf16be(data: &[u8]) -> String {
    String::from_utf16_lossy(
        data.chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect::<Vec<u16>>()
            .as_slice(),
    )
}

fn decode_utf16le(data: &[u8]) -> String {
    String::from_utf16_lossy(
        data.chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect::<Vec<u16>>()
            .as_slice(),
    )
}

use crate::core::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::string::Encoding;
use log::error;

const FLAG_ASCII: u8 = 0x00;
const FLAG_UTF16: u8 = 0x01;
const FLAG_UTF16BE: u8 = 0x02;
const FLAG_UTF8: u8 = 0x03;

/// Reads the encoding selector byte at the start of a text frame.
pub fn parse(stream: &mut BufStream) -> ParseResult<Encoding> {
    match stream.read_u8()? {
        FLAG_ASCII => Ok(Encoding::Ascii),
        FLAG_UTF16 => Ok(Encoding::Utf16),
        FLAG_UTF16BE => Ok(Encoding::Utf16Be),
        FLAG_UTF8 => Ok(Encoding::Utf8),
        enc => {
            error!("unrecognized encoding {}", enc);

            Err(ParseError::bad_format(format![
                "invalid text encoding {:#04X}",
                enc
            ]))
        }
    }
}

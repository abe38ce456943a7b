use crate::core::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::id3v2::frames::{encoding, FrameBody, FrameId};
use crate::string::{self, Encoding};
use log::{error, trace};

const NUL: [u8; 2] = [0, 0];

pub(crate) fn parse_text(stream: &mut BufStream) -> ParseResult<FrameBody> {
    let (encoding, text) = read_text(stream)?;

    Ok(FrameBody::GeneralText { encoding, text })
}

pub(crate) fn parse_custom(stream: &mut BufStream) -> ParseResult<FrameBody> {
    let encoding = encoding::parse(stream)?;
    let desc = split_description(encoding, stream);
    let (description, value) = string::decode_pair(encoding, desc, stream.take_rest());

    Ok(FrameBody::CustomText {
        encoding,
        description,
        value,
    })
}

pub(crate) fn parse_slash_separated(stream: &mut BufStream) -> ParseResult<FrameBody> {
    let (encoding, text) = read_text(stream)?;
    let parts = text.split('/').map(String::from).collect();

    Ok(FrameBody::SlashSeparatedText { encoding, parts })
}

pub(crate) fn parse_numeric(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<FrameBody> {
    let (encoding, text) = read_text(stream)?;

    let value = text.parse::<u64>().map_err(|_| {
        error!("{} is not a number: {:?}", frame_id, text);
        ParseError::bad_format(format!["{} must be numeric, found {:?}", frame_id, text])
    })?;

    Ok(FrameBody::NumericText { encoding, value })
}

pub(crate) fn parse_year(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<FrameBody> {
    let (encoding, text) = read_text(stream)?;

    // Years are always exactly four digits, so anything else is treated as malformed.
    if text.chars().count() != 4 || !text.chars().all(|ch| ch.is_ascii_digit()) {
        error!("{} is not a year: {:?}", frame_id, text);

        return Err(ParseError::bad_format(format![
            "{} must be a 4-digit year, found {:?}",
            frame_id, text
        ]));
    }

    let value = text.parse::<u16>().map_err(|_| {
        ParseError::bad_format(format!["{} must be a 4-digit year, found {:?}", frame_id, text])
    })?;

    Ok(FrameBody::YearText { encoding, value })
}

fn read_text(stream: &mut BufStream) -> ParseResult<(Encoding, String)> {
    let encoding = encoding::parse(stream)?;
    let text = string::read(encoding, stream);

    Ok((encoding, text))
}

/// Consumes a description from the stream and returns its raw data, leaving the stream at
/// the start of the value that follows it.
///
/// The description ends at the first NUL code unit. A NUL always wins over a space, so ASCII
/// text is only split at its first space when it has no NUL at all. If neither is present,
/// everything is the description.
pub(crate) fn split_description<'a>(encoding: Encoding, stream: &mut BufStream<'a>) -> &'a [u8] {
    if let Some(desc) = stream.search(&NUL[..encoding.nul_size()]) {
        return desc;
    }

    if encoding == Encoding::Ascii {
        if let Some(desc) = stream.search(b" ") {
            return desc;
        }
    }

    trace!("no separator found, treating the whole frame as a description");

    stream.take_rest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with<F>(data: &[u8], parse: F) -> ParseResult<FrameBody>
    where
        F: FnOnce(&mut BufStream) -> ParseResult<FrameBody>,
    {
        parse(&mut BufStream::new(data))
    }

    #[test]
    fn parse_ascii_text() {
        let body = parse_with(b"\x00My Album  ", parse_text).unwrap();

        assert_eq!(
            body,
            FrameBody::GeneralText {
                encoding: Encoding::Ascii,
                text: String::from("My Album"),
            }
        );
        assert_eq!(body.encoding().map(|enc| enc.name()), Some("ASCII"));
    }

    #[test]
    fn parse_utf8_text_untrimmed() {
        let body = parse_with(b"\x03 Caf\xC3\xA9 ", parse_text).unwrap();

        assert_eq!(
            body,
            FrameBody::GeneralText {
                encoding: Encoding::Utf8,
                text: String::from(" Café "),
            }
        );
    }

    #[test]
    fn parse_utf16_text() {
        let body = parse_with(b"\x01\xFF\xFE\x54\x00\x69\x00\x20\x00\x00\x00", parse_text).unwrap();

        assert_eq!(
            body,
            FrameBody::GeneralText {
                encoding: Encoding::Utf16,
                text: String::from("Ti"),
            }
        );
    }

    #[test]
    fn parse_empty_text() {
        let body = parse_with(b"\x00", parse_text).unwrap();

        assert_eq!(
            body,
            FrameBody::GeneralText {
                encoding: Encoding::Ascii,
                text: String::new(),
            }
        );
    }

    #[test]
    fn reject_bad_encoding() {
        let result = parse_with(b"\x07Text", parse_text);
        assert!(matches!(result, Err(ParseError::BadFormat(_))));
    }

    #[test]
    fn parse_custom_ascii_nul() {
        let body = parse_with(b"\x00replaygain_track_gain\x00-6.5 dB", parse_custom).unwrap();

        assert_eq!(
            body,
            FrameBody::CustomText {
                encoding: Encoding::Ascii,
                description: String::from("replaygain_track_gain"),
                value: String::from("-6.5 dB"),
            }
        );
    }

    #[test]
    fn parse_custom_ascii_space() {
        let body = parse_with(b"\x00MOOD calm and slow", parse_custom).unwrap();

        assert_eq!(
            body,
            FrameBody::CustomText {
                encoding: Encoding::Ascii,
                description: String::from("MOOD"),
                value: String::from("calm and slow"),
            }
        );
    }

    #[test]
    fn parse_custom_utf16() {
        let data = b"\x01\xFF\xFE\x4B\x00\x65\x00\x79\x00\x00\x00\xFF\xFE\x56\x00\x20\x00\x61\x00";
        let body = parse_with(data, parse_custom).unwrap();

        assert_eq!(
            body,
            FrameBody::CustomText {
                encoding: Encoding::Utf16,
                description: String::from("Key"),
                value: String::from("V a"),
            }
        );
    }

    #[test]
    fn parse_custom_utf8_no_separator() {
        let body = parse_with(b"\x03Only a description", parse_custom).unwrap();

        assert_eq!(
            body,
            FrameBody::CustomText {
                encoding: Encoding::Utf8,
                description: String::from("Only a description"),
                value: String::new(),
            }
        );
    }

    #[test]
    fn parse_slash_list() {
        let body = parse_with(b"\x00Composer A/Composer B/C", parse_slash_separated).unwrap();

        assert_eq!(
            body,
            FrameBody::SlashSeparatedText {
                encoding: Encoding::Ascii,
                parts: vec![
                    String::from("Composer A"),
                    String::from("Composer B"),
                    String::from("C")
                ],
            }
        );
    }

    #[test]
    fn parse_track_number() {
        let body = parse_with(b"\x0303/12\x00", parse_slash_separated).unwrap();

        assert_eq!(
            body,
            FrameBody::SlashSeparatedText {
                encoding: Encoding::Utf8,
                parts: vec![String::from("03"), String::from("12")],
            }
        );
    }

    #[test]
    fn parse_numeric_text() {
        let body = parse_numeric(FrameId::new(b"TLEN"), &mut BufStream::new(b"\x00216000")).unwrap();

        assert_eq!(
            body,
            FrameBody::NumericText {
                encoding: Encoding::Ascii,
                value: 216000,
            }
        );
    }

    #[test]
    fn reject_non_numeric_text() {
        for data in &[&b"\x0012a"[..], b"\x00", b"\x00-1", b"\x00 1 2"] {
            let result = parse_numeric(FrameId::new(b"TLEN"), &mut BufStream::new(data));
            assert!(matches!(result, Err(ParseError::BadFormat(_))), "{:?}", data);
        }
    }

    #[test]
    fn parse_year_text() {
        let body = parse_year(FrameId::new(b"TYER"), &mut BufStream::new(b"\x002017")).unwrap();

        assert_eq!(
            body,
            FrameBody::YearText {
                encoding: Encoding::Ascii,
                value: 2017,
            }
        );
    }

    #[test]
    fn reject_bad_year() {
        for data in &[&b"\x00201"[..], b"\x0020171", b"\x0020a7", b"\x00+201", b"\x00"] {
            let result = parse_year(FrameId::new(b"TYER"), &mut BufStream::new(data));
            assert!(matches!(result, Err(ParseError::BadFormat(_))), "{:?}", data);
        }
    }

    #[test]
    fn split_description_prefers_nul() {
        let mut stream = BufStream::new(b"a b\0c");

        assert_eq!(split_description(Encoding::Ascii, &mut stream), b"a b");
        assert_eq!(stream.take_rest(), b"c");

        let body = parse_with(b"\x00a b\x00c", parse_custom).unwrap();

        assert_eq!(
            body,
            FrameBody::CustomText {
                encoding: Encoding::Ascii,
                description: String::from("a b"),
                value: String::from("c"),
            }
        );
    }

    #[test]
    fn split_description_consumes_separator() {
        let mut stream = BufStream::new(b"desc\0value");

        assert_eq!(split_description(Encoding::Utf8, &mut stream), b"desc");
        assert_eq!(stream.take_rest(), b"value");
    }
}

//! Frame parsing.
//!
//! An ID3v2 tag is primarily made up of chunks of data called frames. Every frame starts with
//! a [`FrameHeader`](FrameHeader), and its id decides which grammar the body that follows is
//! read with. Only the text and URL frames are understood here, and ids outside of that table
//! are treated as a malformed tag rather than being skipped.

mod encoding;
mod header;
mod text;
mod url;

pub use header::{FrameFlags, FrameHeader, FrameId};

use crate::core::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::string::Encoding;
use log::{error, trace, warn};
use std::fmt::{self, Display, Formatter};

/// A single decoded frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    header: FrameHeader,
    body: FrameBody,
}

impl Frame {
    pub fn id(&self) -> FrameId {
        self.header.id()
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn body(&self) -> &FrameBody {
        &self.body
    }

    /// Whether a tag may contain more than one frame with this id.
    pub fn is_repeatable(&self) -> bool {
        Grammar::for_id(self.id()).map_or(false, Grammar::is_repeatable)
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.body]
    }
}

/// The decoded contents of a frame. Which variant a frame produces is fixed by its id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameBody {
    GeneralText {
        encoding: Encoding,
        text: String,
    },
    CustomText {
        encoding: Encoding,
        description: String,
        value: String,
    },
    SlashSeparatedText {
        encoding: Encoding,
        parts: Vec<String>,
    },
    NumericText {
        encoding: Encoding,
        value: u64,
    },
    YearText {
        encoding: Encoding,
        value: u16,
    },
    Url {
        text: String,
    },
}

impl FrameBody {
    /// The encoding the text of this body was declared with. URLs have no declared encoding.
    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            Self::GeneralText { encoding, .. }
            | Self::CustomText { encoding, .. }
            | Self::SlashSeparatedText { encoding, .. }
            | Self::NumericText { encoding, .. }
            | Self::YearText { encoding, .. } => Some(*encoding),
            Self::Url { .. } => None,
        }
    }
}

impl Display for FrameBody {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::GeneralText { text, .. } | Self::Url { text } => write![f, "{}", text],
            Self::CustomText {
                description, value, ..
            } => write![f, "{}: {}", description, value],
            Self::SlashSeparatedText { parts, .. } => write![f, "{}", parts.join("/")],
            Self::NumericText { value, .. } => write![f, "{}", value],
            Self::YearText { value, .. } => write![f, "{}", value],
        }
    }
}

/// The body grammars a frame id can map to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Grammar {
    GeneralText,
    CustomText,
    SlashSeparatedText,
    NumericText,
    YearText,
    Url,
    UserUrl,
}

impl Grammar {
    /// Looks up the grammar of a frame id, returning `None` if the id is not a known
    /// text or URL frame.
    pub fn for_id(frame_id: FrameId) -> Option<Self> {
        let grammar = match frame_id.inner() {
            // --- Text Information ---
            b"TALB" | b"TCON" | b"TCOP" | b"TDAT" | b"TENC" | b"TFLT" | b"TIME" | b"TIT1"
            | b"TIT2" | b"TIT3" | b"TKEY" | b"TLAN" | b"TMED" | b"TOAL" | b"TOFN" | b"TOWN"
            | b"TPE2" | b"TPE3" | b"TPE4" | b"TPUB" | b"TRDA" | b"TRSN" | b"TRSO" | b"TSRC"
            | b"TSSE" => Self::GeneralText,

            // Lists of people, and the "n/total" position frames
            b"TCOM" | b"TEXT" | b"TOLY" | b"TOPE" | b"TPE1" | b"TPOS" | b"TRCK" => {
                Self::SlashSeparatedText
            }

            b"TBPM" | b"TDLY" | b"TLEN" | b"TSIZ" => Self::NumericText,

            b"TYER" | b"TORY" => Self::YearText,

            // User-Defined Text Information
            b"TXXX" => Self::CustomText,

            // --- URL Link ---
            b"WCOM" | b"WCOP" | b"WOAF" | b"WOAR" | b"WOAS" | b"WORS" | b"WPAY" | b"WPUB" => {
                Self::Url
            }

            // User-Defined URL Link
            b"WXXX" => Self::UserUrl,

            _ => return None,
        };

        Some(grammar)
    }

    /// User-defined frames are keyed by their description, so any number of them can appear.
    pub fn is_repeatable(self) -> bool {
        matches!(self, Self::CustomText | Self::UserUrl)
    }

    pub(crate) fn parse(self, frame_id: FrameId, stream: &mut BufStream) -> ParseResult<FrameBody> {
        match self {
            Self::GeneralText => text::parse_text(stream),
            Self::CustomText => text::parse_custom(stream),
            Self::SlashSeparatedText => text::parse_slash_separated(stream),
            Self::NumericText => text::parse_numeric(frame_id, stream),
            Self::YearText => text::parse_year(frame_id, stream),
            Self::Url => url::parse_url(stream),
            Self::UserUrl => url::parse_user_url(stream),
        }
    }
}

/// Parses a single frame, consuming its header and exactly the body size the header declares.
pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Frame> {
    let header = FrameHeader::parse(stream)?;
    let frame_id = header.id();
    let size = header.size() as usize;

    if size > stream.remaining() {
        error!(
            "frame {} is {} bytes, but only {} bytes of the tag remain",
            frame_id,
            size,
            stream.remaining()
        );

        return Err(ParseError::bad_format(format![
            "frame {} overruns the tag by {} bytes",
            frame_id,
            size - stream.remaining()
        ]));
    }

    let grammar = Grammar::for_id(frame_id).ok_or_else(|| {
        error!("no grammar for frame {}", frame_id);
        ParseError::bad_format(format!["invalid frame id {}", frame_id])
    })?;

    let mut data = BufStream::new(stream.slice(size)?);

    // Compression means that the frame data will be owned by us instead of borrowed from
    // the tag, so keep it alive here and point the body stream at it.
    let decoded = decode_frame(&header, &mut data)?;

    let mut body = match &decoded {
        Some(decoded) => BufStream::new(decoded),
        None => data,
    };

    // Empty frames are treated as a sign of a malformed tag.
    if body.is_empty() {
        error!("frame {} is empty", frame_id);
        return Err(ParseError::bad_format(format!["frame {} is empty", frame_id]));
    }

    trace!("parsing frame {} as {:?}", frame_id, grammar);

    let body = grammar.parse(frame_id, &mut body)?;

    Ok(Frame { header, body })
}

fn decode_frame(header: &FrameHeader, data: &mut BufStream) -> ParseResult<Option<Vec<u8>>> {
    let frame_id = header.id();
    let flags = header.flags();

    // The extra fields the flags add all come before the frame data, in the order of the flags.
    // Compression adds the decompressed size of the data.
    let decompressed_size = if flags.compression {
        Some(data.read_u32()?)
    } else {
        None
    };

    // Encryption. Will never be supported since its usually vendor-specific
    if flags.encryption {
        warn!("encryption is not supported for frame {}", frame_id);

        return Err(ParseError::unsupported(format![
            "frame {} is encrypted",
            frame_id
        ]));
    }

    // Frame grouping. Pretty much nobody uses this, so its ignored.
    if flags.grouping_identity {
        data.skip(1)?;
    }

    match decompressed_size {
        Some(size) => inflate_frame(frame_id, size, data).map(Some),
        None => Ok(None),
    }
}

#[cfg(feature = "id3v2_zlib")]
fn inflate_frame(frame_id: FrameId, size: u32, src: &mut BufStream) -> ParseResult<Vec<u8>> {
    let data = miniz_oxide::inflate::decompress_to_vec_zlib(src.take_rest()).map_err(|err| {
        error!("could not decompress frame {}: {:?}", frame_id, err);
        ParseError::bad_format(format!["could not decompress frame {}", frame_id])
    })?;

    if data.len() != size as usize {
        error!(
            "frame {} decompressed to {} bytes, expected {}",
            frame_id,
            data.len(),
            size
        );

        return Err(ParseError::bad_format(format![
            "frame {} decompressed to {} bytes instead of {}",
            frame_id,
            data.len(),
            size
        ]));
    }

    Ok(data)
}

#[cfg(not(feature = "id3v2_zlib"))]
fn inflate_frame(frame_id: FrameId, _: u32, _: &mut BufStream) -> ParseResult<Vec<u8>> {
    warn!("frame decompression is not enabled");

    Err(ParseError::unsupported(format![
        "frame {} is compressed",
        frame_id
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_data(id: &[u8; 4], flags: [u8; 2], body: &[u8]) -> Vec<u8> {
        let mut data = id.to_vec();
        data.extend(&(body.len() as u32).to_be_bytes());
        data.extend(&flags);
        data.extend(body);
        data
    }

    #[test]
    fn parse_text_frame() {
        let data = frame_data(b"TIT2", [0, 0], b"\x00Song Title");
        let mut stream = BufStream::new(&data);
        let frame = parse(&mut stream).unwrap();

        assert_eq!(frame.id(), b"TIT2");
        assert_eq!(frame.header().size(), 11);
        assert_eq!(
            frame.body(),
            &FrameBody::GeneralText {
                encoding: Encoding::Ascii,
                text: String::from("Song Title")
            }
        );
        assert_eq!(frame.to_string(), "Song Title");
        assert!(!frame.is_repeatable());
        assert!(stream.is_empty());
    }

    #[test]
    fn parse_leaves_following_frames() {
        let mut data = frame_data(b"TRCK", [0, 0], b"\x003/12");
        data.extend(b"TPE1");

        let mut stream = BufStream::new(&data);
        let frame = parse(&mut stream).unwrap();

        assert_eq!(frame.to_string(), "3/12");
        assert_eq!(stream.take_rest(), b"TPE1");
    }

    #[test]
    fn parse_user_frames() {
        let data = frame_data(b"TXXX", [0, 0], b"\x00KEY\x00value");
        let frame = parse(&mut BufStream::new(&data)).unwrap();

        assert_eq!(frame.to_string(), "KEY: value");
        assert!(frame.is_repeatable());

        let data = frame_data(b"WXXX", [0, 0], b"\x00Site\x00http://x.org");
        let frame = parse(&mut BufStream::new(&data)).unwrap();

        assert_eq!(frame.to_string(), "Site: http://x.org");
        assert!(frame.is_repeatable());
    }

    #[test]
    fn dispatch_by_id() {
        let cases: &[(&[u8; 4], Grammar)] = &[
            (b"TALB", Grammar::GeneralText),
            (b"TCON", Grammar::GeneralText),
            (b"TSSE", Grammar::GeneralText),
            (b"TCOM", Grammar::SlashSeparatedText),
            (b"TPE1", Grammar::SlashSeparatedText),
            (b"TRCK", Grammar::SlashSeparatedText),
            (b"TLEN", Grammar::NumericText),
            (b"TBPM", Grammar::NumericText),
            (b"TYER", Grammar::YearText),
            (b"TORY", Grammar::YearText),
            (b"TXXX", Grammar::CustomText),
            (b"WOAR", Grammar::Url),
            (b"WXXX", Grammar::UserUrl),
        ];

        for (id, grammar) in cases {
            assert_eq!(Grammar::for_id(FrameId::new(id)), Some(*grammar), "{:?}", id);
        }

        for id in &[b"APIC", b"COMM", b"IPLS", b"ZZZZ", b"tit2", b"\0\0\0\0"] {
            assert_eq!(Grammar::for_id(FrameId::new(id)), None);
        }
    }

    #[test]
    fn reject_unknown_frame() {
        let data = frame_data(b"APIC", [0, 0], b"\x00image/png\x00\x03\x00\x89PNG");
        let result = parse(&mut BufStream::new(&data));

        match result {
            Err(ParseError::BadFormat(msg)) => assert!(msg.contains("invalid frame id")),
            other => panic!("expected invalid frame id, found {:?}", other),
        }
    }

    #[test]
    fn reject_overrunning_frame() {
        let mut data = frame_data(b"TIT2", [0, 0], b"\x00Title");
        data.truncate(data.len() - 2);

        let result = parse(&mut BufStream::new(&data));
        assert!(matches!(result, Err(ParseError::BadFormat(_))));
    }

    #[test]
    fn reject_empty_frame() {
        let data = frame_data(b"TIT2", [0, 0], b"");
        let result = parse(&mut BufStream::new(&data));
        assert!(matches!(result, Err(ParseError::BadFormat(_))));

        let data = frame_data(b"WOAR", [0, 0x20], b"\x01");
        let result = parse(&mut BufStream::new(&data));
        assert!(matches!(result, Err(ParseError::BadFormat(_))));
    }

    #[test]
    fn reject_encrypted_frame() {
        let data = frame_data(b"TIT2", [0, 0x40], b"\x80\x00Secret");
        let result = parse(&mut BufStream::new(&data));

        assert!(matches!(result, Err(ParseError::Unsupported(_))));
    }

    #[test]
    fn skip_group_byte() {
        let data = frame_data(b"TIT2", [0, 0x20], b"\x05\x00Grouped");
        let frame = parse(&mut BufStream::new(&data)).unwrap();

        assert!(frame.header().flags().grouping_identity);
        assert_eq!(frame.to_string(), "Grouped");
    }

    #[test]
    fn keep_status_flags() {
        let data = frame_data(b"TIT2", [0xE0, 0], b"\x00Title");
        let frame = parse(&mut BufStream::new(&data)).unwrap();
        let flags = frame.header().flags();

        assert!(flags.tag_alter_preservation);
        assert!(flags.file_alter_preservation);
        assert!(flags.read_only);
        assert_eq!(frame.to_string(), "Title");
    }

    #[test]
    #[cfg(feature = "id3v2_zlib")]
    fn parse_compressed_frame() {
        let text = b"\x00A fairly long title that is worth compressing";

        let mut body = (text.len() as u32).to_be_bytes().to_vec();
        body.extend(miniz_oxide::deflate::compress_to_vec_zlib(text, 6));

        let data = frame_data(b"TIT2", [0, 0x80], &body);
        let frame = parse(&mut BufStream::new(&data)).unwrap();

        assert_eq!(
            frame.to_string(),
            "A fairly long title that is worth compressing"
        );
    }

    #[test]
    #[cfg(feature = "id3v2_zlib")]
    fn reject_bad_compressed_frame() {
        let text = b"\x00Title";

        let mut body = 100u32.to_be_bytes().to_vec();
        body.extend(miniz_oxide::deflate::compress_to_vec_zlib(text, 6));

        let data = frame_data(b"TIT2", [0, 0x80], &body);
        let result = parse(&mut BufStream::new(&data));
        assert!(matches!(result, Err(ParseError::BadFormat(_))));

        let data = frame_data(b"TIT2", [0, 0x80], b"\x00\x00\x00\x06garbage");
        let result = parse(&mut BufStream::new(&data));
        assert!(matches!(result, Err(ParseError::BadFormat(_))));
    }

    #[test]
    #[cfg(not(feature = "id3v2_zlib"))]
    fn reject_compressed_frame() {
        let data = frame_data(b"TIT2", [0, 0x80], b"\x00\x00\x00\x06\x78\x9C");
        let result = parse(&mut BufStream::new(&data));

        assert!(matches!(result, Err(ParseError::Unsupported(_))));
    }
}

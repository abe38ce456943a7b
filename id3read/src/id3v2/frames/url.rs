use crate::core::BufStream;
use crate::err::ParseResult;
use crate::id3v2::frames::{encoding, text, FrameBody};
use crate::string;

pub(crate) fn parse_url(stream: &mut BufStream) -> ParseResult<FrameBody> {
    Ok(FrameBody::Url {
        text: read_url(stream),
    })
}

pub(crate) fn parse_user_url(stream: &mut BufStream) -> ParseResult<FrameBody> {
    let encoding = encoding::parse(stream)?;
    let desc = text::split_description(encoding, stream);

    Ok(FrameBody::CustomText {
        encoding,
        description: string::decode(encoding, desc),
        value: read_url(stream),
    })
}

fn read_url(stream: &mut BufStream) -> String {
    // URLs are always ISO-8859-1 and are kept exactly as written, apart from the terminator
    // some writers add.
    let url: String = stream.take_rest().iter().map(|&byte| char::from(byte)).collect();
    url.trim_end_matches('\0').to_string()
}

#![no_main]

use id3read::id3v2::Tag;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Any input is fair game, the only requirement is that decoding never panics.
    let _ = Tag::read(&mut Cursor::new(data));
});

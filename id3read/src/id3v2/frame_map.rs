use crate::err::{ParseError, ParseResult};
use crate::id3v2::frames::{Frame, FrameId};
use indexmap::map::{Entry, Iter, Keys};
use indexmap::IndexMap;
use log::error;
use std::ops::Index;
use std::slice;

/// The frames of a tag, keyed by frame id in the order each id first appeared.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrameMap {
    map: IndexMap<FrameId, FrameEntry>,
}

/// Every occurrence of a frame id within a tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameEntry {
    Single(Frame),
    Repeated(Vec<Frame>),
}

impl FrameEntry {
    /// The occurrences of this id, in file order.
    pub fn frames(&self) -> &[Frame] {
        match self {
            Self::Single(frame) => slice::from_ref(frame),
            Self::Repeated(frames) => frames,
        }
    }
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame. Repeatable frames are appended to the frames already under their id,
    /// while any other frame must be the only one of its id.
    pub fn add(&mut self, frame: Frame) -> ParseResult<()> {
        match self.map.entry(frame.id()) {
            Entry::Vacant(entry) => {
                if frame.is_repeatable() {
                    entry.insert(FrameEntry::Repeated(vec![frame]));
                } else {
                    entry.insert(FrameEntry::Single(frame));
                }
            }

            Entry::Occupied(mut entry) => match entry.get_mut() {
                FrameEntry::Repeated(frames) => frames.push(frame),
                FrameEntry::Single(_) => {
                    error!("found a second {} frame", frame.id());

                    return Err(ParseError::bad_format(format![
                        "duplicate frame {}",
                        frame.id()
                    ]));
                }
            },
        }

        Ok(())
    }

    /// Returns the first frame with the given id.
    pub fn get(&self, id: &str) -> Option<&Frame> {
        self.get_all(id).first()
    }

    /// Returns every frame with the given id, which is empty if there are none.
    pub fn get_all(&self, id: &str) -> &[Frame] {
        self.map
            .get(id.as_bytes())
            .map_or(&[][..], FrameEntry::frames)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id.as_bytes())
    }

    pub fn keys(&self) -> Keys<'_, FrameId, FrameEntry> {
        self.map.keys()
    }

    pub fn iter(&self) -> Iter<'_, FrameId, FrameEntry> {
        self.map.iter()
    }

    /// Iterates over every frame, grouped by id in the order the ids first appeared.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.map.values().flat_map(FrameEntry::frames)
    }

    /// The number of distinct frame ids.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Index<&str> for FrameMap {
    type Output = Frame;

    fn index(&self, id: &str) -> &Self::Output {
        &self.map[id.as_bytes()].frames()[0]
    }
}

impl<'a> IntoIterator for &'a FrameMap {
    type Item = (&'a FrameId, &'a FrameEntry);
    type IntoIter = Iter<'a, FrameId, FrameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BufStream;
    use crate::id3v2::frames;

    fn make_frame(id: &[u8; 4], body: &[u8]) -> Frame {
        let mut data = id.to_vec();
        data.extend(&(body.len() as u32).to_be_bytes());
        data.extend(&[0, 0]);
        data.extend(body);

        frames::parse(&mut BufStream::new(&data)).unwrap()
    }

    #[test]
    fn add_single_frames() {
        let mut map = FrameMap::new();

        map.add(make_frame(b"TIT2", b"\x00Title")).unwrap();
        map.add(make_frame(b"TALB", b"\x00Album")).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["TIT2"].to_string(), "Title");
        assert_eq!(map.get("TALB").unwrap().to_string(), "Album");
        assert_eq!(map.get_all("TALB").len(), 1);
        assert!(map.get("TPE1").is_none());
        assert!(map.get_all("TPE1").is_empty());
        assert!(map.contains("TIT2"));
        assert!(!map.contains("TPE1"));
    }

    #[test]
    fn accumulate_repeated_frames() {
        let mut map = FrameMap::new();

        map.add(make_frame(b"TXXX", b"\x00A\x001")).unwrap();
        map.add(make_frame(b"TIT2", b"\x00Title")).unwrap();
        map.add(make_frame(b"TXXX", b"\x00B\x002")).unwrap();
        map.add(make_frame(b"WXXX", b"\x00C\x00http://c.org")).unwrap();

        assert_eq!(map.len(), 3);

        let custom: Vec<String> = map.get_all("TXXX").iter().map(Frame::to_string).collect();
        assert_eq!(custom, ["A: 1", "B: 2"]);

        assert!(matches!(
            map.iter().next(),
            Some((_, FrameEntry::Repeated(frames))) if frames.len() == 2
        ));
        assert!(matches!(map.get_all("WXXX"), [_]));
    }

    #[test]
    fn reject_duplicate_frames() {
        let mut map = FrameMap::new();

        map.add(make_frame(b"TIT2", b"\x00Title")).unwrap();
        let result = map.add(make_frame(b"TIT2", b"\x00Other"));

        assert!(matches!(result, Err(ParseError::BadFormat(_))));
        assert_eq!(map["TIT2"].to_string(), "Title");
    }

    #[test]
    fn keep_first_occurrence_order() {
        let mut map = FrameMap::new();

        map.add(make_frame(b"TXXX", b"\x00A\x001")).unwrap();
        map.add(make_frame(b"TPE1", b"\x00Artist")).unwrap();
        map.add(make_frame(b"TIT2", b"\x00Title")).unwrap();
        map.add(make_frame(b"TXXX", b"\x00B\x002")).unwrap();

        let ids: Vec<String> = map.keys().map(FrameId::to_string).collect();
        assert_eq!(ids, ["TXXX", "TPE1", "TIT2"]);

        let frames: Vec<String> = map.frames().map(Frame::to_string).collect();
        assert_eq!(frames, ["A: 1", "B: 2", "Artist", "Title"]);

        let ids: Vec<FrameId> = (&map).into_iter().map(|(id, _)| *id).collect();
        assert_eq!(ids[1], b"TPE1");
    }
}

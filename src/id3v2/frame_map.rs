//! [`FrameMap`]: the ordered, key-merging collection known frames are stored
//! in, plus [`UnknownFrames`], the side list raw unrecognized-frame bytes
//! accumulate into.

use crate::id3v2::frame::Frame;
use crate::id3v2::frames::{credits, text, timestamp};
use crate::id3v2::header::Version;
use indexmap::map::{Entry, IndexMap};
use std::ops::{Index, IndexMut};

/// An ordered collection of known frames, keyed by [`Frame::key`] rather than
/// [`Frame::id`] so that frames which can legally repeat (`TXXX`, `WXXX`,
/// `COMM`, `APIC`, `PRIV`, `UFID`) coexist instead of overwriting each other.
#[derive(Clone, Debug, Default)]
pub struct FrameMap {
    map: IndexMap<String, Box<dyn Frame>>,
}

impl FrameMap {
    pub fn new() -> Self {
        FrameMap { map: IndexMap::new() }
    }

    /// Inserts `frame`, overwriting any frame already stored under the same key.
    /// This is the behavior of the default `loaded_frame` hook.
    pub fn insert_boxed(&mut self, frame: Box<dyn Frame>) -> Option<Box<dyn Frame>> {
        self.map.insert(frame.key(), frame)
    }

    /// Inserts `frame`, merging it into an existing frame under the same key
    /// when both are a mergeable type (text, credits, or timestamp lists)
    /// rather than overwriting. Frames that aren't mergeable, or that don't
    /// collide with an existing key, behave like [`insert_boxed`](Self::insert_boxed).
    pub fn add_boxed(&mut self, mut frame: Box<dyn Frame>) {
        let key = frame.key();

        match self.map.entry(key) {
            Entry::Occupied(mut slot) => {
                if !merge_into(slot.get_mut().as_mut(), frame.as_mut()) {
                    slot.insert(frame);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(frame);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn Frame> {
        self.map.get(key).map(|f| f.as_ref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn Frame + 'static)> {
        self.map.get_mut(key).map(|f| f.as_mut())
    }

    /// All frames sharing the given frame ID, regardless of key suffix.
    pub fn get_all(&self, id: &str) -> Vec<&dyn Frame> {
        self.map.values().filter(|f| f.id() == id).map(|f| f.as_ref()).collect()
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Frame>> {
        self.map.shift_remove(key)
    }

    pub fn remove_all(&mut self, id: &str) -> Vec<Box<dyn Frame>> {
        let keys: Vec<String> = self
            .map
            .iter()
            .filter(|(_, f)| f.id() == id)
            .map(|(k, _)| k.clone())
            .collect();

        keys.into_iter().filter_map(|k| self.map.shift_remove(&k)).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn contains_any(&self, id: &str) -> bool {
        self.map.values().any(|f| f.id() == id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &dyn Frame> {
        self.map.values().map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Index<&str> for FrameMap {
    type Output = dyn Frame;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).expect("no frame stored under this key")
    }
}

impl IndexMut<&str> for FrameMap {
    fn index_mut(&mut self, key: &str) -> &mut Self::Output {
        self.get_mut(key).expect("no frame stored under this key")
    }
}

impl<'a> IntoIterator for &'a FrameMap {
    type Item = &'a dyn Frame;
    type IntoIter = Box<dyn Iterator<Item = &'a dyn Frame> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.values())
    }
}

/// Merges `incoming` into `existing` in place when both downcast to the same
/// mergeable type, returning whether a merge happened.
fn merge_into(existing: &mut dyn Frame, incoming: &mut dyn Frame) -> bool {
    if let (Some(e), Some(i)) = (
        existing.downcast_mut::<text::TextFrame>(),
        incoming.downcast_mut::<text::TextFrame>(),
    ) {
        e.text.extend(i.text.drain(..));
        return true;
    }

    if let (Some(e), Some(i)) = (
        existing.downcast_mut::<text::UserTextFrame>(),
        incoming.downcast_mut::<text::UserTextFrame>(),
    ) {
        e.text.extend(i.text.drain(..));
        return true;
    }

    if let (Some(e), Some(i)) = (
        existing.downcast_mut::<timestamp::TimestampFrame>(),
        incoming.downcast_mut::<timestamp::TimestampFrame>(),
    ) {
        e.timestamps.extend(i.timestamps.drain(..));
        return true;
    }

    if let (Some(e), Some(i)) = (
        existing.downcast_mut::<credits::CreditsFrame>(),
        incoming.downcast_mut::<credits::CreditsFrame>(),
    ) {
        for (role, person) in i.people.drain(..) {
            e.people.insert(role, person);
        }
        return true;
    }

    false
}

/// Raw bytes (10-byte header plus payload) for frames the registry didn't
/// recognize, preserved verbatim so a save doesn't silently drop them.
#[derive(Clone, Debug, Default)]
pub struct UnknownFrames {
    version: Option<Version>,
    frames: Vec<Vec<u8>>,
}

impl UnknownFrames {
    pub fn new() -> Self {
        UnknownFrames { version: None, frames: Vec::new() }
    }

    pub(crate) fn push(&mut self, version: Version, raw: Vec<u8>) {
        self.version = Some(version);
        self.frames.push(raw);
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::BufStream;

    #[test]
    fn add_boxed_merges_repeated_text_frames() {
        let mut map = FrameMap::new();
        map.add_boxed(Box::new(text::TextFrame::parse("TPE1", &mut BufStream::new(b"\x00Artist One"))));
        map.add_boxed(Box::new(text::TextFrame::parse("TPE1", &mut BufStream::new(b"\x00Artist Two"))));

        let frame = map.get("TPE1").unwrap().downcast::<text::TextFrame>().unwrap();
        assert_eq!(frame.text, vec!["Artist One".to_string(), "Artist Two".to_string()]);
    }

    #[test]
    fn add_boxed_keeps_distinct_txxx_keys_separate() {
        let mut map = FrameMap::new();
        map.add_boxed(Box::new(text::UserTextFrame::parse(&mut BufStream::new(b"\x00A\x001"))));
        map.add_boxed(Box::new(text::UserTextFrame::parse(&mut BufStream::new(b"\x00B\x002"))));

        assert_eq!(map.len(), 2);
        assert!(map.contains("TXXX:A"));
        assert!(map.contains("TXXX:B"));
    }

    #[test]
    fn insert_boxed_overwrites() {
        let mut map = FrameMap::new();
        map.insert_boxed(Box::new(text::TextFrame::parse("TIT2", &mut BufStream::new(b"\x00First"))));
        map.insert_boxed(Box::new(text::TextFrame::parse("TIT2", &mut BufStream::new(b"\x00Second"))));

        let frame = map.get("TIT2").unwrap().downcast::<text::TextFrame>().unwrap();
        assert_eq!(frame.text, vec!["Second".to_string()]);
    }
}

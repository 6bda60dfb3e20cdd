//! [`Tag`]: the ID3v2 container itself. Ties together the header, the
//! optional extended header, and the frame loop into a single load/save API.
//!
//! Frames the registry recognizes are kept in a [`FrameMap`]; anything else
//! is kept verbatim in [`UnknownFrames`] so a save round-trip doesn't drop
//! bytes a reader couldn't make sense of.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use log::warn;

use crate::core::io::{write_replaced, BufStream};
use crate::err::{SaveError, SaveResult, TagResult};
use crate::id3v2::frame::{self, Frame};
use crate::id3v2::frame_map::{FrameMap, UnknownFrames};
use crate::id3v2::frames;
use crate::id3v2::header::{ExtendedHeader, FrameHeader, TagFlags, TagHeader, Version};
use crate::id3v2::unsynch;

/// Padding appended after the last frame on save, matching the common
/// practice of leaving slack so that small metadata edits don't have to
/// rewrite the whole file.
const PADDING_SIZE: usize = 2048;

/// A parsed ID3v2 tag: its version, tag-level flags, the frames the
/// registry recognized (keyed by [`Frame::key`]), and the raw bytes of any
/// it didn't.
#[derive(Clone, Debug)]
pub struct Tag {
    version: Version,
    minor: u8,
    flags: TagFlags,
    frames: FrameMap,
    unknown_frames: UnknownFrames,
}

/// Customizes how a just-parsed frame is folded into the tag's [`FrameMap`].
/// The default ([`DefaultHook`]) overwrites any existing frame stored under
/// the same key; [`MergeHook`] instead merges repeated text/timestamp/credits
/// frames together. Callers with their own key-derivation needs (e.g.
/// grouping `TXXX` frames by a normalized description) can implement this
/// directly.
pub trait LoadHook {
    fn loaded_frame(&self, frames: &mut FrameMap, frame: Box<dyn Frame>);

    /// Whether `frame_id` should be parsed into a concrete frame type at all.
    /// A frame this returns `false` for is kept verbatim in
    /// [`Tag::unknown_frames`] instead, the same as an ID the built-in
    /// registry doesn't recognize. Defaults to the built-in registry; override
    /// to shrink or replace it, e.g. [`NoRegistryHook`] treats everything as
    /// unknown.
    fn is_known(&self, frame_id: &str) -> bool {
        frames::is_known(frame_id)
    }
}

/// Stores each frame under its key, replacing whatever was there before.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHook;

impl LoadHook for DefaultHook {
    fn loaded_frame(&self, frames: &mut FrameMap, frame: Box<dyn Frame>) {
        frames.insert_boxed(frame);
    }
}

/// Merges a newly parsed frame into an existing one under the same key when
/// both are a mergeable type (text, user-text, timestamp, or credits lists).
#[derive(Clone, Copy, Debug, Default)]
pub struct MergeHook;

impl LoadHook for MergeHook {
    fn loaded_frame(&self, frames: &mut FrameMap, frame: Box<dyn Frame>) {
        frames.add_boxed(frame);
    }
}

/// Treats every frame ID as unknown, so a load keeps the whole tag verbatim
/// in [`Tag::unknown_frames`] instead of decoding any of it into concrete
/// frame types. Useful for inspecting a tag's raw frame layout, or for
/// re-saving a tag completely unmodified.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRegistryHook;

impl LoadHook for NoRegistryHook {
    fn loaded_frame(&self, frames: &mut FrameMap, frame: Box<dyn Frame>) {
        frames.insert_boxed(frame);
    }

    fn is_known(&self, _frame_id: &str) -> bool {
        false
    }
}

impl Tag {
    /// An empty tag of the given version, ready to have frames inserted.
    pub fn new(version: Version) -> Self {
        Tag {
            version,
            minor: 0,
            flags: TagFlags::default(),
            frames: FrameMap::new(),
            unknown_frames: UnknownFrames::new(),
        }
    }

    /// Reads and parses the ID3v2 tag at the start of the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> TagResult<Tag> {
        let mut file = File::open(path)?;
        Self::read_from(&mut file)
    }

    /// Like [`open`](Self::open), but with a [`LoadHook`] controlling how
    /// parsed frames are folded into the result.
    pub fn open_with_hook<P: AsRef<Path>, H: LoadHook>(path: P, hook: &H) -> TagResult<Tag> {
        let mut file = File::open(path)?;
        Self::read_from_with_hook(&mut file, hook)
    }

    /// Reads and parses an ID3v2 tag from the start of `reader`, which must
    /// support seeking back to its own start.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> TagResult<Tag> {
        Self::read_from_with_hook(reader, &DefaultHook)
    }

    /// Like [`read_from`](Self::read_from), but with an explicit [`LoadHook`].
    pub fn read_from_with_hook<R: Read + Seek, H: LoadHook>(
        reader: &mut R,
        hook: &H,
    ) -> TagResult<Tag> {
        reader.seek(SeekFrom::Start(0))?;

        let mut header_raw = [0u8; 10];
        reader.read_exact(&mut header_raw)?;

        let mut header_stream = BufStream::new(&header_raw);
        let mut header = TagHeader::parse(&mut header_stream)?;

        let mut body = vec![0u8; header.size()];
        reader.read_exact(&mut body)?;

        Self::parse_body(&mut header, body, hook)
    }

    fn parse_body<H: LoadHook>(
        header: &mut TagHeader,
        body: Vec<u8>,
        hook: &H,
    ) -> TagResult<Tag> {
        let version = header.version();
        let mut flags = *header.flags();

        let mut decoded = Vec::new();
        let mut cursor = BufStream::new(&body);

        if flags.unsync {
            decoded = unsynch::decode(&body)?;
            cursor = BufStream::new(&decoded);
        }

        if flags.extended {
            if ExtendedHeader::parse(version, &mut cursor).is_err() {
                // A tagger set the flag but didn't write a well-formed
                // extended header; correct it and keep going rather than
                // aborting the whole tag.
                flags.extended = false;
            }
        }

        let mut frames = FrameMap::new();
        let mut unknown = UnknownFrames::new();

        if version != Version::V22 {
            Self::frame_loop(version, &mut cursor, &mut frames, &mut unknown, hook);
        }

        Ok(Tag {
            version,
            minor: header.minor(),
            flags,
            frames,
            unknown_frames: unknown,
        })
    }

    /// Consumes frames from `cursor` until padding, exhaustion, or an
    /// unrecoverable desync (a frame size that would run past the tag
    /// bound). Frames whose size is well-formed but whose payload fails to
    /// decode (bad zlib stream, unsync violation) are preserved verbatim in
    /// `unknown` rather than dropped, since the size is still trustworthy
    /// enough to keep iterating.
    fn frame_loop<H: LoadHook>(
        version: Version,
        cursor: &mut BufStream,
        frames: &mut FrameMap,
        unknown: &mut UnknownFrames,
        hook: &H,
    ) {
        loop {
            if cursor.remaining() < 10 {
                break;
            }

            match cursor.peek(0..1) {
                Ok([0]) => break,
                Ok(_) => {}
                Err(_) => break,
            }

            // Parsed from a clone of the whole remaining cursor (not just
            // this frame's 10 header bytes) so the ID3v2.4 iTunes
            // non-syncsafe-size fallback can peek ahead for the next
            // frame's ID; the body is then sliced from the original
            // cursor using the size this determines, and never re-parsed,
            // so that lookahead result can't be silently recomputed away.
            let mut probe = cursor.clone();
            let frame_header = match FrameHeader::parse(version, &mut probe) {
                Ok(header) => header,
                Err(_) => break,
            };

            let total_len = 10 + frame_header.size();

            let raw = match cursor.slice(total_len) {
                Ok(raw) => raw,
                Err(_) => break,
            };

            if !hook.is_known(frame_header.id()) {
                unknown.push(version, raw.to_vec());
                continue;
            }

            let body = BufStream::new(&raw[10..]);

            match frame::parse(version, &frame_header, body) {
                Ok(parsed) => hook.loaded_frame(frames, parsed),
                Err(err) => {
                    warn!(
                        target: "id3v2",
                        "dropping corrupt frame {}: {:?}",
                        frame_header.id(),
                        err
                    );
                    unknown.push(version, raw.to_vec());
                }
            }
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    pub fn flags(&self) -> &TagFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut TagFlags {
        &mut self.flags
    }

    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut FrameMap {
        &mut self.frames
    }

    pub fn unknown_frames(&self) -> &UnknownFrames {
        &self.unknown_frames
    }

    pub fn get(&self, key: &str) -> Option<&dyn Frame> {
        self.frames.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.frames.contains(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Frame>> {
        self.frames.remove(key)
    }

    pub fn insert(&mut self, frame: Box<dyn Frame>) -> Option<Box<dyn Frame>> {
        self.frames.insert_boxed(frame)
    }

    /// Renders this tag to bytes under its own stored version, padded to a
    /// stable size. Fails if the stored version is ID3v2.2, which this
    /// crate can read but not write.
    pub fn render(&self) -> SaveResult<Vec<u8>> {
        self.render_as(self.version)
    }

    /// Renders this tag under a specific writable version (2.3 or 2.4),
    /// independent of the version it was parsed as.
    pub fn render_as(&self, version: Version) -> SaveResult<Vec<u8>> {
        if version == Version::V22 {
            return Err(SaveError::UnsupportedVersion(version.major()));
        }

        let mut body = Vec::new();

        for frame in self.frames.values() {
            if frame.is_empty() {
                continue;
            }

            body.extend(frame::render(version, frame)?);
        }

        if self.unknown_frames.version() == Some(version) {
            for raw in self.unknown_frames.frames() {
                body.extend(raw);
            }
        } else if !self.unknown_frames.is_empty() {
            warn!(
                target: "id3v2",
                "dropping {} unknown frame(s) saved under a different tag version",
                self.unknown_frames.len()
            );
        }

        let mut out_flags = self.flags;
        out_flags.extended = false;

        if out_flags.unsync {
            body = unsynch::encode(&body);
        }

        body.resize(body.len() + PADDING_SIZE, 0);

        if body.len() > 256_000_000 {
            return Err(SaveError::TooLarge);
        }

        let header = TagHeader::new(version, self.minor, out_flags);
        let mut out = header.render(body.len() as u32).to_vec();
        out.extend(body);

        Ok(out)
    }

    /// Writes this tag into the start of the file at `path`, replacing any
    /// existing ID3v2 tag there and preserving the rest of the file
    /// (audio data) unchanged.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SaveResult<()> {
        let rendered = self.render()?;
        let old_size = Self::existing_tag_span(path.as_ref()).unwrap_or(0);
        write_replaced(path, &rendered, old_size)?;
        Ok(())
    }

    /// The byte length of the ID3v2 tag (header + body) already at the
    /// start of the file, if any, so `save` can overwrite just that span.
    fn existing_tag_span(path: &Path) -> Option<u64> {
        let mut file = File::open(path).ok()?;
        let mut header_raw = [0u8; 10];
        file.read_exact(&mut header_raw).ok()?;

        let mut stream = BufStream::new(&header_raw);
        let header = TagHeader::parse(&mut stream).ok()?;

        Some(10 + header.size() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3v2::frames::text::TextFrame;

    fn v23_header(body_len: u32, flags: u8) -> Vec<u8> {
        let mut out = vec![b'I', b'D', b'3', 3, 0, flags];
        out.extend(crate::id3v2::synchsafe::from_u28(body_len));
        out
    }

    fn text_frame_bytes(id: &[u8; 4], text: &str) -> Vec<u8> {
        let mut payload = vec![0u8];
        payload.extend(text.as_bytes());

        let mut out = Vec::new();
        out.extend(id);
        out.extend((payload.len() as u32).to_be_bytes());
        out.extend([0u8, 0u8]);
        out.extend(payload);
        out
    }

    #[test]
    fn parses_known_and_unknown_frames() {
        let mut body = Vec::new();
        body.extend(text_frame_bytes(b"TALB", "Quod Libet Test Data"));
        body.extend(text_frame_bytes(b"TIT2", "Silence"));

        let mut unknown_frame = Vec::new();
        unknown_frame.extend(b"ZZZZ");
        unknown_frame.extend(3u32.to_be_bytes());
        unknown_frame.extend([0u8, 0u8]);
        unknown_frame.extend(b"xyz");
        body.extend(&unknown_frame);

        let mut data = v23_header(body.len() as u32, 0);
        data.extend(&body);

        let mut cursor = std::io::Cursor::new(data);
        let tag = Tag::read_from(&mut cursor).unwrap();

        assert_eq!(tag.version(), Version::V23);
        assert_eq!(tag.frames().len(), 2);
        assert_eq!(tag.unknown_frames().len(), 1);

        let talb = tag.get("TALB").unwrap().downcast::<TextFrame>().unwrap();
        assert!(talb.text.iter().any(|s| s == "Quod Libet Test Data"));
    }

    #[test]
    fn stops_at_padding() {
        let mut body = Vec::new();
        body.extend(text_frame_bytes(b"TIT2", "Song"));
        body.extend(vec![0u8; 20]);

        let mut data = v23_header(body.len() as u32, 0);
        data.extend(&body);

        let mut cursor = std::io::Cursor::new(data);
        let tag = Tag::read_from(&mut cursor).unwrap();

        assert_eq!(tag.frames().len(), 1);
        assert!(tag.unknown_frames().is_empty());
    }

    #[test]
    fn unrecoverable_size_stops_the_whole_loop() {
        let mut body = Vec::new();
        body.extend(text_frame_bytes(b"TIT2", "Song"));

        // A second frame header claiming a size far larger than what's
        // actually left: this should abort the loop rather than panic or
        // read out of bounds, and the first frame should still be kept.
        body.extend(b"TPE1");
        body.extend(500u32.to_be_bytes());
        body.extend([0u8, 0u8]);
        body.extend(b"short");

        let mut data = v23_header(body.len() as u32, 0);
        data.extend(&body);

        let mut cursor = std::io::Cursor::new(data);
        let tag = Tag::read_from(&mut cursor).unwrap();

        assert_eq!(tag.frames().len(), 1);
        assert!(tag.get("TPE1").is_none());
    }

    #[test]
    fn rejects_missing_header() {
        let data = b"not an id3 tag..".to_vec();
        let mut cursor = std::io::Cursor::new(data);
        assert!(Tag::read_from(&mut cursor).is_err());
    }

    #[test]
    fn render_then_reparse_roundtrips() {
        let mut tag = Tag::new(Version::V24);
        let mut frame = TextFrame::new("TALB");
        frame.text = vec!["Roundtrip Album".to_string()];
        tag.insert(Box::new(frame));

        let rendered = tag.render().unwrap();
        let mut cursor = std::io::Cursor::new(rendered);
        let parsed = Tag::read_from(&mut cursor).unwrap();

        let talb = parsed.get("TALB").unwrap().downcast::<TextFrame>().unwrap();
        assert_eq!(talb.text, vec!["Roundtrip Album".to_string()]);
    }

    #[test]
    fn cannot_render_v22() {
        let tag = Tag::new(Version::V22);
        assert!(tag.render().is_err());
    }

    #[test]
    fn no_registry_hook_treats_every_frame_as_unknown() {
        let mut body = Vec::new();
        body.extend(text_frame_bytes(b"TALB", "Quod Libet Test Data"));
        body.extend(text_frame_bytes(b"TIT2", "Silence"));
        body.extend(text_frame_bytes(b"TPE1", "Artist"));

        let mut data = v23_header(body.len() as u32, 0);
        data.extend(&body);

        let mut cursor = std::io::Cursor::new(data);
        let tag = Tag::read_from_with_hook(&mut cursor, &NoRegistryHook).unwrap();

        assert_eq!(tag.frames().len(), 0);
        assert_eq!(tag.unknown_frames().len(), 3);
    }

    #[test]
    fn merge_hook_accumulates_repeated_text_frames() {
        let mut body = Vec::new();
        body.extend(text_frame_bytes(b"TPE1", "First"));
        body.extend(text_frame_bytes(b"TPE1", "Second"));

        let mut data = v23_header(body.len() as u32, 0);
        data.extend(&body);

        let mut cursor = std::io::Cursor::new(data);
        let tag = Tag::read_from_with_hook(&mut cursor, &MergeHook).unwrap();

        let tpe1 = tag.get("TPE1").unwrap().downcast::<TextFrame>().unwrap();
        assert_eq!(tpe1.text, vec!["First".to_string(), "Second".to_string()]);
    }
}

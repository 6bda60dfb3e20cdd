//! The `Frame` trait, dispatch from a raw frame header into a concrete frame
//! type, and the payload-level transforms (decompression, frame-level
//! unsynchronisation, grouping/data-length-indicator skips) that sit between
//! the two.
//!
//! Frames are kept behind `Box<dyn Frame>` rather than a giant enum: the
//! ID3v2 frame zoo is heterogeneous enough (word text, numeric text,
//! timestamps, binary blobs, role maps) that a single enum would either grow
//! a huge number of near-duplicate variants or smuggle unrelated fields
//! together. [`dyn Frame`] exposes `downcast`/`is` for callers who need a
//! concrete type back.

use crate::core::io::BufStream;
use crate::err::{ParseError, ParseResult, SaveError, SaveResult};
use crate::id3v2::frames;
use crate::id3v2::header::{FrameHeader, Version};
use crate::id3v2::unsynch;
use dyn_clone::DynClone;
use log::warn;
use std::any::Any;
use std::fmt::{Debug, Display};

pub trait Frame: Display + Debug + AsAny + DynClone {
    /// The four-character frame ID this frame was parsed from, or will be
    /// written under.
    fn id(&self) -> &str;

    /// The key this frame is stored under in a [`FrameMap`](crate::id3v2::frame_map::FrameMap).
    /// Usually equal to [`id`](Frame::id), except for frames that can
    /// legally repeat (`TXXX`, `WXXX`, `COMM`, `APIC`, `PRIV`, `UFID`), which
    /// suffix the ID with a distinguishing description.
    fn key(&self) -> String;

    /// Whether this frame has no meaningful content and should be dropped on save.
    fn is_empty(&self) -> bool;

    /// Renders this frame's payload (without the 10-byte frame header).
    fn render(&self, version: Version) -> Vec<u8>;

    /// Whether this frame's primary payload (the sole text value for a text
    /// frame, the URL for a URL frame, the raw bytes for a binary frame)
    /// equals `other`. Frames with no single primary payload (credits lists,
    /// pictures) always return `false`.
    fn payload_eq(&self, _other: &str) -> bool {
        false
    }

    /// The integer reading of this frame's primary payload, for frames where
    /// that's meaningful (numeric and numeric-part text frames). Returns
    /// `None` for every other frame.
    fn to_integer(&self) -> Option<i64> {
        None
    }
}

impl dyn Frame {
    pub fn is<T: Frame>(&self) -> bool {
        self.as_any(Sealed(())).is::<T>()
    }

    pub fn downcast<T: Frame>(&self) -> Option<&T> {
        self.as_any(Sealed(())).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Frame>(&mut self) -> Option<&mut T> {
        self.as_any_mut(Sealed(())).downcast_mut::<T>()
    }
}

pub trait AsAny: Any {
    fn as_any(&self, _: Sealed) -> &dyn Any;
    fn as_any_mut(&mut self, _: Sealed) -> &mut dyn Any;
}

impl<T: Frame> AsAny for T {
    fn as_any(&self, _: Sealed) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self, _: Sealed) -> &mut dyn Any {
        self
    }
}

dyn_clone::clone_trait_object!(Frame);

/// A token restricting [`AsAny`]'s methods to callers inside this crate.
pub struct Sealed(());

/// Parses one frame's payload given its already-parsed header, applying
/// whatever flag-driven transforms the header declares. `body` must hold
/// exactly `header.size()` bytes. The header is parsed once, by the caller,
/// from whatever buffer it has on hand (the tag loader uses the full
/// remaining tag so the ID3v2.4 iTunes size quirk can look ahead to the next
/// frame); re-parsing it here from just this frame's own bytes would lose
/// that lookahead and could recompute a different size than the one `body`
/// was already sliced to. Returns `Err` if the payload itself is broken (bad
/// zlib stream, unsync violation); the caller decides whether that means
/// dropping just this frame or aborting the whole loop.
pub(crate) fn parse(
    version: Version,
    header: &FrameHeader,
    mut body: BufStream,
) -> ParseResult<Box<dyn Frame>> {
    let flags = *header.flags();

    if flags.encrypted {
        warn!(target: "id3v2", "encryption is not supported for frame {}", header.id());
        return Ok(Box::new(frames::bin::UnknownFrame::new(
            header.id().to_string(),
            body.take_rest().to_vec(),
        )));
    }

    let mut decoded = Vec::new();

    if flags.unsync {
        decoded = unsynch::decode(body.take_rest())?;
        body = BufStream::new(&decoded);
    }

    if flags.has_group {
        body.skip(1).map_err(|_| ParseError::NotEnoughData)?;
    }

    // Some taggers don't flip the data-length-indicator bit when compression
    // is on; treat compression as implying it.
    if flags.has_data_len || flags.compressed {
        body.skip(4).map_err(|_| ParseError::NotEnoughData)?;
    }

    if flags.compressed {
        decoded = inflate(body.take_rest(), header.id())?;
        body = BufStream::new(&decoded);
    }

    let _ = &decoded;

    frames::dispatch(version, header.id(), &mut body)
}

#[cfg(feature = "id3v2_zlib")]
fn inflate(src: &[u8], frame_id: &str) -> ParseResult<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec_zlib(src).map_err(|err| {
        warn!(target: "id3v2", "could not decompress frame {}: {:?}", frame_id, err);
        ParseError::InvalidData
    })
}

#[cfg(not(feature = "id3v2_zlib"))]
fn inflate(_src: &[u8], frame_id: &str) -> ParseResult<Vec<u8>> {
    warn!(target: "id3v2", "frame decompression is not enabled, dropping {}", frame_id);
    Err(ParseError::Unsupported)
}

/// Test-only convenience: parses a single frame (header + payload) from the
/// front of `stream` in one call. Only has as much lookahead for the iTunes
/// size quirk as `stream` itself provides past this one frame; the tag
/// loader never uses this, since it parses the header separately against
/// the whole remaining tag buffer instead (see [`parse`]).
#[cfg(test)]
fn parse_standalone(version: Version, stream: &mut BufStream) -> ParseResult<Box<dyn Frame>> {
    let header = FrameHeader::parse(version, stream)?;
    let body = stream
        .slice_stream(header.size())
        .map_err(|_| ParseError::NotEnoughData)?;
    parse(version, &header, body)
}


/// The largest payload a single ID3v2.4 frame can declare: 2^28 - 1, the
/// largest value a 4-byte synchsafe integer can hold.
const MAX_V24_FRAME_SIZE: usize = 0x0FFF_FFFF;

/// Renders a frame's header plus payload, applying the version-appropriate
/// size encoding. The header's flag byte is always written as zero: the point
/// of carrying this many flags is read compatibility, not round-tripping
/// every bit a writer might set.
///
/// Fails with [`SaveError::TooLarge`] for an ID3v2.4 frame whose payload
/// can't fit in a synchsafe size field; checking here, before the header is
/// rendered, keeps [`crate::id3v2::synchsafe::from_u28`] from ever being
/// asked to encode an out-of-range value.
pub(crate) fn render(version: Version, frame: &dyn Frame) -> SaveResult<Vec<u8>> {
    let payload = frame.render(version);

    if version == Version::V24 && payload.len() > MAX_V24_FRAME_SIZE {
        return Err(SaveError::TooLarge);
    }

    let mut header = FrameHeader::new(frame.id(), crate::id3v2::header::FrameFlags::default());
    header.set_size(payload.len());

    let mut out = header.render(version);
    out.extend(payload);
    Ok(out)
}

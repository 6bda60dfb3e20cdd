//! Reader/writer for the ID3 metadata container attached to audio files.
//!
//! This crate covers the tag itself: the ID3v2 header, its optional
//! whole-tag transforms (unsynchronisation, the extended header), the
//! frame-parsing engine driven by per-frame field specs, the concrete frame
//! types built on top of it, and the fixed-layout ID3v1 trailer. Audio-file
//! I/O beyond locating the tag block, MP3 frame scanning, and any
//! higher-level music-library glue are out of scope; callers hand this
//! crate a byte slice (or a path) and get a [`id3v2::Tag`] back.

#![forbid(unsafe_code)]

pub mod core;
pub mod err;
pub mod id3v1;
pub mod id3v2;
pub mod string;

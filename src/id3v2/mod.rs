//! ID3v2: the variable-length tag format that precedes (2.3/2.4) or can
//! follow (2.2, read-only here) an MP3 stream.
//!
//! ```no_run
//! use id3meta::id3v2::Tag;
//!
//! let tag = Tag::open("song.mp3").unwrap();
//! println!("{}", tag.frames().get("TIT2").map(ToString::to_string).unwrap_or_default());
//! ```

pub mod frame;
pub mod frame_map;
pub mod frames;
pub mod genre;
pub mod header;
pub mod lang;
pub mod spec;
pub mod synchsafe;
pub mod tag;
pub mod timestamp;
pub mod unsynch;

pub use frame::Frame;
pub use frame_map::{FrameMap, UnknownFrames};
pub use header::Version;
pub use tag::Tag;

//! The concrete frame types and the ID → type dispatch that builds one from
//! an already flag-normalized payload stream.
//!
//! [`dispatch`] is the only thing [`crate::id3v2::frame::parse`] calls into;
//! everything else here is either a concrete [`crate::id3v2::frame::Frame`]
//! implementation or a helper for one.

pub mod apic;
pub mod bin;
pub mod comments;
pub mod credits;
pub mod tcon;
pub mod text;
pub mod timestamp;
pub mod url;

use crate::core::io::BufStream;
use crate::err::ParseResult;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;

/// Numeric and numeric-part text frames that still parse through the
/// generic `TextFrame`, distinguished only by [`text::TextFrame::to_integer`].
const TIMESTAMP_IDS: &[&str] = &["TDEN", "TDOR", "TDRC", "TDRL", "TDTG"];

pub(crate) fn dispatch(
    _version: Version,
    frame_id: &str,
    stream: &mut BufStream,
) -> ParseResult<Box<dyn Frame>> {
    let frame: Box<dyn Frame> = match frame_id {
        "UFID" => Box::new(bin::FileIdFrame::parse(stream)),
        "PRIV" => Box::new(bin::PrivateFrame::parse(stream)),
        "MCDI" => Box::new(bin::BinaryFrame::parse(frame_id, stream)),

        "TXXX" => Box::new(text::UserTextFrame::parse(stream)),
        "WXXX" => Box::new(url::UserUrlFrame::parse(stream)),

        "COMM" | "USLT" | "USER" => Box::new(comments::LangTextFrame::parse(frame_id, stream)),

        "APIC" => Box::new(apic::AttachedPictureFrame::parse(stream)),

        "IPLS" | "TIPL" | "TMCL" => Box::new(credits::CreditsFrame::parse(frame_id, stream)),

        "TCON" => Box::new(tcon::GenreFrame::parse(stream)),

        id if TIMESTAMP_IDS.contains(&id) => {
            Box::new(timestamp::TimestampFrame::parse(frame_id, stream))
        }

        id if id.starts_with('T') => Box::new(text::TextFrame::parse(frame_id, stream)),
        id if id.starts_with('W') => Box::new(url::UrlFrame::parse(frame_id, stream)),

        _ => Box::new(bin::UnknownFrame::new(
            frame_id.to_string(),
            stream.take_rest().to_vec(),
        )),
    };

    Ok(frame)
}

/// Whether `frame_id` is dispatched to a concrete frame type by [`dispatch`],
/// rather than falling through to the generic binary [`bin::UnknownFrame`].
/// The tag loader uses this to decide whether a frame's raw bytes belong in
/// the known [`crate::id3v2::frame_map::FrameMap`] or the side
/// [`crate::id3v2::frame_map::UnknownFrames`] list.
pub(crate) fn is_known(frame_id: &str) -> bool {
    matches!(
        frame_id,
        "UFID" | "PRIV" | "MCDI" | "TXXX" | "WXXX" | "COMM" | "USLT" | "USER" | "APIC" | "IPLS"
            | "TIPL" | "TMCL" | "TCON"
    ) || TIMESTAMP_IDS.contains(&frame_id)
        || frame_id.starts_with('T')
        || frame_id.starts_with('W')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_known_text_frame() {
        let data = b"\x00Quod Libet Test Data";
        let mut stream = BufStream::new(data);
        let frame = dispatch(Version::V23, "TALB", &mut stream).unwrap();
        assert_eq!(frame.id(), "TALB");
        assert!(frame.payload_eq("Quod Libet Test Data"));
    }

    #[test]
    fn dispatches_unrecognized_id_to_unknown() {
        let data = b"whatever";
        let mut stream = BufStream::new(data);
        let frame = dispatch(Version::V23, "ZZZZ", &mut stream).unwrap();
        assert_eq!(frame.id(), "ZZZZ");
        assert!(frame.downcast::<bin::UnknownFrame>().is_some());
    }
}

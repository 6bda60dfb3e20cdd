//! Word, numeric, and numeric-part text frames (`T***` except `TXXX`), plus
//! the user-defined `TXXX` frame.
//!
//! All of these share the same payload shape: an encoding byte followed by
//! one or more NUL-delimited strings. They differ only in how their numeric
//! coercion is computed, which [`TextFrame::to_integer`] dispatches on the
//! frame ID rather than carrying a separate type per numeric flavor.

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::id3v2::spec::{check_encoding, parse_encoding, parse_text_list, render_text_list};
use crate::string::{self, Encoding};
use std::fmt::{self, Display, Formatter};

/// Frame IDs whose numeric coercion reads the whole of `text[0]`.
const NUMERIC_IDS: &[&str] = &["TBPM", "TLEN", "TDLY", "TSIZ", "TYER", "TORY"];

/// Frame IDs whose numeric coercion reads the prefix of `text[0]` before a `/`.
const NUMERIC_PART_IDS: &[&str] = &["TRCK", "TPOS"];

#[derive(Clone, Debug)]
pub struct TextFrame {
    frame_id: String,
    pub encoding: Encoding,
    pub text: Vec<String>,
}

impl TextFrame {
    pub fn new(frame_id: &str) -> Self {
        TextFrame {
            frame_id: frame_id.to_string(),
            encoding: Encoding::default(),
            text: Vec::new(),
        }
    }

    pub(crate) fn parse(frame_id: &str, stream: &mut BufStream) -> Self {
        // A frame with no bytes at all (or just the encoding byte) is a
        // known real-world broken-but-parseable case; fall back to an empty
        // text list rather than failing the whole frame.
        if stream.is_empty() {
            return TextFrame::new(frame_id);
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let text = parse_text_list(encoding, stream);

        TextFrame {
            frame_id: frame_id.to_string(),
            encoding,
            text,
        }
    }
}

impl Frame for TextFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        self.frame_id.clone()
    }

    fn is_empty(&self) -> bool {
        self.text.iter().all(|s| s.is_empty())
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let mut out = vec![encoding.as_byte()];
        out.extend(render_text_list(encoding, &self.text));
        out
    }

    fn payload_eq(&self, other: &str) -> bool {
        self.text.last().map_or(false, |s| s == other)
    }

    fn to_integer(&self) -> Option<i64> {
        let first = self.text.first()?;

        if NUMERIC_IDS.contains(&self.frame_id.as_str()) {
            parse_leading_int(first)
        } else if NUMERIC_PART_IDS.contains(&self.frame_id.as_str()) {
            parse_leading_int(first.split('/').next().unwrap_or(""))
        } else {
            None
        }
    }
}

impl Display for TextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text.join("/"))
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// `TXXX`: a user-defined text frame keyed by its free-text description
/// rather than its frame ID, so that multiple `TXXX` frames can coexist in
/// the same tag.
#[derive(Clone, Debug)]
pub struct UserTextFrame {
    pub encoding: Encoding,
    pub desc: String,
    pub text: Vec<String>,
}

impl UserTextFrame {
    pub fn new(desc: &str) -> Self {
        UserTextFrame {
            encoding: Encoding::default(),
            desc: desc.to_string(),
            text: Vec::new(),
        }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return UserTextFrame::new("");
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let desc = string::read_terminated(encoding, stream);
        let text = parse_text_list(encoding, stream);

        UserTextFrame { encoding, desc, text }
    }
}

impl Frame for UserTextFrame {
    fn id(&self) -> &str {
        "TXXX"
    }

    fn key(&self) -> String {
        format!("TXXX:{}", self.desc)
    }

    fn is_empty(&self) -> bool {
        self.text.iter().all(|s| s.is_empty())
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let mut out = vec![encoding.as_byte()];
        out.extend(string::render_terminated(encoding, &self.desc));
        out.extend(render_text_list(encoding, &self.text));
        out
    }

    fn payload_eq(&self, other: &str) -> bool {
        self.text.last().map_or(false, |s| s == other)
    }
}

impl Display for UserTextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_value() {
        let data = b"\x00Quod Libet Test Data";
        let mut stream = BufStream::new(data);
        let frame = TextFrame::parse("TALB", &mut stream);
        assert_eq!(frame.text, vec!["Quod Libet Test Data".to_string()]);
        assert!(frame.payload_eq("Quod Libet Test Data"));
    }

    #[test]
    fn numeric_coercion() {
        let data = b"\x003000";
        let mut stream = BufStream::new(data);
        let frame = TextFrame::parse("TLEN", &mut stream);
        assert_eq!(frame.to_integer(), Some(3000));
    }

    #[test]
    fn numeric_part_coercion() {
        let data = b"\x0002/10";
        let mut stream = BufStream::new(data);
        let frame = TextFrame::parse("TRCK", &mut stream);
        assert_eq!(frame.to_integer(), Some(2));
        assert!(frame.payload_eq("02/10"));
    }

    #[test]
    fn year_coercion() {
        let data = b"\x002004";
        let mut stream = BufStream::new(data);
        let frame = TextFrame::parse("TYER", &mut stream);
        assert_eq!(frame.to_integer(), Some(2004));
    }

    #[test]
    fn empty_frame_defaults_leniently() {
        let data: &[u8] = &[];
        let mut stream = BufStream::new(data);
        let frame = TextFrame::parse("TIT2", &mut stream);
        assert!(frame.text.is_empty());
        assert_eq!(frame.encoding, Encoding::Latin1);
    }

    #[test]
    fn word_frame_has_no_integer() {
        let data = b"\x00Rock";
        let mut stream = BufStream::new(data);
        let frame = TextFrame::parse("TIT2", &mut stream);
        assert_eq!(frame.to_integer(), None);
    }

    #[test]
    fn txxx_keys_by_description() {
        let data = b"\x00Replay Gain\x001.0 dB";
        let mut stream = BufStream::new(data);
        let frame = UserTextFrame::parse(&mut stream);
        assert_eq!(frame.key(), "TXXX:Replay Gain");
        assert_eq!(frame.text, vec!["1.0 dB".to_string()]);
    }
}

//! `TCON`: genre. Wire-compatible with a plain text frame, but exposes a
//! decoded `genres()` view that expands the ID3v1 numeric-code escape
//! grammar (see [`crate::id3v2::genre`]).

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::genre;
use crate::id3v2::header::Version;
use crate::id3v2::spec::{check_encoding, parse_encoding, parse_text_list, render_text_list};
use crate::string::Encoding;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug)]
pub struct GenreFrame {
    pub encoding: Encoding,
    pub text: Vec<String>,
}

impl GenreFrame {
    pub fn new() -> Self {
        GenreFrame {
            encoding: Encoding::default(),
            text: Vec::new(),
        }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return GenreFrame::new();
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let text = parse_text_list(encoding, stream);

        GenreFrame { encoding, text }
    }

    /// The decoded, human-readable genre names.
    pub fn genres(&self) -> Vec<String> {
        genre::decode(&self.text)
    }

    /// Replaces the stored text with the parenthesized-numeric encoding of
    /// `names`, preferring a genre code when one exists for the name.
    pub fn set_genres(&mut self, names: &[String]) {
        self.text = genre::encode(names);
    }
}

impl Default for GenreFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame for GenreFrame {
    fn id(&self) -> &str {
        "TCON"
    }

    fn key(&self) -> String {
        "TCON".to_string()
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
}

impl Display for GenreFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.genres().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_grammar() {
        let mut data = vec![0x00u8];
        data.extend(b"(20)(CR)\x0030\x00\x00Another\x00(51)Hooray");
        let mut stream = BufStream::new(&data);
        let frame = GenreFrame::parse(&mut stream);
        assert_eq!(
            frame.genres(),
            vec!["Alternative", "Cover", "Fusion", "Another", "Techno-Industrial", "Hooray"]
        );
    }

    #[test]
    fn set_genres_prefers_numeric_form() {
        let mut frame = GenreFrame::new();
        frame.set_genres(&["Ska".to_string()]);
        assert_eq!(frame.text, vec!["(21)".to_string()]);
    }
}

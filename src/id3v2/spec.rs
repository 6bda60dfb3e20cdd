//! Small field-level helpers shared by the concrete frame types: the
//! encoding byte, NUL-delimited multi-string text lists, and the version
//! downgrade a too-new encoding needs on write.

use crate::core::io::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::id3v2::header::Version;
use crate::string::{self, Encoding};
use log::info;

/// Reads the one-byte encoding discriminant every text-bearing frame starts with.
pub fn parse_encoding(stream: &mut BufStream) -> ParseResult<Encoding> {
    Encoding::parse(stream.read_u8().map_err(|_| ParseError::NotEnoughData)?)
}

/// Downgrades `encoding` to something legal for `version`, since ID3v2.3
/// readers choke on the `Utf16Be`/`Utf8` byte values that only exist in 2.4.
pub fn check_encoding(encoding: Encoding, version: Version) -> Encoding {
    if version < Version::V24 && !encoding.valid_for_v3() {
        info!(target: "id3v2", "downgrading {:?} to Utf16 for ID3v2.{}", encoding, version.major());
        return Encoding::Utf16;
    }

    encoding
}

/// Reads a list of NUL-delimited strings until the stream is exhausted.
/// Empty strings produced by trailing padding are dropped, matching the
/// tolerance real-world files need.
pub fn parse_text_list(encoding: Encoding, stream: &mut BufStream) -> Vec<String> {
    let mut text = Vec::new();

    while !stream.is_empty() {
        let string = string::read_terminated(encoding, stream);

        if !string.is_empty() {
            text.push(string);
        }
    }

    text
}

/// Renders a list of strings, NUL-delimited except after the last entry.
pub fn render_text_list(encoding: Encoding, text: &[String]) -> Vec<u8> {
    let mut result = Vec::new();

    for (i, string) in text.iter().enumerate() {
        if i > 0 {
            result.resize(result.len() + encoding.nul_size(), 0);
        }

        result.extend(string::render(encoding, string));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downgrades_on_old_versions() {
        assert_eq!(check_encoding(Encoding::Utf8, Version::V23), Encoding::Utf16);
        assert_eq!(check_encoding(Encoding::Utf8, Version::V24), Encoding::Utf8);
    }

    #[test]
    fn text_list_roundtrip() {
        let strings = vec!["Post-Rock".to_string(), "Electronica".to_string()];
        let rendered = render_text_list(Encoding::Latin1, &strings);
        let mut stream = BufStream::new(&rendered);
        assert_eq!(parse_text_list(Encoding::Latin1, &mut stream), strings);
    }

    #[test]
    fn text_list_drops_padding() {
        let data = b"hello\0\0\0";
        let mut stream = BufStream::new(data);
        assert_eq!(parse_text_list(Encoding::Latin1, &mut stream), vec!["hello".to_string()]);
    }
}

//! Tag string encoding/decoding.
//!
//! ID3v2 frames carry a one-byte encoding discriminant ahead of their text fields.
//! The byte values are part of the wire format, so [`Encoding`] is laid out to match
//! them exactly rather than being renumbered for convenience.

use crate::core::io::BufStream;
use crate::err::ParseError;
use log::warn;

/// A text encoding as declared by an `EncodingSpec` byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encoding {
    /// ISO-8859-1 / Latin-1. Non-Latin-1 codepoints are flattened to `?` on write.
    Latin1 = 0,
    /// UTF-16 with a leading byte-order mark.
    Utf16 = 1,
    /// UTF-16BE with no byte-order mark. Only legal in ID3v2.4.
    Utf16Be = 2,
    /// UTF-8. Only legal in ID3v2.4.
    Utf8 = 3,
}

impl Encoding {
    /// Parses an encoding byte, failing if it isn't one of the four known values.
    pub fn parse(byte: u8) -> Result<Self, ParseError> {
        match byte {
            0 => Ok(Self::Latin1),
            1 => Ok(Self::Utf16),
            2 => Ok(Self::Utf16Be),
            3 => Ok(Self::Utf8),
            _ => Err(ParseError::InvalidEncoding),
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this encoding is legal in an ID3v2.3 tag. 2.3 only knows about
    /// Latin-1 and BOM'd UTF-16; 2.3 writers must not emit `Utf16Be`/`Utf8`.
    pub fn valid_for_v3(self) -> bool {
        matches!(self, Self::Latin1 | Self::Utf16)
    }

    pub(crate) fn nul_size(self) -> usize {
        match self {
            Self::Latin1 | Self::Utf8 => 1,
            Self::Utf16 | Self::Utf16Be => 2,
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::Latin1
    }
}

/// Consumes the rest of `stream` and decodes it according to `encoding`.
pub fn read(encoding: Encoding, stream: &mut BufStream) -> String {
    decode(encoding, stream.take_rest())
}

/// Decodes a raw byte slice as Latin-1, with no terminator handling. Used by
/// the ID3v1 reader, whose fixed-width fields carry no encoding byte and are
/// always Latin-1.
pub fn from_latin1(data: &[u8]) -> String {
    decode_latin1(data)
}

/// Reads a NUL-terminated string, leniently tolerating the single stray NUL that
/// real-world UTF-16 frames sometimes carry instead of the expected double NUL.
pub fn read_terminated(encoding: Encoding, stream: &mut BufStream) -> String {
    let data = match encoding.nul_size() {
        1 => stream.search(&[0]),
        2 => search_utf16_terminator(stream),
        _ => unreachable!(),
    };

    decode(encoding, data)
}

/// Scans for a double-NUL terminator aligned on an even byte boundary. A lone
/// `0x00` landing on an odd offset is real-world misalignment, not a
/// terminator, and is simply stepped over until an aligned pair turns up.
fn search_utf16_terminator<'a>(stream: &mut BufStream<'a>) -> &'a [u8] {
    let mut i = 0;

    while i + 1 < stream.remaining() {
        if let Ok(pair) = stream.peek(i..i + 2) {
            if pair == [0, 0] {
                let data = stream.peek(0..i).unwrap_or(&[]);
                let _ = stream.skip(i + 2);
                return data;
            }
        }

        i += 2;
    }

    stream.take_rest()
}

/// Renders a string (without a terminator) according to `encoding`.
pub fn render(encoding: Encoding, string: &str) -> Vec<u8> {
    match encoding {
        Encoding::Latin1 => encode_latin1(string),
        Encoding::Utf16 => encode_utf16(string),
        Encoding::Utf16Be => encode_utf16be(string),
        Encoding::Utf8 => string.as_bytes().to_vec(),
    }
}

/// Renders a string plus its encoding-appropriate NUL terminator.
pub fn render_terminated(encoding: Encoding, string: &str) -> Vec<u8> {
    let mut result = render(encoding, string);
    result.resize(result.len() + encoding.nul_size(), 0);
    result
}

fn decode(encoding: Encoding, data: &[u8]) -> String {
    let data = match encoding.nul_size() {
        1 => data.strip_suffix(&[0]).unwrap_or(data),
        2 => data.strip_suffix(&[0, 0]).unwrap_or(data),
        _ => unreachable!(),
    };

    match encoding {
        Encoding::Latin1 => decode_latin1(data),
        Encoding::Utf16 => decode_utf16(data),
        Encoding::Utf16Be => decode_utf16be(data),
        Encoding::Utf8 => String::from_utf8_lossy(data).to_string(),
    }
}

fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&byte| char::from(byte)).collect()
}

fn decode_utf16(data: &[u8]) -> String {
    if data.len() < 2 {
        return String::new();
    }

    match (data[0], data[1]) {
        (0xFF, 0xFE) => decode_utf16le(&data[2..]),
        (0xFE, 0xFF) => decode_utf16be(&data[2..]),
        _ => {
            warn!(target: "id3v2", "could not determine UTF-16 BOM, defaulting to UTF-16LE");
            decode_utf16le(data)
        }
    }
}

fn decode_utf16be(data: &[u8]) -> String {
    String::from_utf16_lossy(
        data.chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect::<Vec<u16>>()
            .as_slice(),
    )
}

fn decode_utf16le(data: &[u8]) -> String {
    String::from_utf16_lossy(
        data.chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect::<Vec<u16>>()
            .as_slice(),
    )
}

fn encode_latin1(string: &str) -> Vec<u8> {
    string
        .chars()
        .map(|ch| if u32::from(ch) > 0xFF { b'?' } else { ch as u8 })
        .collect()
}

fn encode_utf16(string: &str) -> Vec<u8> {
    let mut result: Vec<u8> = vec![0xFF, 0xFE];
    result.extend(encode_utf16le(string));
    result
}

fn encode_utf16be(string: &str) -> Vec<u8> {
    string
        .encode_utf16()
        .flat_map(|cp| cp.to_be_bytes())
        .collect()
}

fn encode_utf16le(string: &str) -> Vec<u8> {
    string
        .encode_utf16()
        .flat_map(|cp| cp.to_le_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_latin1() {
        let data = b"L\xEEke \xE2 while loop w\xEFth n\xF8 escap\xEA";
        assert_eq!(decode(Encoding::Latin1, data), "Lîke â while loop wïth nø escapê");
    }

    #[test]
    fn render_roundtrip_utf8() {
        let s = "hello world";
        assert_eq!(decode(Encoding::Utf8, &render(Encoding::Utf8, s)), s);
    }

    #[test]
    fn render_roundtrip_utf16() {
        let s = "héllo wörld";
        assert_eq!(decode(Encoding::Utf16, &render(Encoding::Utf16, s)), s);
    }

    #[test]
    fn render_latin1_lossy() {
        assert_eq!(render(Encoding::Latin1, "h\u{1234}i"), b"h?i");
    }

    #[test]
    fn parse_terminated() {
        let data = b"hello\0world";
        let mut stream = BufStream::new(data);
        assert_eq!(read_terminated(Encoding::Latin1, &mut stream), "hello");
        assert_eq!(stream.take_rest(), b"world");
    }

    #[test]
    fn encoding_byte_roundtrip() {
        for byte in 0..4u8 {
            assert_eq!(Encoding::parse(byte).unwrap().as_byte(), byte);
        }
        assert!(Encoding::parse(4).is_err());
    }

    #[test]
    fn v3_legal_encodings() {
        assert!(Encoding::Latin1.valid_for_v3());
        assert!(Encoding::Utf16.valid_for_v3());
        assert!(!Encoding::Utf16Be.valid_for_v3());
        assert!(!Encoding::Utf8.valid_for_v3());
    }
}

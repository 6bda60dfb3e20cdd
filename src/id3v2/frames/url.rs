//! `W***` URL frames. All of them carry a bare Latin-1 URL with no encoding
//! byte, except `WXXX`, whose encoding byte governs only its description —
//! the URL itself is still written as Latin-1.

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::id3v2::spec::{check_encoding, parse_encoding};
use crate::string::{self, Encoding};
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug)]
pub struct UrlFrame {
    frame_id: String,
    pub url: String,
}

impl UrlFrame {
    pub fn new(frame_id: &str) -> Self {
        UrlFrame {
            frame_id: frame_id.to_string(),
            url: String::new(),
        }
    }

    pub(crate) fn parse(frame_id: &str, stream: &mut BufStream) -> Self {
        UrlFrame {
            frame_id: frame_id.to_string(),
            url: string::read(Encoding::Latin1, stream),
        }
    }
}

impl Frame for UrlFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        self.frame_id.clone()
    }

    fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    fn render(&self, _version: Version) -> Vec<u8> {
        string::render(Encoding::Latin1, &self.url)
    }

    fn payload_eq(&self, other: &str) -> bool {
        self.url == other
    }
}

impl Display for UrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// `WXXX`: a user-defined URL frame keyed by its description.
#[derive(Clone, Debug)]
pub struct UserUrlFrame {
    pub encoding: Encoding,
    pub desc: String,
    pub url: String,
}

impl UserUrlFrame {
    pub fn new(desc: &str) -> Self {
        UserUrlFrame {
            encoding: Encoding::default(),
            desc: desc.to_string(),
            url: String::new(),
        }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return UserUrlFrame::new("");
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let desc = string::read_terminated(encoding, stream);
        let url = string::read(Encoding::Latin1, stream);

        UserUrlFrame { encoding, desc, url }
    }
}

impl Frame for UserUrlFrame {
    fn id(&self) -> &str {
        "WXXX"
    }

    fn key(&self) -> String {
        format!("WXXX:{}", self.desc)
    }

    fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let mut out = vec![encoding.as_byte()];
        out.extend(string::render_terminated(encoding, &self.desc));
        out.extend(string::render(Encoding::Latin1, &self.url));
        out
    }

    fn payload_eq(&self, other: &str) -> bool {
        self.url == other
    }
}

impl Display for UserUrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_url() {
        let data = b"https://example.com/";
        let mut stream = BufStream::new(data);
        let frame = UrlFrame::parse("WOAR", &mut stream);
        assert_eq!(frame.url, "https://example.com/");
    }

    #[test]
    fn wxxx_keys_by_description_and_writes_latin1_url() {
        let data = b"\x03Source\0https://example.com/";
        let mut stream = BufStream::new(data);
        let frame = UserUrlFrame::parse(&mut stream);
        assert_eq!(frame.key(), "WXXX:Source");
        assert_eq!(frame.url, "https://example.com/");
        assert_eq!(frame.render(Version::V24)[0], Encoding::Utf8.as_byte());
    }
}

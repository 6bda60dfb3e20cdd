//! `COMM`, `USLT`, `USER`: the three frames sharing the
//! `[encoding] lang(3) desc \0 text` payload shape. `USER` ("terms of use")
//! carries no real description in practice, but its wire layout is identical
//! to `COMM`/`USLT`, so one type covers all three.

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::id3v2::lang::Language;
use crate::id3v2::spec::{check_encoding, parse_encoding};
use crate::string::{self, Encoding};
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug)]
pub struct LangTextFrame {
    frame_id: String,
    pub encoding: Encoding,
    pub lang: Language,
    pub desc: String,
    pub text: String,
}

impl LangTextFrame {
    pub fn new(frame_id: &str) -> Self {
        LangTextFrame {
            frame_id: frame_id.to_string(),
            encoding: Encoding::default(),
            lang: Language::default(),
            desc: String::new(),
            text: String::new(),
        }
    }

    pub(crate) fn parse(frame_id: &str, stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return LangTextFrame::new(frame_id);
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let lang = Language::parse(stream);
        let desc = string::read_terminated(encoding, stream);
        let text = string::read(encoding, stream);

        LangTextFrame {
            frame_id: frame_id.to_string(),
            encoding,
            lang,
            desc,
            text,
        }
    }
}

impl Frame for LangTextFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        format!("{}:{}:{}", self.frame_id, self.desc, self.lang)
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let mut out = vec![encoding.as_byte()];
        out.extend(self.lang.code());
        out.extend(string::render_terminated(encoding, &self.desc));
        out.extend(string::render(encoding, &self.text));
        out
    }

    fn payload_eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl Display for LangTextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comment() {
        let mut data = vec![0x03u8];
        data.extend(b"eng");
        data.extend(b"Description\0");
        data.extend(b"Text");

        let mut stream = BufStream::new(&data);
        let frame = LangTextFrame::parse("COMM", &mut stream);
        assert_eq!(frame.lang.as_str(), "eng");
        assert_eq!(frame.desc, "Description");
        assert_eq!(frame.text, "Text");
        assert_eq!(frame.key(), "COMM:Description:eng");
    }

    #[test]
    fn id3v1_comment_defaults_to_eng() {
        let mut data = vec![0x00u8];
        data.extend(b"eng");
        data.extend(b"\0");
        data.extend(b"wxyz");

        let mut stream = BufStream::new(&data);
        let frame = LangTextFrame::parse("COMM", &mut stream);
        assert_eq!(frame.text, "wxyz");
        assert!(frame.payload_eq("wxyz"));
    }
}

//! ISO-639-2 language codes, as used by `COMM`, `USLT`, and `USER`.

use crate::core::io::BufStream;
use std::fmt::{self, Display, Formatter};
use std::str;

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct Language {
    code: [u8; 3],
}

impl Language {
    /// `code` is lowercased; non-alphabetic input falls back to the
    /// conventional "unknown" placeholder rather than failing outright, since
    /// a bad language code shouldn't sink an otherwise-readable comment.
    pub fn new(code: &[u8; 3]) -> Self {
        let mut out = [0u8; 3];

        for (i, &byte) in code.iter().enumerate() {
            if !byte.is_ascii_alphabetic() {
                return Self::default();
            }

            out[i] = byte.to_ascii_lowercase();
        }

        Language { code: out }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        match stream.read_array::<3>() {
            Ok(code) => Self::new(&code),
            Err(_) => Self::default(),
        }
    }

    pub fn code(&self) -> &[u8; 3] {
        &self.code
    }

    pub fn as_str(&self) -> &str {
        str::from_utf8(&self.code).unwrap()
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Language {
    fn default() -> Self {
        // "xxx" isn't a real ISO-639-2 code, but it's the conventional
        // stand-in for "unknown" that most taggers already write.
        Language { code: [b'x'; 3] }
    }
}

impl PartialEq<[u8; 3]> for Language {
    fn eq(&self, other: &[u8; 3]) -> bool {
        self.code == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_lowercases() {
        let lang = Language::new(b"ENG");
        assert_eq!(lang.as_str(), "eng");
    }

    #[test]
    fn invalid_code_falls_back_to_unknown() {
        let lang = Language::new(b"123");
        assert_eq!(lang.as_str(), "xxx");
    }

    #[test]
    fn default_is_xxx() {
        assert_eq!(Language::default().as_str(), "xxx");
    }
}

//! `IPLS`/`TIPL`/`TMCL`: role → person credit lists.
//!
//! The payload is a flat list of encoded strings, alternating role then
//! person; an odd-length list has no partner for its last entry and is
//! dropped rather than failing the whole frame. `IPLS` (2.3) and `TIPL`
//! (2.4) are the same list under different IDs, so they're normalized to the
//! same key.

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::id3v2::spec::{check_encoding, parse_encoding, parse_text_list, render_text_list};
use crate::string::Encoding;
use indexmap::IndexMap;
use log::{info, warn};
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug)]
pub struct CreditsFrame {
    frame_id: String,
    pub encoding: Encoding,
    pub people: IndexMap<String, String>,
}

impl CreditsFrame {
    pub fn new(frame_id: &str) -> Self {
        CreditsFrame {
            frame_id: frame_id.to_string(),
            encoding: Encoding::default(),
            people: IndexMap::new(),
        }
    }

    /// The key people-credit frames are merged under: `IPLS` and `TIPL` are
    /// the same list across versions, `TMCL` is its own.
    fn normalized_id(frame_id: &str) -> &str {
        match frame_id {
            "IPLS" => "TIPL",
            other => other,
        }
    }

    pub(crate) fn parse(frame_id: &str, stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return CreditsFrame::new(frame_id);
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let mut flat = parse_text_list(encoding, stream);

        if flat.len() % 2 != 0 {
            info!(
                target: "id3v2",
                "dropping unpaired trailing entry in {} credits list",
                frame_id
            );
            flat.pop();
        }

        let mut people = IndexMap::new();
        let mut iter = flat.into_iter();

        while let (Some(role), Some(person)) = (iter.next(), iter.next()) {
            people.insert(role, person);
        }

        CreditsFrame {
            frame_id: frame_id.to_string(),
            encoding,
            people,
        }
    }
}

impl Frame for CreditsFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        Self::normalized_id(&self.frame_id).to_string()
    }

    fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let mut flat = Vec::with_capacity(self.people.len() * 2);

        for (role, person) in &self.people {
            if role.is_empty() || person.is_empty() {
                warn!(target: "id3v2", "dropping incomplete credit pair in {}", self.frame_id);
                continue;
            }

            flat.push(role.clone());
            flat.push(person.clone());
        }

        let mut out = vec![encoding.as_byte()];
        out.extend(render_text_list(encoding, &flat));
        out
    }
}

impl Display for CreditsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .people
            .iter()
            .map(|(role, person)| format!("{}: {}", role, person))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let data = b"\x00Producer\0Jane Doe\0Engineer\0John Roe";
        let mut stream = BufStream::new(data);
        let frame = CreditsFrame::parse("TMCL", &mut stream);
        assert_eq!(frame.people.get("Producer"), Some(&"Jane Doe".to_string()));
        assert_eq!(frame.people.get("Engineer"), Some(&"John Roe".to_string()));
    }

    #[test]
    fn ipls_and_tipl_share_a_key() {
        let data = b"\x00Producer\0Jane Doe";
        let mut stream = BufStream::new(data);
        let ipls = CreditsFrame::parse("IPLS", &mut stream);
        assert_eq!(ipls.key(), "TIPL");
    }

    #[test]
    fn odd_entry_is_dropped() {
        let data = b"\x00Producer\0Jane Doe\0Orphan";
        let mut stream = BufStream::new(data);
        let frame = CreditsFrame::parse("TMCL", &mut stream);
        assert_eq!(frame.people.len(), 1);
    }
}

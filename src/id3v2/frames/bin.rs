//! Frames whose payload is (mostly) opaque bytes: `MCDI`, `UFID`, `PRIV`, and
//! the fallback `UnknownFrame` used for IDs the registry doesn't recognize
//! (or that carry an unsupported flag, such as encryption).

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::string::{self, Encoding};
use std::fmt::{self, Display, Formatter};

/// A frame whose ID the registry doesn't recognize, or one dropped back to
/// raw storage because of an unsupported flag (encryption). Kept verbatim so
/// a save round-trip doesn't lose it.
#[derive(Clone, Debug)]
pub struct UnknownFrame {
    frame_id: String,
    pub data: Vec<u8>,
}

impl UnknownFrame {
    pub fn new(frame_id: String, data: Vec<u8>) -> Self {
        UnknownFrame { frame_id, data }
    }
}

impl Frame for UnknownFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        self.frame_id.clone()
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn render(&self, _version: Version) -> Vec<u8> {
        self.data.clone()
    }

    fn payload_eq(&self, _other: &str) -> bool {
        false
    }
}

impl Display for UnknownFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "<{} unknown frame, {} bytes>", self.frame_id, self.data.len())
    }
}

/// `MCDI`: a binary CD table-of-contents blob, stored verbatim.
#[derive(Clone, Debug)]
pub struct BinaryFrame {
    frame_id: String,
    pub data: Vec<u8>,
}

impl BinaryFrame {
    pub fn new(frame_id: &str) -> Self {
        BinaryFrame {
            frame_id: frame_id.to_string(),
            data: Vec::new(),
        }
    }

    pub(crate) fn parse(frame_id: &str, stream: &mut BufStream) -> Self {
        BinaryFrame {
            frame_id: frame_id.to_string(),
            data: stream.take_rest().to_vec(),
        }
    }
}

impl Frame for BinaryFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        self.frame_id.clone()
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn render(&self, _version: Version) -> Vec<u8> {
        self.data.clone()
    }
}

impl Display for BinaryFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "<{} bytes of binary data>", self.data.len())
    }
}

/// `UFID`: an owner-identified string plus an opaque identifier, used by
/// services like MusicBrainz to stash their own IDs.
#[derive(Clone, Debug)]
pub struct FileIdFrame {
    pub owner: String,
    pub identifier: Vec<u8>,
}

impl FileIdFrame {
    pub fn new(owner: &str) -> Self {
        FileIdFrame {
            owner: owner.to_string(),
            identifier: Vec::new(),
        }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let identifier = stream.take_rest().to_vec();
        FileIdFrame { owner, identifier }
    }
}

impl Frame for FileIdFrame {
    fn id(&self) -> &str {
        "UFID"
    }

    fn key(&self) -> String {
        format!("UFID:{}", self.owner)
    }

    fn is_empty(&self) -> bool {
        self.identifier.is_empty()
    }

    fn render(&self, _version: Version) -> Vec<u8> {
        let mut out = string::render_terminated(Encoding::Latin1, &self.owner);
        out.extend(&self.identifier);
        out
    }
}

impl Display for FileIdFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.owner)
    }
}

/// `PRIV`: an owner-identified string plus arbitrary application-private data.
#[derive(Clone, Debug)]
pub struct PrivateFrame {
    pub owner: String,
    pub data: Vec<u8>,
}

impl PrivateFrame {
    pub fn new(owner: &str) -> Self {
        PrivateFrame {
            owner: owner.to_string(),
            data: Vec::new(),
        }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let data = stream.take_rest().to_vec();
        PrivateFrame { owner, data }
    }
}

impl Frame for PrivateFrame {
    fn id(&self) -> &str {
        "PRIV"
    }

    fn key(&self) -> String {
        format!("PRIV:{}", self.owner)
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn render(&self, _version: Version) -> Vec<u8> {
        let mut out = string::render_terminated(Encoding::Latin1, &self.owner);
        out.extend(&self.data);
        out
    }
}

impl Display for PrivateFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.owner, self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_frame_round_trips_bytes() {
        let frame = UnknownFrame::new("XXXX".to_string(), vec![1, 2, 3]);
        assert_eq!(frame.render(Version::V23), vec![1, 2, 3]);
        assert_eq!(frame.id(), "XXXX");
    }

    #[test]
    fn ufid_parses_owner_and_identifier() {
        let data = b"musicbrainz.org\0abcd-1234";
        let mut stream = BufStream::new(data);
        let frame = FileIdFrame::parse(&mut stream);
        assert_eq!(frame.owner, "musicbrainz.org");
        assert_eq!(frame.identifier, b"abcd-1234");
        assert_eq!(frame.key(), "UFID:musicbrainz.org");
    }

    #[test]
    fn priv_parses_owner_and_data() {
        let data = b"com.apple.iTunes\0\x01\x02";
        let mut stream = BufStream::new(data);
        let frame = PrivateFrame::parse(&mut stream);
        assert_eq!(frame.owner, "com.apple.iTunes");
        assert_eq!(frame.data, vec![1, 2]);
    }
}

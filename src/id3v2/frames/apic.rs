//! `APIC`: an embedded picture.

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::id3v2::spec::{check_encoding, parse_encoding};
use crate::string::{self, Encoding};
use log::info;
use std::fmt::{self, Debug, Display, Formatter};

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum PictureType {
    Other,
    FileIcon,
    OtherFileIcon,
    FrontCover,
    BackCover,
    LeafletPage,
    Media,
    LeadArtist,
    Artist,
    Conductor,
    Band,
    Composer,
    Lyricist,
    RecordingLocation,
    DuringRecording,
    DuringPerformance,
    VideoScreenCapture,
    BrightFish,
    Illustration,
    BandLogo,
    PublisherLogo,
}

impl PictureType {
    fn parse(byte: u8) -> Self {
        match byte {
            0x00 => Self::Other,
            0x01 => Self::FileIcon,
            0x02 => Self::OtherFileIcon,
            0x03 => Self::FrontCover,
            0x04 => Self::BackCover,
            0x05 => Self::LeafletPage,
            0x06 => Self::Media,
            0x07 => Self::LeadArtist,
            0x08 => Self::Artist,
            0x09 => Self::Conductor,
            0x0A => Self::Band,
            0x0B => Self::Composer,
            0x0C => Self::Lyricist,
            0x0D => Self::RecordingLocation,
            0x0E => Self::DuringRecording,
            0x0F => Self::DuringPerformance,
            0x10 => Self::VideoScreenCapture,
            0x11 => Self::BrightFish,
            0x12 => Self::Illustration,
            0x13 => Self::BandLogo,
            0x14 => Self::PublisherLogo,
            _ => Self::Other,
        }
    }

    fn as_byte(self) -> u8 {
        self as u8
    }
}

impl Default for PictureType {
    fn default() -> Self {
        Self::FrontCover
    }
}

#[derive(Clone, Debug)]
pub struct AttachedPictureFrame {
    pub encoding: Encoding,
    pub mime: String,
    pub pic_type: PictureType,
    pub desc: String,
    pub picture: Vec<u8>,
}

impl AttachedPictureFrame {
    pub fn new() -> Self {
        AttachedPictureFrame {
            encoding: Encoding::default(),
            mime: "image/".to_string(),
            pic_type: PictureType::default(),
            desc: String::new(),
            picture: Vec::new(),
        }
    }

    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return AttachedPictureFrame::new();
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);

        let mut mime = string::read_terminated(Encoding::Latin1, stream);
        if mime.is_empty() {
            info!(target: "id3v2", "APIC frame has no MIME type, defaulting to image/");
            mime = "image/".to_string();
        }

        let pic_type = stream
            .read_u8()
            .map(PictureType::parse)
            .unwrap_or_default();

        let desc = string::read_terminated(encoding, stream);
        let picture = stream.take_rest().to_vec();

        AttachedPictureFrame {
            encoding,
            mime,
            pic_type,
            desc,
            picture,
        }
    }
}

impl Default for AttachedPictureFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame for AttachedPictureFrame {
    fn id(&self) -> &str {
        "APIC"
    }

    fn key(&self) -> String {
        format!("APIC:{}", self.desc)
    }

    fn is_empty(&self) -> bool {
        self.picture.is_empty()
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let mut out = vec![encoding.as_byte()];
        out.extend(string::render_terminated(Encoding::Latin1, &self.mime));
        out.push(self.pic_type.as_byte());
        out.extend(string::render_terminated(encoding, &self.desc));
        out.extend(&self.picture);
        out
    }
}

impl Display for AttachedPictureFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ({}, {} bytes)", self.desc, self.mime, self.picture.len())
    }
}

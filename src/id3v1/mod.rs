//! ID3v1: the fixed 128-byte tag trailing an MP3 file, decoded into the
//! corresponding ID3v2 frames.
//!
//! Layout: `title(30) artist(30) album(30) year(4) comment(29, or 28 plus a
//! trailing track byte for ID3v1.1) genre(1)`, all Latin-1.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::frames::comments::LangTextFrame;
use crate::id3v2::frames::tcon::GenreFrame;
use crate::id3v2::frames::text::TextFrame;
use crate::id3v2::genre;
use crate::id3v2::lang::Language;
use crate::string;

const BLOCK_LEN: u64 = 128;
const MAGIC: &[u8] = b"TAG";

/// A parsed ID3v1 (and, when present, ID3v1.1 track number) trailer.
#[derive(Clone, Debug, Default)]
pub struct Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub track: Option<u8>,
    pub genre: u8,
}

impl Tag {
    /// Reads the 128-byte block at the end of `reader`, if the `TAG` magic
    /// is present there. Returns `Ok(None)` rather than an error when the
    /// magic is missing or the source is too short, since the absence of an
    /// ID3v1 tag isn't itself a failure.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> std::io::Result<Option<Tag>> {
        let end = reader.seek(SeekFrom::End(0))?;

        if end < BLOCK_LEN {
            return Ok(None);
        }

        reader.seek(SeekFrom::Start(end - BLOCK_LEN))?;

        let mut block = [0u8; BLOCK_LEN as usize];
        reader.read_exact(&mut block)?;

        Ok(Self::parse(&block))
    }

    /// Opens `path` and reads its trailing ID3v1 block, if any.
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Option<Tag>> {
        let mut file = File::open(path)?;
        Self::read_from(&mut file)
    }

    /// Parses an exact 128-byte ID3v1 block. Returns `None` if it doesn't
    /// start with the `TAG` magic.
    pub fn parse(block: &[u8; 128]) -> Option<Tag> {
        if &block[0..3] != MAGIC {
            return None;
        }

        let mut stream = BufStream::new(&block[3..]);

        let title = read_field(&mut stream, 30);
        let artist = read_field(&mut stream, 30);
        let album = read_field(&mut stream, 30);
        let year = read_field(&mut stream, 4);

        // ID3v1.1: a NUL at comment byte 28 with a non-zero byte at 29 means
        // the last two bytes are a zero-terminator plus a track number,
        // shrinking the free-form comment to 28 bytes.
        let comment_raw = stream.slice(30).unwrap_or(&[]);
        let (comment, track) = if comment_raw.len() == 30 && comment_raw[28] == 0 && comment_raw[29] != 0 {
            (trim_latin1(&comment_raw[..28]), Some(comment_raw[29]))
        } else {
            (trim_latin1(comment_raw), None)
        };

        let genre = stream.read_u8().unwrap_or(0xFF);

        Some(Tag {
            title,
            artist,
            album,
            year,
            comment,
            track,
            genre,
        })
    }

    /// The decoded genre name for [`genre`](Self::genre), when the byte maps
    /// to an entry in the ID3v1 extended genre table.
    pub fn genre_name(&self) -> Option<&'static str> {
        genre::name_for_code(u16::from(self.genre))
    }

    /// Builds the ID3v2 frames this tag decodes into: `TIT2`, `TPE1`,
    /// `TALB`, `TYER`, `COMM` (language `eng`), `TRCK` when an ID3v1.1 track
    /// number is present, and `TCON` when the genre byte names a known
    /// genre.
    pub fn into_frames(self) -> Vec<Box<dyn Frame>> {
        let mut frames: Vec<Box<dyn Frame>> = Vec::new();

        if !self.title.is_empty() {
            frames.push(Box::new(text_frame("TIT2", &self.title)));
        }

        if !self.artist.is_empty() {
            frames.push(Box::new(text_frame("TPE1", &self.artist)));
        }

        if !self.album.is_empty() {
            frames.push(Box::new(text_frame("TALB", &self.album)));
        }

        if !self.year.is_empty() {
            frames.push(Box::new(text_frame("TYER", &self.year)));
        }

        if !self.comment.is_empty() {
            let mut comm = LangTextFrame::new("COMM");
            comm.lang = Language::new(b"eng");
            comm.text = self.comment.clone();
            frames.push(Box::new(comm));
        }

        if let Some(track) = self.track {
            frames.push(Box::new(text_frame("TRCK", &track.to_string())));
        }

        if let Some(name) = self.genre_name() {
            let mut tcon = GenreFrame::new();
            tcon.set_genres(&[name.to_string()]);
            frames.push(Box::new(tcon));
        }

        frames
    }
}

fn text_frame(id: &str, value: &str) -> TextFrame {
    let mut frame = TextFrame::new(id);
    frame.text = vec![value.to_string()];
    frame
}

fn read_field(stream: &mut BufStream, len: usize) -> String {
    trim_latin1(stream.slice(len).unwrap_or(&[]))
}

/// Decodes `data` as Latin-1 and strips trailing spaces and `\0` bytes, the
/// way ID3v1's space- or NUL-padded fixed-width fields are conventionally
/// cleaned up.
fn trim_latin1(data: &[u8]) -> String {
    let end = data
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |pos| pos + 1);

    string::from_latin1(&data[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn block(title: &[u8], artist: &[u8], album: &[u8], year: &[u8], comment: &[u8], genre: u8) -> [u8; 128] {
        let mut data = [0u8; 128];
        data[0..3].copy_from_slice(b"TAG");
        data[3..33][..title.len()].copy_from_slice(title);
        data[33..63][..artist.len()].copy_from_slice(artist);
        data[63..93][..album.len()].copy_from_slice(album);
        data[93..97][..year.len()].copy_from_slice(year);
        data[97..127][..comment.len()].copy_from_slice(comment);
        data[127] = genre;
        data
    }

    #[test]
    fn parses_basic_fields() {
        let data = block(b"hijklmnop", b"abcdefg", b"qrstuv", b"1234", b"wxyz", 0x01);
        let tag = Tag::parse(&data).unwrap();

        assert_eq!(tag.title, "hijklmnop");
        assert_eq!(tag.artist, "abcdefg");
        assert_eq!(tag.album, "qrstuv");
        assert_eq!(tag.year, "1234");
        assert_eq!(tag.comment, "wxyz");
        assert_eq!(tag.track, None);
        assert_eq!(tag.genre, 0x01);
    }

    #[test]
    fn decodes_latin1_high_bytes() {
        let data = block(
            b"hijklmn\xf3p",
            b"abcd\xe9fg",
            b"qrst\xfcv",
            b"1234",
            b"wxyz",
            0x01,
        );
        let tag = Tag::parse(&data).unwrap();

        assert_eq!(tag.title, "hijklmnóp");
        assert_eq!(tag.artist, "abcdéfg");
        assert_eq!(tag.album, "qrstüv");
    }

    #[test]
    fn detects_v1_1_track_number() {
        let mut data = block(b"Title", b"Artist", b"Album", b"2004", b"A comment", 0x00);
        // Overwrite the comment region directly to place the zero/track marker.
        let comment_start = 3 + 30 + 30 + 30 + 4;
        data[comment_start..comment_start + 28].copy_from_slice(&[0u8; 28]);
        data[comment_start..comment_start + 2].copy_from_slice(b"hi");
        data[comment_start + 28] = 0;
        data[comment_start + 29] = 5;

        let tag = Tag::parse(&data).unwrap();
        assert_eq!(tag.comment, "hi");
        assert_eq!(tag.track, Some(5));
    }

    #[test]
    fn rejects_missing_magic() {
        let mut data = [0u8; 128];
        data[0..3].copy_from_slice(b"XXX");
        assert!(Tag::parse(&data).is_none());
    }

    #[test]
    fn into_frames_builds_expected_set() {
        let data = block(b"hijklmnop", b"abcdefg", b"qrstuv", b"1234", b"wxyz", 0x01);
        let tag = Tag::parse(&data).unwrap();
        let frames = tag.into_frames();

        assert!(frames.iter().any(|f| f.id() == "TIT2" && f.payload_eq("hijklmnop")));
        assert!(frames.iter().any(|f| f.id() == "TPE1" && f.payload_eq("abcdefg")));
        assert!(frames.iter().any(|f| f.id() == "TALB" && f.payload_eq("qrstuv")));
        assert!(frames.iter().any(|f| f.id() == "TYER" && f.to_integer() == Some(1234)));
        assert!(frames.iter().any(|f| f.id() == "COMM" && f.payload_eq("wxyz")));
        assert!(frames.iter().any(|f| f.id() == "TCON"));
    }

    #[test]
    fn reads_from_end_of_stream() {
        let mut data = vec![0xAAu8; 64];
        data.extend_from_slice(&block(b"Song", b"Band", b"", b"", b"", 0xFF));

        let mut cursor = Cursor::new(data);
        let tag = Tag::read_from(&mut cursor).unwrap().unwrap();
        assert_eq!(tag.title, "Song");
        assert_eq!(tag.artist, "Band");
        assert_eq!(tag.genre_name(), None);
    }

    #[test]
    fn no_tag_when_too_short() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        assert!(Tag::read_from(&mut cursor).unwrap().is_none());
    }
}

//! Shared tag IO.
use std::error;
use std::fmt::{self, Display, Formatter};
use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::Path;

/// An ergonomics layer around a byte slice.
///
/// This automates bounds checking and position tracking while parsing a tag.
#[derive(Clone)]
pub struct BufStream<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> BufStream<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Reads this stream into a buffer.
    ///
    /// If the end of the stream is reached, the remaining bytes are left unchanged.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let len = usize::min(self.remaining(), buf.len());
        buf[..len].copy_from_slice(&self.src[self.pos..self.pos + len]);
        self.pos += len;
        len
    }

    /// Reads this stream into a buffer.
    ///
    /// # Errors
    /// If this buffer cannot be filled, an error is returned.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if self.remaining() < buf.len() {
            return Err(underread_error(buf.len(), self.remaining()));
        }

        buf.copy_from_slice(&self.src[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();

        Ok(())
    }

    /// Reads this stream into an array of size `N`.
    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut arr = [0; N];
        self.read_exact(&mut arr)?;
        Ok(arr)
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        if self.is_empty() {
            return Err(eos_error());
        }

        self.pos += 1;

        Ok(self.src[self.pos - 1])
    }

    pub fn read_be_u16(&mut self) -> io::Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Skips `n` bytes in this stream.
    pub fn skip(&mut self, n: usize) -> io::Result<()> {
        if self.remaining() < n {
            return Err(oob_error(self.pos + n, self.len()));
        }

        self.pos += n;

        Ok(())
    }

    /// Consumes the stream and returns a slice of size `n`.
    pub fn slice(&mut self, n: usize) -> io::Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(underread_error(n, self.remaining()));
        }

        self.pos += n;

        Ok(&self.src[self.pos - n..self.pos])
    }

    /// Like [`slice`](BufStream::slice), but returns a new `BufStream` over the slice.
    pub fn slice_stream(&mut self, n: usize) -> io::Result<BufStream<'a>> {
        Ok(BufStream::new(self.slice(n)?))
    }

    /// Peeks at a portion of this stream relative to the current position, without
    /// consuming the stream.
    pub fn peek(&self, range: Range<usize>) -> io::Result<&'a [u8]> {
        let start = range.start + self.pos;
        let end = range.end + self.pos;

        if start > self.len() || end > self.len() {
            return Err(oob_error(end, self.len()));
        }

        Ok(&self.src[start..end])
    }

    /// Searches for `needle`, consuming the stream up to and including the match.
    ///
    /// If the needle is never found, the whole remaining stream is consumed and returned.
    pub fn search(&mut self, needle: &[u8]) -> &'a [u8] {
        let start = self.pos;
        let limit = self.pos + self.remaining();

        let mut begin = self.pos;
        let mut end = self.pos + needle.len();

        while end <= limit {
            if &self.src[begin..end] == needle {
                self.pos = end;
                return &self.src[start..self.pos];
            }

            begin += needle.len();
            end += needle.len();
        }

        self.take_rest()
    }

    /// Consumes the rest of the stream into a slice, exhausting the stream.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.src[self.pos..];
        self.pos += self.remaining();
        rest
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.src[self.pos..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.pos()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// The error type returned when a [`BufStream`] read fails.
#[derive(Debug, Clone)]
pub enum StreamError {
    EndOfStream,
    BufferUnderread { len: usize, remaining: usize },
    OutOfBounds { pos: usize, len: usize },
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            StreamError::EndOfStream => write![f, "end of stream"],
            StreamError::BufferUnderread { len, remaining } => write![
                f,
                "buffer underread: length is {} but stream only has {}",
                len, remaining
            ],
            StreamError::OutOfBounds { pos, len } => {
                write![f, "out of bounds: index is {} but length is {}", pos, len]
            }
        }
    }
}

impl error::Error for StreamError {}

#[inline(always)]
fn eos_error() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, StreamError::EndOfStream)
}

#[inline(always)]
fn underread_error(len: usize, remaining: usize) -> io::Error {
    io::Error::new(
        ErrorKind::UnexpectedEof,
        StreamError::BufferUnderread { len, remaining },
    )
}

#[inline(always)]
fn oob_error(pos: usize, len: usize) -> io::Error {
    io::Error::new(
        ErrorKind::UnexpectedEof,
        StreamError::OutOfBounds { pos, len },
    )
}

/// Replace up to `end` bytes in a file with `data`, keeping any trailing bytes past `end`.
pub fn write_replaced<P: AsRef<Path>>(path: P, data: &[u8], end: u64) -> io::Result<()> {
    match data.len() as u64 {
        len if len == end => {
            let mut file = OpenOptions::new().create(true).write(true).open(&path)?;
            file.write_all(data)?;
            file.flush()
        }

        _ => {
            // Lengths differ: read whatever comes after `end` and re-blit everything
            // in sequence. Not efficient, but there's nothing else we can do in place.
            let keep = match OpenOptions::new().read(true).open(&path) {
                Ok(mut file) => {
                    let mut keep = Vec::new();
                    file.seek(SeekFrom::Start(end))?;
                    file.read_to_end(&mut keep)?;
                    keep
                }

                Err(_) => Vec::new(),
            };

            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)?;

            file.write_all(data)?;
            file.write_all(&keep)?;
            file.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_primitives() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut stream = BufStream::new(&data);

        assert_eq!(stream.read_u8().unwrap(), 0x01);
        assert_eq!(stream.read_be_u16().unwrap(), 0x0203);
        assert_eq!(stream.remaining(), 2);
    }

    #[test]
    fn read_exact_underrun() {
        let data = [0x01, 0x02];
        let mut stream = BufStream::new(&data);
        let mut buf = [0u8; 4];
        assert!(stream.read_exact(&mut buf).is_err());
    }

    #[test]
    fn slice_and_skip() {
        let data = [0x00, 0x01, 0x02, 0x03, 0x04];
        let mut stream = BufStream::new(&data);
        stream.skip(1).unwrap();
        assert_eq!(stream.slice(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(stream.take_rest(), &[0x03, 0x04]);
        assert!(stream.is_empty());
    }

    #[test]
    fn search_finds_needle() {
        let data = b"hello\0world";
        let mut stream = BufStream::new(data);
        assert_eq!(stream.search(b"\0"), b"hello\0");
        assert_eq!(stream.take_rest(), b"world");
    }

    #[test]
    fn search_exhausts_on_miss() {
        let data = b"hello";
        let mut stream = BufStream::new(data);
        assert_eq!(stream.search(b"\0"), b"hello");
        assert!(stream.is_empty());
    }
}

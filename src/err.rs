//! Error types.
//!
//! Frame-payload decoding uses the cheap, allocation-free [`ParseError`]. Tag-level
//! loading and saving use [`TagError`]/[`SaveError`], which wrap I/O failures and the
//! structural/version errors a caller needs to distinguish from a plain parse failure.

use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// An error encountered while decoding a single frame's payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    NotEnoughData,
    InvalidData,
    InvalidEncoding,
    Unsupported,
    NotFound,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// An error encountered while loading a whole tag.
#[derive(Debug)]
pub enum TagError {
    /// No `ID3` magic was found at the expected offset.
    NoHeader,
    /// The major version is not `2`, `3`, or `4`.
    UnsupportedVersion(u8),
    /// The source ended before a required read could complete.
    Eof,
    /// A structural problem other than a missing header or bad version.
    InvalidData,
    Io(io::Error),
}

impl Display for TagError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::NoHeader => write!(f, "no ID3v2 header found"),
            Self::UnsupportedVersion(major) => write!(f, "ID3v2.{} is not supported", major),
            Self::Eof => write!(f, "unexpected end of stream"),
            Self::InvalidData => write!(f, "malformed ID3v2 tag"),
            Self::Io(err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for TagError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TagError {
    fn from(err: io::Error) -> Self {
        // `BufStream` surfaces its own underread/out-of-bounds errors as `io::Error`s
        // with `ErrorKind::UnexpectedEof`; fold those back into `TagError::Eof` so
        // callers don't need to know about the stream layer's error type.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TagError::Eof
        } else {
            TagError::Io(err)
        }
    }
}

impl From<ParseError> for TagError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NotEnoughData => TagError::Eof,
            _ => TagError::InvalidData,
        }
    }
}

pub type TagResult<T> = Result<T, TagError>;

/// An error produced while parsing the 10-byte tag header itself, kept
/// distinct from [`ParseError`] so a bad version never collapses into the
/// same bucket as a missing header or other structural damage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderError {
    /// No `ID3` magic was found at the expected offset.
    NoHeader,
    /// The major version is not `2`, `3`, or `4`.
    UnsupportedVersion(u8),
    /// A structural problem other than a missing header or bad version.
    InvalidData,
    /// The source ended before the 10-byte header could be read in full.
    NotEnoughData,
}

impl From<HeaderError> for TagError {
    fn from(err: HeaderError) -> Self {
        match err {
            HeaderError::NoHeader => TagError::NoHeader,
            HeaderError::UnsupportedVersion(major) => TagError::UnsupportedVersion(major),
            HeaderError::InvalidData => TagError::InvalidData,
            HeaderError::NotEnoughData => TagError::Eof,
        }
    }
}

/// An error encountered while rendering a tag back to bytes.
#[derive(Debug)]
pub enum SaveError {
    /// A frame or tag grew too large to be represented by the version's size field.
    TooLarge,
    /// Only ID3v2.3 and ID3v2.4 can be written; this tag is still ID3v2.2.
    UnsupportedVersion(u8),
    Io(io::Error),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::TooLarge => write!(f, "tag or frame size exceeds the format's limit"),
            Self::UnsupportedVersion(major) => {
                write!(f, "ID3v2.{} tags cannot be written, only 2.3 and 2.4", major)
            }
            Self::Io(err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for SaveError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(err: io::Error) -> Self {
        SaveError::Io(err)
    }
}

pub type SaveResult<T> = Result<T, SaveError>;

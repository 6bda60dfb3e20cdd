//! `TDEN`, `TDOR`, `TDRC`, `TDRL`, `TDTG`: text frames whose entries are
//! truncated ID3v2.4 timestamps rather than arbitrary strings.

use crate::core::io::BufStream;
use crate::id3v2::frame::Frame;
use crate::id3v2::header::Version;
use crate::id3v2::spec::{check_encoding, parse_encoding, parse_text_list, render_text_list};
use crate::id3v2::timestamp::TimeStamp;
use crate::string::Encoding;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug)]
pub struct TimestampFrame {
    frame_id: String,
    pub encoding: Encoding,
    pub timestamps: Vec<TimeStamp>,
}

impl TimestampFrame {
    pub fn new(frame_id: &str) -> Self {
        TimestampFrame {
            frame_id: frame_id.to_string(),
            encoding: Encoding::default(),
            timestamps: Vec::new(),
        }
    }

    pub(crate) fn parse(frame_id: &str, stream: &mut BufStream) -> Self {
        if stream.is_empty() {
            return TimestampFrame::new(frame_id);
        }

        let encoding = parse_encoding(stream).unwrap_or(Encoding::Latin1);
        let timestamps = parse_text_list(encoding, stream)
            .iter()
            .map(|text| TimeStamp::parse(text))
            .collect();

        TimestampFrame {
            frame_id: frame_id.to_string(),
            encoding,
            timestamps,
        }
    }
}

impl Frame for TimestampFrame {
    fn id(&self) -> &str {
        &self.frame_id
    }

    fn key(&self) -> String {
        self.frame_id.clone()
    }

    fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn render(&self, version: Version) -> Vec<u8> {
        let encoding = check_encoding(self.encoding, version);
        let text: Vec<String> = self.timestamps.iter().map(TimeStamp::to_string).collect();

        let mut out = vec![encoding.as_byte()];
        out.extend(render_text_list(encoding, &text));
        out
    }

    fn payload_eq(&self, other: &str) -> bool {
        self.timestamps.last().map_or(false, |ts| ts.to_string() == other)
    }
}

impl Display for TimestampFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let text: Vec<String> = self.timestamps.iter().map(TimeStamp::to_string).collect();
        write!(f, "{}", text.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_timestamp() {
        let data = b"\x002004-01-02T03:04:05";
        let mut stream = BufStream::new(data);
        let frame = TimestampFrame::parse("TDRC", &mut stream);
        assert_eq!(frame.timestamps[0].to_string(), "2004-01-02T03:04:05");
    }

    #[test]
    fn parses_truncated_timestamp() {
        let data = b"\x002004";
        let mut stream = BufStream::new(data);
        let frame = TimestampFrame::parse("TDRC", &mut stream);
        assert_eq!(frame.timestamps[0].to_string(), "2004");
    }
}

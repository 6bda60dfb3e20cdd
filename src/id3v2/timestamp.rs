//! `TDRC`/`TDOR`/etc. timestamp parsing.
//!
//! ID3v2.4 timestamps are a left-truncated prefix of `yyyy-MM-ddTHH:mm:ss`; any
//! trailing component may be omitted, but components are never omitted from the
//! middle. The canonical textual form truncates at the first absent field, and
//! ordering falls directly out of comparing that textual form.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeStamp {
    pub year: Option<u16>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

impl TimeStamp {
    /// Parses a (possibly truncated, possibly malformed) timestamp string.
    /// Unparseable or out-of-range trailing components are simply dropped
    /// rather than failing the whole value, matching the lenient handling
    /// the rest of the frame layer uses for malformed text.
    pub fn parse(text: &str) -> Self {
        let mut ts = Self::default();
        let text = text.trim();

        // Split on the date/time separator first ('T' or ' '), then the date
        // portion on '-' and the time portion on ':'.
        let (date_part, time_part) = match text.find(['T', ' ']) {
            Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
            None => (text, None),
        };

        let mut date_fields = date_part.split('-');

        ts.year = date_fields.next().and_then(|s| s.parse().ok());
        if ts.year.is_none() {
            return ts;
        }

        ts.month = date_fields.next().and_then(|s| s.parse().ok());
        if ts.month.is_none() {
            return ts;
        }

        ts.day = date_fields.next().and_then(|s| s.parse().ok());
        if ts.day.is_none() {
            return ts;
        }

        let time_part = match time_part {
            Some(t) => t,
            None => return ts,
        };

        let mut time_fields = time_part.split(':');

        ts.hour = time_fields.next().and_then(|s| s.parse().ok());
        if ts.hour.is_none() {
            return ts;
        }

        ts.minute = time_fields.next().and_then(|s| s.parse().ok());
        if ts.minute.is_none() {
            return ts;
        }

        ts.second = time_fields.next().and_then(|s| s.parse().ok());

        ts
    }
}

impl Display for TimeStamp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let year = match self.year {
            Some(y) => y,
            None => return Ok(()),
        };

        write!(f, "{:04}", year)?;

        let month = match self.month {
            Some(m) => m,
            None => return Ok(()),
        };

        write!(f, "-{:02}", month)?;

        let day = match self.day {
            Some(d) => d,
            None => return Ok(()),
        };

        write!(f, "-{:02}", day)?;

        let hour = match self.hour {
            Some(h) => h,
            None => return Ok(()),
        };

        write!(f, "T{:02}", hour)?;

        let minute = match self.minute {
            Some(m) => m,
            None => return Ok(()),
        };

        write!(f, ":{:02}", minute)?;

        if let Some(second) = self.second {
            write!(f, ":{:02}", second)?;
        }

        Ok(())
    }
}

impl PartialOrd for TimeStamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeStamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_timestamp_roundtrips() {
        let ts = TimeStamp::parse("2004-03-05T12:30:45");
        assert_eq!(ts.to_string(), "2004-03-05T12:30:45");
    }

    #[test]
    fn truncates_at_first_absent_field() {
        let ts = TimeStamp::parse("2004-03");
        assert_eq!(ts.to_string(), "2004-03");
        assert_eq!(ts.day, None);
    }

    #[test]
    fn year_only() {
        let ts = TimeStamp::parse("2004");
        assert_eq!(ts.to_string(), "2004");
    }

    #[test]
    fn ordering_matches_text() {
        let a = TimeStamp::parse("2004-01");
        let b = TimeStamp::parse("2004-02");
        assert!(a < b);

        let c = TimeStamp::parse("2004");
        assert!(c < a);
    }
}

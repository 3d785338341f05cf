//! Date helper functions

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// chrono format for dates shown to readers
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Formats that carry an explicit UTC offset
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Wall-clock formats without an offset
const NAIVE_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Errors raised while turning a raw date string into a display date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("date string is empty")]
    Empty,

    #[error("unparseable date: {0:?}")]
    Unparseable(String),

    #[error("unknown time zone: {0:?}")]
    UnknownZone(String),
}

/// Time zone whose calendar date is shown to readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The zone of the running process
    #[default]
    Local,
    /// An IANA zone such as `Europe/Rome`
    Named(Tz),
}

impl FromStr for DisplayZone {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }

        s.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| FormatError::UnknownZone(s.to_string()))
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// A raw date after parsing, before it is placed in a zone
enum ParsedDate {
    /// Absolute instant; converted into the display zone
    Absolute(DateTime<FixedOffset>),
    /// Wall-clock value; already expressed in the display zone
    WallClock(NaiveDateTime),
}

fn parse_raw(raw: &str) -> Result<ParsedDate, FormatError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FormatError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedDate::Absolute(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(ParsedDate::Absolute(dt));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDate::Absolute(dt));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDate::WallClock(dt));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(ParsedDate::WallClock(dt));
            }
        }
    }

    Err(FormatError::Unparseable(raw.to_string()))
}

/// Calendar date of `raw` as seen from `tz`
pub fn display_date_in<Z: TimeZone>(raw: &str, tz: &Z) -> Result<NaiveDate, FormatError> {
    Ok(match parse_raw(raw)? {
        ParsedDate::Absolute(dt) => dt.with_timezone(tz).date_naive(),
        ParsedDate::WallClock(dt) => dt.date(),
    })
}

/// Format a raw API date as `YYYY-MM-DD` in the given display zone
///
/// # Examples
/// ```ignore
/// format_display_date("2021-03-05T00:00:00Z", DisplayZone::Named(Tz::UTC)) // -> Ok("2021-03-05")
/// ```
pub fn format_display_date(raw: &str, zone: DisplayZone) -> Result<String, FormatError> {
    let date = match zone {
        DisplayZone::Local => display_date_in(raw, &Local)?,
        DisplayZone::Named(tz) => display_date_in(raw, &tz)?,
    };
    Ok(date.format(DISPLAY_FORMAT).to_string())
}

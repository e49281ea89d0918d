// File: ./src/model/timerange.rs
//! Compact time-range tokens.
//!
//! A token is `#` followed by a start fragment and an optional `-end`
//! fragment. Every fragment is made of fixed-width digit groups: an
//! optional date (`YYYYMMDD` or `MMDD`), an optional `T` marker and an
//! optional time (`hh`, `hhmm` or `hhmmss`). Whatever a fragment leaves out
//! is filled in from the reference date ("today") or from the other
//! fragment:
//!
//! ```text
//! #20250601T0900-T1030    2025-06-01 09:00 -> 2025-06-01 10:30
//! #20250601T0900-0603     2025-06-01 09:00 -> <this year>-06-03 00:00
//! #0900-1030              today 09:00 -> today 10:30
//! #20250601-20250603      2025-06-01 00:00 -> 2025-06-03 00:00
//! #0615                   <this year>-06-15 00:00 -> next day 00:00
//! #T0900                  today 09:00 -> today 10:00
//! ```

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// First character of every time-range token.
pub const SENTINEL: char = '#';
/// Separates the date digits of a fragment from its time digits.
pub const TIME_MARKER: char = 'T';
/// Separates the start fragment from the end fragment.
pub const RANGE_SEPARATOR: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    #[error("time range must start with '#': '{0}'")]
    MissingSentinel(String),
    #[error("malformed time-range fragment '{0}'")]
    MalformedFragment(String),
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}

/// A resolved start/end pair. `end` is never adjusted to follow `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DatePart {
    #[default]
    Absent,
    MonthDay(u32, u32),
    Full(i32, u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hms(u32, u32, u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Fragment {
    date: DatePart,
    time: Option<Hms>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scanned {
    Resolved(Fragment),
    /// Four bare digits: either `MMDD` or `hhmm`, decided by the caller.
    Bare4(u32, u32),
}

impl TimeRange {
    /// Parses `token` against the local current date.
    pub fn parse(token: &str) -> Result<Self, TimeRangeError> {
        Self::parse_with_today(token, Local::now().date_naive())
    }

    /// Parses `token`, filling omitted date parts from `today`.
    pub fn parse_with_today(token: &str, today: NaiveDate) -> Result<Self, TimeRangeError> {
        let token = token.trim();
        let body = token
            .strip_prefix(SENTINEL)
            .ok_or_else(|| TimeRangeError::MissingSentinel(token.to_string()))?;

        let (start_text, end_text) = body.split_once(RANGE_SEPARATOR).unwrap_or((body, ""));

        let start = match scan_fragment(start_text)? {
            Scanned::Resolved(fragment) => fragment,
            Scanned::Bare4(a, b) if is_month_day(a, b) => Fragment {
                date: DatePart::MonthDay(a, b),
                time: None,
            },
            Scanned::Bare4(a, b) => Fragment {
                date: DatePart::Absent,
                time: Some(Hms(a, b, 0)),
            },
        };
        // A dated start reads a bare end as month-day whenever it is one; a
        // start without a date only ever pairs with a clock time.
        let end = match scan_fragment(end_text)? {
            Scanned::Resolved(fragment) => fragment,
            Scanned::Bare4(a, b) if start.date == DatePart::Absent => Fragment {
                date: DatePart::Absent,
                time: Some(Hms(a, b, 0)),
            },
            Scanned::Bare4(a, b) if is_month_day(a, b) || start.time.is_none() => Fragment {
                date: DatePart::MonthDay(a, b),
                time: None,
            },
            Scanned::Bare4(a, b) => Fragment {
                date: DatePart::Absent,
                time: Some(Hms(a, b, 0)),
            },
        };

        let start_date = match start.date {
            DatePart::Absent => today,
            DatePart::MonthDay(month, day) => make_date(today.year(), month, day)?,
            DatePart::Full(year, month, day) => make_date(year, month, day)?,
        };
        let start_at = start_date.and_time(make_time(start.time)?);

        let end_at = match (end.date, end.time) {
            (DatePart::Full(year, month, day), time) => {
                make_date(year, month, day)?.and_time(make_time(time)?)
            }
            // Uses the current year, not the start's year.
            (DatePart::MonthDay(month, day), time) => {
                make_date(today.year(), month, day)?.and_time(make_time(time)?)
            }
            (DatePart::Absent, Some(time)) => start_date.and_time(make_time(Some(time))?),
            (DatePart::Absent, None) => match start {
                Fragment {
                    date: DatePart::MonthDay(..) | DatePart::Full(..),
                    time: None,
                } => start_at + Duration::days(1),
                Fragment { time: Some(_), .. } => start_at + Duration::hours(1),
                _ => start_at,
            },
        };

        Ok(Self {
            start: start_at,
            end: end_at,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Whole minutes between the two sides of a bare `hhmm-hhmm` pair, as text.
///
/// Each side is read as a time of day, so `"0900-1030"` yields `"90"`.
pub fn duration_minutes(range: &str) -> Result<String, TimeRangeError> {
    duration_minutes_with_today(range, Local::now().date_naive())
}

/// [`duration_minutes`] with both sides placed on `today`.
pub fn duration_minutes_with_today(
    range: &str,
    today: NaiveDate,
) -> Result<String, TimeRangeError> {
    let sides: Vec<String> = range
        .split(RANGE_SEPARATOR)
        .map(|side| format!("{TIME_MARKER}{side}"))
        .collect();
    let token = format!("{SENTINEL}{}", sides.join(&RANGE_SEPARATOR.to_string()));
    let parsed = TimeRange::parse_with_today(&token, today)?;
    Ok(parsed.duration().num_minutes().to_string())
}

fn scan_fragment(text: &str) -> Result<Scanned, TimeRangeError> {
    let malformed = || TimeRangeError::MalformedFragment(text.to_string());

    if let Some((date_text, time_text)) = text.split_once(TIME_MARKER) {
        let date = digit_pairs(date_text).ok_or_else(malformed)?;
        let time = digit_pairs(time_text).ok_or_else(malformed)?;
        let fragment = Fragment {
            date: date_part(&date).ok_or_else(malformed)?,
            time: time_part(&time).ok_or_else(malformed)?,
        };
        return Ok(Scanned::Resolved(fragment));
    }

    let pairs = digit_pairs(text).ok_or_else(malformed)?;
    let fragment = match pairs.len() {
        0 => Fragment::default(),
        1 => Fragment {
            date: DatePart::Absent,
            time: time_part(&pairs).ok_or_else(malformed)?,
        },
        2 => return Ok(Scanned::Bare4(pairs[0], pairs[1])),
        // MMDD followed by an hour.
        3 => Fragment {
            date: date_part(&pairs[..2]).ok_or_else(malformed)?,
            time: time_part(&pairs[2..]).ok_or_else(malformed)?,
        },
        4..=7 => Fragment {
            date: date_part(&pairs[..4]).ok_or_else(malformed)?,
            time: time_part(&pairs[4..]).ok_or_else(malformed)?,
        },
        _ => return Err(malformed()),
    };
    Ok(Scanned::Resolved(fragment))
}

/// Splits an all-digit string into two-digit numbers.
fn digit_pairs(text: &str) -> Option<Vec<u32>> {
    if !text.len().is_multiple_of(2) || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        text.as_bytes()
            .chunks(2)
            .map(|pair| u32::from(pair[0] - b'0') * 10 + u32::from(pair[1] - b'0'))
            .collect(),
    )
}

fn is_month_day(month: u32, day: u32) -> bool {
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn date_part(pairs: &[u32]) -> Option<DatePart> {
    match *pairs {
        [] => Some(DatePart::Absent),
        [month, day] => Some(DatePart::MonthDay(month, day)),
        [century, year, month, day] => {
            Some(DatePart::Full((century * 100 + year) as i32, month, day))
        }
        _ => None,
    }
}

fn time_part(pairs: &[u32]) -> Option<Option<Hms>> {
    match *pairs {
        [] => Some(None),
        [hour] => Some(Some(Hms(hour, 0, 0))),
        [hour, minute] => Some(Some(Hms(hour, minute, 0))),
        [hour, minute, second] => Some(Some(Hms(hour, minute, second))),
        _ => None,
    }
}

fn make_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, TimeRangeError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TimeRangeError::InvalidDate { year, month, day })
}

fn make_time(time: Option<Hms>) -> Result<NaiveTime, TimeRangeError> {
    let Hms(hour, minute, second) = time.unwrap_or(Hms(0, 0, 0));
    NaiveTime::from_hms_opt(hour, minute, second).ok_or(TimeRangeError::InvalidTime {
        hour,
        minute,
        second,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_fragment_layouts() {
        assert_eq!(
            scan_fragment("20250601T0930").unwrap(),
            Scanned::Resolved(Fragment {
                date: DatePart::Full(2025, 6, 1),
                time: Some(Hms(9, 30, 0)),
            })
        );
        assert_eq!(
            scan_fragment("061509").unwrap(),
            Scanned::Resolved(Fragment {
                date: DatePart::MonthDay(6, 15),
                time: Some(Hms(9, 0, 0)),
            })
        );
        assert_eq!(
            scan_fragment("20250601093015").unwrap(),
            Scanned::Resolved(Fragment {
                date: DatePart::Full(2025, 6, 1),
                time: Some(Hms(9, 30, 15)),
            })
        );
        assert_eq!(scan_fragment("0900").unwrap(), Scanned::Bare4(9, 0));
        assert_eq!(
            scan_fragment("").unwrap(),
            Scanned::Resolved(Fragment::default())
        );
    }

    #[test]
    fn test_scan_fragment_rejects_odd_widths() {
        assert!(scan_fragment("2025060").is_err());
        assert!(scan_fragment("T09301").is_err());
        assert!(scan_fragment("202506T09").is_err());
        assert!(scan_fragment("2025060109301500").is_err());
        assert!(scan_fragment("ab").is_err());
    }

    #[test]
    fn test_digit_pairs() {
        assert_eq!(digit_pairs("0930"), Some(vec![9, 30]));
        assert_eq!(digit_pairs(""), Some(vec![]));
        assert_eq!(digit_pairs("093"), None);
        assert_eq!(digit_pairs("9a"), None);
    }
}

//! Calendar date parsing for batch names, overrides and archive stamps.
//!
//! Accepted input formats are `YYYYMMDD` and `YYYY-MM-DD`; everything is
//! normalized to [`NaiveDate`] and printed back as `YYYY-MM-DD`.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

/// Date parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date format: `{0}` (expected yyyymmdd or yyyy-mm-dd)")]
    Format(String),

    #[error("date does not exist: `{0}`")]
    Calendar(String),
}

/// Parse a date given as `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    let bytes = s.trim().as_bytes();

    let (year, month, day) = match bytes.len() {
        8 => (&bytes[0..4], &bytes[4..6], &bytes[6..8]),
        10 if bytes[4] == b'-' && bytes[7] == b'-' => (&bytes[0..4], &bytes[5..7], &bytes[8..10]),
        _ => return Err(DateError::Format(s.to_owned())),
    };

    let (Some(year), Some(month), Some(day)) = (parse_u16(year), parse_u8(month), parse_u8(day))
    else {
        return Err(DateError::Format(s.to_owned()));
    };

    NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())
        .ok_or_else(|| DateError::Calendar(s.to_owned()))
}

/// Date encoded in the 8-digit `YYYYMMDD` prefix of a file stem.
///
/// `20240101.inbox` → 2024-01-01. Returns `None` when the prefix is missing
/// or does not name a real calendar day.
pub fn date_from_stem(stem: &str) -> Option<NaiveDate> {
    let prefix = stem.as_bytes().get(..8)?;
    let year = parse_u16(&prefix[0..4])?;
    let month = parse_u8(&prefix[4..6])?;
    let day = parse_u8(&prefix[6..8])?;
    NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())
}

/// `YYYY-MM-DD`
#[inline]
pub fn to_dashed(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYYMMDD`
#[inline]
pub fn to_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Today in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Name of the archive subdirectory for a run started at `now`.
pub fn archive_stamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d-%H%M%S").to_string()
}

/// Creation timestamp stored in entry records (RFC 3339, UTC, microseconds).
pub fn created_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + d as u16;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_compact() {
        assert_eq!(parse_date("20171201"), Ok(NaiveDate::from_ymd_opt(2017, 12, 1).unwrap()));
    }

    #[test]
    fn test_parse_date_dashed() {
        assert_eq!(parse_date("2017-12-01"), Ok(NaiveDate::from_ymd_opt(2017, 12, 1).unwrap()));
        assert_eq!(parse_date(" 2024-02-29 "), Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn test_parse_date_invalid_format() {
        for input in ["", "2017/12/01", "171201", "2017-1-01", "2017120", "abcdefgh", "2017_12_01"] {
            assert!(
                matches!(parse_date(input), Err(DateError::Format(_))),
                "{input} should be a format error"
            );
        }
    }

    #[test]
    fn test_parse_date_invalid_calendar_day() {
        assert!(matches!(parse_date("20230229"), Err(DateError::Calendar(_))));
        assert!(matches!(parse_date("2024-13-01"), Err(DateError::Calendar(_))));
        assert!(matches!(parse_date("2024-04-31"), Err(DateError::Calendar(_))));
    }

    #[test]
    fn test_date_from_stem() {
        assert_eq!(date_from_stem("20240101.inbox"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(date_from_stem("20240101"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(date_from_stem("inbox.202512"), None);
        assert_eq!(date_from_stem("2024011"), None);
        assert_eq!(date_from_stem("20241399.txt"), None);
    }

    #[test]
    fn test_formatting() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(to_dashed(date), "2024-03-07");
        assert_eq!(to_compact(date), "20240307");
    }

    #[test]
    fn test_archive_stamp() {
        let now = Local.with_ymd_and_hms(2025, 12, 1, 8, 5, 9).unwrap();
        assert_eq!(archive_stamp(now), "2025-12-01-080509");
    }

    #[test]
    fn test_created_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(created_timestamp(now), "2024-01-01T12:00:00.000000+00:00");
    }
}

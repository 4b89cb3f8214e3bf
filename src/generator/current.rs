//! Current-entry summary.
//!
//! `<assets>/current_haiku.json` names the newest entry by `(date, seq)` and
//! the number of entries:
//!
//! ```json
//! {
//!   "current_count": 42,
//!   "current_haiku": { "path_html": "data/2024/01/05/haiku.2024-01-05.03.html" }
//! }
//! ```
//!
//! With no records at all nothing is written, so an earlier summary survives.

use super::{RecordError, ScannedRecord, scan_records};
use crate::{config::SiteConfig, log, utils::fs as fsx};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Contents of `current_haiku.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSummary {
    pub current_count: usize,
    pub current_haiku: CurrentHaiku,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentHaiku {
    pub path_html: String,
}

/// Recompute the summary from the records and write it.
///
/// Returns `None` (and writes nothing) when there are no usable records.
pub fn update_current(config: &SiteConfig) -> Result<Option<CurrentSummary>> {
    let Some(summary) = CurrentSummary::from_records(scan_records(&config.paths.data)) else {
        log!("warn"; "no haiku entries found, skipping current summary");
        return Ok(None);
    };

    let path = config.paths.current_path();
    fsx::write_json(&path, &summary)?;
    log!("current"; "built {} ({} entries)", path.display(), summary.current_count);
    Ok(Some(summary))
}

impl CurrentSummary {
    /// Count the usable records and pick the greatest `(date, seq)`.
    ///
    /// Dates compare as strings, sequences as integers. On a tie the last
    /// record in scan order wins.
    pub fn from_records<I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = Result<ScannedRecord, RecordError>>,
    {
        let mut count = 0;
        let mut latest: Option<(String, u32, String)> = None;

        for scanned in records {
            let (date, seq, path_html) = match scanned.and_then(|r| ordering_key(&r)) {
                Ok(key) => key,
                Err(err) => {
                    log!("error"; "{err}");
                    continue;
                }
            };

            count += 1;
            let newer = latest
                .as_ref()
                .is_none_or(|(d, s, _)| (date.as_str(), seq) >= (d.as_str(), *s));
            if newer {
                latest = Some((date, seq, path_html));
            }
        }

        latest.map(|(_, _, path_html)| Self {
            current_count: count,
            current_haiku: CurrentHaiku { path_html },
        })
    }
}

fn ordering_key(scanned: &ScannedRecord) -> Result<(String, u32, String), RecordError> {
    let path_html = scanned.path_html()?.to_owned();
    let date = scanned.record.date.clone().unwrap_or_default();
    Ok((date, scanned.record.seq.unwrap_or(0), path_html))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use std::fs;

    #[test]
    fn test_picks_greatest_date_then_seq() {
        let (_dir, config) = project();
        write_record(&config, &record("2024-01-02", 9, &["a"], &[]));
        write_record(&config, &record("2024-01-02", 10, &["b"], &[]));
        write_record(&config, &record("2024-01-01", 12, &["c"], &[]));

        let summary = update_current(&config).unwrap().unwrap();

        assert_eq!(summary.current_count, 3);
        assert_eq!(
            summary.current_haiku.path_html,
            "data/2024/01/02/haiku.2024-01-02.10.html"
        );
        let written: CurrentSummary =
            serde_json::from_str(&fs::read_to_string(config.paths.current_path()).unwrap())
                .unwrap();
        assert_eq!(written, summary);
    }

    #[test]
    fn test_tie_goes_to_last_in_scan_order() {
        let (_dir, config) = project();
        let mut first = record("2024-01-01", 1, &["a"], &[]);
        first["path_html"] = "first.html".into();
        write_raw(&config, "data/a.json", &first.to_string());
        let mut second = record("2024-01-01", 1, &["b"], &[]);
        second["path_html"] = "second.html".into();
        write_raw(&config, "data/b.json", &second.to_string());

        let summary = update_current(&config).unwrap().unwrap();

        assert_eq!(summary.current_haiku.path_html, "second.html");
    }

    #[test]
    fn test_zero_records_skips_without_error() {
        let (_dir, config) = project();
        write_raw(&config, "assets/current_haiku.json", "previous");

        let summary = update_current(&config).unwrap();

        assert!(summary.is_none());
        assert_eq!(fs::read_to_string(config.paths.current_path()).unwrap(), "previous");
    }

    #[test]
    fn test_unusable_records_not_counted() {
        let (_dir, config) = project();
        write_record(&config, &record("2024-01-01", 1, &["a"], &[]));
        write_raw(&config, "data/broken.json", "[");
        write_raw(&config, "data/nopath.json", r#"{"date": "2099-01-01", "seq": 1}"#);
        write_raw(&config, "data/nodate.json", r#"{"path_html": "x.html"}"#);

        let summary = update_current(&config).unwrap().unwrap();

        assert_eq!(summary.current_count, 2);
        assert_eq!(
            summary.current_haiku.path_html,
            "data/2024/01/01/haiku.2024-01-01.01.html"
        );
    }
}

//! Entry identity and the structured record written next to each page.

use crate::utils::date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Structured record of one haiku, as stored in `haiku.YYYY-MM-DD.NN.json`.
///
/// Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaikuEntry {
    /// `YYYYMMDD-NN`
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// 1-based position within the source batch file
    pub seq: u32,
    pub title: String,
    /// Verbatim lines of the entry
    pub lines: Vec<String>,
    pub tags: Vec<String>,
    /// Page path relative to the project root, `/`-separated
    pub path_html: String,
    /// Record path relative to the project root, `/`-separated
    pub path_json: String,
    /// RFC 3339 creation timestamp (UTC)
    pub created: String,
}

/// Where the two files of an entry live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPaths {
    pub html: PathBuf,
    pub json: PathBuf,
}

impl EntryPaths {
    /// `<data>/YYYY/MM/DD/haiku.YYYY-MM-DD.NN.{html,json}`
    pub fn new(data_dir: &Path, date: NaiveDate, seq: u32) -> Self {
        let dashed = date::to_dashed(date);
        let dir = data_dir
            .join(date.format("%Y").to_string())
            .join(date.format("%m").to_string())
            .join(date.format("%d").to_string());
        let stem = format!("haiku.{dashed}.{seq:02}");

        Self {
            html: dir.join(format!("{stem}.html")),
            json: dir.join(format!("{stem}.json")),
        }
    }

    /// Whether either file already exists.
    pub fn any_exists(&self) -> bool {
        self.html.exists() || self.json.exists()
    }
}

/// Stable id: compact date plus two-digit sequence.
///
/// Injective over `(date, seq)` for `seq < 100`; wider sequences keep all
/// their digits, so distinct pairs still never collide.
pub fn entry_id(date: NaiveDate, seq: u32) -> String {
    format!("{}-{seq:02}", date::to_compact(date))
}

/// Title used when no override is given: `YYYY-MM-DD.NN`.
pub fn default_title(date: NaiveDate, seq: u32) -> String {
    format!("{}.{seq:02}", date::to_dashed(date))
}

/// Entry date by precedence: override, then file name prefix, then today.
pub fn resolve_date(date_override: Option<NaiveDate>, source: &Path) -> NaiveDate {
    date_override
        .or_else(|| {
            source
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(date::date_from_stem)
        })
        .unwrap_or_else(date::today)
}

/// Split a block into its lines, keeping each line verbatim.
pub fn block_lines(block: &str) -> Vec<String> {
    block.lines().map(str::to_owned).collect()
}

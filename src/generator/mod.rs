//! Derived catalogs over the entry records.
//!
//! Every pass re-reads all records from the data tree and writes one file:
//!
//! | Pass      | Output                      |
//! |-----------|-----------------------------|
//! | `tags`    | `<data>/tags.json`          |
//! | `manifest`| `<data>/manifest.json`      |
//! | `current` | `<assets>/current_haiku.json` |
//!
//! A record that cannot be read or lacks a field the pass needs is logged
//! and skipped; the pass still writes its output.

pub mod current;
pub mod manifest;
pub mod tags;

pub use current::update_current;
pub use manifest::{Manifest, build_manifest};
pub use tags::{TagIndex, build_tag_index};

use crate::{
    config::{MANIFEST_FILE, TAGS_FILE},
    pages::joined_text,
    tagger::PosGate,
    utils::fs as fsx,
};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Per-record scan failures. Never fatal to a pass.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} is missing `{field}`", path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

/// Record fields as found on disk. Everything is optional here; each pass
/// asks for the fields it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredRecord {
    pub id: Option<String>,
    pub date: Option<String>,
    pub seq: Option<u32>,
    pub title: Option<String>,
    pub lines: Vec<String>,
    pub tags: Vec<String>,
    pub path_html: Option<String>,
    pub path_json: Option<String>,
}

/// A parsed record and the file it came from.
#[derive(Debug, Clone)]
pub struct ScannedRecord {
    pub path: PathBuf,
    pub record: StoredRecord,
}

impl ScannedRecord {
    pub fn id(&self) -> Result<&str, RecordError> {
        self.require("id", self.record.id.as_deref())
    }

    pub fn path_html(&self) -> Result<&str, RecordError> {
        self.require("path_html", self.record.path_html.as_deref())
    }

    pub fn path_json(&self) -> Result<&str, RecordError> {
        self.require("path_json", self.record.path_json.as_deref())
    }

    /// Stored tags that still pass the gate against the stored lines.
    pub fn validated_tags(&self, gate: &PosGate<'_>) -> Vec<String> {
        gate.filter(&self.record.tags, &joined_text(&self.record.lines))
    }

    fn require<'a>(
        &self,
        field: &'static str,
        value: Option<&'a str>,
    ) -> Result<&'a str, RecordError> {
        value.ok_or_else(|| RecordError::MissingField {
            path: self.path.clone(),
            field,
        })
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Record files below `data_dir` in sorted path order, aggregates excluded.
pub fn record_files(data_dir: &Path) -> Vec<PathBuf> {
    fsx::collect_files_with_ext(data_dir, "json")
        .into_iter()
        .filter(|path| {
            path.file_name()
                .is_none_or(|name| name != TAGS_FILE && name != MANIFEST_FILE)
        })
        .collect()
}

/// Read and parse one record file.
pub fn read_record(path: &Path) -> Result<ScannedRecord, RecordError> {
    let content = fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let record = serde_json::from_str(&content).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ScannedRecord {
        path: path.to_path_buf(),
        record,
    })
}

/// Every record under `data_dir`, parsed or failed, in scan order.
pub fn scan_records(data_dir: &Path) -> impl Iterator<Item = Result<ScannedRecord, RecordError>> {
    record_files(data_dir).into_iter().map(|path| read_record(&path))
}

/// Forward-slash form of a stored path.
fn posix_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ============================================================================
// Test helpers
// ============================================================================

//! Tag index generation.
//!
//! Reverse index from tag to the entries carrying it, rebuilt from scratch
//! on every run.
//!
//! # Format
//!
//! ```json
//! {
//!   "tags": [
//!     { "tag": "pond", "count": 2, "files": ["20240101-01", "20240102-03"] }
//!   ]
//! }
//! ```
//!
//! Tags are sorted; each tag's ids keep record scan order.

use super::{RecordError, ScannedRecord, scan_records};
use crate::{
    cli::Mode,
    config::SiteConfig,
    debug, log,
    logger::Verbosity,
    tagger::{PosGate, Tagger},
    utils::fs as fsx,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of `tags.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagIndex {
    pub tags: Vec<TagIndexEntry>,
}

/// One tag and the ids of the entries carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagIndexEntry {
    pub tag: String,
    pub count: usize,
    pub files: Vec<String>,
}

// ============================================================================
// Public API
// ============================================================================

/// Rebuild (or, in clean mode, remove) the tag index.
///
/// Returns the written index, or `None` in clean mode.
pub fn build_tag_index(
    config: &SiteConfig,
    mode: Mode,
    tagger: &dyn Tagger,
) -> Result<Option<TagIndex>> {
    let path = config.paths.tags_path();

    if mode == Mode::Clean {
        if fsx::remove_if_exists(&path)? {
            log!("tags"; "removed {}", path.display());
        } else {
            log!("tags"; "nothing to remove");
        }
        return Ok(None);
    }

    let gate = PosGate::new(tagger);
    let index = TagIndex::from_records(scan_records(&config.paths.data), &gate, config.verbosity);
    fsx::write_json(&path, &index)?;

    log!("tags"; "built {} ({} tags)", path.display(), index.tags.len());
    Ok(Some(index))
}

// ============================================================================
// Index
// ============================================================================

impl TagIndex {
    /// Re-validate every record's stored tags and invert them.
    ///
    /// Unreadable records and records without an id are logged and skipped.
    pub fn from_records<I>(records: I, gate: &PosGate<'_>, verbosity: Verbosity) -> Self
    where
        I: IntoIterator<Item = Result<ScannedRecord, RecordError>>,
    {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for scanned in records {
            let (id, before, tags) = match scanned.and_then(|r| revalidate(&r, gate)) {
                Ok(found) => found,
                Err(err) => {
                    log!("error"; "{err}");
                    continue;
                }
            };

            debug!(verbosity; "tags"; "{id}: tags {before} -> {}", tags.len());

            for tag in tags {
                let files = map.entry(tag).or_default();
                if !files.contains(&id) {
                    files.push(id.clone());
                }
            }
        }

        Self {
            tags: map
                .into_iter()
                .map(|(tag, files)| TagIndexEntry {
                    tag,
                    count: files.len(),
                    files,
                })
                .collect(),
        }
    }

    #[cfg(test)]
    fn files(&self, tag: &str) -> Option<&[String]> {
        self.tags
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.files.as_slice())
    }
}

/// Id, stored tag count and validated tags of one record.
fn revalidate(
    scanned: &ScannedRecord,
    gate: &PosGate<'_>,
) -> Result<(String, usize, Vec<String>), RecordError> {
    let id = scanned.id()?.to_owned();
    Ok((id, scanned.record.tags.len(), scanned.validated_tags(gate)))
}

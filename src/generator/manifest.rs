//! Manifest generation.
//!
//! Flat catalog of every entry for listing and search front ends. Carries no
//! generation timestamp, so an unchanged record set always yields the same
//! bytes.
//!
//! # Format
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "id": "20240101-01",
//!       "title": "2024-01-01.01",
//!       "path_html": "data/2024/01/01/haiku.2024-01-01.01.html",
//!       "path_json": "data/2024/01/01/haiku.2024-01-01.01.json",
//!       "tags": ["pond"]
//!     }
//!   ]
//! }
//! ```

use super::{RecordError, ScannedRecord, posix_path, scan_records};
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

/// Contents of `manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub items: Vec<ManifestItem>,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub id: String,
    pub title: String,
    pub path_html: String,
    pub path_json: String,
    pub tags: Vec<String>,
}

/// Rebuild (or, in clean mode, remove) the manifest.
pub fn build_manifest(
    config: &SiteConfig,
    mode: Mode,
    tagger: &dyn Tagger,
) -> Result<Option<Manifest>> {
    let path = config.paths.manifest_path();

    if mode == Mode::Clean {
        if fsx::remove_if_exists(&path)? {
            log!("manifest"; "removed {}", path.display());
        } else {
            log!("manifest"; "nothing to remove");
        }
        return Ok(None);
    }

    let gate = PosGate::new(tagger);
    let manifest = Manifest::from_records(scan_records(&config.paths.data), &gate, config.verbosity);
    fsx::write_json(&path, &manifest)?;

    log!("manifest"; "built {} ({} items)", path.display(), manifest.items.len());
    Ok(Some(manifest))
}

impl Manifest {
    /// One item per usable record, in scan order.
    pub fn from_records<I>(records: I, gate: &PosGate<'_>, verbosity: Verbosity) -> Self
    where
        I: IntoIterator<Item = Result<ScannedRecord, RecordError>>,
    {
        let items = records
            .into_iter()
            .filter_map(|scanned| match scanned.and_then(|r| ManifestItem::from_record(&r, gate)) {
                Ok((item, before)) => {
                    debug!(
                        verbosity; "manifest"; "{}: manifest tags {before} -> {}",
                        item.id,
                        item.tags.len()
                    );
                    Some(item)
                }
                Err(err) => {
                    log!("error"; "{err}");
                    None
                }
            })
            .collect();

        Self { items }
    }
}

impl ManifestItem {
    /// Item for one record, with the stored tag count before validation.
    fn from_record(
        scanned: &ScannedRecord,
        gate: &PosGate<'_>,
    ) -> Result<(Self, usize), RecordError> {
        let item = Self {
            id: scanned.id()?.to_owned(),
            title: scanned.record.title.clone().unwrap_or_default(),
            path_html: posix_path(scanned.path_html()?),
            path_json: posix_path(scanned.path_json()?),
            tags: scanned.validated_tags(gate),
        };
        Ok((item, scanned.record.tags.len()))
    }
}

//! `[paths]` section configuration.
//!
//! Directory roles of a haiku project. Every path is relative to the project
//! root until [`SiteConfig::update_with_cli`](super::SiteConfig::update_with_cli)
//! normalizes it to an absolute path.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[paths]` section in haiku.toml.
///
/// # Example
/// ```toml
/// [paths]
/// inbox = "inbox"        # Raw submissions and daily batch files
/// archive = "archive"    # Consumed inbox files, one timestamped dir per run
/// data = "data"          # Entry tree plus tags.json / manifest.json
/// assets = "assets"      # Template and current_haiku.json
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::paths::root")]
    #[educe(Default = defaults::paths::root())]
    pub root: Option<PathBuf>,

    /// Inbox directory holding `*.txt` batches awaiting the page build.
    #[serde(default = "defaults::paths::inbox")]
    #[educe(Default = defaults::paths::inbox())]
    pub inbox: PathBuf,

    /// Archive directory receiving consumed inbox files.
    #[serde(default = "defaults::paths::archive")]
    #[educe(Default = defaults::paths::archive())]
    pub archive: PathBuf,

    /// Data directory with the date-partitioned entry tree.
    #[serde(default = "defaults::paths::data")]
    #[educe(Default = defaults::paths::data())]
    pub data: PathBuf,

    /// Assets directory with the template and the current-entry summary.
    #[serde(default = "defaults::paths::assets")]
    #[educe(Default = defaults::paths::assets())]
    pub assets: PathBuf,

    /// Page template. Defaults to `<assets>/haiku.template.html`.
    #[serde(default = "defaults::paths::template")]
    #[educe(Default = defaults::paths::template())]
    pub template: Option<PathBuf>,
}

/// File name of the default page template inside the assets directory.
pub const TEMPLATE_FILE: &str = "haiku.template.html";
/// File name of the current-entry summary inside the assets directory.
pub const CURRENT_FILE: &str = "current_haiku.json";
/// File name of the tag index inside the data directory.
pub const TAGS_FILE: &str = "tags.json";
/// File name of the manifest inside the data directory.
pub const MANIFEST_FILE: &str = "manifest.json";

impl PathsConfig {
    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Resolved page template path.
    pub fn template_path(&self) -> PathBuf {
        self.template
            .clone()
            .unwrap_or_else(|| self.assets.join(TEMPLATE_FILE))
    }

    pub fn tags_path(&self) -> PathBuf {
        self.data.join(TAGS_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.data.join(MANIFEST_FILE)
    }

    pub fn current_path(&self) -> PathBuf {
        self.assets.join(CURRENT_FILE)
    }

    /// Express `path` relative to the project root with `/` separators.
    ///
    /// Paths outside the root are kept whole, still with `/` separators.
    pub fn project_relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.get_root()).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

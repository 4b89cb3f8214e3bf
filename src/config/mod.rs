//! Project configuration management for `haiku.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[paths]`   | Inbox, archive, data and assets directories      |
//! | `[split]`   | Daily batch capacity for the inbox splitter      |
//! | `[tags]`    | Stop words and part-of-speech lexicon overrides  |
//! | `[log]`     | Default verbosity                                |
//!
//! # Example
//!
//! ```toml
//! [paths]
//! inbox = "inbox"
//! data = "data"
//!
//! [split]
//! per_day = 3
//!
//! [tags]
//! remove_stopwords = true
//!
//! [log]
//! verbose = false
//! ```

pub mod defaults;
mod error;
mod paths;
mod split;
mod tags;

pub use error::ConfigError;
pub use paths::{MANIFEST_FILE, PathsConfig, TAGS_FILE};
#[cfg(test)]
pub use paths::TEMPLATE_FILE;
pub use split::SplitConfig;
pub use tags::TagsConfig;

use crate::cli::{Cli, Commands};
use crate::logger::Verbosity;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// `[log]` section in haiku.toml.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Print per-file and per-record traces (same as `-v`).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub verbose: bool,
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing haiku.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Effective verbosity, resolved from `[log]` and `-v`
    #[serde(skip)]
    pub verbosity: Verbosity,

    /// Project directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// Inbox splitting settings
    #[serde(default)]
    pub split: SplitConfig,

    /// Tag extraction settings
    #[serde(default)]
    pub tags: TagsConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.paths.get_root()
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.paths.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .map(|root| expand_tilde(root))
            .unwrap_or_else(|| self.get_root().to_owned());

        self.update_path_with_root(&root, &cli.config);

        // Command-line paths are relative to the working directory, like `split`.
        if let Commands::Build {
            template: Some(template),
            ..
        } = &cli.command
        {
            self.paths.template = Some(Self::normalize_path(&expand_tilde(template)));
        }

        self.verbosity = if cli.verbose > 0 {
            Verbosity::from_occurrences(cli.verbose)
        } else if self.log.verbose {
            Verbosity::Debug
        } else {
            Verbosity::Info
        };
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    pub fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));

        self.paths.inbox = Self::normalize_path(&root.join(&self.paths.inbox));
        self.paths.archive = Self::normalize_path(&root.join(&self.paths.archive));
        self.paths.data = Self::normalize_path(&root.join(&self.paths.data));
        self.paths.assets = Self::normalize_path(&root.join(&self.paths.assets));

        if let Some(template) = self.paths.template.as_ref() {
            self.paths.template = Some(Self::normalize_path(&root.join(template)));
        }
        if let Some(lexicon) = self.tags.lexicon.as_ref() {
            self.tags.lexicon = Some(Self::normalize_path(&root.join(lexicon)));
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self, cli: &Cli) -> Result<()> {
        if self.split.per_day == 0 {
            bail!(ConfigError::Validation(
                "[split.per_day] must be at least 1".into()
            ));
        }

        if let Some(path) = &self.tags.lexicon {
            if !path.exists() {
                bail!(ConfigError::Validation(format!(
                    "[tags.lexicon] not found: {}",
                    path.display()
                )));
            }
            if !path.is_file() {
                bail!(ConfigError::Validation(
                    "[tags.lexicon] is not a file".into()
                ));
            }
        }

        if let Commands::Split {
            number: Some(0), ..
        } = &cli.command
        {
            bail!(ConfigError::Validation("--number must be at least 1".into()));
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// Tests
// ============================================================================

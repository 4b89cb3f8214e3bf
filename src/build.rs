//! Build orchestration.
//!
//! Runs the selected phases in order:
//!
//! ```text
//! run_build()
//!     │
//!     ├── pages    ──► entry pages + records, archive batches, current summary
//!     │
//!     ├── tags     ──► data/tags.json
//!     │
//!     └── manifest ──► data/manifest.json
//! ```
//!
//! The tag and manifest passes only read records, so either can be rerun on
//! its own at any time.

use crate::{
    cli::{Mode, Phase},
    config::SiteConfig,
    generator, log,
    pages::{self, BuildOptions, PagesReport},
    tagger::{LexiconTagger, Tagger},
    utils::date,
};
use anyhow::Result;

/// Arguments of one `build` invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub phase: Phase,
    pub mode: Mode,
    pub title: Option<String>,
    /// `YYYYMMDD` or `YYYY-MM-DD`
    pub date: Option<String>,
}

/// What a build run produced.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub pages: Option<PagesReport>,
    pub tags: Option<generator::TagIndex>,
    pub manifest: Option<generator::Manifest>,
}

/// Run a build with the tagger configured for this project.
pub fn run_build(config: &SiteConfig, request: &BuildRequest) -> Result<BuildSummary> {
    let tagger = LexiconTagger::load(config.tags.lexicon.as_deref())?;
    if tagger.override_count() > 0 {
        log!("build"; "lexicon: {} overrides", tagger.override_count());
    }
    run_build_with(config, request, &tagger)
}

/// Run a build with an explicit tagger.
pub fn run_build_with(
    config: &SiteConfig,
    request: &BuildRequest,
    tagger: &dyn Tagger,
) -> Result<BuildSummary> {
    // Validate the date before touching anything.
    let options = BuildOptions {
        mode: request.mode,
        title: request.title.clone(),
        date: request.date.as_deref().map(date::parse_date).transpose()?,
    };

    log!("build"; "root: {}", config.get_root().display());
    log!("build"; "inbox: {}", config.paths.inbox.display());
    log!("build"; "archive: {}", config.paths.archive.display());
    log!("build"; "data: {}", config.paths.data.display());
    log!("build"; "assets: {}", config.paths.assets.display());

    let mut summary = BuildSummary::default();

    if request.phase.runs_pages() {
        summary.pages = Some(pages::build_pages(config, &options, tagger)?);
    }
    if request.phase.runs_tags() {
        summary.tags = generator::build_tag_index(config, request.mode, tagger)?;
    }
    if request.phase.runs_manifest() {
        summary.manifest = generator::build_manifest(config, request.mode, tagger)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEMPLATE_FILE;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn project() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.update_path_with_root(dir.path(), Path::new("haiku.toml"));
        fs::create_dir_all(&config.paths.inbox).unwrap();
        fs::create_dir_all(&config.paths.assets).unwrap();
        fs::write(
            config.paths.assets.join(TEMPLATE_FILE),
            "{{title}} {{date}} {{lines}} {{json}}",
        )
        .unwrap();
        (dir, config)
    }

    #[test]
    fn test_full_build() {
        let (_dir, config) = project();
        fs::write(
            config.paths.inbox.join("20240101.inbox.txt"),
            "old pond\na frog jumps in\n###\nrunning toward the ocean",
        )
        .unwrap();

        let summary = run_build(&config, &BuildRequest::default()).unwrap();

        assert_eq!(summary.pages.unwrap().entries, 2);
        let tags = summary.tags.unwrap();
        let names: Vec<_> = tags.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["frog", "ocean", "old", "pond"]);
        assert_eq!(summary.manifest.unwrap().items.len(), 2);
        assert!(config.paths.tags_path().is_file());
        assert!(config.paths.manifest_path().is_file());
        assert!(config.paths.current_path().is_file());
    }

    #[test]
    fn test_single_phase() {
        let (_dir, config) = project();
        fs::write(config.paths.inbox.join("20240101.inbox.txt"), "old pond").unwrap();
        let request = BuildRequest {
            phase: Phase::Manifest,
            ..Default::default()
        };

        let summary = run_build(&config, &request).unwrap();

        assert!(summary.pages.is_none());
        assert!(summary.tags.is_none());
        assert!(summary.manifest.unwrap().items.is_empty());
        assert!(config.paths.inbox.join("20240101.inbox.txt").exists());
    }

    #[test]
    fn test_invalid_date_fails_before_any_write() {
        let (_dir, config) = project();
        let source = config.paths.inbox.join("20240101.inbox.txt");
        fs::write(&source, "old pond").unwrap();
        let request = BuildRequest {
            date: Some("2024/01/01".into()),
            ..Default::default()
        };

        assert!(run_build(&config, &request).is_err());
        assert!(source.exists());
        assert!(!config.paths.data.exists());
    }

    #[test]
    fn test_date_override_applies_to_every_file() {
        let (_dir, config) = project();
        fs::write(config.paths.inbox.join("a.txt"), "old pond").unwrap();
        fs::write(config.paths.inbox.join("b.txt"), "cold moon").unwrap();
        let request = BuildRequest {
            phase: Phase::Pages,
            date: Some("20231231".into()),
            ..Default::default()
        };

        run_build(&config, &request).unwrap();

        assert!(config.paths.data.join("2023/12/31/haiku.2023-12-31.01.json").is_file());
        // same (date, seq) as a.txt, refused in create mode
        assert!(config.paths.inbox.join("b.txt").exists());
    }

    #[test]
    fn test_clean_mode_removes_aggregates_only() {
        let (_dir, config) = project();
        fs::write(config.paths.inbox.join("20240101.inbox.txt"), "old pond").unwrap();
        run_build(&config, &BuildRequest::default()).unwrap();

        let request = BuildRequest {
            mode: Mode::Clean,
            ..Default::default()
        };
        run_build(&config, &request).unwrap();

        assert!(!config.paths.tags_path().exists());
        assert!(!config.paths.manifest_path().exists());
        assert!(config.paths.data.join("2024/01/01/haiku.2024-01-01.01.json").is_file());
        assert!(config.paths.current_path().is_file());
    }
}

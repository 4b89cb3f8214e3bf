//! Page building.
//!
//! Every `*.txt` batch in the inbox becomes one page and one structured
//! record per entry:
//!
//! ```text
//! inbox/20240101.inbox.txt
//!   ├── block 1 ──► data/2024/01/01/haiku.2024-01-01.01.{html,json}
//!   └── block 2 ──► data/2024/01/01/haiku.2024-01-01.02.{html,json}
//!         then ──► archive/<YYYY-MM-DD-HHMMSS>/20240101.inbox.txt
//! ```
//!
//! After the last batch the current-entry summary is recomputed.

mod entry;
mod extract;
mod render;

pub use entry::{EntryPaths, HaikuEntry, block_lines, default_title, entry_id, resolve_date};
pub use extract::{extract_tags, joined_text};
pub use render::Template;

use crate::{
    cli::Mode,
    config::SiteConfig,
    debug, generator, log,
    logger::ProgressBar,
    split::{RawBlock, split_blocks},
    tagger::{PosGate, Tagger},
    utils::{date, fs as fsx},
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Per-run page options from the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub mode: Mode,
    /// Title for every entry built in this run
    pub title: Option<String>,
    /// Date for every entry built in this run
    pub date: Option<NaiveDate>,
}

/// Counts of one page build run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagesReport {
    /// Batch files built and archived
    pub sources: usize,
    /// Entries written
    pub entries: usize,
    /// Batch files left in the inbox because their entries already exist
    pub refused: usize,
}

/// One entry ready to be written.
struct PlannedEntry {
    entry: HaikuEntry,
    paths: EntryPaths,
}

// ============================================================================
// Public API
// ============================================================================

/// Build pages for every batch in the inbox, then refresh the current entry.
pub fn build_pages(
    config: &SiteConfig,
    options: &BuildOptions,
    tagger: &dyn Tagger,
) -> Result<PagesReport> {
    if options.mode == Mode::Clean {
        log!("pages"; "clean: entry records are kept, nothing to remove");
        return Ok(PagesReport::default());
    }

    let template = Template::load(&config.paths.template_path())?;

    for dir in [&config.paths.data, &config.paths.archive] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let sources = inbox_sources(config)?;
    log!("pages"; "{} batch files in {}", sources.len(), config.paths.inbox.display());

    let gate = PosGate::new(tagger);
    let progress = ProgressBar::new_if("pages", sources.len(), config.verbosity);
    let mut report = PagesReport::default();

    for source in &sources {
        match build_source(source, config, options, &template, &gate)? {
            Some(count) => {
                report.sources += 1;
                report.entries += count;
            }
            None => report.refused += 1,
        }
        if let Some(progress) = &progress {
            progress.inc();
        }
    }

    if let Some(progress) = &progress {
        progress.finish();
    }

    log!(
        "pages"; "built {} entries from {} files{}",
        report.entries,
        report.sources,
        if report.refused > 0 { format!(", {} left in inbox", report.refused) } else { String::new() }
    );

    generator::update_current(config)?;
    Ok(report)
}

// ============================================================================
// Internal
// ============================================================================

/// `*.txt` files of the inbox in name order; other files are skipped.
fn inbox_sources(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    let inbox = &config.paths.inbox;
    if !inbox.is_dir() {
        log!("pages"; "inbox not found: {}", inbox.display());
        return Ok(Vec::new());
    }

    let sources = fsx::list_files(inbox)?
        .into_iter()
        .filter(|path| {
            let is_batch = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
            if !is_batch {
                debug!(config.verbosity; "pages"; "skipping unsupported file {}", path.display());
            }
            is_batch
        })
        .collect();
    Ok(sources)
}

/// Build and archive one batch file.
///
/// Returns `None` when the batch was refused (create mode, entries exist).
fn build_source(
    source: &Path,
    config: &SiteConfig,
    options: &BuildOptions,
    template: &Template,
    gate: &PosGate<'_>,
) -> Result<Option<usize>> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log!("pages"; "processing {name}");

    let text = fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let date = resolve_date(options.date, source);
    let created = date::created_timestamp(Utc::now());

    let planned = split_blocks(&text)
        .iter()
        .map(|block| plan_entry(block, date, &created, config, options, gate))
        .collect::<Result<Vec<_>>>()?;

    if options.mode == Mode::Create
        && let Some(existing) = planned.iter().find(|p| p.paths.any_exists())
    {
        log!(
            "error"; "{name}: entry {} already exists, left in inbox (use --mode rebuild to overwrite)",
            existing.entry.id
        );
        return Ok(None);
    }

    for planned in &planned {
        write_entry(planned, template)?;
        debug!(
            config.verbosity; "pages"; "built {} and {}",
            planned.entry.path_html, planned.entry.path_json
        );
    }

    let archive_dir = config.paths.archive.join(date::archive_stamp(Local::now()));
    let target = fsx::archive_file(source, &archive_dir)?;
    debug!(config.verbosity; "pages"; "moved {} to {}", source.display(), target.display());

    Ok(Some(planned.len()))
}

/// Derive identity, tags and paths of one entry.
fn plan_entry(
    block: &RawBlock,
    date: NaiveDate,
    created: &str,
    config: &SiteConfig,
    options: &BuildOptions,
    gate: &PosGate<'_>,
) -> Result<PlannedEntry> {
    let seq = u32::try_from(block.ordinal).context("sequence number out of range")?;
    let lines = block_lines(&block.text);
    let tags = extract_tags(&lines, config.tags.active_stopwords(), gate);
    let paths = EntryPaths::new(&config.paths.data, date, seq);

    let entry = HaikuEntry {
        id: entry_id(date, seq),
        date: date::to_dashed(date),
        seq,
        title: options
            .title
            .clone()
            .unwrap_or_else(|| default_title(date, seq)),
        lines,
        tags,
        path_html: config.paths.project_relative(&paths.html),
        path_json: config.paths.project_relative(&paths.json),
        created: created.to_owned(),
    };

    Ok(PlannedEntry { entry, paths })
}

/// Write the page and the record of one entry.
fn write_entry(planned: &PlannedEntry, template: &Template) -> Result<()> {
    let json = serde_json::to_string_pretty(&planned.entry)
        .with_context(|| format!("Failed to serialize {}", planned.entry.id))?;
    let html = template.render(&planned.entry, &json);

    fsx::write_file(&planned.paths.html, html.as_bytes())?;
    fsx::write_file(&planned.paths.json, json.as_bytes())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEMPLATE_FILE;
    use crate::tagger::LexiconTagger;
    use tempfile::TempDir;

    const TEMPLATE: &str =
        "<h1>{{title}}</h1>\n<time>{{date}}</time>\n{{lines}}\n<script>{{json}}</script>\n";

    struct Project {
        _dir: TempDir,
        config: SiteConfig,
    }

    impl Project {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let mut config = SiteConfig::default();
            config.update_path_with_root(dir.path(), Path::new("haiku.toml"));
            fs::create_dir_all(&config.paths.inbox).unwrap();
            fs::create_dir_all(&config.paths.assets).unwrap();
            fs::write(config.paths.assets.join(TEMPLATE_FILE), TEMPLATE).unwrap();
            Self { _dir: dir, config }
        }

        fn inbox(&self, name: &str, content: &str) -> PathBuf {
            let path = self.config.paths.inbox.join(name);
            fs::write(&path, content).unwrap();
            path
        }

        fn build(&self, options: &BuildOptions) -> Result<PagesReport> {
            build_pages(&self.config, options, &LexiconTagger::new())
        }

        fn record(&self, rel: &str) -> HaikuEntry {
            let path = self.config.get_root().join(rel);
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
        }

        fn archived(&self) -> Vec<String> {
            fsx::collect_files_with_ext(&self.config.paths.archive, "txt")
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        }
    }

    const BATCH: &str = "an old silent pond\na frog jumps into the pond\nsplash! silence again\n###\nrunning toward the ocean\nwaves";

    #[test]
    fn test_build_pages_writes_records_and_pages() {
        let project = Project::new();
        let source = project.inbox("20240101.inbox.txt", BATCH);

        let report = project.build(&BuildOptions::default()).unwrap();
        assert_eq!(report, PagesReport { sources: 1, entries: 2, refused: 0 });

        let first = project.record("data/2024/01/01/haiku.2024-01-01.01.json");
        assert_eq!(first.id, "20240101-01");
        assert_eq!(first.date, "2024-01-01");
        assert_eq!(first.seq, 1);
        assert_eq!(first.title, "2024-01-01.01");
        assert_eq!(first.lines.len(), 3);
        assert_eq!(first.tags, vec!["frog", "old", "pond", "silence", "silent", "splash"]);
        assert_eq!(first.path_html, "data/2024/01/01/haiku.2024-01-01.01.html");
        assert_eq!(first.path_json, "data/2024/01/01/haiku.2024-01-01.01.json");
        assert!(first.created.ends_with("+00:00"));

        let second = project.record("data/2024/01/01/haiku.2024-01-01.02.json");
        assert_eq!(second.id, "20240101-02");
        assert_eq!(second.tags, vec!["ocean", "waves"]);

        let html = fs::read_to_string(
            project.config.get_root().join("data/2024/01/01/haiku.2024-01-01.02.html"),
        )
        .unwrap();
        assert!(html.contains("<h1>2024-01-01.02</h1>"));
        assert!(html.contains("<p>running toward the ocean</p>\n<p>waves</p>"));
        assert!(html.contains("\"id\": \"20240101-02\""));

        assert!(!source.exists());
        assert_eq!(project.archived(), vec!["20240101.inbox.txt"]);
        assert!(project.config.paths.current_path().is_file());
    }

    #[test]
    fn test_build_pages_missing_template_is_fatal() {
        let project = Project::new();
        fs::remove_file(project.config.paths.assets.join(TEMPLATE_FILE)).unwrap();
        let source = project.inbox("20240101.inbox.txt", BATCH);

        let err = project.build(&BuildOptions::default()).unwrap_err();

        assert!(err.to_string().contains("Template not found"));
        assert!(source.exists());
        assert!(!project.config.paths.data.exists());
    }

    #[test]
    fn test_build_pages_create_refuses_existing_entries() {
        let project = Project::new();
        project.inbox("20240101.inbox.txt", BATCH);
        project.build(&BuildOptions::default()).unwrap();

        let again = project.inbox("20240101.inbox.txt", "different\ntext");
        let report = project.build(&BuildOptions::default()).unwrap();

        assert_eq!(report.refused, 1);
        assert_eq!(report.entries, 0);
        assert!(again.exists());
        let first = project.record("data/2024/01/01/haiku.2024-01-01.01.json");
        assert_eq!(first.lines[0], "an old silent pond");
    }

    #[test]
    fn test_build_pages_rebuild_overwrites() {
        let project = Project::new();
        project.inbox("20240101.inbox.txt", BATCH);
        project.build(&BuildOptions::default()).unwrap();

        let again = project.inbox("20240101.inbox.txt", "winter moon");
        let options = BuildOptions {
            mode: Mode::Rebuild,
            ..Default::default()
        };
        let report = project.build(&options).unwrap();

        assert_eq!(report.entries, 1);
        assert!(!again.exists());
        let first = project.record("data/2024/01/01/haiku.2024-01-01.01.json");
        assert_eq!(first.lines, vec!["winter moon"]);
        assert_eq!(first.tags, vec!["moon", "winter"]);
    }

    #[test]
    fn test_build_pages_overrides() {
        let project = Project::new();
        project.inbox("20240101.inbox.txt", "cold rain");
        let options = BuildOptions {
            mode: Mode::Create,
            title: Some("Rain".into()),
            date: NaiveDate::from_ymd_opt(2023, 12, 31),
        };

        project.build(&options).unwrap();

        let entry = project.record("data/2023/12/31/haiku.2023-12-31.01.json");
        assert_eq!(entry.id, "20231231-01");
        assert_eq!(entry.title, "Rain");
    }

    #[test]
    fn test_build_pages_sequence_restarts_per_file() {
        let project = Project::new();
        project.inbox("20240101.inbox.txt", "a pond\n###\na frog");
        project.inbox("20240102.inbox.txt", "the moon");

        let report = project.build(&BuildOptions::default()).unwrap();

        assert_eq!(report.entries, 3);
        assert_eq!(project.record("data/2024/01/02/haiku.2024-01-02.01.json").seq, 1);
        assert_eq!(project.record("data/2024/01/01/haiku.2024-01-01.02.json").seq, 2);
    }

    #[test]
    fn test_build_pages_skips_non_txt_and_archives_empty() {
        let project = Project::new();
        let notes = project.inbox("notes.md", "old pond");
        let empty = project.inbox("20240103.inbox.txt", "\n###\n   \n");

        let report = project.build(&BuildOptions::default()).unwrap();

        assert_eq!(report, PagesReport { sources: 1, entries: 0, refused: 0 });
        assert!(notes.exists());
        assert!(!empty.exists());
        assert_eq!(project.archived(), vec!["20240103.inbox.txt"]);
        // no records, so no summary
        assert!(!project.config.paths.current_path().exists());
    }

    #[test]
    fn test_build_pages_clean_is_noop() {
        let project = Project::new();
        let source = project.inbox("20240101.inbox.txt", BATCH);
        let options = BuildOptions {
            mode: Mode::Clean,
            ..Default::default()
        };

        let report = project.build(&options).unwrap();

        assert_eq!(report, PagesReport::default());
        assert!(source.exists());
    }
}

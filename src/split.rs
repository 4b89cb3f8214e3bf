//! Inbox splitting.
//!
//! Turns raw submission files into dated daily batch files:
//!
//! ```text
//! src files (name order) ──► blocks (### separated, trimmed, non-empty)
//!        │
//!        └──► one flat list ──► chunks of N ──► YYYYMMDD.inbox.txt, one day apart
//! ```
//!
//! Everything is read and checked before the first write, so a bad source
//! leaves no partial output behind.

use crate::{
    config::SiteConfig,
    debug, log,
    utils::{date, fs as fsx},
};
use anyhow::{Context, Result, bail};
use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Block separator token.
pub const SEPARATOR: &str = "###";

/// A line holding only the separator (surrounding whitespace allowed).
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*###[ \t]*\r?$").expect("separator pattern is valid"));

/// One entry's raw text, as cut out of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Trimmed text, internal newlines preserved.
    pub text: String,
    /// 1-based position among the non-empty blocks of its source file.
    pub ordinal: usize,
}

/// Blocks assigned to one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub blocks: Vec<RawBlock>,
}

impl DailyBucket {
    /// `YYYYMMDD.inbox.txt`
    pub fn file_name(&self) -> String {
        format!("{}.inbox.txt", date::to_compact(self.date))
    }

    /// Blocks rejoined with separator lines.
    pub fn contents(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(&format!("\n{SEPARATOR}\n"))
    }
}

/// Resolved arguments of one split run.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub src: PathBuf,
    pub dst: PathBuf,
    pub start_date: NaiveDate,
    pub per_day: usize,
    pub dry_run: bool,
    /// Move consumed source files to the archive after writing.
    pub archive: Option<PathBuf>,
}

impl SplitOptions {
    /// Build options from CLI values, validating the start date first.
    pub fn new(
        src: &Path,
        dst: &Path,
        startdate: &str,
        per_day: Option<usize>,
        dry_run: bool,
        keep_source: bool,
        config: &SiteConfig,
    ) -> Result<Self> {
        let start_date = date::parse_date(startdate)?;
        let per_day = per_day.unwrap_or(config.split.per_day);
        if per_day == 0 {
            bail!("entries per day must be at least 1");
        }
        Ok(Self {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            start_date,
            per_day,
            dry_run,
            archive: (!keep_source).then(|| config.paths.archive.clone()),
        })
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Split the inbox source into daily batch files.
///
/// Returns the buckets that were written (or would have been, in dry-run).
pub fn split_inbox(options: &SplitOptions, config: &SiteConfig) -> Result<Vec<DailyBucket>> {
    let verbosity = config.verbosity;

    log!("split"; "source: {}", options.src.display());
    log!("split"; "destination: {}", options.dst.display());
    log!("split"; "start date: {}", date::to_compact(options.start_date));
    log!("split"; "entries per day: {}", options.per_day);
    log!("split"; "dry run: {}", options.dry_run);

    let files = collect_source_files(&options.src)?;
    log!("split"; "files discovered: {}", files.len());

    let mut all_blocks = Vec::new();
    for path in &files {
        debug!(verbosity; "split"; "reading {}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let blocks = split_blocks(&text);
        log!("split"; "haikus found in {}: {}", display_name(path), blocks.len());
        all_blocks.extend(blocks);
    }
    log!("split"; "total haikus collected: {}", all_blocks.len());

    let buckets = pack_daily(all_blocks, options.start_date, options.per_day)?;
    check_collisions(&buckets, &files, &options.dst)?;

    if options.dry_run {
        for bucket in &buckets {
            log!("split"; "would write {} ({} entries)", bucket.file_name(), bucket.blocks.len());
        }
        if let Some(archive) = &options.archive {
            for path in &files {
                log!("split"; "would archive {} to {}", display_name(path), archive.display());
            }
        }
        return Ok(buckets);
    }

    fs::create_dir_all(&options.dst)
        .with_context(|| format!("Failed to create {}", options.dst.display()))?;

    for bucket in &buckets {
        let output = options.dst.join(bucket.file_name());
        log!("split"; "writing {} ({} entries)", bucket.file_name(), bucket.blocks.len());
        fsx::write_file(&output, bucket.contents().as_bytes())?;
    }

    if let Some(archive) = &options.archive {
        let archive_dir = archive.join(date::archive_stamp(Local::now()));
        for path in &files {
            let target = fsx::archive_file(path, &archive_dir)?;
            debug!(verbosity; "split"; "moved {} to {}", path.display(), target.display());
        }
    }

    Ok(buckets)
}

/// Source files: the file itself, or the regular files of a directory in name order.
pub fn collect_source_files(src: &Path) -> Result<Vec<PathBuf>> {
    if src.is_file() {
        return Ok(vec![src.to_path_buf()]);
    }
    if src.is_dir() {
        return fsx::list_files(src);
    }
    bail!("Invalid source path: {}", src.display())
}

/// Cut text into trimmed, non-empty blocks on separator lines.
pub fn split_blocks(text: &str) -> Vec<RawBlock> {
    SEPARATOR_RE
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(i, block)| RawBlock {
            text: block.to_owned(),
            ordinal: i + 1,
        })
        .collect()
}

/// Slice blocks into consecutive groups of at most `per_day`, one day apart.
pub fn pack_daily(
    blocks: Vec<RawBlock>,
    start_date: NaiveDate,
    per_day: usize,
) -> Result<Vec<DailyBucket>> {
    if per_day == 0 {
        bail!("entries per day must be at least 1");
    }

    let mut buckets = Vec::with_capacity(blocks.len().div_ceil(per_day));
    let mut blocks = blocks.into_iter().peekable();
    let mut day = 0u64;

    while blocks.peek().is_some() {
        let date = start_date
            .checked_add_days(Days::new(day))
            .with_context(|| format!("date overflow after {start_date} + {day} days"))?;
        buckets.push(DailyBucket {
            date,
            blocks: blocks.by_ref().take(per_day).collect(),
        });
        day += 1;
    }

    Ok(buckets)
}

/// Refuse to write a batch over one of the files being split.
fn check_collisions(buckets: &[DailyBucket], sources: &[PathBuf], dst: &Path) -> Result<()> {
    for bucket in buckets {
        let output = dst.join(bucket.file_name());
        let clash = sources.iter().any(|src| {
            src == &output
                || matches!(
                    (src.canonicalize(), output.canonicalize()),
                    (Ok(a), Ok(b)) if a == b
                )
        });
        if clash {
            bail!(
                "Batch {} would overwrite a source file; choose another --dst",
                output.display()
            );
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

// ============================================================================
// Tests
// ============================================================================

//! Logging utilities with colored output and a progress bar.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, gated by an explicitly passed [`Verbosity`]
//! - `ProgressBar` for displaying progress of a single long-running phase
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("pages"; "building {} entries", count);
//!
//! // Only printed with `-v`
//! debug!(config.verbosity; "pages"; "built {}", path.display());
//!
//! let progress = ProgressBar::new("pages", 100);
//! progress.inc();
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use serde::{Deserialize, Serialize};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Whether a progress bar currently owns the line below the cursor
static BAR_ACTIVE: AtomicBool = AtomicBool::new(false);

// ============================================================================
// Layout Constants
// ============================================================================
//
// Progress bar format: "[module] [████░░░░] 42/100"
//                       ^------^ ^-------^ ^----^
//                       prefix   bar       count

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;
/// Bar wrapper: " []" (space + brackets around progress bar)
const BAR_WRAPPER_LEN: usize = 3;
/// Space before count: "...] 42/100" <- this space
const SPACE_BEFORE_COUNT: usize = 1;
/// Minimum progress bar width in characters
const MIN_BAR_WIDTH: usize = 10;
/// Maximum progress bar width in characters
const MAX_BAR_WIDTH: usize = 40;

/// Calculate total prefix length for a module name.
///
/// Returns: `module.len() + 3` (for `[`, `]`, and trailing space)
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Verbosity
// ============================================================================

/// How much a phase reports while it runs.
///
/// Carried in the site config and handed to every phase entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Phase summaries, written files, recoverable errors.
    #[default]
    Info,
    /// Everything above plus per-file and per-record traces.
    Debug,
}

impl Verbosity {
    /// Map the repeat count of `-v` to a level.
    pub const fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Info,
            _ => Self::Debug,
        }
    }

    #[inline]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message only when the given verbosity is [`Verbosity::Debug`].
///
/// The message is not formatted at all otherwise.
///
/// # Usage
/// ```ignore
/// debug!(config.verbosity; "module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! debug {
    ($verbosity:expr; $module:expr; $($arg:tt)*) => {{
        if $verbosity.is_debug() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Progress Bar
// ============================================================================

/// A single progress bar drawn on the line below the log output.
///
/// Log lines printed while the bar is active are inserted above it.
pub struct ProgressBar {
    /// Colored prefix string (e.g., "[pages]" in yellow)
    prefix: ColoredString,
    /// Pre-calculated display length of prefix
    prefix_len: usize,
    /// Total number of items to process
    total: usize,
    /// Current progress counter
    current: AtomicUsize,
    lock: Mutex<()>,
}

impl ProgressBar {
    /// Reserve a terminal line and start a bar for `module`.
    pub fn new(module: &'static str, total: usize) -> Self {
        let mut stdout = stdout().lock();
        writeln!(stdout).ok();
        stdout.flush().ok();

        BAR_ACTIVE.store(true, Ordering::SeqCst);

        Self {
            prefix: colorize_prefix(module, &module.to_ascii_lowercase()),
            prefix_len: calc_prefix_len(module.len()),
            total,
            current: AtomicUsize::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Start a bar only when it is worth drawing.
    ///
    /// Returns `None` in debug mode (per-item lines would interleave with it)
    /// or when there is at most one item.
    pub fn new_if(module: &'static str, total: usize, verbosity: Verbosity) -> Option<Self> {
        if verbosity.is_debug() || total <= 1 {
            return None;
        }
        Some(Self::new(module, total))
    }

    /// Advance the bar by one item.
    pub fn inc(&self) {
        let current = self.current.fetch_add(1, Ordering::Relaxed) + 1;
        self.display(current);
    }

    fn display(&self, current: usize) {
        let _guard = self.lock.lock().ok();

        let width = get_terminal_width() as usize;

        let progress_text = format!("{}/{}", current, self.total);
        let overhead = self.prefix_len + BAR_WRAPPER_LEN + SPACE_BEFORE_COUNT + progress_text.len();
        let available = width.saturating_sub(overhead);
        let bar_width = available.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

        let filled = if self.total > 0 {
            (current.min(self.total) * bar_width) / self.total
        } else {
            0
        };
        let empty = bar_width.saturating_sub(filled);

        let progress_bar: String = "█".repeat(filled) + &"░".repeat(empty);

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{}] {}", self.prefix, progress_bar, progress_text).ok();
        execute!(stdout, cursor::MoveDown(1)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear the bar from the terminal.
    pub fn finish(&self) {
        if !BAR_ACTIVE.swap(false, Ordering::SeqCst) {
            return;
        }
        let _guard = self.lock.lock().ok();

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.finish();
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Long single-line messages are truncated to the terminal width, except
/// for `error` and `warn`.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();

    let bar_active = BAR_ACTIVE.load(Ordering::SeqCst);
    if bar_active {
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    writeln!(stdout, "{prefix} {}", fit_message(&module_lower, message, width)).ok();

    if bar_active {
        writeln!(stdout).ok();
    }

    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "split" => prefix.bright_blue().bold(),
        "tags" | "manifest" | "current" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// The part of `message` shown on one terminal row of `width` columns.
///
/// Errors and warnings end with their cause, so they are always shown whole.
#[inline]
fn fit_message<'a>(module_lower: &str, message: &'a str, width: usize) -> &'a str {
    if message.contains('\n') || matches!(module_lower, "error" | "warn") {
        return message;
    }
    truncate_str(message, width.saturating_sub(calc_prefix_len(module_lower.len())))
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

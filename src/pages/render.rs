//! Page template rendering.
//!
//! # Placeholders
//!
//! | Placeholder  | Replaced with                              |
//! |--------------|--------------------------------------------|
//! | `{{title}}`  | entry title (escaped)                      |
//! | `{{date}}`   | `YYYY-MM-DD`                               |
//! | `{{lines}}`  | one `<p>` per line, joined by newlines     |
//! | `{{json}}`   | the structured record, `<` as `\u003c`     |
//!
//! The embedded record parses to the same value as the `.json` file but can
//! never close a surrounding `<script>` element.
//!
//! Substitution is a single left-to-right pass, so placeholder text inside
//! a substituted value is never expanded again.

use super::HaikuEntry;
use anyhow::{Context, Result, bail};
use regex::{Captures, Regex};
use std::{borrow::Cow, fs, path::Path, sync::LazyLock};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(title|date|lines|json)\}\}").expect("placeholder pattern is valid")
});

/// A loaded page template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    /// Read the template, failing when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("Template not found: {}", path.display());
        }
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Ok(Self::new(source))
    }

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Render the page for `entry`, embedding `record_json`.
    pub fn render(&self, entry: &HaikuEntry, record_json: &str) -> String {
        let embedded = script_safe_json(record_json);
        PLACEHOLDER_RE
            .replace_all(&self.source, |caps: &Captures| match &caps[1] {
                "title" => html_escape(&entry.title).into_owned(),
                "date" => entry.date.clone(),
                "lines" => render_lines(&entry.lines),
                _ => embedded.to_string(),
            })
            .into_owned()
    }
}

/// `<p>line</p>` per line, joined by `\n`.
pub fn render_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("<p>{}</p>", html_escape(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON text safe inside a `<script>` element.
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes to the same
/// character.
#[inline]
fn script_safe_json(json: &str) -> Cow<'_, str> {
    if json.contains('<') {
        Cow::Owned(json.replace('<', "\\u003c"))
    } else {
        Cow::Borrowed(json)
    }
}

/// Escape HTML special characters.
#[inline]
fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

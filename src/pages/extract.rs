//! Tag candidate extraction.
//!
//! Lower-cased word runs of the joined entry text, minus stop words,
//! sorted and unique. The result still has to pass the [`PosGate`].

use crate::tagger::PosGate;
use regex::Regex;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Entry text as seen by tag extraction: lines joined by single spaces.
pub fn joined_text<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

/// Sorted, unique, lower-cased word candidates of `text`.
pub fn candidate_words(text: &str, stopwords: Option<&[String]>) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut words: Vec<String> = WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|word| stopwords.is_none_or(|stop| !stop.iter().any(|s| s == word)))
        .map(str::to_owned)
        .collect();

    words.sort();
    words.dedup();
    words
}

/// Final tag set of an entry: candidates that survive the gate.
pub fn extract_tags<S: AsRef<str>>(
    lines: &[S],
    stopwords: Option<&[String]>,
    gate: &PosGate<'_>,
) -> Vec<String> {
    let text = joined_text(lines);
    let candidates = candidate_words(&text, stopwords);
    gate.filter(&candidates, &text)
}

//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn inbox() -> PathBuf {
        "inbox".into()
    }

    pub fn archive() -> PathBuf {
        "archive".into()
    }

    pub fn data() -> PathBuf {
        "data".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn template() -> Option<PathBuf> {
        None
    }
}

// ============================================================================
// [split] Section Defaults
// ============================================================================

pub mod split {
    pub fn per_day() -> usize {
        3
    }
}

// ============================================================================
// [tags] Section Defaults
// ============================================================================

pub mod tags {
    use std::path::PathBuf;

    /// Words never worth tagging, removed before the part-of-speech gate.
    pub const STOPWORDS: &[&str] = &[
        "an", "a", "the", "they", "you", "we", "our", "is", "was", "that", "this", "these",
        "them",
    ];

    pub fn stopwords() -> Vec<String> {
        STOPWORDS.iter().map(|w| (*w).to_owned()).collect()
    }

    pub fn lexicon() -> Option<PathBuf> {
        None
    }
}

//! Treebank-style word tokenizer.
//!
//! - punctuation is split off into its own tokens (`...` and `--` stay whole)
//! - hyphenated words stay whole: `cherry-blossom`
//! - negation and clitics are split: `don't` → `do` `n't`, `moon's` → `moon` `'s`

use regex::Regex;
use std::sync::LazyLock;

/// Words (with inner hyphens or apostrophes), ellipses, dashes, other marks.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:[-'’]\w+)*|\.\.\.|--|[^\w\s]").expect("token pattern is valid")
});

/// Clitics split from the word they attach to.
const CLITICS: &[&str] = &["'s", "'m", "'d", "'re", "'ve", "'ll"];

/// Tokenize `text` following Penn Treebank conventions.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in TOKEN_RE.find_iter(text) {
        split_clitics(&m.as_str().replace('’', "'"), &mut tokens);
    }
    tokens
}

fn split_clitics(word: &str, out: &mut Vec<String>) {
    let lower = word.to_lowercase();

    if lower.len() > 3 && lower.ends_with("n't") {
        let cut = word.len() - 3;
        out.push(word[..cut].to_owned());
        out.push(word[cut..].to_owned());
        return;
    }

    if let Some(clitic) = CLITICS
        .iter()
        .find(|c| lower.len() > c.len() && lower.ends_with(**c))
    {
        let cut = word.len() - clitic.len();
        out.push(word[..cut].to_owned());
        out.push(word[cut..].to_owned());
        return;
    }

    out.push(word.to_owned());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_and_punctuation() {
        assert_eq!(
            tokenize("an old pond, a frog jumps in."),
            vec!["an", "old", "pond", ",", "a", "frog", "jumps", "in", "."]
        );
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_words() {
        assert_eq!(
            tokenize("cherry-blossom rain"),
            vec!["cherry-blossom", "rain"]
        );
    }

    #[test]
    fn test_tokenize_splits_negation_and_clitics() {
        assert_eq!(tokenize("don't"), vec!["do", "n't"]);
        assert_eq!(tokenize("the moon's glow"), vec!["the", "moon", "'s", "glow"]);
        assert_eq!(tokenize("we'll see"), vec!["we", "'ll", "see"]);
        assert_eq!(tokenize("moon’s"), vec!["moon", "'s"]);
    }

    #[test]
    fn test_tokenize_ellipsis_and_dash() {
        assert_eq!(
            tokenize("silence... then -- rain"),
            vec!["silence", "...", "then", "--", "rain"]
        );
    }

    #[test]
    fn test_tokenize_multiline_and_unicode() {
        assert_eq!(
            tokenize("first snow\nfalls on\nthe café"),
            vec!["first", "snow", "falls", "on", "the", "café"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n ").is_empty());
    }
}

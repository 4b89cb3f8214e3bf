//! Tokenization and part-of-speech tagging.
//!
//! The pipeline only talks to the [`Tagger`] trait, so the linguistic backend
//! can be swapped without touching page building or aggregation.
//!
//! # Gate
//!
//! ```text
//! candidates ──► lower-case ──► in tokenize(text)? ──► tag(word) allowed? ──► sorted, unique
//!                                      │ no                  │ no
//!                                      ▼                     ▼
//!                                   rejected              rejected
//! ```
//!
//! [`PosGate`] is the single place this decision is made; page building and
//! both aggregation passes go through it, so a word accepted at build time is
//! accepted again on re-validation.

mod lexicon;
mod tokenize;

pub use lexicon::LexiconTagger;
pub use tokenize::tokenize;

use rustc_hash::FxHashSet;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Tagger-related errors
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("unknown part-of-speech tag `{0}`")]
    UnknownTag(String),
}

/// A tokenizer plus an isolated-word part-of-speech tagger.
pub trait Tagger {
    /// Split `text` into word and punctuation tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Tag a single token, without surrounding context.
    fn tag(&self, token: &str) -> PosTag;
}

// ============================================================================
// Tags
// ============================================================================

/// Penn Treebank part-of-speech categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// NN
    Noun,
    /// NNS
    NounPlural,
    /// NNP
    ProperNoun,
    /// NNPS
    ProperNounPlural,
    /// JJ
    Adjective,
    /// JJR
    AdjectiveComparative,
    /// JJS
    AdjectiveSuperlative,
    /// VB
    Verb,
    /// VBD
    VerbPast,
    /// VBG
    VerbGerund,
    /// VBN
    VerbParticiple,
    /// VBP
    VerbPresent,
    /// VBZ
    VerbThirdPerson,
    /// RB
    Adverb,
    /// RBR
    AdverbComparative,
    /// RBS
    AdverbSuperlative,
    /// DT
    Determiner,
    /// PDT
    Predeterminer,
    /// PRP
    Pronoun,
    /// PRP$
    PossessivePronoun,
    /// IN
    Preposition,
    /// CC
    Conjunction,
    /// MD
    Modal,
    /// CD
    Number,
    /// UH
    Interjection,
    /// TO
    To,
    /// EX
    Existential,
    /// RP
    Particle,
    /// POS
    Possessive,
    /// WDT
    WhDeterminer,
    /// WP
    WhPronoun,
    /// WRB
    WhAdverb,
    /// Punctuation marks, tagged with the mark itself in Treebank output.
    Punctuation,
    /// SYM
    Symbol,
}

/// Code ↔ tag table, in Treebank notation.
const TAG_CODES: &[(&str, PosTag)] = &[
    ("NN", PosTag::Noun),
    ("NNS", PosTag::NounPlural),
    ("NNP", PosTag::ProperNoun),
    ("NNPS", PosTag::ProperNounPlural),
    ("JJ", PosTag::Adjective),
    ("JJR", PosTag::AdjectiveComparative),
    ("JJS", PosTag::AdjectiveSuperlative),
    ("VB", PosTag::Verb),
    ("VBD", PosTag::VerbPast),
    ("VBG", PosTag::VerbGerund),
    ("VBN", PosTag::VerbParticiple),
    ("VBP", PosTag::VerbPresent),
    ("VBZ", PosTag::VerbThirdPerson),
    ("RB", PosTag::Adverb),
    ("RBR", PosTag::AdverbComparative),
    ("RBS", PosTag::AdverbSuperlative),
    ("DT", PosTag::Determiner),
    ("PDT", PosTag::Predeterminer),
    ("PRP", PosTag::Pronoun),
    ("PRP$", PosTag::PossessivePronoun),
    ("IN", PosTag::Preposition),
    ("CC", PosTag::Conjunction),
    ("MD", PosTag::Modal),
    ("CD", PosTag::Number),
    ("UH", PosTag::Interjection),
    ("TO", PosTag::To),
    ("EX", PosTag::Existential),
    ("RP", PosTag::Particle),
    ("POS", PosTag::Possessive),
    ("WDT", PosTag::WhDeterminer),
    ("WP", PosTag::WhPronoun),
    ("WRB", PosTag::WhAdverb),
    (".", PosTag::Punctuation),
    ("SYM", PosTag::Symbol),
];

impl PosTag {
    /// Treebank code, e.g. `"NN"`.
    pub fn code(self) -> &'static str {
        TAG_CODES
            .iter()
            .find(|(_, tag)| *tag == self)
            .map_or("SYM", |(code, _)| code)
    }

    /// Nouns (common and proper, singular and plural) and adjectives
    /// (positive, comparative, superlative) make tags. Nothing else does.
    pub const fn is_tag_worthy(self) -> bool {
        matches!(
            self,
            Self::Noun
                | Self::NounPlural
                | Self::ProperNoun
                | Self::ProperNounPlural
                | Self::Adjective
                | Self::AdjectiveComparative
                | Self::AdjectiveSuperlative
        )
    }
}

impl FromStr for PosTag {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        TAG_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, tag)| *tag)
            .ok_or_else(|| TaggerError::UnknownTag(s.to_owned()))
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Accept/reject filter for tag candidates.
#[derive(Clone, Copy)]
pub struct PosGate<'a> {
    tagger: &'a dyn Tagger,
}

impl<'a> PosGate<'a> {
    pub fn new(tagger: &'a dyn Tagger) -> Self {
        Self { tagger }
    }

    /// Keep the candidates that occur in `text` and tag as noun or adjective.
    ///
    /// Membership is checked on the lower-cased candidate against the tokens
    /// of the lower-cased text; kept candidates retain their original
    /// spelling. The result is sorted and free of duplicates.
    pub fn filter<S: AsRef<str>>(&self, candidates: &[S], text: &str) -> Vec<String> {
        if candidates.is_empty() || text.is_empty() {
            return Vec::new();
        }

        let tokens: FxHashSet<String> = self
            .tagger
            .tokenize(&text.to_lowercase())
            .into_iter()
            .collect();

        let mut kept: Vec<String> = candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|candidate| self.accepts(candidate, &tokens))
            .map(str::to_owned)
            .collect();

        kept.sort();
        kept.dedup();
        kept
    }

    /// Decision for one candidate against an already tokenized text.
    pub fn accepts(&self, candidate: &str, tokens: &FxHashSet<String>) -> bool {
        let lower = candidate.to_lowercase();
        tokens.contains(&lower) && self.tagger.tag(&lower).is_tag_worthy()
    }
}

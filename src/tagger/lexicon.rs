//! Built-in lexicon tagger.
//!
//! Tags a word in isolation, the way a context-free lookup would:
//!
//! 1. user overrides (`[tags].lexicon`)
//! 2. built-in word table: closed-class words, frequent verbs and adverbs,
//!    adjectives, and nouns that look like something else
//! 3. numbers and punctuation
//! 4. suffix rules (`-ing`, `-ed`, `-ly`, `-ous`, comparatives, plurals, ...)
//! 5. everything else is a common noun

use super::{PosTag, Tagger, TaggerError, tokenize};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path, sync::LazyLock};

use PosTag::*;

// ============================================================================
// Word tables
// ============================================================================

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "every", "each", "some", "any", "no",
    "another", "either", "neither",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves", "one",
];

const POSSESSIVE_PRONOUNS: &[&str] = &["my", "your", "his", "her", "its", "our", "their"];

const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "of", "by", "for", "with", "from", "into", "onto", "upon", "over",
    "under", "above", "below", "beneath", "beside", "between", "among", "through",
    "across", "along", "around", "against", "toward", "towards", "behind", "beyond", "near",
    "without", "within", "during", "after", "before", "since", "until", "till", "like", "as",
    "if", "because", "while", "though", "although", "whether", "than", "past", "amid",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "so", "yet", "plus"];

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would",
];

const INTERJECTIONS: &[&str] = &["oh", "ah", "alas", "hush", "o", "hey", "yes", "wow"];

const WH_WORDS: &[(&str, PosTag)] = &[
    ("which", WhDeterminer),
    ("what", WhPronoun),
    ("who", WhPronoun),
    ("whom", WhPronoun),
    ("where", WhAdverb),
    ("when", WhAdverb),
    ("why", WhAdverb),
    ("how", WhAdverb),
];

const NUMBERS: &[&str] = &[
    "zero", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "twenty", "hundred", "thousand", "million",
];

/// Base forms (VB).
const VERBS: &[&str] = &[
    "be", "do", "go", "see", "say", "get", "make", "know", "think", "take", "give", "find",
    "tell", "become", "leave", "feel", "bring", "begin", "keep", "hold", "stand", "hear",
    "let", "mean", "meet", "pay", "sit", "speak", "lie", "lead", "grow", "lose", "understand",
    "forget", "remember", "seem", "sing", "swim", "sleep", "weep", "wake", "awake", "shine",
    "sink", "drink", "dream", "wander", "linger", "listen", "whisper", "breathe", "fade",
    "arrive", "return", "disappear", "remain", "carry", "bloom", "gather", "scatter", "jump",
];

/// Present tense, non third person (VBP).
const VERBS_PRESENT: &[&str] = &["am", "are", "have"];

/// Third person singular (VBZ).
const VERBS_THIRD: &[&str] = &[
    "is", "has", "does", "goes", "says", "seems", "becomes", "makes", "knows", "takes",
    "gives", "sings", "sleeps", "shines", "fades", "lingers", "whispers", "drifts", "falls",
    "runs", "flies", "sits", "waits", "wanders", "jumps",
];

/// Irregular past tense (VBD).
const VERBS_PAST: &[&str] = &[
    "was", "were", "did", "went", "saw", "said", "got", "made", "knew", "thought", "took",
    "gave", "found", "told", "became", "left", "felt", "brought", "began", "kept", "held",
    "stood", "heard", "meant", "met", "paid", "sat", "spoke", "lay", "led", "grew", "lost",
    "forgot", "sang", "swam", "slept", "wept", "woke", "shone", "sank", "drank", "flew",
    "ran", "came", "fell", "rose", "blew", "threw", "drew", "wrote", "broke", "froze",
];

/// Irregular past participles (VBN).
const VERBS_PARTICIPLE: &[&str] = &[
    "been", "done", "gone", "seen", "known", "taken", "given", "begun", "spoken", "grown",
    "sung", "swum", "flown", "risen", "blown", "thrown", "drawn", "written", "forgotten",
];

const ADVERBS: &[&str] = &[
    "not", "never", "always", "often", "sometimes", "very", "too", "also", "still", "just",
    "now", "then", "here", "there", "again", "soon", "only", "almost", "already", "ever",
    "once", "away", "together", "perhaps", "quite", "rather", "even", "else", "ago", "down",
    "up", "out", "off", "back", "forth", "tonight", "today", "tomorrow", "yesterday",
    "everywhere", "somewhere", "nowhere", "anywhere", "alone", "far", "early", "late",
    "more", "most", "less", "least",
];

/// Adjectives without a telling suffix. Also the stems for `-er` / `-est`.
const ADJECTIVES: &[&str] = &[
    "old", "new", "young", "cold", "warm", "hot", "cool", "dark", "bright", "soft", "loud",
    "quiet", "silent", "deep", "shallow", "wide", "narrow", "long", "short", "small", "big",
    "little", "tiny", "vast", "empty", "full", "bare", "pale", "green", "red", "blue",
    "white", "black", "gray", "grey", "golden", "silver", "yellow", "purple", "pink", "brown",
    "wet", "dry", "sweet", "bitter", "sharp", "gentle", "slow", "fast", "high", "low", "wild",
    "calm", "clear", "thin", "thick", "heavy", "frozen", "broken", "distant", "ancient",
    "fresh", "rainy", "misty", "foggy", "snowy", "windy", "sunny", "cloudy", "icy", "dusty",
    "hazy", "dewy", "stormy", "lonely", "lovely", "ugly", "silly", "chilly", "holy", "jolly",
    "friendly", "lively", "deadly", "elderly", "lowly", "alive", "asleep", "last", "first",
    "next", "same", "other", "own", "whole", "true", "good", "bad", "great", "fine", "kind",
    "brave", "strange", "sacred", "naked", "wicked", "rugged", "ragged", "crooked", "beloved",
    "faint", "dim", "grim", "stark", "free", "rich", "poor",
];

/// Words a suffix rule would get wrong.
const NOUNS: &[&str] = &[
    // -ing
    "morning", "evening", "spring", "thing", "nothing", "something", "anything",
    "everything", "king", "ring", "wing", "string", "ceiling", "sibling", "darling",
    "pudding", "lightning", "awning", "offspring",
    // -ed
    "bed", "seed", "weed", "reed", "shed", "sled", "shred", "steed", "creed",
    // -ly
    "lily", "family", "belly", "jelly", "butterfly", "dragonfly", "firefly", "holly", "fly",
    "melancholy", "rally", "ally",
    // -s
    "grass", "moss", "glass", "dress", "chess", "bus", "lotus", "iris", "crocus",
    "cactus", "chaos", "abyss", "news", "species", "series",
    // -ive / -ish / -able
    "olive", "hive", "dive", "drive", "archive", "fish", "dish", "wish", "radish", "table",
    "cable", "fable", "vegetable",
];

/// Tag for every built-in word. Later tables do not override earlier ones.
static BUILTIN: LazyLock<FxHashMap<&'static str, PosTag>> = LazyLock::new(|| {
    let tables: &[(&[&str], PosTag)] = &[
        (DETERMINERS, Determiner),
        (POSSESSIVE_PRONOUNS, PossessivePronoun),
        (PRONOUNS, Pronoun),
        (CONJUNCTIONS, Conjunction),
        (MODALS, Modal),
        (INTERJECTIONS, Interjection),
        (NUMBERS, Number),
        (VERBS_PRESENT, VerbPresent),
        (VERBS_THIRD, VerbThirdPerson),
        (VERBS_PAST, VerbPast),
        (VERBS_PARTICIPLE, VerbParticiple),
        (VERBS, Verb),
        (ADVERBS, Adverb),
        (PREPOSITIONS, Preposition),
        (ADJECTIVES, Adjective),
        (NOUNS, Noun),
    ];

    let mut map = FxHashMap::default();
    map.insert("to", To);
    map.insert("there's", Existential);
    map.insert("'s", Possessive);
    map.insert("n't", Adverb);
    for (word, tag) in WH_WORDS {
        map.insert(*word, *tag);
    }
    for (words, tag) in tables {
        for word in *words {
            map.entry(*word).or_insert(*tag);
        }
    }
    map
});

// ============================================================================
// Suffix rules
// ============================================================================

/// Adjective-forming suffixes, with the minimum word length they apply to.
const ADJECTIVE_SUFFIXES: &[(&str, usize)] = &[
    ("ous", 5),
    ("ful", 5),
    ("less", 6),
    ("ive", 5),
    ("able", 6),
    ("ible", 6),
    ("ish", 6),
];

fn tag_by_suffix(word: &str) -> PosTag {
    let len = word.chars().count();

    if let Some(tag) = comparative(word) {
        return tag;
    }
    if len > 4 && word.ends_with("ing") {
        return VerbGerund;
    }
    if len > 3 && word.ends_with("ed") {
        return VerbPast;
    }
    if len > 3 && word.ends_with("ly") {
        return Adverb;
    }
    if ADJECTIVE_SUFFIXES
        .iter()
        .any(|(suffix, min)| len >= *min && word.ends_with(suffix))
    {
        return Adjective;
    }
    if len > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return NounPlural;
    }
    Noun
}

/// `colder` → JJR, `darkest` → JJS, when the stem is a known adjective.
fn comparative(word: &str) -> Option<PosTag> {
    let forms = [("est", AdjectiveSuperlative), ("er", AdjectiveComparative)];
    for (suffix, tag) in forms {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        let candidates = [
            stem.to_owned(),
            format!("{stem}e"),
            // bigger → big
            stem.get(..stem.len().saturating_sub(1)).unwrap_or_default().to_owned(),
            // lonelier → lonely
            stem.strip_suffix('i').map(|s| format!("{s}y")).unwrap_or_default(),
        ];
        if candidates
            .iter()
            .any(|c| matches!(BUILTIN.get(c.as_str()), Some(Adjective)))
        {
            return Some(tag);
        }
    }
    None
}

// ============================================================================
// Tagger
// ============================================================================

/// On-disk override table.
///
/// ```toml
/// [words]
/// ocean = "NN"
/// drift = "VB"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    #[serde(default)]
    words: BTreeMap<String, String>,
}

/// Deterministic tagger backed by built-in word tables and suffix rules.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    overrides: FxHashMap<String, PosTag>,
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tagger with per-word overrides that win over the built-in tables.
    pub fn with_overrides<I, S>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, PosTag)>,
        S: AsRef<str>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(word, tag)| (word.as_ref().to_lowercase(), tag))
                .collect(),
        }
    }

    /// Parse an override table from TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: LexiconFile = toml::from_str(content)?;
        let overrides = file
            .words
            .into_iter()
            .map(|(word, code)| Ok((word, code.parse::<PosTag>()?)))
            .collect::<Result<Vec<_>, TaggerError>>()?;
        Ok(Self::with_overrides(overrides))
    }

    /// Load an override table from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid lexicon {}", path.display()))
    }

    /// Built-in tagger, plus the overrides file when one is configured.
    pub fn load(lexicon: Option<&Path>) -> Result<Self> {
        lexicon.map_or_else(|| Ok(Self::new()), Self::from_path)
    }

    /// Number of override entries.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Tagger for LexiconTagger {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }

    fn tag(&self, token: &str) -> PosTag {
        let word = token.to_lowercase();

        if let Some(tag) = self.overrides.get(&word) {
            return *tag;
        }
        if let Some(tag) = BUILTIN.get(word.as_str()) {
            return *tag;
        }
        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
            && word.chars().any(|c| c.is_ascii_digit())
        {
            return Number;
        }
        if !word.chars().any(char::is_alphanumeric) {
            return if word.chars().all(|c| c.is_ascii_punctuation()) {
                Punctuation
            } else {
                Symbol
            };
        }
        tag_by_suffix(&word)
    }
}

//! `[tags]` section configuration.
//!
//! Controls candidate extraction ahead of the part-of-speech gate.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[tags]` section in haiku.toml.
///
/// # Example
/// ```toml
/// [tags]
/// remove_stopwords = true
/// stopwords = ["a", "an", "the"]
/// lexicon = "assets/lexicon.toml"   # optional part-of-speech overrides
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    /// Drop stop words before candidates reach the tagger.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub remove_stopwords: bool,

    /// Stop words, matched against lower-cased candidates.
    #[serde(default = "defaults::tags::stopwords")]
    #[educe(Default = defaults::tags::stopwords())]
    pub stopwords: Vec<String>,

    /// TOML file whose `[words]` table maps words to Treebank tags,
    /// overriding the built-in lexicon.
    #[serde(default = "defaults::tags::lexicon")]
    #[educe(Default = defaults::tags::lexicon())]
    pub lexicon: Option<PathBuf>,
}

impl TagsConfig {
    /// Stop words to apply, or `None` when removal is disabled.
    pub fn active_stopwords(&self) -> Option<&[String]> {
        self.remove_stopwords.then_some(self.stopwords.as_slice())
    }
}

//! `[split]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[split]` section in haiku.toml - inbox splitting.
///
/// # Example
/// ```toml
/// [split]
/// per_day = 3    # entries packed into each daily batch file
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Maximum number of entries per daily batch, used when `--number` is omitted.
    #[serde(default = "defaults::split::per_day")]
    #[educe(Default = defaults::split::per_day())]
    pub per_day: usize,
}

//! Configuration for the recommendation controller
//!
//! Defines how long the post-save visual states last.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timings of the post-save visual states
///
/// # Examples
///
/// ```
/// use catalog_curator::CuratorConfig;
///
/// let config = CuratorConfig::default();
/// assert_eq!(config.highlight_ms, 3000);
/// assert_eq!(config.fade_ms, 1000);
///
/// let config = CuratorConfig::from_toml_str("fade_ms = 250").unwrap();
/// assert_eq!(config.fade_ms, 250);
/// assert_eq!(config.highlight_ms, 3000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// How long a freshly saved product stays highlighted in the catalog
    /// (in milliseconds)
    /// Default: 3000
    pub highlight_ms: u64,

    /// How long a saved recommendation fades before it leaves the queue
    /// (in milliseconds)
    /// Default: 1000
    pub fade_ms: u64,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            highlight_ms: 3000,
            fade_ms: 1000,
        }
    }
}

impl CuratorConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Get highlight window as Duration
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    /// Get fade window as Duration
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

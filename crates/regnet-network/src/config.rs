//! Configuration for network expansion
//!
//! Bounds how far a company network fans out through shared directors and
//! owners.

use serde::{Deserialize, Serialize};

/// Configuration for the Graph Expander
///
/// # Examples
///
/// ```
/// use regnet_network::ExpanderConfig;
///
/// let config = ExpanderConfig::default();
/// assert_eq!(config.limit_related_per_anchor, 20);
/// assert_eq!(config.reverse_lookup_limit(config.limit_related_per_anchor), 100);
/// assert_eq!(config.reverse_lookup_limit(3), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Maximum number of sibling companies merged into a network
    /// Default: 20
    pub limit_related_per_anchor: usize,

    /// The reverse edge lookup fetches `limit × overfetch_factor` rows, since
    /// many of them point back at the anchor or at foreign companies
    /// Default: 5
    pub overfetch_factor: usize,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            limit_related_per_anchor: 20,
            overfetch_factor: 5,
        }
    }
}

impl ExpanderConfig {
    /// Row bound for the reverse edge lookup when merging at most `limit` siblings
    pub fn reverse_lookup_limit(&self, limit: usize) -> usize {
        limit.saturating_mul(self.overfetch_factor.max(1))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.overfetch_factor == 0 {
            return Err("overfetch_factor must be at least 1".to_string());
        }
        Ok(())
    }
}

//! Configuration for the Relationship Ingestor

use serde::{Deserialize, Serialize};

/// Configuration for the Relationship Ingestor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Source tag written when a record does not name its provider
    pub default_source: String,

    /// Labels longer than this (in characters) are truncated before insert
    pub max_label_len: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_source: "V4".to_string(),
            max_label_len: 500,
        }
    }
}

impl IngestConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_label_len == 0 {
            return Err("max_label_len must be greater than 0".to_string());
        }
        if self.default_source.trim().is_empty() {
            return Err("default_source cannot be empty".to_string());
        }
        Ok(())
    }

    /// Truncate a label to `max_label_len` characters
    pub fn clamp_label(&self, label: &str) -> String {
        label.chars().take(self.max_label_len).collect()
    }
}

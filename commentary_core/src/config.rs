//! Runtime configuration for context assembly.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the context assembler.
///
/// Pressure weights and level thresholds are fixed and deliberately not part of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Upper bound on each external lookup, in milliseconds.
    pub lookup_timeout_ms: u64,

    /// Maximum callbacks kept on the narrative state.
    pub max_callbacks: usize,

    /// Maximum recently-used phrases passed through to the generator.
    pub max_avoid_phrases: usize,

    /// Minimum head-to-head balls before a matchup line is attached.
    pub matchup_min_balls: u32,

    /// Deliveries in the recent window (wicket cluster, boundary counts).
    pub recent_window_balls: usize,

    /// How far ahead (in runs) a milestone is reported on the batter.
    pub milestone_lookahead: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 250,
            max_callbacks: 5,
            max_avoid_phrases: 5,
            matchup_min_balls: 10,
            recent_window_balls: 30,
            milestone_lookahead: 15,
        }
    }
}

impl ContextConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Per-call lookup timeout.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "lookup_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        // The collapse signal needs room for at least one over.
        if self.recent_window_balls < 6 {
            return Err(ConfigError::Invalid {
                key: "recent_window_balls",
                reason: format!("must be at least 6, got {}", self.recent_window_balls),
            });
        }
        Ok(())
    }
}

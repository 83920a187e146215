use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PRUNE_THRESHOLD: usize = 10;
pub const DEFAULT_COOLDOWN_MS: u64 = 300;
pub const MIN_COOLDOWN_MS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerConfig {
    /// UsedSet size above which the oldest half is dropped on each advance.
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: usize,
    /// Time an accepted advance blocks further advances.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Fixed seed for reproducible rounds; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("prune threshold must be at least 1")]
    ZeroPruneThreshold,
    #[error("cooldown of {0}ms is below the {MIN_COOLDOWN_MS}ms minimum")]
    CooldownTooShort(u64),
}

fn default_prune_threshold() -> usize {
    DEFAULT_PRUNE_THRESHOLD
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            seed: None,
        }
    }
}

impl ControllerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prune_threshold == 0 {
            return Err(ConfigError::ZeroPruneThreshold);
        }
        if self.cooldown_ms < MIN_COOLDOWN_MS {
            return Err(ConfigError::CooldownTooShort(self.cooldown_ms));
        }
        Ok(())
    }
}

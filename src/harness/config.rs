//! Harness settings.
//!
//! Values come from an optional JSON file and are then overridden by
//! command-line flags.

use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::harness::HarnessError;

/// How the harness brings the engine up and what it generates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Cycles of reset held before any stimulus.
    pub reset_cycles: usize,
    /// Pulse `clear_acc` once (plus one idle cycle) after reset.
    pub clear_after_reset: bool,
    /// Seed for random stimulus.
    pub seed: u64,
    /// Length of random stimulus.
    pub cycles: usize,
    /// Also randomise valid, clear and the `0b11` weight code.
    pub full_random: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            reset_cycles: 10,
            clear_after_reset: true,
            seed: 0x5EED,
            cycles: 100,
            full_random: false,
        }
    }
}

impl HarnessConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HarnessError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| HarnessError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&text)
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HarnessError> {
        serde_json::from_str(text).map_err(|e| HarnessError::Config(e.to_string()))
    }
}

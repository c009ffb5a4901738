//! Host-side tooling that drives the engine.
//!
//! This module provides:
//! - Stimulus files (`.stim` text and JSON)
//! - An unbounded-precision reference model
//! - Built-in scenarios (bring-up, documented trace, saturation, random)
//! - Lockstep verification with per-cycle trace records

pub mod config;
pub mod reference;
pub mod scenario;
pub mod stimulus;
pub mod verify;

use thiserror::Error;

pub use config::HarnessConfig;
pub use reference::ReferenceModel;
pub use scenario::Scenario;
pub use stimulus::{Stimulus, StimulusCycle, StimulusError, load_stimulus, save_stimulus};
pub use verify::{TraceRecord, Verifier, VerifyReport, verify, verify_file};

/// Errors that can occur while driving the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    #[error("output sampled at cycle {cycle} before the engine was reset")]
    OutputBeforeReset { cycle: usize },

    #[error("stimulus error: {0}")]
    Stimulus(#[from] StimulusError),

    #[error("config error: {0}")]
    Config(String),
}

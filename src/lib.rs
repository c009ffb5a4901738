//! # Ternary MAC Emulator
//!
//! A cycle-accurate model of a MatMul-free streaming neuron.
//!
//! Multiplication is replaced by ternary-weighted addition and subtraction:
//! each cycle an 8-bit activation is added to, subtracted from, or ignored
//! by a 16-bit accumulator, and the accumulator is continuously clamped to
//! an 8-bit output.

pub mod ternary;
pub mod engine;
pub mod harness;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use ternary::{Weight, WeightCode, Word16, DecodeError};
pub use engine::{Engine, EngineState, CycleInputs, PinFrame};
pub use harness::{
    HarnessConfig, HarnessError, ReferenceModel, Scenario, Stimulus, StimulusCycle,
    StimulusError, VerifyReport, load_stimulus, save_stimulus, verify,
    verify_file,
};

#[cfg(feature = "tui")]
pub use tui::run_viewer;

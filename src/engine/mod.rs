//! The ternary accumulator engine and its input contract.
//!
//! This module implements the whole datapath:
//! - per-cycle input signals and their bus encoding
//! - the 16-bit accumulator register and its update rule
//! - the combinational saturating output

pub mod signals;
pub mod decode;
pub mod execute;

pub use signals::CycleInputs;
pub use decode::PinFrame;
pub use execute::{Engine, EngineState};

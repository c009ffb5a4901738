//! TUI viewer for the ternary MAC emulator.
//!
//! Provides an interactive terminal-based stepper with:
//! - Per-cycle history with saturation and mismatch highlighting
//! - Live accumulator and output view
//! - Step/run/breakpoint controls

mod app;
mod ui;

pub use app::{ViewerApp, run_viewer};

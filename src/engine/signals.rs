//! Per-cycle input signals.
//!
//! Every field is sampled fresh each cycle; nothing here persists.

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::ternary::{Weight, WeightCode};

/// Everything the engine samples on one clock edge.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInputs {
    /// Signed 8-bit activation.
    pub activation: i8,
    /// 2-bit weight field.
    pub weight: WeightCode,
    /// Gates whether accumulation occurs.
    #[serde(default)]
    pub valid: bool,
    /// Synchronous clear of the accumulator.
    #[serde(default)]
    pub clear_acc: bool,
    /// Apply reset this cycle. Priority over all else.
    #[serde(default)]
    pub reset: bool,
    /// Host-side enable (chip select).
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl CycleInputs {
    /// An idle cycle: enabled, nothing strobed.
    pub const fn idle() -> Self {
        Self {
            activation: 0,
            weight: WeightCode::ZeroLow,
            valid: false,
            clear_acc: false,
            reset: false,
            enabled: true,
        }
    }

    /// A valid MAC cycle with the given activation and weight.
    pub const fn mac(activation: i8, weight: Weight) -> Self {
        Self::with_code(activation, weight.code())
    }

    /// A valid MAC cycle with an explicit weight code.
    pub const fn with_code(activation: i8, weight: WeightCode) -> Self {
        Self {
            activation,
            weight,
            valid: true,
            ..Self::idle()
        }
    }

    /// A cycle asserting reset.
    pub const fn reset() -> Self {
        Self { reset: true, ..Self::idle() }
    }

    /// A cycle pulsing `clear_acc`.
    pub const fn clear() -> Self {
        Self { clear_acc: true, ..Self::idle() }
    }

    /// Builder: set `valid`.
    pub const fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Builder: set `enabled`.
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder: set `clear_acc`.
    pub const fn clear_acc(mut self, clear_acc: bool) -> Self {
        self.clear_acc = clear_acc;
        self
    }

    /// Builder: set `reset`.
    pub const fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// True if this cycle forces the accumulator to zero.
    #[inline]
    pub const fn zeroes(&self) -> bool {
        self.reset || self.clear_acc
    }

    /// True if this cycle applies the weight to the accumulator.
    #[inline]
    pub const fn accumulates(&self) -> bool {
        !self.zeroes() && self.enabled && self.valid
    }
}

impl Default for CycleInputs {
    fn default() -> Self {
        Self::idle()
    }
}

impl fmt::Debug for CycleInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "act={:4} w={:?}({}) ", self.activation, self.weight.weight(), self.weight)?;
        write!(f, "{}", flags(self))
    }
}

/// Compact flag string: `v` valid, `c` clear, `r` reset, `d` disabled.
pub fn flags(inputs: &CycleInputs) -> String {
    let mut s = String::with_capacity(4);
    if inputs.valid {
        s.push('v');
    }
    if inputs.clear_acc {
        s.push('c');
    }
    if inputs.reset {
        s.push('r');
    }
    if !inputs.enabled {
        s.push('d');
    }
    s
}

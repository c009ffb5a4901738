//! Number primitives for the ternary MAC datapath.
//!
//! This module provides the core types for working with the datapath:
//! - [`Weight`] - A ternary weight (-1, 0, +1)
//! - [`WeightCode`] - Its 2-bit bus encoding (two codes mean zero)
//! - [`Word16`] - The 16-bit two's-complement accumulator word

mod weight;
mod word;
pub mod arith;

use thiserror::Error;

pub use weight::{Weight, WeightCode};
pub use word::{Word16, sign_extend16};
pub use arith::{add, subtract, ternary_mac, saturate, is_saturated};

/// Errors raised when converting out-of-contract values at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid weight code {0} (must fit in 2 bits)")]
    InvalidWeightCode(u8),

    #[error("invalid weight token '{0}' (expected +, -, 0 or #0..#3)")]
    InvalidWeightToken(String),

    #[error("activation {0} out of range (-128 to +127)")]
    ActivationOutOfRange(i64),
}

/// Narrow a wider integer to an activation, rejecting anything outside 8 bits.
pub fn activation_from_i64(value: i64) -> Result<i8, DecodeError> {
    i8::try_from(value).map_err(|_| DecodeError::ActivationOutOfRange(value))
}

//! Fixed-width two's-complement words.
//!
//! The datapath has exactly two widths:
//! - 8-bit activations and outputs, carried as plain `i8`
//! - [`Word16`]: the 16-bit accumulator register
//!
//! Widening from 8 to 16 bits goes through [`sign_extend16`], which builds
//! the upper byte by replicating bit 7 rather than leaning on a widening
//! signed cast. The widening cast appears only in tests, as the reference
//! the bit construction is checked against.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A 16-bit two's-complement word, stored as raw bits.
///
/// Value range: -32,768 to +32,767
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word16 {
    bits: u16,
}

impl Word16 {
    /// Number of bits in a Word16.
    pub const WIDTH: usize = 16;

    /// Maximum positive value: +32,767 (0x7FFF)
    pub const MAX: i32 = 32_767;

    /// Minimum negative value: -32,768 (0x8000)
    pub const MIN: i32 = -32_768;

    /// Create a new Word16 holding zero.
    #[inline]
    pub const fn zero() -> Self {
        Self { bits: 0 }
    }

    /// Create from raw bits.
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    /// Get the raw bits.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Create from a signed value.
    #[inline]
    pub const fn from_i16(value: i16) -> Self {
        Self { bits: value as u16 }
    }

    /// Interpret the bits as a signed value.
    #[inline]
    pub const fn to_i16(self) -> i16 {
        self.bits as i16
    }

    /// The sign bit, bit 15.
    #[inline]
    pub const fn sign_bit(self) -> bool {
        self.bits & 0x8000 != 0
    }

    /// The top nine bits, `[15:7]`, right-aligned.
    #[inline]
    pub const fn upper9(self) -> u16 {
        self.bits >> 7
    }

    /// The low byte, `[7:0]`.
    #[inline]
    pub const fn low_byte(self) -> u8 {
        (self.bits & 0x00FF) as u8
    }

    /// Returns true if the word is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.bits == 0
    }
}

impl fmt::Debug for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word16(0x{:04X} = {})", self.bits, self.to_i16())
    }
}

impl fmt::Display for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_i16(), f)
    }
}

impl fmt::UpperHex for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.bits, f)
    }
}

impl From<i16> for Word16 {
    fn from(value: i16) -> Self {
        Word16::from_i16(value)
    }
}

impl From<Word16> for i16 {
    fn from(word: Word16) -> Self {
        word.to_i16()
    }
}

/// Widen an 8-bit activation to 16 bits by replicating bit 7 into bits 15..8.
#[inline]
pub const fn sign_extend16(activation: i8) -> Word16 {
    let low = activation as u8 as u16;
    let sign = (low >> 7) & 1;
    // 0 - 1 wraps to 0xFFFF, so the mask is all ones exactly when the sign is set
    let upper = 0u16.wrapping_sub(sign) & 0xFF00;
    Word16::from_bits(upper | low)
}

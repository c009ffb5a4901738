//! Ternary weights and their 2-bit wire encoding.
//!
//! A weight can hold one of three values: -1, 0, or +1.
//! On the bus it travels as a 2-bit code:
//! - `0b00` = 0 (hold)
//! - `0b01` = +1 (add)
//! - `0b10` = -1 (subtract)
//! - `0b11` = 0 (hold)
//!
//! The encoding is not bijective: two codes both mean zero. [`WeightCode`]
//! keeps both variants so the distinction stays visible, and
//! [`WeightCode::weight`] collapses them onto a single [`Weight::Zero`].

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::ternary::DecodeError;

/// A single ternary weight.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weight {
    /// Negative (-1)
    Neg,
    /// Zero (0)
    Zero,
    /// Positive (+1)
    Pos,
}

impl Weight {
    /// All possible weight values in order: Neg, Zero, Pos
    pub const ALL: [Weight; 3] = [Weight::Neg, Weight::Zero, Weight::Pos];

    /// Create a weight from an integer value.
    ///
    /// Returns `None` if value is not in {-1, 0, 1}.
    #[inline]
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Weight::Neg),
            0 => Some(Weight::Zero),
            1 => Some(Weight::Pos),
            _ => None,
        }
    }

    /// Convert to integer value.
    #[inline]
    pub const fn to_i8(self) -> i8 {
        match self {
            Weight::Neg => -1,
            Weight::Zero => 0,
            Weight::Pos => 1,
        }
    }

    /// Canonical bus encoding. Zero always encodes as `0b00`.
    #[inline]
    pub const fn code(self) -> WeightCode {
        match self {
            Weight::Neg => WeightCode::Minus,
            Weight::Zero => WeightCode::ZeroLow,
            Weight::Pos => WeightCode::Plus,
        }
    }

    /// Returns true if this weight leaves the accumulator untouched.
    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Weight::Zero)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::Zero
    }
}

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Neg => write!(f, "-1"),
            Weight::Zero => write!(f, "0"),
            Weight::Pos => write!(f, "+1"),
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Neg => write!(f, "-"),
            Weight::Zero => write!(f, "0"),
            Weight::Pos => write!(f, "+"),
        }
    }
}

impl std::ops::Neg for Weight {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Weight::Neg => Weight::Pos,
            Weight::Zero => Weight::Zero,
            Weight::Pos => Weight::Neg,
        }
    }
}

impl From<Weight> for i8 {
    fn from(weight: Weight) -> Self {
        weight.to_i8()
    }
}

/// The 2-bit weight field as it appears on the bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeightCode {
    /// `0b00`: weight 0
    #[default]
    ZeroLow = 0b00,
    /// `0b01`: weight +1
    Plus = 0b01,
    /// `0b10`: weight -1
    Minus = 0b10,
    /// `0b11`: weight 0 (alias of `ZeroLow`)
    ZeroHigh = 0b11,
}

impl WeightCode {
    /// All four codes in bit order.
    pub const ALL: [WeightCode; 4] = [
        WeightCode::ZeroLow,
        WeightCode::Plus,
        WeightCode::Minus,
        WeightCode::ZeroHigh,
    ];

    /// Decode the low two bits of a bus byte. Upper bits are ignored.
    #[inline]
    pub const fn from_bits(byte: u8) -> Self {
        match byte & 0b11 {
            0b00 => WeightCode::ZeroLow,
            0b01 => WeightCode::Plus,
            0b10 => WeightCode::Minus,
            _ => WeightCode::ZeroHigh,
        }
    }

    /// Get the raw 2-bit value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// The ternary weight this code selects.
    #[inline]
    pub const fn weight(self) -> Weight {
        match self {
            WeightCode::Plus => Weight::Pos,
            WeightCode::Minus => Weight::Neg,
            WeightCode::ZeroLow | WeightCode::ZeroHigh => Weight::Zero,
        }
    }
}

impl TryFrom<u8> for WeightCode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b11 {
            return Err(DecodeError::InvalidWeightCode(value));
        }
        Ok(WeightCode::from_bits(value))
    }
}

impl From<Weight> for WeightCode {
    fn from(weight: Weight) -> Self {
        weight.code()
    }
}

impl fmt::Display for WeightCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02b}", self.bits())
    }
}

/// Parses the tokens used in stimulus files:
/// `+`, `+1`, `-`, `-1`, `0` for the canonical codes and `#0`..`#3` for raw codes.
impl FromStr for WeightCode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "+1" => Ok(WeightCode::Plus),
            "-" | "-1" => Ok(WeightCode::Minus),
            "0" => Ok(WeightCode::ZeroLow),
            _ => {
                let raw = s
                    .strip_prefix('#')
                    .and_then(|digits| digits.parse::<u8>().ok())
                    .ok_or_else(|| DecodeError::InvalidWeightToken(s.to_string()))?;
                WeightCode::try_from(raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_zero_codes_hold() {
        assert_eq!(WeightCode::ZeroLow.weight(), Weight::Zero);
        assert_eq!(WeightCode::ZeroHigh.weight(), Weight::Zero);
        assert_ne!(WeightCode::ZeroLow, WeightCode::ZeroHigh);
    }

    #[test]
    fn test_decode_table() {
        assert_eq!(WeightCode::from_bits(0b00).weight(), Weight::Zero);
        assert_eq!(WeightCode::from_bits(0b01).weight(), Weight::Pos);
        assert_eq!(WeightCode::from_bits(0b10).weight(), Weight::Neg);
        assert_eq!(WeightCode::from_bits(0b11).weight(), Weight::Zero);
    }

    #[test]
    fn test_from_bits_ignores_upper_bits() {
        assert_eq!(WeightCode::from_bits(0b1111_0101), WeightCode::Plus);
        assert_eq!(WeightCode::from_bits(0b0000_0110), WeightCode::Minus);
    }

    #[test]
    fn test_try_from_rejects_wide_codes() {
        for raw in 0..=3u8 {
            assert_eq!(WeightCode::try_from(raw).unwrap().bits(), raw);
        }
        assert_eq!(WeightCode::try_from(4), Err(DecodeError::InvalidWeightCode(4)));
        assert!(WeightCode::try_from(255).is_err());
    }

    #[test]
    fn test_canonical_code() {
        for w in Weight::ALL {
            assert_eq!(w.code().weight(), w);
        }
        assert_eq!(Weight::Zero.code(), WeightCode::ZeroLow);
    }

    #[test]
    fn test_negation_involution() {
        for w in Weight::ALL {
            assert_eq!(-(-w), w);
            assert_eq!((-w).to_i8(), -w.to_i8());
        }
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("+".parse::<WeightCode>().unwrap(), WeightCode::Plus);
        assert_eq!("+1".parse::<WeightCode>().unwrap(), WeightCode::Plus);
        assert_eq!("-".parse::<WeightCode>().unwrap(), WeightCode::Minus);
        assert_eq!("-1".parse::<WeightCode>().unwrap(), WeightCode::Minus);
        assert_eq!("0".parse::<WeightCode>().unwrap(), WeightCode::ZeroLow);
        assert_eq!("#3".parse::<WeightCode>().unwrap(), WeightCode::ZeroHigh);
        assert_eq!("#4".parse::<WeightCode>(), Err(DecodeError::InvalidWeightCode(4)));
        assert!(matches!("x".parse::<WeightCode>(), Err(DecodeError::InvalidWeightToken(_))));
        assert!(matches!("1".parse::<WeightCode>(), Err(DecodeError::InvalidWeightToken(_))));
    }
}

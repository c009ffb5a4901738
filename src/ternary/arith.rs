//! Accumulator arithmetic.
//!
//! Addition and subtraction wrap modulo 2^16, exactly like a 16-bit adder.
//! Only [`saturate`] protects the 8-bit output from out-of-range values.

use crate::ternary::{Weight, Word16, sign_extend16};

/// Largest value the output can carry.
pub const OUTPUT_MAX: i8 = 127;

/// Smallest value the output can carry.
pub const OUTPUT_MIN: i8 = -128;

/// Add two 16-bit words, wrapping on overflow.
#[inline]
pub const fn add(a: Word16, b: Word16) -> Word16 {
    Word16::from_bits(a.bits().wrapping_add(b.bits()))
}

/// Subtract two 16-bit words (a - b), wrapping on overflow.
#[inline]
pub const fn subtract(a: Word16, b: Word16) -> Word16 {
    Word16::from_bits(a.bits().wrapping_sub(b.bits()))
}

/// Multiply-free MAC: `acc + weight * activation`.
///
/// The weight only ever selects between add, subtract and hold.
#[inline]
pub const fn ternary_mac(acc: Word16, weight: Weight, activation: i8) -> Word16 {
    match weight {
        Weight::Pos => add(acc, sign_extend16(activation)),
        Weight::Neg => subtract(acc, sign_extend16(activation)),
        Weight::Zero => acc,
    }
}

/// Clamp a 16-bit accumulator to the signed 8-bit output range.
///
/// The value fits in 8 bits iff `acc[15:7]` is all zeros or all ones.
/// Anything else clamps toward the sign bit.
#[inline]
pub const fn saturate(acc: Word16) -> i8 {
    match acc.upper9() {
        0x000 | 0x1FF => acc.low_byte() as i8,
        _ if acc.sign_bit() => OUTPUT_MIN,
        _ => OUTPUT_MAX,
    }
}

/// Returns true if [`saturate`] would clamp this value.
#[inline]
pub const fn is_saturated(acc: Word16) -> bool {
    !matches!(acc.upper9(), 0x000 | 0x1FF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn w(v: i16) -> Word16 {
        Word16::from_i16(v)
    }

    #[test]
    fn test_saturation_boundaries() {
        assert_eq!(saturate(w(127)), 127);
        assert_eq!(saturate(w(128)), 127);
        assert_eq!(saturate(w(-128)), -128);
        assert_eq!(saturate(w(-129)), -128);
        assert_eq!(saturate(w(0)), 0);
        assert_eq!(saturate(w(-1)), -1);
        assert_eq!(saturate(w(i16::MAX)), 127);
        assert_eq!(saturate(w(i16::MIN)), -128);
    }

    #[test]
    fn test_saturation_matches_clamp_for_every_word() {
        for bits in 0..=u16::MAX {
            let acc = Word16::from_bits(bits);
            let expected = acc.to_i16().clamp(OUTPUT_MIN as i16, OUTPUT_MAX as i16) as i8;
            assert_eq!(saturate(acc), expected, "saturate(0x{:04X})", bits);
            assert_eq!(is_saturated(acc), acc.to_i16() != expected as i16);
        }
    }

    #[test]
    fn test_add_subtract_wrap() {
        assert_eq!(add(w(i16::MAX), w(1)).to_i16(), i16::MIN);
        assert_eq!(subtract(w(i16::MIN), w(1)).to_i16(), i16::MAX);
        assert_eq!(add(w(-5), w(3)).to_i16(), -2);
    }

    #[test]
    fn test_ternary_mac_table() {
        assert_eq!(ternary_mac(w(10), Weight::Pos, -5).to_i16(), 5);
        assert_eq!(ternary_mac(w(10), Weight::Neg, -5).to_i16(), 15);
        assert_eq!(ternary_mac(w(10), Weight::Zero, -5).to_i16(), 10);
    }

    proptest! {
        #[test]
        fn prop_mac_matches_wrapping_reference(acc in any::<i16>(), x in any::<i8>(), wv in -1i8..=1) {
            let weight = Weight::from_i8(wv).unwrap();
            let expected = acc.wrapping_add((wv as i16).wrapping_mul(x as i16));
            prop_assert_eq!(ternary_mac(w(acc), weight, x).to_i16(), expected);
        }
    }
}

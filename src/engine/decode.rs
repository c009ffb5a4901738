//! Bus-level encoding of the engine's inputs.
//!
//! The device is driven through two 8-bit input buses plus reset and
//! enable lines:
//! - `ui_in[7:0]`: activation (two's complement)
//! - `uio_in[1:0]`: weight code
//! - `uio_in[2]`: valid
//! - `uio_in[3]`: clear_acc
//! - `uio_in[7:4]`: unused
//! - `rst_n`: active-low reset
//! - `ena`: enable

use serde::{Serialize, Deserialize};
use crate::engine::CycleInputs;
use crate::ternary::WeightCode;

/// `uio_in` bit carrying `valid`.
pub const VALID_BIT: u8 = 1 << 2;

/// `uio_in` bit carrying `clear_acc`.
pub const CLEAR_BIT: u8 = 1 << 3;

/// `uio_in` bits carrying the weight code.
pub const WEIGHT_MASK: u8 = 0b11;

/// Raw bus values for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinFrame {
    pub ui_in: u8,
    pub uio_in: u8,
    pub rst_n: bool,
    pub ena: bool,
}

impl PinFrame {
    /// Decode the buses into logical inputs. Unused bits are ignored.
    pub fn decode(&self) -> CycleInputs {
        CycleInputs {
            activation: self.ui_in as i8,
            weight: WeightCode::from_bits(self.uio_in & WEIGHT_MASK),
            valid: self.uio_in & VALID_BIT != 0,
            clear_acc: self.uio_in & CLEAR_BIT != 0,
            reset: !self.rst_n,
            enabled: self.ena,
        }
    }
}

impl CycleInputs {
    /// Encode onto the buses. Unused bits are driven low.
    pub fn encode(&self) -> PinFrame {
        let mut uio_in = self.weight.bits();
        if self.valid {
            uio_in |= VALID_BIT;
        }
        if self.clear_acc {
            uio_in |= CLEAR_BIT;
        }
        PinFrame {
            ui_in: self.activation as u8,
            uio_in,
            rst_n: !self.reset,
            ena: self.enabled,
        }
    }
}

impl From<&CycleInputs> for PinFrame {
    fn from(inputs: &CycleInputs) -> Self {
        inputs.encode()
    }
}

impl From<PinFrame> for CycleInputs {
    fn from(frame: PinFrame) -> Self {
        frame.decode()
    }
}

/// Put a saturated output on the `uo_out` bus.
#[inline]
pub fn output_byte(output: i8) -> u8 {
    output as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::Weight;

    #[test]
    fn test_decode_clear_pulse() {
        let frame = PinFrame { ui_in: 0, uio_in: 0x08, rst_n: true, ena: true };
        let inputs = frame.decode();
        assert!(inputs.clear_acc);
        assert!(!inputs.valid);
        assert!(!inputs.reset);
    }

    #[test]
    fn test_decode_mac_cycle() {
        // valid + subtract, activation -5
        let frame = PinFrame { ui_in: 0xFB, uio_in: 0b0110, rst_n: true, ena: true };
        assert_eq!(frame.decode(), CycleInputs::mac(-5, Weight::Neg));
    }

    #[test]
    fn test_reset_is_active_low() {
        let frame = PinFrame { ui_in: 0, uio_in: 0, rst_n: false, ena: true };
        assert!(frame.decode().reset);
    }

    #[test]
    fn test_unused_bits_ignored() {
        let frame = PinFrame { ui_in: 7, uio_in: 0xF5, rst_n: true, ena: true };
        let inputs = frame.decode();
        assert_eq!(inputs, CycleInputs::mac(7, Weight::Pos));
        assert_eq!(inputs.encode().uio_in, 0x05);
    }

    #[test]
    fn test_encode_decode_agree() {
        for code in WeightCode::ALL {
            for &act in &[-128i8, -1, 0, 1, 127] {
                for flags in 0..16u8 {
                    let inputs = CycleInputs {
                        activation: act,
                        weight: code,
                        valid: flags & 1 != 0,
                        clear_acc: flags & 2 != 0,
                        reset: flags & 4 != 0,
                        enabled: flags & 8 != 0,
                    };
                    assert_eq!(inputs.encode().decode(), inputs);
                    assert_eq!(PinFrame::from(&inputs), inputs.encode());
                }
            }
        }
    }

    #[test]
    fn test_output_byte() {
        assert_eq!(output_byte(-128), 0x80);
        assert_eq!(output_byte(127), 0x7F);
        assert_eq!(output_byte(-1), 0xFF);
    }
}

//! The ternary accumulator engine.
//!
//! One 16-bit register, advanced once per clock edge. The decode,
//! accumulate and saturate stages are all evaluated inside [`Engine::step`]
//! and [`Engine::output`].

use log::trace;
use serde::{Serialize, Deserialize};
use crate::engine::CycleInputs;
use crate::ternary::{Word16, arith};

/// Engine state as seen by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Powered on, no reset or clear seen yet. The accumulator is undefined.
    Unreset,
    /// The accumulator holds a defined value.
    Ready,
}

/// The ternary MAC engine.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Engine {
    /// `None` until the first reset or clear.
    accumulator: Option<Word16>,
    /// Clock edges seen.
    pub cycles: u64,
}

impl Engine {
    /// Create an engine in its power-on state.
    pub fn new() -> Self {
        Self {
            accumulator: None,
            cycles: 0,
        }
    }

    /// Advance one clock edge.
    ///
    /// Reset and clear take priority over everything. Otherwise the weight is
    /// applied only when both `enabled` and `valid` are high.
    pub fn step(&mut self, inputs: &CycleInputs) {
        let next = if inputs.zeroes() {
            Some(Word16::zero())
        } else if inputs.accumulates() {
            // an undefined register stays undefined
            self.accumulator
                .map(|acc| arith::ternary_mac(acc, inputs.weight.weight(), inputs.activation))
        } else {
            self.accumulator
        };

        self.accumulator = next;
        self.cycles += 1;

        trace!(
            "cycle {}: {:?} -> acc={:?} out={:?}",
            self.cycles, inputs, self.accumulator, self.output()
        );
    }

    /// Step through a sequence of inputs, returning the output after each.
    pub fn run(&mut self, inputs: &[CycleInputs]) -> Vec<Option<i8>> {
        inputs
            .iter()
            .map(|i| {
                self.step(i);
                self.output()
            })
            .collect()
    }

    /// Saturated 8-bit output. Combinational; reading never changes state.
    ///
    /// `None` before the engine has been reset.
    #[inline]
    pub fn output(&self) -> Option<i8> {
        self.accumulator.map(arith::saturate)
    }

    /// Current accumulator value, if defined.
    #[inline]
    pub fn accumulator(&self) -> Option<Word16> {
        self.accumulator
    }

    /// True when the output currently sits on a clamp bound because the
    /// accumulator is out of 8-bit range.
    pub fn is_saturated(&self) -> bool {
        self.accumulator.map_or(false, arith::is_saturated)
    }

    /// Current state.
    pub fn state(&self) -> EngineState {
        match self.accumulator {
            Some(_) => EngineState::Ready,
            None => EngineState::Unreset,
        }
    }

    /// Check if the engine has seen a reset or clear.
    pub fn is_ready(&self) -> bool {
        self.accumulator.is_some()
    }

    /// Return to the power-on state.
    pub fn power_cycle(&mut self) {
        self.accumulator = None;
        self.cycles = 0;
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("cycles", &self.cycles)
            .field("accumulator", &self.accumulator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::{Weight, WeightCode};
    use proptest::prelude::*;

    /// Engine reset and then walked to `value` with +1 weights.
    fn engine_at(value: i16) -> Engine {
        let mut engine = Engine::new();
        engine.step(&CycleInputs::reset());
        let mut remaining = value as i32;
        while remaining != 0 {
            let chunk = remaining.clamp(-100, 100);
            engine.step(&CycleInputs::mac(chunk as i8, Weight::Pos));
            remaining -= chunk;
        }
        assert_eq!(engine.accumulator().map(Word16::to_i16), Some(value));
        engine
    }

    fn acc(engine: &Engine) -> i16 {
        engine.accumulator().map(Word16::to_i16).unwrap()
    }

    #[test]
    fn test_undefined_until_reset() {
        let mut engine = Engine::new();
        assert_eq!(engine.state(), EngineState::Unreset);
        assert_eq!(engine.output(), None);

        engine.step(&CycleInputs::mac(10, Weight::Pos));
        assert_eq!(engine.output(), None);

        engine.step(&CycleInputs::reset());
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.output(), Some(0));
    }

    #[test]
    fn test_clear_also_defines_register() {
        let mut engine = Engine::new();
        engine.step(&CycleInputs::clear());
        assert_eq!(engine.output(), Some(0));
    }

    #[test]
    fn test_accumulate_sign_extends() {
        let mut engine = engine_at(0);
        engine.step(&CycleInputs::mac(-5, Weight::Pos));
        assert_eq!(acc(&engine), -5);
        assert_eq!(engine.accumulator().unwrap().bits(), 0xFFFB);
    }

    #[test]
    fn test_subtract() {
        let mut engine = engine_at(0);
        engine.step(&CycleInputs::mac(-5, Weight::Neg));
        assert_eq!(acc(&engine), 5);

        let mut engine = engine_at(0);
        engine.step(&CycleInputs::mac(42, Weight::Neg));
        assert_eq!(acc(&engine), -42);
    }

    #[test]
    fn test_clear_beats_compute() {
        let mut engine = engine_at(77);
        engine.step(&CycleInputs::mac(100, Weight::Pos).clear_acc(true));
        assert_eq!(acc(&engine), 0);
    }

    #[test]
    fn test_positive_saturation_boundary() {
        let mut engine = engine_at(127);
        assert_eq!(engine.output(), Some(127));
        assert!(!engine.is_saturated());

        engine.step(&CycleInputs::mac(1, Weight::Pos));
        assert_eq!(acc(&engine), 128);
        assert_eq!(engine.output(), Some(127));
        assert!(engine.is_saturated());
    }

    #[test]
    fn test_negative_saturation_boundary() {
        let mut engine = engine_at(-128);
        assert_eq!(engine.output(), Some(-128));

        engine.step(&CycleInputs::mac(1, Weight::Neg));
        assert_eq!(acc(&engine), -129);
        assert_eq!(engine.output(), Some(-128));
    }

    #[test]
    fn test_documented_trace() {
        let mut engine = engine_at(0);
        let steps = [
            (50, Weight::Pos, 50, 50),
            (30, Weight::Pos, 80, 80),
            (20, Weight::Neg, 60, 60),
            (100, Weight::Zero, 60, 60),
            (70, Weight::Pos, 130, 127),
        ];
        for (act, weight, expected_acc, expected_out) in steps {
            engine.step(&CycleInputs::mac(act, weight));
            assert_eq!(acc(&engine), expected_acc);
            assert_eq!(engine.output(), Some(expected_out));
        }
    }

    #[test]
    fn test_output_read_is_idempotent() {
        let engine = engine_at(300);
        let first = engine.output();
        for _ in 0..10 {
            assert_eq!(engine.output(), first);
        }
        assert_eq!(first, Some(127));
    }

    #[test]
    fn test_accumulator_wraps() {
        let mut engine = engine_at(32_700);
        engine.step(&CycleInputs::mac(100, Weight::Pos));
        assert_eq!(acc(&engine), i16::MIN + 32);
        assert_eq!(engine.output(), Some(-128));
    }

    #[test]
    fn test_run_and_power_cycle() {
        let mut engine = Engine::new();
        let outputs = engine.run(&[
            CycleInputs::mac(3, Weight::Pos),
            CycleInputs::reset(),
            CycleInputs::mac(3, Weight::Pos),
        ]);
        assert_eq!(outputs, vec![None, Some(0), Some(3)]);
        assert_eq!(engine.cycles, 3);

        engine.power_cycle();
        assert_eq!(engine.cycles, 0);
        assert_eq!(engine.output(), None);
    }

    fn any_code() -> impl Strategy<Value = WeightCode> {
        (0u8..4).prop_map(WeightCode::from_bits)
    }

    proptest! {
        #[test]
        fn prop_reset_priority(start in any::<i16>(), act in any::<i8>(), code in any_code(),
                               valid in any::<bool>(), clear in any::<bool>(), ena in any::<bool>()) {
            let mut engine = engine_at(start);
            let inputs = CycleInputs { activation: act, weight: code, valid, clear_acc: clear, reset: true, enabled: ena };
            engine.step(&inputs);
            prop_assert_eq!(acc(&engine), 0);
        }

        #[test]
        fn prop_clear_priority(start in any::<i16>(), act in any::<i8>(), code in any_code(),
                               valid in any::<bool>(), ena in any::<bool>()) {
            let mut engine = engine_at(start);
            let inputs = CycleInputs { activation: act, weight: code, valid, clear_acc: true, reset: false, enabled: ena };
            engine.step(&inputs);
            prop_assert_eq!(acc(&engine), 0);
        }

        #[test]
        fn prop_hold(start in any::<i16>(), act in any::<i8>(), code in any_code(),
                     valid in any::<bool>(), ena in any::<bool>()) {
            prop_assume!(!valid || !ena || code.weight().is_zero());
            let mut engine = engine_at(start);
            let inputs = CycleInputs { activation: act, weight: code, valid, clear_acc: false, reset: false, enabled: ena };
            engine.step(&inputs);
            prop_assert_eq!(acc(&engine), start);
        }

        #[test]
        fn prop_single_step_from_zero(x in any::<i8>()) {
            let mut engine = engine_at(0);
            engine.step(&CycleInputs::mac(x, Weight::Pos));
            prop_assert_eq!(acc(&engine), x as i16);

            let mut engine = engine_at(0);
            engine.step(&CycleInputs::mac(x, Weight::Neg));
            prop_assert_eq!(acc(&engine), -(x as i16));
        }
    }
}

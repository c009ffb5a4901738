//! Golden model: unbounded accumulation, then clamp.
//!
//! Shares nothing with the engine's datapath. Activations are widened with
//! an ordinary integer conversion and the running sum is an `i64`, so the
//! model never wraps.

use crate::engine::CycleInputs;

/// Reference arithmetic for differential testing.
#[derive(Debug, Clone, Default)]
pub struct ReferenceModel {
    acc: Option<i64>,
}

impl ReferenceModel {
    pub fn new() -> Self {
        Self { acc: None }
    }

    pub fn step(&mut self, inputs: &CycleInputs) {
        if inputs.reset || inputs.clear_acc {
            self.acc = Some(0);
            return;
        }
        if !(inputs.enabled && inputs.valid) {
            return;
        }
        let x = i64::from(inputs.activation);
        let w = i64::from(inputs.weight.weight().to_i8());
        if let Some(acc) = self.acc.as_mut() {
            *acc += w * x;
        }
    }

    /// Unbounded accumulator, if defined.
    pub fn accumulator(&self) -> Option<i64> {
        self.acc
    }

    /// Clamped output, if defined.
    pub fn output(&self) -> Option<i8> {
        // the clamp guarantees the value fits
        self.acc.map(|acc| acc.clamp(-128, 127) as i8)
    }

    /// True when the unbounded sum no longer fits the engine's 16-bit register.
    pub fn wrap_hazard(&self) -> bool {
        self.acc
            .map_or(false, |acc| acc < i64::from(i16::MIN) || acc > i64::from(i16::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::{Weight, WeightCode};

    #[test]
    fn test_reference_clamps() {
        let mut model = ReferenceModel::new();
        assert_eq!(model.output(), None);
        model.step(&CycleInputs::reset());
        for _ in 0..5 {
            model.step(&CycleInputs::mac(127, Weight::Pos));
        }
        assert_eq!(model.accumulator(), Some(635));
        assert_eq!(model.output(), Some(127));
    }

    #[test]
    fn test_reference_gating() {
        let mut model = ReferenceModel::new();
        model.step(&CycleInputs::clear());
        model.step(&CycleInputs::mac(10, Weight::Pos).valid(false));
        model.step(&CycleInputs::mac(10, Weight::Pos).enabled(false));
        model.step(&CycleInputs::with_code(10, WeightCode::ZeroHigh));
        assert_eq!(model.accumulator(), Some(0));
    }

    #[test]
    fn test_wrap_hazard() {
        let mut model = ReferenceModel::new();
        model.step(&CycleInputs::reset());
        for _ in 0..258 {
            model.step(&CycleInputs::mac(127, Weight::Pos));
        }
        assert!(!model.wrap_hazard());
        model.step(&CycleInputs::mac(127, Weight::Pos));
        assert!(model.wrap_hazard());
    }
}

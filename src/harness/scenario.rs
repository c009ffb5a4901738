//! Built-in stimulus programs.
//!
//! Every scenario starts with the same bring-up: reset held for
//! `reset_cycles`, then optionally one `clear_acc` pulse and one idle cycle.

use std::str::FromStr;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use crate::engine::CycleInputs;
use crate::harness::{HarnessConfig, Stimulus, StimulusCycle};
use crate::ternary::{Weight, WeightCode};

/// Named scenarios selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// The five-step accumulate/saturate trace.
    Trace,
    /// Overflow, underflow, clear, hold and gating edge cases.
    Saturation,
    /// Random MAC stream.
    Random,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Trace, Scenario::Saturation, Scenario::Random];

    /// Build the stimulus for this scenario, including bring-up.
    pub fn build(self, config: &HarnessConfig) -> Stimulus {
        let body = match self {
            Scenario::Trace => documented_trace(),
            Scenario::Saturation => saturation_clamp(),
            Scenario::Random if config.full_random => random_full(config.cycles, config.seed),
            Scenario::Random => random_stress(config.cycles, config.seed),
        };
        with_bring_up(config, body)
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Trace => "trace",
            Scenario::Saturation => "saturation",
            Scenario::Random => "random",
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scenario '{}' (expected trace, saturation or random)", s))
    }
}

/// Reset, then an optional clear pulse and idle cycle.
pub fn bring_up(config: &HarnessConfig) -> Stimulus {
    let mut stim = Stimulus::new();
    for _ in 0..config.reset_cycles {
        stim.push(StimulusCycle::new(CycleInputs::reset()));
    }
    if config.clear_after_reset {
        stim.push(StimulusCycle::expecting(CycleInputs::clear(), 0));
        stim.push(StimulusCycle::expecting(CycleInputs::idle(), 0));
    }
    stim
}

/// Prefix `body` with [`bring_up`].
pub fn with_bring_up(config: &HarnessConfig, body: Stimulus) -> Stimulus {
    let mut stim = bring_up(config);
    stim.extend(body);
    stim
}

/// 50, +30, -20, hold, +70: the last step saturates at 127 with the
/// accumulator at 130.
pub fn documented_trace() -> Stimulus {
    [
        (50, Weight::Pos, 50),
        (30, Weight::Pos, 80),
        (20, Weight::Neg, 60),
        (100, Weight::Zero, 60),
        (70, Weight::Pos, 127),
    ]
    .into_iter()
    .map(|(act, w, out)| StimulusCycle::expecting(CycleInputs::mac(act, w), out))
    .collect()
}

/// Drive past both clamp bounds, then check clear, both zero codes and the
/// valid gate.
pub fn saturation_clamp() -> Stimulus {
    let mut stim = Stimulus::new();
    let clear = |stim: &mut Stimulus| {
        stim.push(StimulusCycle::expecting(CycleInputs::clear(), 0));
        stim.push(StimulusCycle::expecting(CycleInputs::idle(), 0));
    };

    // +127 five times: 127, 254, ... all read 127
    for _ in 0..5 {
        stim.push(StimulusCycle::expecting(CycleInputs::mac(127, Weight::Pos), 127));
    }
    clear(&mut stim);

    // -127 five times: -127, then clamped at -128
    stim.push(StimulusCycle::expecting(CycleInputs::mac(127, Weight::Neg), -127));
    for _ in 0..4 {
        stim.push(StimulusCycle::expecting(CycleInputs::mac(127, Weight::Neg), -128));
    }
    clear(&mut stim);

    stim.push(StimulusCycle::expecting(CycleInputs::mac(42, Weight::Pos), 42));
    for _ in 0..3 {
        stim.push(StimulusCycle::expecting(CycleInputs::mac(100, Weight::Zero), 42));
    }
    stim.push(StimulusCycle::expecting(CycleInputs::with_code(100, WeightCode::ZeroHigh), 42));
    stim.push(StimulusCycle::expecting(CycleInputs::mac(100, Weight::Pos).valid(false), 42));
    stim
}

/// Random activations with weights drawn from {0, +1, -1}, valid always high.
pub fn random_stress(cycles: usize, seed: u64) -> Stimulus {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..cycles)
        .map(|_| {
            let act: i8 = rng.gen();
            let w = Weight::ALL[rng.gen_range(0..3)];
            StimulusCycle::new(CycleInputs::mac(act, w))
        })
        .collect()
}

/// Random activations, all four weight codes, and random valid, enable and
/// clear strobes. Clears are kept rare so the accumulator gets somewhere.
pub fn random_full(cycles: usize, seed: u64) -> Stimulus {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..cycles)
        .map(|_| {
            let inputs = CycleInputs {
                activation: rng.gen(),
                weight: WeightCode::from_bits(rng.gen()),
                valid: rng.gen_bool(0.8),
                clear_acc: rng.gen_bool(0.05),
                reset: false,
                enabled: rng.gen_bool(0.9),
            };
            StimulusCycle::new(inputs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bring_up_shape() {
        let cfg = HarnessConfig::default();
        let stim = bring_up(&cfg);
        assert_eq!(stim.len(), 12);
        assert!(stim.cycles[..10].iter().all(|c| c.inputs.reset));
        assert!(stim.cycles[10].inputs.clear_acc);

        let cfg = HarnessConfig { reset_cycles: 1, clear_after_reset: false, ..cfg };
        assert_eq!(bring_up(&cfg).len(), 1);
    }

    #[test]
    fn test_random_is_reproducible() {
        assert_eq!(random_stress(50, 9), random_stress(50, 9));
        assert_ne!(random_stress(50, 9), random_stress(50, 10));
        assert_eq!(random_full(50, 9), random_full(50, 9));
    }

    #[test]
    fn test_random_stress_never_uses_high_zero() {
        let stim = random_stress(500, 1);
        assert!(stim.cycles.iter().all(|c| c.inputs.valid && c.inputs.weight != WeightCode::ZeroHigh));
    }

    #[test]
    fn test_scenario_names() {
        for sc in Scenario::ALL {
            assert_eq!(sc.name().parse::<Scenario>().unwrap(), sc);
        }
        assert_eq!("SATURATION".parse::<Scenario>().unwrap(), Scenario::Saturation);
        assert!("bogus".parse::<Scenario>().is_err());
    }
}

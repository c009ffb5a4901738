//! Lockstep verification of the engine against the reference model.

use log::{debug, info, warn};
use serde::{Serialize, Deserialize};
use crate::engine::{CycleInputs, Engine};
use std::path::Path;
use crate::harness::{load_stimulus, HarnessError, ReferenceModel, Stimulus};

/// What was driven and observed on one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// 0-based index into the stimulus.
    pub cycle: usize,
    pub inputs: CycleInputs,
    /// Engine accumulator after the edge.
    pub accumulator: Option<i16>,
    /// Engine output after the edge.
    pub output: Option<i8>,
    /// Unbounded reference accumulator after the edge.
    pub reference: Option<i64>,
    /// What the output had to be: the stimulus expectation if present,
    /// otherwise the reference output.
    pub expected: Option<i8>,
}

impl TraceRecord {
    pub fn matches(&self) -> bool {
        self.expected.is_none() || self.expected == self.output
    }
}

/// Result of driving a whole stimulus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyReport {
    pub records: Vec<TraceRecord>,
    /// Cycles whose output differed from the expectation.
    pub mismatches: Vec<usize>,
    /// Cycles where the reference sum left the 16-bit range.
    pub wrap_hazards: Vec<usize>,
    /// Cycles where an explicit expectation disagreed with the reference.
    pub stale_expectations: Vec<usize>,
}

impl VerifyReport {
    pub fn cycles(&self) -> usize {
        self.records.len()
    }

    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Drives an [`Engine`] and a [`ReferenceModel`] side by side.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    pub engine: Engine,
    pub reference: ReferenceModel,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step both models once and record what happened.
    ///
    /// On error neither model is advanced.
    pub fn step(
        &mut self,
        cycle: usize,
        inputs: &CycleInputs,
        expect: Option<i8>,
    ) -> Result<TraceRecord, HarnessError> {
        let mut engine = self.engine.clone();
        let mut reference = self.reference.clone();
        engine.step(inputs);
        reference.step(inputs);

        let output = engine.output();
        let expected = expect.or(reference.output());

        if expected.is_some() && output.is_none() {
            return Err(HarnessError::OutputBeforeReset { cycle });
        }
        self.engine = engine;
        self.reference = reference;

        let record = TraceRecord {
            cycle,
            inputs: *inputs,
            accumulator: self.engine.accumulator().map(|a| a.to_i16()),
            output,
            reference: self.reference.accumulator(),
            expected,
        };
        debug!(
            "cycle {:4}: {:?} acc={:?} out={:?} expected={:?}",
            cycle, inputs, record.accumulator, output, expected
        );
        Ok(record)
    }

    /// Drive every cycle of `stimulus`.
    pub fn run(&mut self, stimulus: &Stimulus) -> Result<VerifyReport, HarnessError> {
        let mut report = VerifyReport::default();
        info!("verifying {} cycles", stimulus.len());

        for (i, cycle) in stimulus.cycles.iter().enumerate() {
            let record = self.step(i, &cycle.inputs, cycle.expect)?;

            if self.reference.wrap_hazard() {
                warn!("cycle {}: reference sum {:?} exceeds the 16-bit accumulator", i, record.reference);
                report.wrap_hazards.push(i);
            }
            if let (Some(expect), Some(reference)) = (cycle.expect, self.reference.output()) {
                if expect != reference {
                    warn!("cycle {}: stimulus expects {} but reference gives {}", i, expect, reference);
                    report.stale_expectations.push(i);
                }
            }
            if !record.matches() {
                warn!(
                    "MISMATCH at cycle {}: {:?} expected={:?} actual={:?}",
                    i, cycle.inputs, record.expected, record.output
                );
                report.mismatches.push(i);
            }
            report.records.push(record);
        }

        info!(
            "{} cycles, {} mismatches, {} wrap hazards",
            report.cycles(),
            report.mismatches.len(),
            report.wrap_hazards.len()
        );
        Ok(report)
    }
}

/// Verify `stimulus` on a fresh engine.
pub fn verify(stimulus: &Stimulus) -> Result<VerifyReport, HarnessError> {
    Verifier::new().run(stimulus)
}

/// Load a stimulus file and verify it on a fresh engine.
pub fn verify_file<P: AsRef<Path>>(path: P) -> Result<VerifyReport, HarnessError> {
    let stimulus = load_stimulus(path)?;
    verify(&stimulus)
}

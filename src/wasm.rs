//! WebAssembly bindings for the ternary MAC emulator.
//!
//! This module provides JavaScript-friendly wrappers around the engine.

use wasm_bindgen::prelude::*;
use crate::engine::{CycleInputs, Engine};
use crate::harness::{stimulus, Stimulus};
use crate::ternary::{arith, Word16, WeightCode};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly engine wrapper.
#[wasm_bindgen]
pub struct WasmMac {
    engine: Engine,
    stimulus: Stimulus,
    position: usize,
}

#[wasm_bindgen]
impl WasmMac {
    /// Create a new engine in its power-on state.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
            stimulus: Stimulus::new(),
            position: 0,
        }
    }

    /// Drive one cycle. Returns the output, or `undefined` before reset.
    #[wasm_bindgen]
    pub fn step(
        &mut self,
        activation: i8,
        weight_code: u8,
        valid: bool,
        clear_acc: bool,
        reset: bool,
        enabled: bool,
    ) -> Result<Option<i8>, JsError> {
        let weight = WeightCode::try_from(weight_code)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        let inputs = CycleInputs { activation, weight, valid, clear_acc, reset, enabled };
        self.engine.step(&inputs);
        Ok(self.engine.output())
    }

    /// Load a `.stim` program for replay with [`WasmMac::step_stim`].
    #[wasm_bindgen]
    pub fn load_stim(&mut self, source: &str) -> Result<usize, JsError> {
        let stim = stimulus::parse_stim(source)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        let len = stim.len();
        self.stimulus = stim;
        self.position = 0;
        self.engine = Engine::new();
        Ok(len)
    }

    /// Replay the next loaded cycle. Returns false at the end of the program.
    #[wasm_bindgen]
    pub fn step_stim(&mut self) -> bool {
        match self.stimulus.cycles.get(self.position) {
            Some(cycle) => {
                self.engine.step(&cycle.inputs);
                self.position += 1;
                true
            }
            None => false,
        }
    }

    /// Saturated output, or `undefined` before reset.
    #[wasm_bindgen]
    pub fn output(&self) -> Option<i8> {
        self.engine.output()
    }

    /// Accumulator value, or `undefined` before reset.
    #[wasm_bindgen]
    pub fn accumulator(&self) -> Option<i16> {
        self.engine.accumulator().map(Word16::to_i16)
    }

    /// Whether the output is currently clamped.
    #[wasm_bindgen]
    pub fn is_saturated(&self) -> bool {
        self.engine.is_saturated()
    }

    /// Get cycle count.
    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.engine.cycles
    }

    /// Return to power-on state and rewind any loaded program.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.engine.power_cycle();
        self.position = 0;
    }

    /// Get state as JSON string.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.engine).map_err(|e| JsError::new(&format!("{}", e)))
    }
}

impl Default for WasmMac {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a 16-bit accumulator value to the 8-bit output range.
#[wasm_bindgen]
pub fn wasm_saturate(acc: i16) -> i8 {
    arith::saturate(Word16::from_i16(acc))
}

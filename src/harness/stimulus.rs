//! Stimulus files: per-cycle input sequences for the engine.
//!
//! Two on-disk formats are supported, chosen by file extension:
//!
//! `.json` is the serde form of [`Stimulus`].
//!
//! Anything else is the `.stim` text format:
//! - One cycle per line: `<activation> <weight> [flags] [=> <expected>]`
//! - Weight is `+`, `-`, `0`, `+1`, `-1`, or a raw code `#0`..`#3`
//! - Flags are letters: `v` valid, `c` clear, `r` reset, `d` disabled;
//!   `.` means no flags
//! - Text after `;` is a comment, blank lines are ignored

use std::fmt::Write as _;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::engine::{signals, CycleInputs};
use crate::ternary::{self, WeightCode};

/// One cycle of stimulus, with an optional expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusCycle {
    pub inputs: CycleInputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<i8>,
}

impl StimulusCycle {
    /// A cycle with no expectation attached.
    pub fn new(inputs: CycleInputs) -> Self {
        Self { inputs, expect: None }
    }

    /// A cycle whose output must equal `expect`.
    pub fn expecting(inputs: CycleInputs, expect: i8) -> Self {
        Self { inputs, expect: Some(expect) }
    }
}

/// A loaded stimulus sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    pub cycles: Vec<StimulusCycle>,
}

impl Stimulus {
    /// Create a new empty stimulus.
    pub fn new() -> Self {
        Self { cycles: Vec::new() }
    }

    /// Append a cycle.
    pub fn push(&mut self, cycle: StimulusCycle) {
        self.cycles.push(cycle);
    }

    /// Append every cycle of `other`.
    pub fn extend(&mut self, other: Stimulus) {
        self.cycles.extend(other.cycles);
    }

    /// Get the number of cycles.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// The input half of every cycle.
    pub fn inputs(&self) -> Vec<CycleInputs> {
        self.cycles.iter().map(|c| c.inputs).collect()
    }
}

impl FromIterator<StimulusCycle> for Stimulus {
    fn from_iter<I: IntoIterator<Item = StimulusCycle>>(iter: I) -> Self {
        Self { cycles: iter.into_iter().collect() }
    }
}

/// Parse `.stim` text.
pub fn parse_stim(source: &str) -> Result<Stimulus, StimulusError> {
    let mut stimulus = Stimulus::new();
    for (line_num, line) in source.lines().enumerate() {
        if let Some(cycle) = parse_line(line).map_err(|message| StimulusError::ParseError {
            line: line_num + 1,
            message,
        })? {
            stimulus.push(cycle);
        }
    }
    Ok(stimulus)
}

fn parse_line(line: &str) -> Result<Option<StimulusCycle>, String> {
    let code = line.split(';').next().unwrap_or("").trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (body, expect) = match code.split_once("=>") {
        Some((body, expect)) => {
            let value: i64 = expect
                .trim()
                .parse()
                .map_err(|_| format!("invalid expected output '{}'", expect.trim()))?;
            let value = ternary::activation_from_i64(value)
                .map_err(|_| format!("expected output {} out of range", value))?;
            (body, Some(value))
        }
        None => (code, None),
    };

    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.len() < 2 || tokens.len() > 3 {
        return Err(format!("expected '<activation> <weight> [flags]', found {} fields", tokens.len()));
    }

    let activation: i64 = tokens[0]
        .parse()
        .map_err(|_| format!("invalid activation '{}'", tokens[0]))?;
    let activation = ternary::activation_from_i64(activation).map_err(|e| e.to_string())?;
    let weight: WeightCode = tokens[1].parse().map_err(|e: ternary::DecodeError| e.to_string())?;

    let mut inputs = CycleInputs {
        activation,
        weight,
        valid: false,
        clear_acc: false,
        reset: false,
        enabled: true,
    };
    if let Some(flags) = tokens.get(2) {
        if *flags != "." {
            for c in flags.chars() {
                match c {
                    'v' => inputs.valid = true,
                    'c' => inputs.clear_acc = true,
                    'r' => inputs.reset = true,
                    'd' => inputs.enabled = false,
                    other => return Err(format!("unknown flag '{}'", other)),
                }
            }
        }
    }

    Ok(Some(StimulusCycle { inputs, expect }))
}

fn weight_token(code: WeightCode) -> &'static str {
    match code {
        WeightCode::Plus => "+",
        WeightCode::Minus => "-",
        WeightCode::ZeroLow => "0",
        WeightCode::ZeroHigh => "#3",
    }
}

/// Render a stimulus as `.stim` text.
pub fn format_stim(stimulus: &Stimulus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "; ternary MAC stimulus");
    let _ = writeln!(out, "; {} cycles", stimulus.len());
    let _ = writeln!(out);
    for (i, cycle) in stimulus.cycles.iter().enumerate() {
        let flags = signals::flags(&cycle.inputs);
        let flags = if flags.is_empty() { ".".to_string() } else { flags };
        let _ = write!(
            out,
            "{:4} {:2} {:4}",
            cycle.inputs.activation,
            weight_token(cycle.inputs.weight),
            flags
        );
        if let Some(expect) = cycle.expect {
            let _ = write!(out, " => {:4}", expect);
        }
        let _ = writeln!(out, " ; {:03}", i);
    }
    out
}

fn is_json<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a stimulus file from disk.
pub fn load_stimulus<P: AsRef<Path>>(path: P) -> Result<Stimulus, StimulusError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| StimulusError::IoError(e.to_string()))?;
    let mut reader = BufReader::new(file);

    if is_json(&path) {
        return serde_json::from_reader(reader).map_err(|e| StimulusError::JsonError(e.to_string()));
    }

    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|e| StimulusError::IoError(e.to_string()))?;
    parse_stim(&source)
}

/// Save a stimulus file to disk.
pub fn save_stimulus<P: AsRef<Path>>(path: P, stimulus: &Stimulus) -> Result<(), StimulusError> {
    let mut file = std::fs::File::create(path.as_ref())
        .map_err(|e| StimulusError::IoError(e.to_string()))?;

    if is_json(&path) {
        serde_json::to_writer_pretty(&mut file, stimulus)
            .map_err(|e| StimulusError::JsonError(e.to_string()))?;
        return writeln!(file).map_err(|e| StimulusError::IoError(e.to_string()));
    }

    file.write_all(format_stim(stimulus).as_bytes())
        .map_err(|e| StimulusError::IoError(e.to_string()))
}

/// Errors that can occur during stimulus operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StimulusError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("JSON error: {0}")]
    JsonError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::Weight;

    #[test]
    fn test_parse_basic_lines() {
        let src = "\
; reset then add
0 0 r
  50 +  v => 50
-20 -1 v ; subtract
100 #3 v
7 + vd
";
        let stim = parse_stim(src).unwrap();
        assert_eq!(stim.len(), 5);
        assert!(stim.cycles[0].inputs.reset);
        assert_eq!(stim.cycles[1], StimulusCycle::expecting(CycleInputs::mac(50, Weight::Pos), 50));
        assert_eq!(stim.cycles[2].inputs, CycleInputs::mac(-20, Weight::Neg));
        assert_eq!(stim.cycles[3].inputs.weight, WeightCode::ZeroHigh);
        assert!(!stim.cycles[4].inputs.enabled);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = parse_stim("0 0 r\n200 + v\n").unwrap_err();
        assert!(matches!(err, StimulusError::ParseError { line: 2, .. }), "{:?}", err);

        let err = parse_stim("0 #7 v").unwrap_err();
        assert!(matches!(err, StimulusError::ParseError { line: 1, .. }));

        let err = parse_stim("0 + vx").unwrap_err();
        assert_eq!(
            err,
            StimulusError::ParseError { line: 1, message: "unknown flag 'x'".into() }
        );

        assert!(parse_stim("5").is_err());
        assert!(parse_stim("5 + v => 300").is_err());
    }

    #[test]
    fn test_format_parses_back() {
        let stim: Stimulus = [
            StimulusCycle::new(CycleInputs::reset()),
            StimulusCycle::expecting(CycleInputs::mac(-128, Weight::Neg), 127),
            StimulusCycle::new(CycleInputs::with_code(3, WeightCode::ZeroHigh).enabled(false)),
            StimulusCycle::new(CycleInputs::idle()),
        ]
        .into_iter()
        .collect();

        let text = format_stim(&stim);
        assert_eq!(parse_stim(&text).unwrap(), stim);
    }

    #[test]
    fn test_file_roundtrip_both_formats() {
        let dir = std::env::temp_dir().join(format!("tmac-stim-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut stim = Stimulus::new();
        stim.push(StimulusCycle::new(CycleInputs::reset()));
        stim.push(StimulusCycle::expecting(CycleInputs::mac(9, Weight::Pos), 9));

        for name in ["a.stim", "a.json"] {
            let path = dir.join(name);
            save_stimulus(&path, &stim).unwrap();
            assert_eq!(load_stimulus(&path).unwrap(), stim, "{}", name);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_stimulus("/nonexistent/never.stim"),
            Err(StimulusError::IoError(_))
        ));
    }
}

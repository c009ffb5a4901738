//! Ternary MAC Emulator - CLI Entry Point
//!
//! Commands:
//! - `tmac-emu run <stim>` - Drive a stimulus file and print outputs
//! - `tmac-emu verify <stim>` - Check a stimulus against the reference model
//! - `tmac-emu random` - Random differential run
//! - `tmac-emu scenario <name>` - Run a built-in scenario
//! - `tmac-emu debug <stim>` - Interactive viewer
//! - `tmac-emu convert <in> <out>` - Convert between .stim and .json

use clap::{Parser, Subcommand};
use tmac::{HarnessConfig, HarnessError, Scenario, Stimulus, VerifyReport};

#[derive(Parser)]
#[command(name = "tmac-emu")]
#[command(author = "John Minnick")]
#[command(version = "0.1.0")]
#[command(about = "A cycle-accurate emulator of a MatMul-free ternary MAC neuron")]
struct Cli {
    /// Harness settings file (JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,
    /// Cycles of reset before the stimulus body (overrides config)
    #[arg(long, global = true)]
    reset_cycles: Option<usize>,
    /// Log every verified cycle
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a stimulus file and print the output after each cycle
    Run {
        /// Path to the .stim or .json file
        stimulus: String,
        /// Show inputs and accumulator for every cycle
        #[arg(short, long)]
        trace: bool,
    },
    /// Drive a stimulus file against the reference model
    Verify {
        /// Path to the .stim or .json file
        stimulus: String,
        /// Write the per-cycle report as JSON
        #[arg(short, long)]
        report: Option<String>,
    },
    /// Random differential run against the reference model
    Random {
        /// Number of random cycles
        #[arg(short = 'n', long)]
        cycles: Option<usize>,
        /// RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Also randomise valid, enable, clear and the 0b11 weight code
        #[arg(short, long)]
        full: bool,
    },
    /// Run a built-in scenario (trace, saturation, random)
    Scenario {
        /// Scenario name
        name: Scenario,
        /// Save the generated stimulus instead of running it
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Interactive viewer
    Debug {
        /// Path to the .stim or .json file
        stimulus: String,
    },
    /// Convert a stimulus between .stim and .json
    Convert {
        input: String,
        output: String,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&cli);

    match cli.command {
        Some(Commands::Run { stimulus, trace }) => {
            run_stimulus(&stimulus, trace);
        }
        Some(Commands::Verify { stimulus, report }) => {
            println!("📂 Verifying {}", stimulus);
            verify_and_report(tmac::verify_file(&stimulus), report.as_deref());
        }
        Some(Commands::Random { cycles, seed, full }) => {
            let config = HarnessConfig {
                cycles: cycles.unwrap_or(config.cycles),
                seed: seed.unwrap_or(config.seed),
                full_random: full || config.full_random,
                ..config
            };
            println!("🎲 {} random cycles, seed {}", config.cycles, config.seed);
            verify_and_report(tmac::verify(&Scenario::Random.build(&config)), None);
        }
        Some(Commands::Scenario { name, output }) => {
            let stim = name.build(&config);
            match output {
                Some(path) => save_or_exit(&path, &stim),
                None => {
                    println!("▶ Scenario: {}", name.name());
                    verify_and_report(tmac::verify(&stim), None);
                }
            }
        }
        Some(Commands::Debug { stimulus }) => {
            debug_stimulus(&stimulus);
        }
        Some(Commands::Convert { input, output }) => {
            let stim = load_or_exit(&input);
            save_or_exit(&output, &stim);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Ternary MAC Emulator v0.1.0");
            println!("A MatMul-free streaming neuron, one clock edge at a time");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_documented_trace();
        }
    }
}

fn load_config(cli: &Cli) -> HarnessConfig {
    let mut config = match &cli.config {
        Some(path) => match HarnessConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => HarnessConfig::default(),
    };
    if let Some(n) = cli.reset_cycles {
        config.reset_cycles = n;
    }
    log::debug!("harness config: {:?}", config);
    config
}

fn load_or_exit(path: &str) -> Stimulus {
    match tmac::load_stimulus(path) {
        Ok(stim) => {
            println!("📂 Loaded {} cycles from {}", stim.len(), path);
            stim
        }
        Err(e) => {
            eprintln!("❌ Failed to load stimulus: {}", e);
            std::process::exit(1);
        }
    }
}

fn save_or_exit(path: &str, stim: &Stimulus) {
    if let Err(e) = tmac::save_stimulus(path, stim) {
        eprintln!("❌ Failed to save stimulus: {}", e);
        std::process::exit(1);
    }
    println!("✓ Saved {} cycles to {}", stim.len(), path);
}

fn run_stimulus(path: &str, trace: bool) {
    use tmac::Engine;

    let stim = load_or_exit(path);
    if stim.is_empty() {
        eprintln!("❌ No cycles to drive");
        std::process::exit(1);
    }

    println!();
    println!("━━━ Execution ━━━");

    let mut engine = Engine::new();
    for (i, cycle) in stim.cycles.iter().enumerate() {
        engine.step(&cycle.inputs);
        let out = engine
            .output()
            .map_or("  X".to_string(), |o| format!("{:4}", o));
        if trace {
            let acc = engine
                .accumulator()
                .map_or("     X".to_string(), |a| format!("{:6} (0x{:04X})", a, a));
            println!("{:04}: {:?}  acc={}  out={}", i, cycle.inputs, acc, out);
        } else {
            println!("{:04}: {}", i, out);
        }
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", engine.cycles);
    println!("State: {:?}", engine.state());
    match (engine.accumulator(), engine.output()) {
        (Some(acc), Some(out)) => {
            println!("Accumulator: {} (0x{:04X})", acc, acc);
            println!("Output:      {}{}", out, if engine.is_saturated() { " (saturated)" } else { "" });
        }
        _ => {
            println!();
            println!("⚠️  Engine was never reset; output is undefined.");
        }
    }
}

fn verify_and_report(result: Result<VerifyReport, HarnessError>, report_path: Option<&str>) {
    let report = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = report_path {
        let written = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("❌ Failed to write report: {}", e);
            std::process::exit(1);
        }
        println!("✓ Report written to {}", path);
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Cycles:       {}", report.cycles());
    println!("Mismatches:   {}", report.mismatches.len());
    if !report.wrap_hazards.is_empty() {
        println!("Wrap hazards: {} (first at cycle {})", report.wrap_hazards.len(), report.wrap_hazards[0]);
    }

    if report.passed() {
        println!("✓ PASSED");
    } else {
        for &i in report.mismatches.iter().take(10) {
            let r = &report.records[i];
            eprintln!("✗ cycle {:04}: {:?} expected={:?} actual={:?}", i, r.inputs, r.expected, r.output);
        }
        std::process::exit(1);
    }
}

#[cfg(feature = "tui")]
fn debug_stimulus(path: &str) {
    let stim = load_or_exit(path);
    println!("🚀 Launching viewer...");
    if let Err(e) = tmac::run_viewer(stim) {
        eprintln!("❌ Viewer error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn debug_stimulus(_path: &str) {
    eprintln!("❌ Built without the `tui` feature");
    std::process::exit(1);
}

fn demo_documented_trace() {
    use tmac::{CycleInputs, Engine, Weight};

    println!("━━━ Documented Trace ━━━");
    println!();

    let mut engine = Engine::new();
    engine.step(&CycleInputs::reset());

    let steps = [
        (50, Weight::Pos),
        (30, Weight::Pos),
        (20, Weight::Neg),
        (100, Weight::Zero),
        (70, Weight::Pos),
    ];
    for (i, (act, w)) in steps.into_iter().enumerate() {
        engine.step(&CycleInputs::mac(act, w));
        if let (Some(acc), Some(out)) = (engine.accumulator(), engine.output()) {
            println!(
                "  step {}: act={:4} w={:?}  acc={:4}  out={:4}{}",
                i + 1, act, w, acc, out,
                if engine.is_saturated() { "  SAT!" } else { "" }
            );
        }
    }
    println!();
}

fn run_self_test() {
    use tmac::{CycleInputs, Engine, Weight, WeightCode};
    use tmac::ternary::{arith, sign_extend16, Word16};

    println!("━━━ Ternary MAC Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut check = |name: &str, ok: bool| {
        print!("{}... ", name);
        if ok {
            println!("✓");
            passed += 1;
        } else {
            println!("✗");
            failed += 1;
        }
    };

    check(
        "Sign extension matches reference",
        (i8::MIN..=i8::MAX).all(|x| sign_extend16(x).to_i16() == i16::from(x)),
    );

    check(
        "Bit-level saturation matches clamp",
        (0..=u16::MAX).all(|b| {
            let w = Word16::from_bits(b);
            arith::saturate(w) as i16 == w.to_i16().clamp(-128, 127)
        }),
    );

    check(
        "Both zero codes hold",
        WeightCode::ZeroLow.weight() == Weight::Zero && WeightCode::ZeroHigh.weight() == Weight::Zero,
    );

    let mut engine = Engine::new();
    engine.step(&CycleInputs::reset());
    engine.step(&CycleInputs::mac(-5, Weight::Pos));
    check("Negative activation accumulates as -5", engine.output() == Some(-5));

    engine.step(&CycleInputs::mac(100, Weight::Pos).with_reset(true));
    check("Reset beats compute", engine.output() == Some(0));

    let config = HarnessConfig::default();
    for sc in Scenario::ALL {
        let ok = tmac::verify(&sc.build(&config)).map_or(false, |r| r.passed());
        check(&format!("Scenario '{}'", sc.name()), ok);
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}

//! Viewer application state and logic.

use crate::harness::{Stimulus, TraceRecord, Verifier};
use std::collections::HashSet;

/// Viewer application state.
pub struct ViewerApp {
    /// Engine and reference model being stepped.
    pub verifier: Verifier,
    /// Stimulus being replayed.
    pub stimulus: Stimulus,
    /// Index of the next stimulus cycle.
    pub position: usize,
    /// Every cycle driven so far.
    pub history: Vec<TraceRecord>,
    /// Breakpoints (by stimulus cycle).
    pub breakpoints: HashSet<usize>,
    /// Is the viewer running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// History scroll offset from the newest record.
    pub scroll: usize,
}

impl ViewerApp {
    /// Create a new viewer for a stimulus.
    pub fn new(stimulus: Stimulus) -> Self {
        Self {
            verifier: Verifier::new(),
            stimulus,
            position: 0,
            history: Vec::new(),
            breakpoints: HashSet::new(),
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
            scroll: 0,
        }
    }

    /// True once every stimulus cycle has been driven.
    pub fn finished(&self) -> bool {
        self.position >= self.stimulus.len()
    }

    /// Step one cycle.
    pub fn step(&mut self) {
        let Some(cycle) = self.stimulus.cycles.get(self.position).copied() else {
            self.status = format!("End of stimulus after {} cycles", self.position);
            self.running = false;
            return;
        };

        match self.verifier.step(self.position, &cycle.inputs, cycle.expect) {
            Ok(record) => {
                self.status = if record.matches() {
                    format!("cycle {:03}: {:?}", record.cycle, record.inputs)
                } else {
                    self.running = false;
                    format!(
                        "MISMATCH at cycle {:03}: expected {:?}, got {:?}",
                        record.cycle, record.expected, record.output
                    )
                };
                self.history.push(record);
                self.position += 1;
                self.scroll = 0;
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until the end, a breakpoint, or a mismatch.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if self.finished() {
            self.running = false;
            self.status = format!("Finished after {} cycles", self.position);
            return;
        }

        if self.breakpoints.contains(&self.position) {
            self.running = false;
            self.status = format!("Breakpoint at cycle {}", self.position);
            return;
        }

        self.step();
    }

    /// Toggle breakpoint at the next cycle.
    pub fn toggle_breakpoint(&mut self) {
        let at = self.position;
        if self.breakpoints.remove(&at) {
            self.status = format!("Removed breakpoint at cycle {}", at);
        } else {
            self.breakpoints.insert(at);
            self.status = format!("Set breakpoint at cycle {}", at);
        }
    }

    /// Power-cycle the engine and rewind the stimulus.
    pub fn reset(&mut self) {
        self.verifier = Verifier::new();
        self.position = 0;
        self.history.clear();
        self.running = false;
        self.scroll = 0;
        self.status = "Reset. Ready.".into();
    }

    /// The `lines` most recent records, oldest first, honouring the scroll offset.
    pub fn visible_history(&self, lines: usize) -> &[TraceRecord] {
        let end = self.history.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(lines);
        &self.history[start..end]
    }

    /// Count of mismatched cycles so far.
    pub fn mismatches(&self) -> usize {
        self.history.iter().filter(|r| !r.matches()).count()
    }
}

/// Run the viewer with a stimulus.
pub fn run_viewer(stimulus: Stimulus) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = ViewerApp::new(stimulus);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') => {
                            app.running = false;
                            app.step();
                        }
                        KeyCode::Char('r') => app.run(),
                        KeyCode::Char('p') => {
                            app.running = false;
                            app.status = "Paused.".into();
                        }
                        KeyCode::Char('b') => app.toggle_breakpoint(),
                        KeyCode::Char('x') => app.reset(),
                        KeyCode::Up => {
                            if app.scroll + 1 < app.history.len() {
                                app.scroll += 1;
                            }
                        }
                        KeyCode::Down => {
                            app.scroll = app.scroll.saturating_sub(1);
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

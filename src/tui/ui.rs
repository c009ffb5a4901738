//! UI rendering for the viewer.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::engine::signals;
use crate::ternary::{Weight, arith};
use super::app::ViewerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &ViewerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(frame.area());

    // Left side: history and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_history(frame, left_chunks[0], app);
    draw_status(frame, left_chunks[1], app);

    // Right side: datapath and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(chunks[1]);

    draw_datapath(frame, right_chunks[0], app);
    draw_help(frame, right_chunks[1]);
}

/// Draw the per-cycle history, newest at the bottom.
fn draw_history(frame: &mut Frame, area: Rect, app: &ViewerApp) {
    let rows = (area.height as usize).saturating_sub(2);

    let items: Vec<ListItem> = app
        .visible_history(rows)
        .iter()
        .map(|rec| {
            let acc = rec.accumulator.map_or("  ????".to_string(), |a| format!("{:6}", a));
            let out = rec.output.map_or("????".to_string(), |o| format!("{:4}", o));
            let bp = if app.breakpoints.contains(&rec.cycle) { "●" } else { " " };
            let text = format!(
                "{} {:04}: act={:4} w={:>2} {:<4} acc={} out={}",
                bp,
                rec.cycle,
                rec.inputs.activation,
                format!("{:?}", rec.inputs.weight.weight()),
                signals::flags(&rec.inputs),
                acc,
                out,
            );

            let saturated = rec.accumulator.map_or(false, |a| a > 127 || a < -128);
            let style = if !rec.matches() {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else if saturated {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Cycles ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw the engine's live state.
fn draw_datapath(frame: &mut Frame, area: Rect, app: &ViewerApp) {
    let engine = &app.verifier.engine;
    let (acc_dec, acc_hex) = match engine.accumulator() {
        Some(acc) => (format!("{}", acc), format!("0x{:04X}", acc)),
        None => ("undefined".to_string(), "0x????".to_string()),
    };
    let (out_text, out_style) = match engine.output() {
        Some(out) if engine.is_saturated() => (
            format!("{} SAT", out),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Some(out) => (format!("{}", out), Style::default().fg(Color::Green)),
        None => ("undefined".to_string(), Style::default().fg(Color::DarkGray)),
    };
    let next = app.stimulus.cycles.get(app.position);

    let mut content = vec![
        Line::from(vec![
            Span::raw("ACC: "),
            Span::styled(format!("{:>10}", acc_dec), Style::default().fg(Color::White)),
            Span::raw(format!("  {}", acc_hex)),
        ]),
        Line::from(vec![
            Span::raw("OUT: "),
            Span::styled(format!("{:>10}", out_text), out_style),
            Span::raw(format!("  clamp [{}, {}]", arith::OUTPUT_MIN, arith::OUTPUT_MAX)),
        ]),
        Line::from(vec![
            Span::raw("Cycles: "),
            Span::styled(format!("{}", engine.cycles), Style::default().fg(Color::Cyan)),
            Span::raw("   State: "),
            Span::styled(format!("{:?}", engine.state()),
                if engine.is_ready() {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                }),
        ]),
        Line::from(vec![
            Span::raw("Mismatches: "),
            Span::styled(format!("{}", app.mismatches()),
                if app.mismatches() == 0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                }),
        ]),
        Line::from(""),
    ];

    match next {
        Some(cycle) => content.push(Line::from(vec![
            Span::raw(format!("Next {:04}: act={} w=", app.position, cycle.inputs.activation)),
            Span::styled(format!("{:?}", cycle.inputs.weight.weight()), weight_style(cycle.inputs.weight.weight())),
            Span::raw(format!(" code={} flags={}", cycle.inputs.weight, signals::flags(&cycle.inputs))),
        ])),
        None => content.push(Line::from("Next: end of stimulus")),
    }

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Datapath ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &ViewerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Breakpoint"),
        Line::from("x: Reset  ↑↓: Scroll history  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Get color style for a weight.
fn weight_style(w: Weight) -> Style {
    match w {
        Weight::Neg => Style::default().fg(Color::Red),
        Weight::Zero => Style::default().fg(Color::Gray),
        Weight::Pos => Style::default().fg(Color::Green),
    }
}

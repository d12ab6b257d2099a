// Status bar widget: title, lifecycle phase, backend reachability and any
// startup configuration warning.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use kahani_core::protocol::BackendStatus;
use kahani_core::session::Phase;

use crate::tui::ViewState;

pub const TITLE: &str = "اردو کہانی جنریٹر";

/// Render the status bar into the given area.
///
/// Layout: [title] | [phase] | [backend dot + label] [warning]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let mut spans = vec![
        Span::styled(
            format!(" {} ", TITLE),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
    ];

    let (phase_text, phase_color) = phase_indicator(state.session.phase());
    spans.push(Span::styled(phase_text, Style::default().fg(phase_color)));
    spans.push(separator());

    let (dot, label, color) = backend_indicator(state.backend);
    spans.push(Span::styled(format!("{} ", dot), Style::default().fg(color)));
    spans.push(Span::styled(label, Style::default().fg(Color::White)));

    if let Some(warning) = &state.config_warning {
        spans.push(separator());
        spans.push(Span::styled(
            warning.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn phase_indicator(phase: Phase) -> (&'static str, Color) {
    match phase {
        Phase::Idle => ("idle", Color::DarkGray),
        Phase::Generating => ("generating...", Color::Yellow),
        Phase::Streaming => ("streaming...", Color::Green),
    }
}

/// Dot, label and color for the backend probe result.
pub fn backend_indicator(status: BackendStatus) -> (&'static str, &'static str, Color) {
    match status {
        BackendStatus::Unknown => ("○", "API checking", Color::DarkGray),
        BackendStatus::Reachable => ("●", "API online", Color::Green),
        BackendStatus::Unreachable => ("●", "API unreachable", Color::Red),
        BackendStatus::Unconfigured => ("●", "API not configured", Color::Yellow),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Action row: generate / clear / copy labels on the first line, the current
// error (validation or failure) on the second.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use kahani_core::session::SessionState;

use super::key_hint;
use crate::tui::ViewState;

pub const GENERATE_LABEL: &str = "📖 کہانی بنائیں";
pub const GENERATING_LABEL: &str = "کہانی بنائی جا رہی ہے...";
pub const CLEAR_LABEL: &str = "صاف کریں";
pub const COPY_LABEL: &str = "کاپی کریں";
pub const COPIED_LABEL: &str = "کاپی ہو گیا!";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![button_line(&state.session)];
    if let Some(error) = &state.session.error {
        lines.push(
            Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        );
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn button_line(session: &SessionState) -> Line<'static> {
    let mut spans = vec![Span::raw(" "), key_hint("Ctrl+G"), Span::raw(" ")];

    if session.is_generating {
        spans.push(Span::styled(
            GENERATING_LABEL,
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            GENERATE_LABEL,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::raw("   "));
    spans.push(key_hint("Ctrl+L"));
    spans.push(Span::styled(
        format!(" {}", CLEAR_LABEL),
        Style::default().fg(Color::Gray),
    ));

    // Copy only makes sense once there are words to copy.
    if !session.output_words.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(key_hint("Ctrl+Y"));
        if session.copied {
            spans.push(Span::styled(
                format!(" {}", COPIED_LABEL),
                Style::default().fg(Color::Green),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {}", COPY_LABEL),
                Style::default().fg(Color::Gray),
            ));
        }
    }

    Line::from(spans)
}

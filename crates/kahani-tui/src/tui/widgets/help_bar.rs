// Help bar: keyboard shortcut hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::key_hint;

const HINTS: &[(&str, &str)] = &[
    ("Ctrl+G", "Generate"),
    ("Ctrl+L", "Clear"),
    ("Ctrl+Y", "Copy"),
    ("Ctrl+U", "Erase"),
    ("Ctrl+←/→ Home/End", "Length"),
    ("F1-F3", "Presets"),
    ("PgUp/PgDn", "Scroll"),
    ("Esc", "Quit"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(hint_spans()))
        .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn hint_spans() -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in HINTS {
        spans.push(key_hint(key));
        spans.push(Span::styled(
            format!("{} ", action),
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        ));
    }
    spans
}

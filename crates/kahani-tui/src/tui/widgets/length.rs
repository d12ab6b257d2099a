// Length control widget: slider over [50, 500] plus the three presets.
//
// The preset equal to the current value is highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use kahani_core::session::{LengthPreset, MaxLength};

use crate::tui::ViewState;
use super::key_hint;

pub const LABEL: &str = "زیادہ سے زیادہ لمبائی";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let max_length = state.session.max_length;
    let active = state.session.active_preset();

    let mut spans = preset_spans(active);
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let inner_width = area.width.saturating_sub(2) as usize;
    let slider_width = inner_width.saturating_sub(used + 2);
    if slider_width >= 3 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            slider_bar(max_length, slider_width),
            Style::default().fg(Color::Cyan),
        ));
    }

    let title = Line::from(vec![
        Span::raw(format!(" {}: ", LABEL)),
        Span::styled(
            format!("{} ", max_length),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// `[F1] مختصر (150) [F2] درمیانی (300) [F3] طویل (450)`
fn preset_spans(active: Option<LengthPreset>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, preset) in LengthPreset::ALL.into_iter().enumerate() {
        let style = if active == Some(preset) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(key_hint(&format!("F{}", i + 1)));
        spans.push(Span::styled(
            format!(" {} ({}) ", preset.label(), preset.max_length()),
            style,
        ));
    }
    spans
}

/// Horizontal slider `━━━━●────` of exactly `width` cells.
pub fn slider_bar(value: MaxLength, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let span = (MaxLength::MAX - MaxLength::MIN) as usize;
    let offset = (value.get() - MaxLength::MIN) as usize;
    let knob = offset * (width - 1) / span;

    let mut bar = String::with_capacity(width * 3);
    bar.push_str(&"━".repeat(knob));
    bar.push('●');
    bar.push_str(&"─".repeat(width - 1 - knob));
    bar
}

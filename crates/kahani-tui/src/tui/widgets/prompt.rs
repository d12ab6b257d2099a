// Prompt editor widget.
//
// Urdu is right-to-left, so the text is right-aligned. The trailing block
// cursor marks where typed characters land.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

pub const PLACEHOLDER: &str = "کہانی شروع کرنے کے لیے ایک جملہ لکھیں...";
const CURSOR: &str = "▌";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let text = prompt_text(&state.session.input_text);

    // Keep the last line in view once the prompt outgrows the box.
    let inner_height = area.height.saturating_sub(2) as usize;
    let line_count = text.lines.len();
    let scroll = line_count.saturating_sub(inner_height) as u16;

    let border = if state.session.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(
                    " کہانی کا آغاز ",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .alignment(Alignment::Right)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// One line per prompt line, cursor on the last one. An empty prompt shows
/// the dimmed placeholder.
fn prompt_text(input: &str) -> Text<'static> {
    if input.is_empty() {
        return Text::from(Line::from(vec![
            Span::styled(CURSOR, Style::default().fg(Color::Cyan)),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ]));
    }

    let mut lines: Vec<Line<'static>> = input
        .split('\n')
        .map(|line| Line::from(line.to_string()))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.push_span(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }
    Text::from(lines)
}

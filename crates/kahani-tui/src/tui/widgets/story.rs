// Story widget: the revealed words, right-aligned.
//
// While the reveal runs the pane follows the newest words and shows a
// cursor; afterwards PageUp/PageDown scroll it. Before any story exists a
// dimmed placeholder is shown instead.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use kahani_core::session::SessionState;

use crate::tui::ViewState;

pub const PLACEHOLDER: &str = "یہاں آپ کی کہانی ظاہر ہوگی...";
const CURSOR: &str = "▌";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let session = &state.session;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(session))
        .title(Span::styled(
            " کہانی ",
            Style::default().add_modifier(Modifier::BOLD),
        ));

    if show_placeholder(session) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let paragraph = Paragraph::new(story_line(session))
        .alignment(Alignment::Right)
        .wrap(Wrap { trim: true });
    let inner_height = area.height.saturating_sub(2);
    let max_scroll = wrapped_height(&paragraph, area.width.saturating_sub(2))
        .saturating_sub(inner_height);
    let scroll = if session.is_streaming {
        max_scroll
    } else {
        state.story_scroll.min(max_scroll)
    };

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

/// Placeholder only for an untouched pane: no words, no reveal, no error.
pub fn show_placeholder(session: &SessionState) -> bool {
    session.output_words.is_empty() && !session.is_streaming && session.error.is_none()
}

fn story_line(session: &SessionState) -> Line<'static> {
    let mut spans = vec![Span::raw(session.story_text())];
    if session.is_streaming {
        spans.push(Span::styled(
            format!(" {}", CURSOR),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

/// Rows the unbordered paragraph wraps to at `width` cells.
fn wrapped_height(paragraph: &Paragraph, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    paragraph.line_count(width).min(u16::MAX as usize) as u16
}

fn border_style(session: &SessionState) -> Style {
    if session.is_streaming {
        Style::default().fg(Color::Yellow)
    } else if session.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// TUI widget modules, one per screen zone.

pub mod actions;
pub mod help_bar;
pub mod length;
pub mod prompt;
pub mod quit_confirm;
pub mod status_bar;
pub mod story;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Bracketed key hint, e.g. `[Ctrl+G]`.
pub fn key_hint(key: &str) -> Span<'static> {
    Span::styled(
        format!("[{}]", key),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

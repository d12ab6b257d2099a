// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones, top to bottom:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Prompt (5 rows)                                   |
// +--------------------------------------------------+
// | Length slider + presets (3 rows)                  |
// +--------------------------------------------------+
// | Actions / message (2 rows)                        |
// +--------------------------------------------------+
// | Story (fill)                                      |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Title, phase and backend status.
    pub status_bar: Rect,
    /// Prompt editor.
    pub prompt: Rect,
    /// Max length slider and preset chips.
    pub length: Rect,
    /// Generate / copy labels and the error line.
    pub actions: Rect,
    /// Revealed story text.
    pub story: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(5), // prompt
            Constraint::Length(3), // length
            Constraint::Length(2), // actions
            Constraint::Min(3),    // story
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        prompt: vertical[1],
        length: vertical[2],
        actions: vertical[3],
        story: vertical[4],
        help_bar: vertical[5],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    fn all_rects(layout: &AppLayout) -> [(&'static str, Rect); 6] {
        [
            ("status_bar", layout.status_bar),
            ("prompt", layout.prompt),
            ("length", layout.length),
            ("actions", layout.actions),
            ("story", layout.story),
            ("help_bar", layout.help_bar),
        ]
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        for (name, rect) in all_rects(&layout) {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_rows() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.prompt.height, 5);
        assert_eq!(layout.length.height, 3);
        assert_eq!(layout.actions.height, 2);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn layout_story_takes_remaining_space() {
        let layout = build_layout(test_area());
        assert_eq!(layout.story.height, 40 - 1 - 5 - 3 - 2 - 1);
        assert_eq!(layout.story.width, 100);
    }

    #[test]
    fn layout_zones_stack_in_order() {
        let layout = build_layout(test_area());
        let rects = all_rects(&layout);
        for pair in rects.windows(2) {
            let (upper, lower) = (pair[0], pair[1]);
            assert_eq!(
                upper.1.y + upper.1.height,
                lower.1.y,
                "{} should sit directly above {}",
                upper.0,
                lower.0
            );
        }
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let area = Rect::new(0, 0, 40, 16);
        let layout = build_layout(area);
        for (name, rect) in all_rects(&layout) {
            assert!(
                rect.y + rect.height <= area.height,
                "{} exceeds area: {:?}",
                name,
                rect
            );
        }
        assert!(layout.help_bar.height > 0);
    }
}

// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// orchestrator, or into local ViewState mutations (quit dialog, story
// scroll). Prompt editing is forwarded as `UserCommand::Edit` because the
// prompt lives in the session.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use kahani_core::protocol::{InputEdit, UserCommand};
use kahani_core::session::{LengthPreset, MaxLength};

use super::ViewState;

/// Lines moved per PageUp / PageDown in the story pane.
const PAGE_SIZE: u16 = 5;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator. Returns `None` when it was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits immediately regardless of mode
    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if ctrl {
        return handle_control_key(key_event.code);
    }

    match key_event.code {
        KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }

        KeyCode::F(1) => Some(UserCommand::Preset(LengthPreset::Short)),
        KeyCode::F(2) => Some(UserCommand::Preset(LengthPreset::Medium)),
        KeyCode::F(3) => Some(UserCommand::Preset(LengthPreset::Long)),
        KeyCode::Home => Some(UserCommand::SetLength(MaxLength::MIN.into())),
        KeyCode::End => Some(UserCommand::SetLength(MaxLength::MAX.into())),

        KeyCode::PageUp => {
            view_state.story_scroll = view_state.story_scroll.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.story_scroll = view_state.story_scroll.saturating_add(PAGE_SIZE);
            None
        }

        KeyCode::Enter => Some(UserCommand::Edit(InputEdit::Newline)),
        KeyCode::Backspace => Some(UserCommand::Edit(InputEdit::Backspace)),
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::ALT) => {
            Some(UserCommand::Edit(InputEdit::Insert(c)))
        }

        _ => None,
    }
}

/// Pasted text goes into the prompt unless the quit dialog is open.
pub fn handle_paste(text: String, view_state: &ViewState) -> Option<UserCommand> {
    if view_state.confirm_quit || text.is_empty() {
        return None;
    }
    Some(UserCommand::Edit(InputEdit::Paste(text)))
}

/// Ctrl+Enter only arrives when the terminal accepted the keyboard
/// enhancement flags pushed in `tui::run`; Ctrl+G always works.
fn handle_control_key(code: KeyCode) -> Option<UserCommand> {
    match code {
        KeyCode::Enter | KeyCode::Char('g') => Some(UserCommand::Generate),
        KeyCode::Char('u') => Some(UserCommand::Edit(InputEdit::Replace(String::new()))),
        KeyCode::Char('l') => Some(UserCommand::Clear),
        KeyCode::Char('y') => Some(UserCommand::Copy),
        KeyCode::Left => Some(UserCommand::AdjustLength(-MaxLength::STEP)),
        KeyCode::Right => Some(UserCommand::AdjustLength(MaxLength::STEP)),
        _ => None,
    }
}

/// While the dialog is open only y/q confirm and n/Esc cancel.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest session snapshot plus a few
// purely local fields (quit dialog, story scroll). The orchestrator pushes
// `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use kahani_core::protocol::{BackendStatus, UiUpdate, UserCommand};
use kahani_core::session::SessionState;

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state used for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Latest session snapshot from the orchestrator.
    pub session: SessionState,
    /// Result of the startup health probe.
    pub backend: BackendStatus,
    /// Configuration warning to show in the status bar.
    pub config_warning: Option<String>,
    /// Whether the quit confirmation dialog is open.
    pub confirm_quit: bool,
    /// Lines scrolled in the story pane. Ignored while streaming, when the
    /// pane follows the newest words.
    pub story_scroll: u16,
}

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Session(session) => {
            // A new story starts at the top.
            if session.output_words.is_empty() {
                state.story_scroll = 0;
            }
            state.session = *session;
        }
        UiUpdate::Backend(status) => {
            state.backend = status;
        }
        UiUpdate::ConfigWarning(message) => {
            state.config_warning = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::prompt::render(frame, layout.prompt, state);
    widgets::length::render(frame, layout.length, state);
    widgets::actions::render(frame, layout.actions, state);
    widgets::story::render(frame, layout.story, state);
    widgets::help_bar::render(frame, layout.help_bar);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen, bracketed paste,
///    keyboard enhancement where supported so Ctrl+Enter is reported).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, terminal input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    if let Err(e) = execute!(stdout(), EnableBracketedPaste) {
        warn!("Bracketed paste unavailable: {}", e);
    }
    let keyboard_enhanced = push_keyboard_enhancement();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        debug!("UI channel closed");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                let command = match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        input::handle_key(key_event, &mut view_state)
                    }
                    Some(Ok(Event::Paste(text))) => input::handle_paste(text, &view_state),
                    Some(Ok(_)) => None,
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                };

                if let Some(cmd) = command {
                    let quit = cmd == UserCommand::Quit;
                    if cmd_tx.send(cmd).await.is_err() {
                        debug!("Command channel closed");
                        break Ok(());
                    }
                    if quit {
                        break Ok(());
                    }
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    if keyboard_enhanced {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}

/// Ask the terminal to report modified keys such as Ctrl+Enter. Returns
/// whether the flags were pushed and must be popped on exit.
fn push_keyboard_enhancement() -> bool {
    match crossterm::terminal::supports_keyboard_enhancement() {
        Ok(true) => {
            let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
            match execute!(stdout(), PushKeyboardEnhancementFlags(flags)) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Keyboard enhancement unavailable: {}", e);
                    false
                }
            }
        }
        _ => {
            debug!("Terminal does not support keyboard enhancement; Ctrl+Enter unavailable");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn session_with_story(words: &[&str]) -> SessionState {
        SessionState {
            input_text: "ایک دن".into(),
            output_words: words.iter().map(|w| w.to_string()).collect(),
            ..SessionState::default()
        }
    }

    /// Flatten the rendered buffer into one string.
    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.session, SessionState::default());
        assert_eq!(state.backend, BackendStatus::Unknown);
        assert!(state.config_warning.is_none());
        assert!(!state.confirm_quit);
        assert_eq!(state.story_scroll, 0);
    }

    #[test]
    fn apply_ui_update_session_replaces_snapshot() {
        let mut state = ViewState::default();
        let session = session_with_story(&["ایک", "دن"]);
        apply_ui_update(&mut state, UiUpdate::Session(Box::new(session.clone())));
        assert_eq!(state.session, session);
    }

    #[test]
    fn apply_ui_update_empty_story_resets_scroll() {
        let mut state = ViewState::default();
        state.story_scroll = 7;
        apply_ui_update(
            &mut state,
            UiUpdate::Session(Box::new(session_with_story(&["a"]))),
        );
        assert_eq!(state.story_scroll, 7);

        apply_ui_update(&mut state, UiUpdate::Session(Box::default()));
        assert_eq!(state.story_scroll, 0);
    }

    #[test]
    fn apply_ui_update_backend_and_warning() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Backend(BackendStatus::Reachable));
        apply_ui_update(&mut state, UiUpdate::ConfigWarning("no url".into()));
        assert_eq!(state.backend, BackendStatus::Reachable);
        assert_eq!(state.config_warning.as_deref(), Some("no url"));
    }

    #[test]
    fn render_frame_does_not_panic_with_defaults() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let state = ViewState::default();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }

    #[test]
    fn render_frame_shows_story_words() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let state = ViewState {
            session: session_with_story(&["story", "words"]),
            ..ViewState::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("words"));
    }

    #[test]
    fn render_frame_with_quit_dialog() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let state = ViewState {
            confirm_quit: true,
            ..ViewState::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Quit?"));
    }

    #[test]
    fn render_frame_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        let state = ViewState {
            session: session_with_story(&["a", "b", "c"]),
            confirm_quit: true,
            ..ViewState::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}

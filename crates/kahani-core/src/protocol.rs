// Message types passed between the TUI, the orchestrator loop and the
// background request / reveal tasks.

use crate::client::RequestError;
use crate::session::{LengthPreset, SessionState};

// ---------------------------------------------------------------------------
// TUI -> orchestrator
// ---------------------------------------------------------------------------

/// A single change to the prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Paste(String),
    Newline,
    Backspace,
    Replace(String),
}

/// Commands sent from the TUI to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Edit(InputEdit),
    Generate,
    Clear,
    Copy,
    /// Move the length slider by this many units.
    AdjustLength(i32),
    SetLength(i64),
    Preset(LengthPreset),
    Quit,
}

// ---------------------------------------------------------------------------
// Orchestrator -> TUI
// ---------------------------------------------------------------------------

/// Reachability of the generation backend, as seen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
    Unconfigured,
}

/// Updates pushed from the orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full copy of the session after a mutation.
    Session(Box<SessionState>),
    Backend(BackendStatus),
    /// Non-fatal configuration problem found at startup.
    ConfigWarning(String),
}

// ---------------------------------------------------------------------------
// Background tasks -> orchestrator
// ---------------------------------------------------------------------------

/// Outcome of one generation request, tagged with the request id it was
/// spawned under so stale outcomes can be discarded.
#[derive(Debug)]
pub enum GenerationEvent {
    Completed { text: String, request: u64 },
    Failed { error: RequestError, request: u64 },
}

impl GenerationEvent {
    pub fn request(&self) -> u64 {
        match self {
            GenerationEvent::Completed { request, .. } => *request,
            GenerationEvent::Failed { request, .. } => *request,
        }
    }
}

/// Ticks emitted by a running reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    Word { word: String, reveal: u64 },
    Finished { reveal: u64 },
}

impl RevealEvent {
    pub fn reveal(&self) -> u64 {
        match self {
            RevealEvent::Word { reveal, .. } => *reveal,
            RevealEvent::Finished { reveal } => *reveal,
        }
    }
}

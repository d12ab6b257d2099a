// Write-only clipboard access.
//
// The copy action talks to a `Clipboard` trait object so tests can record
// what was copied. `SystemClipboard` is the real implementation on arboard.
// Writes may block (arboard's Linux `wait()`), so callers run them off the
// async runtime; see `copy::CopyAction`.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

pub trait Clipboard: Send + Sync {
    /// May block until the write is complete.
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

// ---------------------------------------------------------------------------
// SystemClipboard
// ---------------------------------------------------------------------------

/// Native clipboard (X11/Wayland, macOS, Windows).
///
/// A fresh `arboard::Clipboard` is opened per write. On Linux the write
/// keeps serving the selection until another program takes it over, which
/// can take indefinitely long.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| {
            debug!("Clipboard unavailable: {}", e);
            ClipboardError::Unavailable(e.to_string())
        })?;

        #[cfg(target_os = "linux")]
        let result = {
            use arboard::SetExtLinux;
            clipboard.set().wait().text(text)
        };
        #[cfg(not(target_os = "linux"))]
        let result = clipboard.set_text(text);

        result.map_err(|e| {
            warn!("Clipboard copy failed: {}", e);
            ClipboardError::Write(e.to_string())
        })
    }
}

// ---------------------------------------------------------------------------
// MemoryClipboard
// ---------------------------------------------------------------------------

/// Keeps every copied string; clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    history: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.history().pop()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.history
            .lock()
            .map_err(|e| ClipboardError::Write(e.to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

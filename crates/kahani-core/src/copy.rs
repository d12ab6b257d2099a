// Copy action: puts the revealed story on the clipboard and shows a short
// acknowledgement.
//
// The acknowledgement is a deadline rather than a timer task; the
// orchestrator sleeps until `deadline()` and then calls `expire`. Copying
// again simply moves the deadline.
//
// The clipboard write itself runs on a detached thread. It may never
// return (X11 selections are served until someone else takes them), and a
// blocking-pool task would hold up runtime shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::session::SessionState;

/// Default lifetime of the copy acknowledgement.
pub const COPY_ACK: Duration = Duration::from_millis(2000);

pub struct CopyAction {
    clipboard: Arc<dyn Clipboard>,
    ack: Duration,
    deadline: Option<Instant>,
}

impl CopyAction {
    pub fn new(clipboard: Arc<dyn Clipboard>, ack: Duration) -> Self {
        CopyAction {
            clipboard,
            ack,
            deadline: None,
        }
    }

    /// When the acknowledgement should clear, if one is showing.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Copy the revealed words joined by single spaces. Does nothing while
    /// there is no output. Returns whether the session changed.
    ///
    /// The acknowledgement is shown as soon as the write is handed off;
    /// write failures are only logged.
    pub fn copy(&mut self, session: &mut SessionState) -> bool {
        if session.output_words.is_empty() {
            debug!("Copy requested with no story text, ignoring");
            return false;
        }

        let text = session.story_text();
        let clipboard = Arc::clone(&self.clipboard);
        let spawned = std::thread::Builder::new()
            .name("clipboard-write".into())
            .spawn(move || {
                if let Err(e) = clipboard.set_text(&text) {
                    warn!("Copy to clipboard failed: {}", e);
                }
            });
        if let Err(e) = spawned {
            warn!("Failed to start clipboard writer: {}", e);
        }

        session.copied = true;
        self.deadline = Some(Instant::now() + self.ack);
        info!("Copied {} words to clipboard", session.output_words.len());
        true
    }

    /// Clear the acknowledgement once its deadline has passed. Returns
    /// whether the session changed.
    pub fn expire(&mut self, session: &mut SessionState) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                session.copied = false;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

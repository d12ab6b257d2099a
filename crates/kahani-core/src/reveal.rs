// Reveal scheduler: presents a fully-received story one word per tick.
//
// The pacing loop only knows about a token list and an interval, so any
// source of text (a finished HTTP response today) can feed it. Each running
// reveal is a ticker task owned by the scheduler; cancelling aborts the task
// and retires its id so events already sitting in the channel are ignored.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::protocol::RevealEvent;
use crate::session::SessionState;

/// Default delay between two revealed words.
pub const WORD_INTERVAL: Duration = Duration::from_millis(50);

/// Split text into non-empty whitespace-delimited words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Emit `words` over `tx`, one per `interval`, followed by `Finished` one
/// interval after the last word.
///
/// The first word goes out one full interval after the call. Returns early
/// if the receiver is dropped.
pub async fn pace_words(
    words: Vec<String>,
    interval: Duration,
    tx: mpsc::Sender<RevealEvent>,
    reveal: u64,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    for word in words {
        ticker.tick().await;
        if tx.send(RevealEvent::Word { word, reveal }).await.is_err() {
            return;
        }
    }

    ticker.tick().await;
    let _ = tx.send(RevealEvent::Finished { reveal }).await;
}

// ---------------------------------------------------------------------------
// RevealScheduler
// ---------------------------------------------------------------------------

/// Owns at most one running reveal.
pub struct RevealScheduler {
    interval: Duration,
    tx: mpsc::Sender<RevealEvent>,
    /// Id of the reveal whose events are currently accepted.
    active: Option<u64>,
    task: Option<JoinHandle<()>>,
}

impl RevealScheduler {
    pub fn new(interval: Duration, tx: mpsc::Sender<RevealEvent>) -> Self {
        RevealScheduler {
            interval,
            tx,
            active: None,
            task: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start revealing `full_text` under the given id, replacing any reveal
    /// already running. Returns the number of words that will be emitted.
    pub fn start(&mut self, session: &mut SessionState, full_text: &str, reveal: u64) -> usize {
        self.cancel(session);

        let words = tokenize(full_text);
        let count = words.len();

        session.begin_reveal();
        self.active = Some(reveal);
        self.task = Some(tokio::spawn(pace_words(
            words,
            self.interval,
            self.tx.clone(),
            reveal,
        )));

        info!("Started reveal {} ({} words)", reveal, count);
        count
    }

    /// Stop the running reveal, if any. Words already revealed stay in the
    /// session. Returns `true` if a reveal was running.
    pub fn cancel(&mut self, session: &mut SessionState) -> bool {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
        match self.active.take() {
            Some(reveal) => {
                session.end_reveal();
                info!("Cancelled reveal {}", reveal);
                true
            }
            None => false,
        }
    }

    /// Apply a tick to the session. Events from a cancelled or replaced
    /// reveal are dropped; returns whether the session changed.
    pub fn apply(&mut self, session: &mut SessionState, event: RevealEvent) -> bool {
        if self.active != Some(event.reveal()) {
            debug!(
                "Discarding stale reveal event (event: {}, active: {:?})",
                event.reveal(),
                self.active
            );
            return false;
        }

        match event {
            RevealEvent::Word { word, .. } => {
                session.push_word(word);
            }
            RevealEvent::Finished { reveal } => {
                session.end_reveal();
                self.active = None;
                self.task = None;
                info!(
                    "Reveal {} complete ({} words)",
                    reveal,
                    session.output_words.len()
                );
            }
        }
        true
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

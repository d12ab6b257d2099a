// Request controller: validates the prompt, runs one generation request at a
// time and routes its outcome into the session.
//
// Every request is stamped with a monotonically increasing id. A newer
// submit or a Clear aborts the running request and bumps the id, so any
// outcome that still arrives for an older id is a stale response and is
// dropped without touching the session.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{RequestError, StoryClient};
use crate::protocol::GenerationEvent;
use crate::reveal::RevealScheduler;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Empty or whitespace-only prompt. No request was made.
    #[error("prompt is empty")]
    EmptyPrompt,
}

/// What `resolve` did with a generation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Story received; a reveal of this many words has started.
    Revealing { words: usize },
    /// The request failed; the session carries the failure message.
    Failed,
    /// Outcome of a superseded request; ignored.
    Stale,
}

pub struct RequestController {
    client: Arc<StoryClient>,
    tx: mpsc::Sender<GenerationEvent>,
    /// Id of the newest request. Outcomes tagged with any other id are stale.
    ///
    /// u64 overflow is not a practical concern.
    request_id: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl RequestController {
    pub fn new(client: Arc<StoryClient>, tx: mpsc::Sender<GenerationEvent>) -> Self {
        RequestController {
            client,
            tx,
            request_id: 0,
            in_flight: None,
        }
    }

    pub fn current_request(&self) -> u64 {
        self.request_id
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate the session's prompt and start a request for it.
    ///
    /// On an empty prompt only `session.error` changes. Otherwise any running
    /// request and reveal are replaced, the previous attempt is reset and the
    /// session enters GENERATING. Returns the new request id.
    pub fn submit(
        &mut self,
        session: &mut SessionState,
        scheduler: &mut RevealScheduler,
    ) -> Result<u64, SubmitError> {
        if !session.has_prompt() {
            session.reject_prompt();
            info!("Rejected empty prompt");
            return Err(SubmitError::EmptyPrompt);
        }

        self.abort_in_flight();
        scheduler.cancel(session);

        self.request_id += 1;
        let request = self.request_id;
        session.begin_generation();

        let client = Arc::clone(&self.client);
        let prefix = session.input_text.clone();
        let max_length = session.max_length;
        let call = async move { client.generate(&prefix, max_length).await };

        self.in_flight = Some(tokio::spawn(run_request(call, self.tx.clone(), request)));

        info!(
            "Submitted generation request {} (max_length: {})",
            request, max_length
        );
        Ok(request)
    }

    /// Apply a request outcome to the session.
    ///
    /// For the current request, `is_generating` is cleared before anything
    /// else happens; success hands the story to the scheduler and failure
    /// sets the fixed failure message.
    pub fn resolve(
        &mut self,
        session: &mut SessionState,
        scheduler: &mut RevealScheduler,
        event: GenerationEvent,
    ) -> Resolution {
        if event.request() != self.request_id {
            debug!(
                "Discarding stale generation outcome (event: {}, current: {})",
                event.request(),
                self.request_id
            );
            return Resolution::Stale;
        }

        self.in_flight = None;
        session.end_generation();

        match event {
            GenerationEvent::Completed { text, request } => {
                let words = scheduler.start(session, &text, request);
                Resolution::Revealing { words }
            }
            GenerationEvent::Failed { error, request } => {
                warn!("Story generation {} failed: {}", request, error);
                session.fail_generation(error.user_message());
                Resolution::Failed
            }
        }
    }

    /// Abandon the running request, if any. Its outcome, should it still
    /// arrive, is treated as stale.
    pub fn cancel(&mut self) {
        if self.abort_in_flight() {
            info!("Cancelled generation request {}", self.request_id);
        }
        self.request_id += 1;
    }

    fn abort_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

/// Body of the request task. Always reports exactly one outcome, including
/// when `call` panics, unless the task itself is aborted.
async fn run_request<F>(call: F, tx: mpsc::Sender<GenerationEvent>, request: u64)
where
    F: Future<Output = Result<String, RequestError>>,
{
    let outcome = AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(RequestError::TaskFailed("request task panicked".into())));

    let event = match outcome {
        Ok(text) => GenerationEvent::Completed { text, request },
        Err(error) => GenerationEvent::Failed { error, request },
    };

    if tx.send(event).await.is_err() {
        debug!("Generation outcome {} dropped: receiver closed", request);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

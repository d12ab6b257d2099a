// Application state and orchestration logic.
//
// The central event loop that owns the session and coordinates user
// commands from the TUI, generation outcomes from the request task, word
// ticks from the reveal task and the copy acknowledgement deadline. Every
// change to the session is pushed to the TUI as a full snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::StoryClient;
use crate::clipboard::Clipboard;
use crate::config::{Config, ConfigWarning};
use crate::controller::{RequestController, Resolution};
use crate::copy::CopyAction;
use crate::protocol::{BackendStatus, GenerationEvent, RevealEvent, UiUpdate, UserCommand};
use crate::reveal::RevealScheduler;
use crate::session::SessionState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on the startup health probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the event loop owns.
pub struct AppState {
    pub session: SessionState,
    pub controller: RequestController,
    pub scheduler: RevealScheduler,
    pub copy: CopyAction,
    /// Shared with the request tasks and the health probe.
    pub client: Arc<StoryClient>,
    /// Soft configuration problems, reported once when the loop starts.
    pub warnings: Vec<ConfigWarning>,
}

impl AppState {
    /// Build the state from a resolved config.
    ///
    /// `gen_tx` and `reveal_tx` are the sending halves of the channels whose
    /// receivers are later passed to `run`.
    pub fn new(
        config: &Config,
        client: StoryClient,
        clipboard: Arc<dyn Clipboard>,
        gen_tx: mpsc::Sender<GenerationEvent>,
        reveal_tx: mpsc::Sender<RevealEvent>,
    ) -> Self {
        let client = Arc::new(client);
        AppState {
            session: SessionState::new(config.default_max_length()),
            controller: RequestController::new(Arc::clone(&client), gen_tx),
            scheduler: RevealScheduler::new(config.reveal.word_interval(), reveal_tx),
            copy: CopyAction::new(clipboard, config.reveal.copy_ack()),
            client,
            warnings: config.warnings(),
        }
    }

    pub fn snapshot(&self) -> UiUpdate {
        UiUpdate::Session(Box::new(self.session.clone()))
    }

    /// Clear action: abandon the request and the reveal, then reset the
    /// session.
    pub fn clear(&mut self) {
        self.controller.cancel();
        self.scheduler.cancel(&mut self.session);
        self.session.clear();
        info!("Session cleared");
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on three channels plus the copy deadline using `tokio::select!`.
/// Returns on `UserCommand::Quit` or when the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut gen_rx: mpsc::Receiver<GenerationEvent>,
    mut reveal_rx: mpsc::Receiver<RevealEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    for warning in &state.warnings {
        warn!("Config warning: {}", warning);
        let _ = ui_tx.send(UiUpdate::ConfigWarning(warning.to_string())).await;
    }
    let _ = ui_tx.send(state.snapshot()).await;
    spawn_health_probe(Arc::clone(&state.client), ui_tx.clone());

    // Both senders live in `state`, so these only close if a task leaks its
    // sender past shutdown. Stop polling them rather than spin.
    let mut gen_open = true;
    let mut reveal_open = true;

    loop {
        let copy_deadline = state.copy.deadline();

        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if handle_user_command(&mut state, cmd) {
                            let _ = ui_tx.send(state.snapshot()).await;
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Generation outcomes ---
            event = gen_rx.recv(), if gen_open => {
                match event {
                    Some(event) => {
                        if handle_generation_event(&mut state, event) {
                            let _ = ui_tx.send(state.snapshot()).await;
                        }
                    }
                    None => {
                        info!("Generation channel closed");
                        gen_open = false;
                    }
                }
            }

            // --- Reveal ticks ---
            event = reveal_rx.recv(), if reveal_open => {
                match event {
                    Some(event) => {
                        if state.scheduler.apply(&mut state.session, event) {
                            let _ = ui_tx.send(state.snapshot()).await;
                        }
                    }
                    None => {
                        info!("Reveal channel closed");
                        reveal_open = false;
                    }
                }
            }

            // --- Copy acknowledgement expiry ---
            _ = tokio::time::sleep_until(copy_deadline.unwrap_or_else(Instant::now)),
                if copy_deadline.is_some() =>
            {
                if state.copy.expire(&mut state.session) {
                    debug!("Copy acknowledgement expired");
                    let _ = ui_tx.send(state.snapshot()).await;
                }
            }
        }
    }

    // Cleanup
    state.controller.cancel();
    state.scheduler.cancel(&mut state.session);
    info!("Application event loop exiting");
    Ok(())
}

/// Apply a user command. Returns whether the session changed.
fn handle_user_command(state: &mut AppState, cmd: UserCommand) -> bool {
    match cmd {
        UserCommand::Edit(edit) => {
            state.session.apply_edit(edit);
            true
        }
        UserCommand::Generate => {
            // A rejected prompt still changes the session (its error).
            let _ = state
                .controller
                .submit(&mut state.session, &mut state.scheduler);
            true
        }
        UserCommand::Clear => {
            state.clear();
            true
        }
        UserCommand::Copy => state.copy.copy(&mut state.session),
        UserCommand::AdjustLength(delta) => {
            state.session.adjust_max_length(delta);
            debug!("Length adjusted to {}", state.session.max_length);
            true
        }
        UserCommand::SetLength(value) => {
            state.session.set_max_length(value);
            debug!("Length set to {}", state.session.max_length);
            true
        }
        UserCommand::Preset(preset) => {
            state.session.apply_preset(preset);
            info!("Preset {:?} selected ({})", preset, state.session.max_length);
            true
        }
        UserCommand::Quit => {
            // Handled in the main loop
            false
        }
    }
}

fn handle_generation_event(state: &mut AppState, event: GenerationEvent) -> bool {
    match state
        .controller
        .resolve(&mut state.session, &mut state.scheduler, event)
    {
        Resolution::Revealing { words } => {
            info!("Story received, revealing {} words", words);
            true
        }
        Resolution::Failed => true,
        Resolution::Stale => false,
    }
}

// ---------------------------------------------------------------------------
// Health probe
// ---------------------------------------------------------------------------

/// Check the backend once. Never fails; problems become `Unreachable`.
pub async fn probe_backend(client: &StoryClient) -> BackendStatus {
    if matches!(client, StoryClient::Unconfigured) {
        return BackendStatus::Unconfigured;
    }

    match tokio::time::timeout(HEALTH_TIMEOUT, client.health()).await {
        Ok(Ok(())) => {
            info!("Backend health check passed");
            BackendStatus::Reachable
        }
        Ok(Err(e)) => {
            warn!("Backend health check failed: {}", e);
            BackendStatus::Unreachable
        }
        Err(_) => {
            warn!("Backend health check timed out after {:?}", HEALTH_TIMEOUT);
            BackendStatus::Unreachable
        }
    }
}

fn spawn_health_probe(client: Arc<StoryClient>, ui_tx: mpsc::Sender<UiUpdate>) {
    tokio::spawn(async move {
        let status = probe_backend(&client).await;
        let _ = ui_tx.send(UiUpdate::Backend(status)).await;
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

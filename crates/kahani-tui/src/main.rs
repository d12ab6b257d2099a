// Kahani entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the story client and the clipboard
// 4. Create mpsc channels
// 5. Spawn the app event loop
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use kahani_core::app::{self, AppState};
use kahani_core::client::StoryClient;
use kahani_core::clipboard::SystemClipboard;
use kahani_core::config;
use kahani_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Kahani starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: default length {}, word interval {:?}",
        config.default_max_length(),
        config.reveal.word_interval()
    );

    // 3. Story client
    let client = StoryClient::from_config(&config);
    match &client {
        StoryClient::Active(c) => info!("Story client targets {}", c.base_url()),
        StoryClient::Unconfigured => info!("Story client unconfigured (no base URL)"),
    }

    // 4. Channels
    let (gen_tx, gen_rx) = mpsc::channel(16);
    let (reveal_tx, reveal_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let state = AppState::new(
        &config,
        client,
        Arc::new(SystemClipboard),
        gen_tx,
        reveal_tx,
    );

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, gen_rx, reveal_rx, ui_tx, state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI (blocks until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {:#}", e);
    }

    // 7. Cleanup: wait for the app task to finish (with timeout)
    if tokio::time::timeout(Duration::from_secs(5), app_handle)
        .await
        .is_err()
    {
        error!("App task did not stop within 5s");
    }

    info!("Kahani shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir).context("failed to create logs directory")?;

    let log_file = std::fs::File::create(log_dir.join("kahani.log"))
        .context("failed to create log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kahani_core=info,kahani_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

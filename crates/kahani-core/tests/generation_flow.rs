// End-to-end tests for the generation flow.
//
// Each test runs the real event loop (`app::run`) against a wiremock backend
// and observes it only through the session snapshots it publishes.

use std::sync::Arc;
use std::time::Duration;

use kahani_core::app::{self, AppState};
use kahani_core::client::StoryClient;
use kahani_core::clipboard::{Clipboard, ClipboardError, MemoryClipboard};
use kahani_core::config::{ApiConfig, Config};
use kahani_core::protocol::{InputEdit, UiUpdate, UserCommand};
use kahani_core::session::{SessionState, FAILURE_MESSAGE, VALIDATION_MESSAGE};

use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===========================================================================
// Test helpers
// ===========================================================================

const WAIT: Duration = Duration::from_secs(5);

/// Records writes like `MemoryClipboard` but holds each one first, the way
/// an X11 selection write blocks until another program takes over.
struct StuckClipboard {
    inner: MemoryClipboard,
    hold: Duration,
}

impl Clipboard for StuckClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        std::thread::sleep(self.hold);
        self.inner.set_text(text)
    }
}

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    clipboard: MemoryClipboard,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(base_url: Option<String>) -> Self {
        let clipboard = MemoryClipboard::new();
        Self::start_with_clipboard(base_url, clipboard.clone(), Arc::new(clipboard))
    }

    /// `clipboard` is what the app writes to; `record` is where the writes
    /// end up.
    fn start_with_clipboard(
        base_url: Option<String>,
        record: MemoryClipboard,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let config = Config {
            api: ApiConfig { base_url },
            ..Config::default()
        };
        let (gen_tx, gen_rx) = mpsc::channel(8);
        let (reveal_tx, reveal_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (ui_tx, ui_rx) = mpsc::channel(1024);

        let state = AppState::new(
            &config,
            StoryClient::from_config(&config),
            clipboard,
            gen_tx,
            reveal_tx,
        );
        let handle = tokio::spawn(app::run(cmd_rx, gen_rx, reveal_rx, ui_tx, state));

        Harness {
            cmd_tx,
            ui_rx,
            clipboard: record,
            handle,
        }
    }

    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    async fn set_prompt(&self, text: &str) {
        self.send(UserCommand::Edit(InputEdit::Replace(text.into())))
            .await;
    }

    /// Collect snapshots until one satisfies `done`. Returns every snapshot
    /// seen, the matching one last.
    async fn wait_for(&mut self, done: impl Fn(&SessionState) -> bool) -> Vec<SessionState> {
        let mut seen = Vec::new();
        let result = tokio::time::timeout(WAIT, async {
            while let Some(update) = self.ui_rx.recv().await {
                if let UiUpdate::Session(session) = update {
                    let finished = done(&session);
                    seen.push(*session);
                    if finished {
                        return;
                    }
                }
            }
        })
        .await;
        assert!(result.is_ok(), "timed out; last snapshot: {:?}", seen.last());
        seen
    }

    /// Snapshots published during `window`.
    async fn collect_for(&mut self, window: Duration) -> Vec<SessionState> {
        let mut seen = Vec::new();
        let _ = tokio::time::timeout(window, async {
            while let Some(update) = self.ui_rx.recv().await {
                if let UiUpdate::Session(session) = update {
                    seen.push(*session);
                }
            }
        })
        .await;
        seen
    }

    /// Last clipboard write, waiting briefly for the writer thread.
    async fn clipboard_text(&self) -> Option<String> {
        for _ in 0..100 {
            if let Some(text) = self.clipboard.last() {
                return Some(text);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    async fn quit(self) {
        self.send(UserCommand::Quit).await;
        self.handle.await.unwrap().unwrap();
    }
}

fn story_done(s: &SessionState) -> bool {
    !s.output_words.is_empty() && !s.is_streaming && !s.is_generating
}

async fn mount_story(server: &MockServer, story: &str) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generated_text": story })))
        .mount(server)
        .await;
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[tokio::test]
async fn urdu_prompt_is_revealed_word_by_word() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_json(json!({
            "prefix": "ایک دن ایک بلی تھی",
            "max_length": 150
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "generated_text": "ایک دن ایک بلی جنگل میں گئی" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("ایک دن ایک بلی تھی").await;
    h.send(UserCommand::SetLength(150)).await;
    h.send(UserCommand::Generate).await;

    let seen = h.wait_for(story_done).await;
    let last = seen.last().unwrap();

    assert_eq!(
        last.output_words,
        vec!["ایک", "دن", "ایک", "بلی", "جنگل", "میں", "گئی"]
    );
    assert!(last.error.is_none());
    assert!(seen.iter().any(|s| s.is_generating));
    for s in &seen {
        assert!(!(s.is_generating && s.is_streaming), "phases overlapped: {s:?}");
        if s.is_streaming {
            assert!(!s.is_generating);
        }
    }

    // Words arrive one at a time, in order.
    let lengths: Vec<usize> = seen
        .iter()
        .filter(|s| s.is_streaming)
        .map(|s| s.output_words.len())
        .collect();
    assert!(lengths.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));

    h.quit().await;
}

#[tokio::test]
async fn server_error_shows_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("ایک دن").await;
    h.send(UserCommand::Generate).await;

    let seen = h.wait_for(|s| s.error.is_some()).await;
    let last = seen.last().unwrap();
    assert_eq!(last.error.as_deref(), Some(FAILURE_MESSAGE));
    assert!(last.output_words.is_empty());
    assert!(!last.is_generating);
    assert!(!last.is_streaming);

    h.quit().await;
}

#[tokio::test]
async fn blank_prompt_never_reaches_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = Harness::start(Some(server.uri()));
    for prompt in ["", "   "] {
        h.set_prompt(prompt).await;
        h.send(UserCommand::Generate).await;
        let seen = h.wait_for(|s| s.error.is_some()).await;
        let last = seen.last().unwrap();
        assert_eq!(last.error.as_deref(), Some(VALIDATION_MESSAGE));
        assert!(last.output_words.is_empty());
        assert!(!last.is_generating);
        h.send(UserCommand::Clear).await;
        h.wait_for(|s| s.error.is_none()).await;
    }

    h.quit().await;
    server.verify().await;
}

#[tokio::test]
async fn unconfigured_backend_fails_at_request_time() {
    let mut h = Harness::start(None);
    h.set_prompt("ایک دن").await;
    h.send(UserCommand::Generate).await;

    let seen = h.wait_for(|s| s.error.is_some()).await;
    assert_eq!(seen.last().unwrap().error.as_deref(), Some(FAILURE_MESSAGE));

    h.quit().await;
}

#[tokio::test]
async fn reveal_normalizes_whitespace() {
    let server = MockServer::start().await;
    mount_story(&server, "  ایک\n\nدن\tایک  ").await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("prompt").await;
    h.send(UserCommand::Generate).await;

    let seen = h.wait_for(story_done).await;
    let last = seen.last().unwrap();
    assert_eq!(last.output_words, vec!["ایک", "دن", "ایک"]);
    assert_eq!(last.story_text(), "ایک دن ایک");

    h.quit().await;
}

#[tokio::test]
async fn clear_mid_reveal_stops_emission() {
    let server = MockServer::start().await;
    let story = (1..=40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    mount_story(&server, &story).await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("prompt").await;
    h.send(UserCommand::Generate).await;
    h.wait_for(|s| s.is_streaming && s.output_words.len() >= 3)
        .await;

    h.send(UserCommand::Clear).await;
    let seen = h.wait_for(|s| s.input_text.is_empty()).await;
    let cleared = seen.last().unwrap();
    assert!(cleared.output_words.is_empty());
    assert!(cleared.error.is_none());
    assert!(!cleared.is_streaming);
    assert!(!cleared.is_generating);

    // Several tick intervals later nothing has been revealed.
    let after = h.collect_for(Duration::from_millis(300)).await;
    assert!(
        after.iter().all(|s| s.output_words.is_empty()),
        "words revealed after clear: {after:?}"
    );

    h.quit().await;
}

#[tokio::test]
async fn clear_during_request_discards_late_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "generated_text": "late story" }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("prompt").await;
    h.send(UserCommand::Generate).await;
    h.wait_for(|s| s.is_generating).await;
    h.send(UserCommand::Clear).await;
    h.wait_for(|s| !s.is_generating).await;

    let after = h.collect_for(Duration::from_millis(500)).await;
    assert!(after
        .iter()
        .all(|s| s.output_words.is_empty() && s.error.is_none() && !s.is_streaming));

    h.quit().await;
}

#[tokio::test]
async fn newer_submit_supersedes_slow_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_partial_json(json!({ "prefix": "first" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "generated_text": "old old old" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_partial_json(json!({ "prefix": "second" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "generated_text": "new story" })),
        )
        .mount(&server)
        .await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("first").await;
    h.send(UserCommand::Generate).await;
    h.set_prompt("second").await;
    h.send(UserCommand::Generate).await;

    let seen = h.wait_for(story_done).await;
    assert_eq!(seen.last().unwrap().output_words, vec!["new", "story"]);

    let after = h.collect_for(Duration::from_millis(500)).await;
    for s in seen.iter().chain(after.iter()) {
        assert!(!s.output_words.iter().any(|w| w == "old"), "stale words: {s:?}");
    }

    h.quit().await;
}

#[tokio::test]
async fn copy_puts_story_on_clipboard_and_acknowledges() {
    let server = MockServer::start().await;
    mount_story(&server, "ایک دن ایک بلی").await;

    let mut h = Harness::start(Some(server.uri()));
    h.set_prompt("prompt").await;
    h.send(UserCommand::Generate).await;
    h.wait_for(story_done).await;

    h.send(UserCommand::Copy).await;
    h.wait_for(|s| s.copied).await;
    assert_eq!(h.clipboard_text().await.as_deref(), Some("ایک دن ایک بلی"));

    let copied_at = tokio::time::Instant::now();
    h.wait_for(|s| !s.copied).await;
    let elapsed = copied_at.elapsed();
    assert!(elapsed <= Duration::from_millis(2100), "ack cleared after {elapsed:?}");
    assert!(elapsed >= Duration::from_millis(1900), "ack cleared after {elapsed:?}");

    h.quit().await;
}

#[tokio::test]
async fn slow_clipboard_write_does_not_stall_the_loop() {
    let server = MockServer::start().await;
    let story = (1..=200).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    mount_story(&server, &story).await;

    let record = MemoryClipboard::new();
    let clipboard = Arc::new(StuckClipboard {
        inner: record.clone(),
        hold: Duration::from_secs(3),
    });
    let mut h = Harness::start_with_clipboard(Some(server.uri()), record, clipboard);
    h.set_prompt("prompt").await;
    h.send(UserCommand::Generate).await;
    h.wait_for(|s| s.is_streaming && s.output_words.len() >= 3)
        .await;

    h.send(UserCommand::Copy).await;
    let sent = tokio::time::Instant::now();
    h.wait_for(|s| s.copied).await;

    h.send(UserCommand::Clear).await;
    h.wait_for(|s| s.input_text.is_empty() && s.output_words.is_empty())
        .await;
    let elapsed = sent.elapsed();
    assert!(
        elapsed < Duration::from_millis(500),
        "clear applied {elapsed:?} after copy"
    );

    h.quit().await;
}

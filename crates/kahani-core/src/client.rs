// HTTP client for the story generation backend.
//
// One JSON POST per story: `{ prefix, max_length }` in, a JSON object with
// the story text out. Every failure mode maps to a `RequestError`; the user
// only ever sees a single fixed message for all of them.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::session::{MaxLength, FAILURE_MESSAGE};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const GENERATE_PATH: &str = "generate";
const HEALTH_PATH: &str = "health";

/// Response fields that may carry the story, in lookup order.
pub const STORY_FIELDS: [&str; 3] = ["generated_text", "text", "generated_story"];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("generation endpoint is not configured")]
    Unconfigured,

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response did not contain any story text")]
    MissingText,

    #[error("request task failed: {0}")]
    TaskFailed(String),
}

impl RequestError {
    /// The message shown to the user. Identical for every variant; the
    /// variant itself only goes to the log.
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }
}

// ---------------------------------------------------------------------------
// HttpStoryClient
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prefix: &'a str,
    max_length: u16,
}

/// Low-level client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpStoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Request a story continuing `prefix`.
    pub async fn generate(
        &self,
        prefix: &str,
        max_length: MaxLength,
    ) -> Result<String, RequestError> {
        let body = GenerateRequest {
            prefix,
            max_length: max_length.get(),
        };

        let response = self
            .http
            .post(self.endpoint(GENERATE_PATH))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status));
        }

        let text = response.text().await?;
        debug!(bytes = text.len(), "generate response received");
        parse_story_text(&text)
    }

    /// Probe `GET /health`; any 2xx counts as healthy.
    pub async fn health(&self) -> Result<(), RequestError> {
        let response = self.http.get(self.endpoint(HEALTH_PATH)).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RequestError::Status(status))
        }
    }
}

// ---------------------------------------------------------------------------
// StoryClient wrapper
// ---------------------------------------------------------------------------

/// Either a client bound to a configured backend, or a placeholder that
/// fails every request because no base URL was supplied.
#[derive(Debug, Clone)]
pub enum StoryClient {
    Active(HttpStoryClient),
    Unconfigured,
}

impl StoryClient {
    /// Build a `StoryClient` from the resolved config.
    pub fn from_config(config: &Config) -> Self {
        match config.api.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => StoryClient::Active(HttpStoryClient::new(url.trim())),
            _ => StoryClient::Unconfigured,
        }
    }

    pub async fn generate(
        &self,
        prefix: &str,
        max_length: MaxLength,
    ) -> Result<String, RequestError> {
        match self {
            StoryClient::Active(client) => client.generate(prefix, max_length).await,
            StoryClient::Unconfigured => Err(RequestError::Unconfigured),
        }
    }

    pub async fn health(&self) -> Result<(), RequestError> {
        match self {
            StoryClient::Active(client) => client.health().await,
            StoryClient::Unconfigured => Err(RequestError::Unconfigured),
        }
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extract the story from a generate response body.
///
/// The first of `STORY_FIELDS` holding a non-blank string wins. A blank
/// story is treated the same as a missing one.
pub(crate) fn parse_story_text(body: &str) -> Result<String, RequestError> {
    let v: Value = serde_json::from_str(body).map_err(RequestError::Decode)?;
    STORY_FIELDS
        .iter()
        .filter_map(|field| v.get(field)?.as_str())
        .find(|text| !text.trim().is_empty())
        .map(str::to_owned)
        .ok_or(RequestError::MissingText)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

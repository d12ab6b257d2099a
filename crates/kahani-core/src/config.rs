// Configuration loading and validation (config/kahani.toml + environment).
//
// A missing file means all defaults, so the environment alone can configure
// the app. Hard problems (unreadable file, bad TOML, out-of-range values)
// are `ConfigError`s. A missing API base URL is only a `ConfigWarning`: the app
// still starts and every story request fails at request time.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::session::MaxLength;

/// Environment variable that overrides `[api] base_url`.
pub const BASE_URL_ENV: &str = "KAHANI_API_URL";

const CONFIG_FILE: &str = "kahani.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to seed {path} from defaults: {source}")]
    SeedError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Non-fatal problems surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("API base URL is not set ([api] base_url or KAHANI_API_URL); story requests will fail")]
    MissingBaseUrl,
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Backend root, e.g. `https://stories.example.com`. Empty means unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_length")]
    pub default_max_length: u16,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            default_max_length: default_max_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_word_interval_ms")]
    pub word_interval_ms: u64,
    #[serde(default = "default_copy_ack_ms")]
    pub copy_ack_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            word_interval_ms: default_word_interval_ms(),
            copy_ack_ms: default_copy_ack_ms(),
        }
    }
}

impl RevealConfig {
    pub fn word_interval(&self) -> Duration {
        Duration::from_millis(self.word_interval_ms)
    }

    pub fn copy_ack(&self) -> Duration {
        Duration::from_millis(self.copy_ack_ms)
    }
}

fn default_max_length() -> u16 {
    MaxLength::DEFAULT
}

fn default_word_interval_ms() -> u64 {
    50
}

fn default_copy_ack_ms() -> u64 {
    2000
}

impl Config {
    /// Starting value for the length slider. Validation guarantees range.
    pub fn default_max_length(&self) -> MaxLength {
        MaxLength::clamped(self.generation.default_max_length as i64)
    }

    /// Soft problems with an otherwise valid config.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.api.base_url.is_none() {
            warnings.push(ConfigWarning::MissingBaseUrl);
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/kahani.toml` relative to `base_dir`.
///
/// A missing file is not an error: every setting then takes its default.
/// `env_base_url`, when non-blank, replaces the file's `[api] base_url`.
/// This does not seed defaults; `load_config()` does.
pub fn load_config_from(
    base_dir: &Path,
    env_base_url: Option<String>,
) -> Result<Config, ConfigError> {
    let path = config_path(base_dir);
    let mut config = match read_file(&path)? {
        Some(text) => toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?,
        None => Config::default(),
    };

    if let Some(url) = env_base_url.filter(|u| !u.trim().is_empty()) {
        config.api.base_url = Some(url);
    }
    config.api.base_url = config
        .api
        .base_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/kahani.toml` to `config/kahani.toml` unless the latter
/// already exists. Returns the path written, if any.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let target = config_path(base_dir);
    if target.exists() || !source.is_file() {
        return Ok(None);
    }

    let seeded = std::fs::create_dir_all(base_dir.join("config"))
        .and_then(|_| std::fs::copy(&source, &target));
    match seeded {
        Ok(_) => Ok(Some(target)),
        Err(e) => Err(ConfigError::SeedError {
            path: target,
            source: e,
        }),
    }
}

/// Load config relative to the current working directory, seeding
/// `config/` from `defaults/` when possible and applying `KAHANI_API_URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })?;
    seed_config(&cwd)?;
    load_config_from(&cwd, std::env::var(BASE_URL_ENV).ok())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join("config").join(CONFIG_FILE)
}

/// `None` when the file does not exist.
fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let len = config.generation.default_max_length;
    if MaxLength::new(len).is_none() {
        return Err(ConfigError::ValidationError {
            field: "generation.default_max_length".into(),
            message: format!(
                "must be between {} and {} inclusive, got {len}",
                MaxLength::MIN,
                MaxLength::MAX
            ),
        });
    }

    let durations: &[(&str, u64)] = &[
        ("reveal.word_interval_ms", config.reveal.word_interval_ms),
        ("reveal.copy_ack_ms", config.reveal.copy_ack_ms),
    ];
    for (name, val) in durations {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if let Some(url) = &config.api.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: "api.base_url".into(),
                message: format!("must start with http:// or https://, got {url}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

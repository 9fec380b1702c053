//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keyring service name under which credentials are stored.
const KEYRING_SERVICE: &str = "inbox-valet";

/// Nested Telegram configuration.
///
/// The bot token is loaded at runtime via OS keychain or environment
/// variable, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TelegramConfig {
    /// Numeric Telegram id of the one user allowed to talk to the bot.
    /// The bot posts its control message into this user's private chat.
    pub authorized_user_id: u64,
    /// Bot API token (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

/// Nested transcription-service configuration.
///
/// The API key is loaded at runtime via OS keychain or environment
/// variable, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TranscriptionConfig {
    /// Speech-to-text model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Transcription endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API key for the transcription service (populated at runtime).
    #[serde(skip)]
    pub api_key: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            api_key: String::new(),
        }
    }
}

/// Configurable timeout values (seconds) for external calls.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Transcription HTTP request timeout.
    #[serde(default = "default_transcribe_seconds")]
    pub transcribe_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            transcribe_seconds: default_transcribe_seconds(),
        }
    }
}

fn default_model() -> String {
    "whisper-1".into()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/audio/transcriptions".into()
}

fn default_transcribe_seconds() -> u64 {
    60
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Directory holding the durable inbox database. Created if absent.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Telegram connectivity settings.
    pub telegram: TelegramConfig,
    /// Transcription-service settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Timeout configuration for external calls.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and normalize paths.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `inbox-valet` keyring service first, then falls back to
    /// `TELEGRAM_BOT_TOKEN` / `OPENAI_API_KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// the required credentials.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.telegram.bot_token = load_credential("bot_token", "TELEGRAM_BOT_TOKEN").await?;
        self.transcription.api_key = load_credential("openai_api_key", "OPENAI_API_KEY").await?;
        Ok(())
    }

    /// Derived path of the `SQLite` inbox database.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.state_dir.join("inbox.db")
    }

    /// Whether the given Telegram user id is the configured operator.
    #[must_use]
    pub fn is_authorized(&self, user_id: u64) -> bool {
        user_id == self.telegram.authorized_user_id
    }

    fn validate(&mut self) -> Result<()> {
        if self.telegram.authorized_user_id == 0 {
            return Err(AppError::Config(
                "telegram.authorized_user_id must be set".into(),
            ));
        }

        if self.transcription.model.is_empty() {
            return Err(AppError::Config("transcription.model must be set".into()));
        }

        if self.transcription.api_url.is_empty() {
            return Err(AppError::Config("transcription.api_url must be set".into()));
        }

        if self.timeouts.transcribe_seconds == 0 {
            return Err(AppError::Config(
                "timeouts.transcribe_seconds must be greater than zero".into(),
            ));
        }

        // The state dir may not exist yet on first run.
        fs::create_dir_all(&self.state_dir)
            .map_err(|err| AppError::Config(format!("cannot create state_dir: {err}")))?;
        let canonical = self
            .state_dir
            .canonicalize()
            .map_err(|err| AppError::Config(format!("state_dir invalid: {err}")))?;
        self.state_dir = canonical;

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // Try OS keychain first via spawn_blocking (keyring is synchronous I/O).
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    // Fallback to environment variable.
    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain (service {KEYRING_SERVICE}) \
             or {env_key} env var"
        ))
    })
}

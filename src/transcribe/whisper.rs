//! Whisper transcription backend.
//!
//! Posts voice audio as multipart form data to the hosted transcriptions
//! endpoint and extracts the `text` field of the JSON response. Any
//! transport, status, or decode problem collapses into the failure
//! outcome; partial transcripts never escape this module.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{TimeoutConfig, TranscriptionConfig};
use crate::{AppError, Result};

use super::{TranscriptOutcome, Transcriber};

/// Client for the Whisper audio transcriptions API.
pub struct WhisperClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Successful response body of the transcriptions endpoint.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperClient {
    /// Build a client from configuration.
    ///
    /// The request timeout bounds how long the chat can sit in its busy
    /// state when the transcription endpoint hangs.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transcribe` if the HTTP client cannot be built.
    pub fn new(transcription: &TranscriptionConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.transcribe_seconds))
            .build()?;
        Ok(Self {
            http,
            api_url: transcription.api_url.clone(),
            api_key: transcription.api_key.clone(),
            model: transcription.model.clone(),
        })
    }

    /// Upload the audio file and return the transcript text.
    async fn request_transcript(&self, audio: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio).await?;
        let part = Part::bytes(bytes)
            .file_name("voice.ogg")
            .mime_str("audio/ogg")?;
        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transcribe(format!(
                "transcription endpoint returned {status}: {body}"
            )));
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

impl Transcriber for WhisperClient {
    fn transcribe(
        &self,
        audio: &Path,
    ) -> Pin<Box<dyn Future<Output = TranscriptOutcome> + Send + '_>> {
        let audio = audio.to_path_buf();
        Box::pin(async move {
            match self.request_transcript(&audio).await {
                Ok(text) => {
                    debug!(chars = text.len(), "transcription succeeded");
                    TranscriptOutcome::Transcript(text)
                }
                Err(err) => {
                    warn!(%err, "transcription failed");
                    TranscriptOutcome::Failed
                }
            }
        })
    }
}

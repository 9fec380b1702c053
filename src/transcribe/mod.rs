//! Speech-to-text gateway abstraction.
//!
//! The [`Transcriber`] trait decouples the control-message driver from the
//! concrete speech-to-text backend. Outcomes are explicit values: a voice
//! note either yields transcript text or a failure, never partial text.

pub mod whisper;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

/// Result of a single transcription attempt.
///
/// Failures carry no detail here: the driver renders the same failure
/// notice regardless of cause, and backends log specifics at warn level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// The full transcript text.
    Transcript(String),
    /// The audio could not be transcribed. Nothing is queued.
    Failed,
}

/// Interface between the control-message driver and a speech-to-text
/// backend.
///
/// One attempt per voice note, no retries. The call is treated as
/// blocking by the state machine: the chat stays in its busy state until
/// the outcome arrives.
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio` and return the outcome.
    fn transcribe(
        &self,
        audio: &Path,
    ) -> Pin<Box<dyn Future<Output = TranscriptOutcome> + Send + '_>>;
}

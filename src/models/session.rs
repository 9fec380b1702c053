//! Per-chat session state for the control-message state machine.

use serde::{Deserialize, Serialize};

use crate::models::ids::MessageRef;
use crate::models::inbox::ItemId;

/// Position of the triage flow within the control-message state machine.
///
/// Exactly one variant is live at a time, which makes "review and
/// transcription confirmation never display simultaneously" structural
/// rather than a runtime rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFlow {
    /// No review or transcription in progress; the control message shows
    /// the queue count. Default state.
    #[default]
    Idle,
    /// One item is displayed for triage with confirm/stop buttons.
    Reviewing {
        /// The item currently on screen. Always present in the store;
        /// cleared synchronously with deletion or stop.
        item: ItemId,
    },
    /// A transcript awaits the user's save-or-discard decision.
    AwaitingDecision {
        /// Raw transcript text, not yet queued.
        transcript: String,
    },
    /// A transcription call is outstanding; the control message shows a
    /// busy indicator and no buttons.
    Transcribing,
}

/// Mutable session state for the single authorized chat.
///
/// Constructed once at startup, owned by the control-message driver, and
/// injected where needed; never ambient shared storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// The one live control message, once posted. `/start` replaces it.
    pub control: Option<MessageRef>,
    /// Current flow position.
    pub flow: ReviewFlow,
}

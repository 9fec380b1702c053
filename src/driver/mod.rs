//! Control-message driver — the inbox state machine.
//!
//! Owns the per-chat session behind one async mutex and reacts to inbound
//! events (new text, new voice note, button presses) by mutating the queue
//! store and session flow, then recomputing the control view and issuing a
//! single edit of the one live control message. Store mutations always run
//! before the render, so a persistence failure aborts the transition with
//! the display untouched.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::ids::{ChatId, MessageRef};
use crate::models::session::{ChatSession, ReviewFlow};
use crate::persistence::inbox_repo::InboxRepo;
use crate::render::{self, ControlView};
use crate::transcribe::{TranscriptOutcome, Transcriber};
use crate::{AppError, Result};

/// Chat-transport operations consumed by the driver.
///
/// The driver treats these as opaque side-effecting calls; wire format
/// and API details live entirely in the implementing layer, which keeps
/// every transition testable with a fake.
pub trait ChatTransport: Send + Sync {
    /// Post a fresh control message into `chat`, returning its reference.
    fn post_control(
        &self,
        chat: ChatId,
        view: ControlView,
    ) -> Pin<Box<dyn Future<Output = Result<MessageRef>> + Send + '_>>;

    /// Edit the control message in place with new text and buttons.
    fn edit_control(
        &self,
        target: MessageRef,
        view: ControlView,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Delete a message from the chat.
    fn remove_message(
        &self,
        target: MessageRef,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Download a voice attachment into the local file at `dest`.
    fn fetch_voice(
        &self,
        file_id: &str,
        dest: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Orchestrator of the single live control message.
///
/// One instance serves the one authorized chat. Every transition takes
/// the session lock for its full duration, so no two transitions
/// interleave and the rendered view never races the store.
pub struct ControlMessageDriver {
    repo: InboxRepo,
    transport: Arc<dyn ChatTransport>,
    transcriber: Arc<dyn Transcriber>,
    session: Mutex<ChatSession>,
}

impl ControlMessageDriver {
    /// Create the driver with its collaborators and a fresh idle session.
    #[must_use]
    pub fn new(
        repo: InboxRepo,
        transport: Arc<dyn ChatTransport>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            repo,
            transport,
            transcriber,
            session: Mutex::new(ChatSession::default()),
        }
    }

    /// Post a fresh control message into `chat` showing the idle view.
    ///
    /// Used at startup and for `/start`; safe to call repeatedly. Each
    /// call abandons any previous control message and resets the flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the count query fails or
    /// `AppError::Telegram` if the message cannot be posted.
    pub async fn open_control(&self, chat: ChatId) -> Result<()> {
        let mut session = self.session.lock().await;
        let count = self.repo.count().await?;
        let control = self
            .transport
            .post_control(chat, render::idle_view(count))
            .await?;
        info!(%chat, message = %control.message, count, "control message posted");
        session.control = Some(control);
        session.flow = ReviewFlow::Idle;
        Ok(())
    }

    /// Absorb a new text message into the queue.
    ///
    /// The original message is deleted from the chat (best effort) and
    /// the control message re-renders the idle view. Any in-flight review
    /// or undecided transcript is abandoned, per the transition table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store mutation fails (display stays
    /// untouched) or `AppError::Telegram` if the re-render fails.
    pub async fn ingest_text(&self, origin: MessageRef, content: &str) -> Result<()> {
        let mut session = self.session.lock().await;
        let id = self.repo.add(content).await?;
        self.absorb_original(origin).await;
        let count = self.repo.count().await?;
        debug!(item_id = %id, count, "text item queued");
        session.flow = ReviewFlow::Idle;
        self.render(&session, render::idle_view(count)).await
    }

    /// Absorb a voice note: delete it, show the busy indicator, download
    /// the audio to a scoped temp file, and run one transcription attempt.
    ///
    /// The session lock is held across the gateway call, so the chat's
    /// state machine stays in `Transcribing` and later events queue
    /// behind it. Success parks the transcript for a save/discard
    /// decision; failure falls back to the idle status with a notice.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Telegram` if a control-message render fails or
    /// `AppError::Db` if the post-failure count query fails.
    pub async fn ingest_voice(&self, origin: MessageRef, file_id: &str) -> Result<()> {
        let mut session = self.session.lock().await;
        self.absorb_original(origin).await;

        session.flow = ReviewFlow::Transcribing;
        self.render(&session, render::busy_view()).await?;

        match self.download_and_transcribe(file_id).await {
            TranscriptOutcome::Transcript(transcript) => {
                info!(chars = transcript.len(), "transcript awaiting decision");
                let view = render::transcript_view(&transcript);
                session.flow = ReviewFlow::AwaitingDecision { transcript };
                self.render(&session, view).await
            }
            TranscriptOutcome::Failed => {
                let count = self.repo.count().await?;
                session.flow = ReviewFlow::Idle;
                self.render(&session, render::failure_view(count)).await
            }
        }
    }

    /// Queue the pending transcript after a save decision.
    ///
    /// A stale press with no pending transcript is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store mutation fails (display stays
    /// untouched) or `AppError::Telegram` if the re-render fails.
    pub async fn save_transcript(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        let ReviewFlow::AwaitingDecision { transcript } = &session.flow else {
            debug!("save pressed with no pending transcript");
            return Ok(());
        };
        let transcript = transcript.clone();

        let id = self.repo.add(&transcript).await?;
        let count = self.repo.count().await?;
        info!(item_id = %id, count, "transcript queued");
        session.flow = ReviewFlow::Idle;
        self.render(&session, render::idle_view(count)).await
    }

    /// Discard any pending transcript and return to idle.
    ///
    /// Unguarded: a press without a pending transcript still re-renders
    /// the idle view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the count query fails or
    /// `AppError::Telegram` if the re-render fails.
    pub async fn discard_transcript(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if matches!(session.flow, ReviewFlow::AwaitingDecision { .. }) {
            debug!("pending transcript discarded");
        }
        let count = self.repo.count().await?;
        session.flow = ReviewFlow::Idle;
        self.render(&session, render::idle_view(count)).await
    }

    /// Start or restart a review pass over the queue.
    ///
    /// `origin` is the `/process` command message when the pass was
    /// requested by command rather than button; it is absorbed like any
    /// other inbound message. With an empty queue this is a guarded
    /// no-op and the display is left alone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the queue read fails or
    /// `AppError::Telegram` if the render fails.
    pub async fn begin_review(&self, origin: Option<MessageRef>) -> Result<()> {
        let mut session = self.session.lock().await;
        if let Some(origin) = origin {
            self.absorb_original(origin).await;
        }

        let count = self.repo.count().await?;
        let Some(item) = self.repo.peek_first().await? else {
            debug!("review requested on empty queue");
            return Ok(());
        };

        info!(item_id = %item.id, count, "review started");
        session.flow = ReviewFlow::Reviewing { item: item.id };
        self.render(&session, render::review_view(&item.content, count))
            .await
    }

    /// Confirm the item on screen as handled and advance the review.
    ///
    /// Deletes the active item, then re-checks the queue: more items mean
    /// the next one is shown, an empty queue returns to idle. A stale
    /// press with no active review is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a queue operation fails (display stays
    /// untouched) or `AppError::Telegram` if the render fails.
    pub async fn confirm_done(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        let ReviewFlow::Reviewing { item } = &session.flow else {
            debug!("done pressed with no active review");
            return Ok(());
        };
        let active = *item;

        self.repo.delete(active).await?;
        let count = self.repo.count().await?;
        info!(item_id = %active, count, "item triaged");

        match self.repo.peek_first().await? {
            Some(next) => {
                session.flow = ReviewFlow::Reviewing { item: next.id };
                self.render(&session, render::review_view(&next.content, count))
                    .await
            }
            None => {
                session.flow = ReviewFlow::Idle;
                self.render(&session, render::idle_view(count)).await
            }
        }
    }

    /// Abandon the current review and return to idle.
    ///
    /// Unguarded: pressing stop in any state lands on the idle view with
    /// buttons matching the current count.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the count query fails or
    /// `AppError::Telegram` if the re-render fails.
    pub async fn stop_review(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        let count = self.repo.count().await?;
        session.flow = ReviewFlow::Idle;
        self.render(&session, render::idle_view(count)).await
    }

    /// Clone of the current session state, for inspection.
    pub async fn snapshot(&self) -> ChatSession {
        self.session.lock().await.clone()
    }

    /// Fetch the voice file and hand it to the transcriber.
    ///
    /// The temp file is scoped to this call: RAII removes it on success,
    /// failure, and early return alike.
    async fn download_and_transcribe(&self, file_id: &str) -> TranscriptOutcome {
        let temp = match tempfile::Builder::new()
            .prefix("voice-")
            .suffix(".ogg")
            .tempfile()
        {
            Ok(temp) => temp,
            Err(err) => {
                warn!(%err, "failed to create temp audio file");
                return TranscriptOutcome::Failed;
            }
        };

        if let Err(err) = self.transport.fetch_voice(file_id, temp.path()).await {
            warn!(file_id, %err, "failed to download voice attachment");
            return TranscriptOutcome::Failed;
        }

        self.transcriber.transcribe(temp.path()).await
    }

    /// Delete an inbound message from the chat. Best effort: the queue
    /// mutation has already happened, so a failed delete only leaves
    /// clutter in the chat history.
    async fn absorb_original(&self, origin: MessageRef) {
        if let Err(err) = self.transport.remove_message(origin).await {
            warn!(
                chat = %origin.chat,
                message = %origin.message,
                %err,
                "failed to delete original message"
            );
        }
    }

    /// Issue the single edit of the live control message.
    async fn render(&self, session: &ChatSession, view: ControlView) -> Result<()> {
        let control = session
            .control
            .ok_or_else(|| AppError::NotFound("control message not yet posted".into()))?;
        self.transport.edit_control(control, view).await
    }
}

//! Update dispatch with centralized authorization.
//!
//! Every inbound update passes the silent-drop guard before any state
//! transition runs. The dptree branches then funnel messages and button
//! presses into the driver's transition methods.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::config::GlobalConfig;
use crate::driver::ControlMessageDriver;
use crate::models::ids;
use crate::Result;

use super::keyboards;

// ── Centralized authorization check ──────────────────────

/// Verify that the acting Telegram user is the configured operator.
///
/// Returns `true` when authorized. On failure, logs a security event and
/// returns `false` — the caller must silently drop the update so the
/// sender receives no feedback at all, not even a callback ack.
fn is_authorized(user_id: u64, config: &GlobalConfig) -> bool {
    if config.is_authorized(user_id) {
        return true;
    }

    // Log the security event but do NOT respond to the sender.
    warn!(
        user_id,
        "unauthorized user attempted bot interaction (silently ignored)"
    );
    false
}

// ── Dispatcher ───────────────────────────────────────────

/// Run the long-polling dispatcher until Ctrl-C.
pub async fn run(bot: Bot, config: Arc<GlobalConfig>, driver: Arc<ControlMessageDriver>) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![config, driver])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

// ── Update handlers ──────────────────────────────────────

/// Handle an inbound chat message: commands, note text, or a voice note.
async fn handle_message(
    msg: Message,
    config: Arc<GlobalConfig>,
    driver: Arc<ControlMessageDriver>,
) -> Result<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    if !is_authorized(user.id.0, &config) {
        return Ok(());
    }

    let origin = ids::MessageRef::new(ids::ChatId(msg.chat.id.0), ids::MessageId(msg.id.0));

    if let Some(text) = msg.text() {
        match parse_command(text) {
            Some("start") => driver.open_control(origin.chat).await?,
            Some("process") => driver.begin_review(Some(origin)).await?,
            Some(other) => debug!(command = other, "ignoring unknown command"),
            None => driver.ingest_text(origin, text).await?,
        }
    } else if let Some(voice) = msg.voice() {
        driver.ingest_voice(origin, &voice.file.id).await?;
    }

    Ok(())
}

/// Handle a button press on the control message.
async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    config: Arc<GlobalConfig>,
    driver: Arc<ControlMessageDriver>,
) -> Result<()> {
    if !is_authorized(q.from.id.0, &config) {
        return Ok(());
    }

    // Ack immediately so the client stops its progress spinner.
    bot.answer_callback_query(q.id).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    match data {
        keyboards::ACTION_PROCESS => driver.begin_review(None).await,
        keyboards::ACTION_DONE => driver.confirm_done().await,
        keyboards::ACTION_STOP => driver.stop_review().await,
        keyboards::ACTION_SAVE => driver.save_transcript().await,
        keyboards::ACTION_CANCEL => driver.discard_transcript().await,
        other => {
            debug!(data = other, "ignoring unknown callback action");
            Ok(())
        }
    }
}

/// Extract the command name from a `/command` message, tolerating the
/// `/command@botname` form some clients send.
fn parse_command(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('/')?;
    let name = rest.split_whitespace().next().unwrap_or("");
    Some(name.split('@').next().unwrap_or(name))
}

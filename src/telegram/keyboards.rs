//! Inline keyboard construction for the control message.
//!
//! Maps the abstract button sets computed by the renderer onto concrete
//! Telegram inline keyboards. Callback data strings double as the wire
//! protocol between the keyboard and the dispatch layer.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::render::Keyboard;

/// Callback data for the start-review button.
pub const ACTION_PROCESS: &str = "process";
/// Callback data for confirming the reviewed item as handled.
pub const ACTION_DONE: &str = "done";
/// Callback data for stopping the review pass.
pub const ACTION_STOP: &str = "stop";
/// Callback data for saving a pending transcript.
pub const ACTION_SAVE: &str = "save_transcription";
/// Callback data for discarding a pending transcript.
pub const ACTION_CANCEL: &str = "cancel_transcription";

/// Map an abstract keyboard to its Telegram markup, if any.
#[must_use]
pub fn markup_for(keyboard: Keyboard) -> Option<InlineKeyboardMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::StartReview => Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("\u{25b6}\u{fe0f}", ACTION_PROCESS),
        ]])),
        Keyboard::ReviewActions => Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("\u{2705}", ACTION_DONE),
            InlineKeyboardButton::callback("\u{23f9}\u{fe0f}", ACTION_STOP),
        ]])),
        Keyboard::TranscriptActions => Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("\u{2705}", ACTION_SAVE),
            InlineKeyboardButton::callback("\u{23f9}\u{fe0f}", ACTION_CANCEL),
        ]])),
    }
}

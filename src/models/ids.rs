//! Transport-neutral chat identities.
//!
//! The driver and session state reference chats and messages through these
//! newtypes so the state machine never depends on a concrete bot API. The
//! Telegram layer converts at its boundary.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Numeric id of a chat the bot participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl Display for ChatId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of a single message within a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully-qualified reference to one message in one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Chat containing the message.
    pub chat: ChatId,
    /// Message id within that chat.
    pub message: MessageId,
}

impl MessageRef {
    /// Construct a reference from its two parts.
    #[must_use]
    pub fn new(chat: ChatId, message: MessageId) -> Self {
        Self { chat, message }
    }
}

//! Inbox item model — one queued unit of content awaiting triage.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Store-assigned identity of a queued inbox item.
///
/// Wraps the `SQLite` rowid. Used only for deletion; ordering always comes
/// from insertion order, never from id comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub i64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single queued note awaiting user triage.
///
/// Items are immutable once stored: created by `add`, destroyed exactly
/// once by an idempotent `delete`, never edited in between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboxItem {
    /// Store-assigned stable identity.
    pub id: ItemId,
    /// Item text, either directly authored or produced by transcription.
    pub content: String,
}

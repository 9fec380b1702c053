//! Inbox queue repository for `SQLite` persistence.
//!
//! Implements the durable FIFO queue contract: append, count, peek-first,
//! idempotent delete. Each operation is individually atomic; no
//! multi-item transactions are needed.

use std::sync::Arc;

use crate::models::inbox::{InboxItem, ItemId};
use crate::Result;

use super::db::Database;

/// Repository for queued inbox items.
#[derive(Clone)]
pub struct InboxRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct InboxRow {
    id: i64,
    content: String,
}

impl InboxRow {
    fn into_item(self) -> InboxItem {
        InboxItem {
            id: ItemId(self.id),
            content: self.content,
        }
    }
}

impl InboxRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append `content` at the tail of the queue and return the fresh id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn add(&self, content: &str) -> Result<ItemId> {
        let result = sqlx::query("INSERT INTO inbox (content) VALUES (?1)")
            .bind(content)
            .execute(self.db.as_ref())
            .await?;
        Ok(ItemId(result.last_insert_rowid()))
    }

    /// Number of pending items.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inbox")
            .fetch_one(self.db.as_ref())
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Oldest surviving item by insertion order, without removing it.
    ///
    /// Rowids are assigned in append order, so `ORDER BY rowid` is FIFO.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn peek_first(&self) -> Result<Option<InboxItem>> {
        let row: Option<InboxRow> =
            sqlx::query_as("SELECT rowid AS id, content FROM inbox ORDER BY rowid ASC LIMIT 1")
                .fetch_optional(self.db.as_ref())
                .await?;
        Ok(row.map(InboxRow::into_item))
    }

    /// Delete the item with identity `id` if present.
    ///
    /// Idempotent: deleting an id that no longer exists is a successful
    /// no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete(&self, id: ItemId) -> Result<()> {
        sqlx::query("DELETE FROM inbox WHERE rowid = ?1")
            .bind(id.0)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }
}

//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every startup. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// The inbox table carries only the item text. Items are addressed by
/// the implicit rowid, and rowid order is insertion order, which is the
/// queue order.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS inbox (
    content         TEXT NOT NULL
);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}

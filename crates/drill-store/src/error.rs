//! Database error types for drill-store.

use drill_core::errors::{StoreError, StoreOp};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Report this failure as a rejected store operation.
    #[must_use]
    pub fn into_store(self, op: StoreOp) -> StoreError {
        StoreError::rejected(op, self.to_string())
    }
}

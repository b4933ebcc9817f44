//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` / `OR IGNORE` so they
//! can be re-run on every open.

use crate::DeckDb;
use crate::error::DatabaseError;

/// Initial schema: decks, note types (seeded with `Basic`), cards.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl DeckDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}

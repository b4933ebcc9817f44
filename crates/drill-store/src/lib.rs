//! # drill-store
//!
//! Persistence adapters for Opening Drill.
//!
//! - [`LocalDeck`]: cards in a local libSQL database ([`DeckDb`]) plus
//!   diagram files in a media directory ([`MediaDir`])
//! - [`MemoryStore`]: everything in memory, for previews and tests
//!
//! Both implement [`drill_core::store::DeckStore`].
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod cards;
pub mod decks;
pub mod error;
pub mod local;
pub mod media;
pub mod memory;
mod migrations;

pub use error::DatabaseError;
pub use local::LocalDeck;
pub use media::MediaDir;
pub use memory::MemoryStore;

use libsql::Builder;

/// Central database handle for decks and cards.
pub struct DeckDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl DeckDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let deck_db = Self { db, conn };
        deck_db.run_migrations().await?;
        Ok(deck_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Look up a single integer id.
    pub(crate) async fn lookup_id(
        &self,
        sql: &str,
        name: &str,
    ) -> Result<Option<i64>, DatabaseError> {
        let mut rows = self.conn.query(sql, [name]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }
}

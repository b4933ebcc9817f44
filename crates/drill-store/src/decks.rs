//! Deck and note type repository.

use drill_core::responses::DeckSummary;

use crate::DeckDb;
use crate::error::DatabaseError;

impl DeckDb {
    /// Create a deck. Returns `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn create_deck(&self, name: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn()
            .execute("INSERT OR IGNORE INTO decks (name) VALUES (?1)", [name])
            .await?;
        Ok(changed > 0)
    }

    /// Create a note type with the standard field layout. Returns `false` if
    /// it already existed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn create_notetype(&self, name: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn()
            .execute("INSERT OR IGNORE INTO notetypes (name) VALUES (?1)", [name])
            .await?;
        Ok(changed > 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn deck_id(&self, name: &str) -> Result<Option<i64>, DatabaseError> {
        self.lookup_id("SELECT id FROM decks WHERE name = ?1", name)
            .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn notetype_id(&self, name: &str) -> Result<Option<i64>, DatabaseError> {
        self.lookup_id("SELECT id FROM notetypes WHERE name = ?1", name)
            .await
    }

    /// All decks with their card counts, by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_decks(&self) -> Result<Vec<DeckSummary>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT d.name, COUNT(c.id) FROM decks d
                 LEFT JOIN cards c ON c.deck_id = d.id
                 GROUP BY d.id
                 ORDER BY d.name",
                (),
            )
            .await?;

        let mut decks = Vec::new();
        while let Some(row) = rows.next().await? {
            let count = row.get::<i64>(1)?;
            decks.push(DeckSummary {
                name: row.get(0)?,
                cards: u32::try_from(count)
                    .map_err(|e| DatabaseError::Query(format!("card count {count}: {e}")))?,
            });
        }
        Ok(decks)
    }
}

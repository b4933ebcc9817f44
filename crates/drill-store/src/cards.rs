//! Card repository.

use std::collections::BTreeSet;

use chrono::Utc;
use drill_core::ids::RecordId;
use drill_core::store::{CardFields, StoredCard};

use crate::DeckDb;
use crate::error::DatabaseError;

impl DeckDb {
    /// All cards of a deck, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_cards(&self, deck_id: i64) -> Result<Vec<StoredCard>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, question, answer, line, fen FROM cards
                 WHERE deck_id = ?1 ORDER BY id",
                [deck_id],
            )
            .await?;

        let mut cards = Vec::new();
        while let Some(row) = rows.next().await? {
            cards.push(StoredCard {
                id: RecordId::new(row.get::<i64>(0)?),
                fields: CardFields {
                    question: row.get(1)?,
                    answer: row.get(2)?,
                    line: row.get(3)?,
                    fen: row.get(4)?,
                },
            });
        }
        Ok(cards)
    }

    /// Insert a card and return its id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn insert_card(
        &self,
        deck_id: i64,
        notetype_id: i64,
        fields: &CardFields,
    ) -> Result<RecordId, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO cards (deck_id, notetype_id, question, answer, line, fen, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                libsql::params![
                    deck_id,
                    notetype_id,
                    fields.question.as_str(),
                    fields.answer.as_str(),
                    fields.line.as_str(),
                    fields.fen.as_str(),
                    now.as_str(),
                ],
            )
            .await?;
        Ok(RecordId::new(self.conn().last_insert_rowid()))
    }

    /// Replace the fields of a card. Returns `false` if the card is gone.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn update_card(
        &self,
        id: RecordId,
        fields: &CardFields,
    ) -> Result<bool, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let changed = self
            .conn()
            .execute(
                "UPDATE cards SET question = ?1, answer = ?2, line = ?3, fen = ?4, updated_at = ?5
                 WHERE id = ?6",
                libsql::params![
                    fields.question.as_str(),
                    fields.answer.as_str(),
                    fields.line.as_str(),
                    fields.fen.as_str(),
                    now.as_str(),
                    id.get(),
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Delete cards by id. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a delete fails.
    pub async fn delete_cards(&self, ids: &[RecordId]) -> Result<u64, DatabaseError> {
        let mut deleted = 0;
        for id in ids {
            deleted += self
                .conn()
                .execute("DELETE FROM cards WHERE id = ?1", [id.get()])
                .await?;
        }
        Ok(deleted)
    }

    /// Ids of every card in every deck.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn card_ids(&self) -> Result<BTreeSet<RecordId>, DatabaseError> {
        let mut rows = self.conn().query("SELECT id FROM cards", ()).await?;
        let mut ids = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            ids.insert(RecordId::new(row.get::<i64>(0)?));
        }
        Ok(ids)
    }
}

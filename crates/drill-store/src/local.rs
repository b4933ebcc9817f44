//! [`DeckStore`] backed by a local libSQL database and media directory.

use std::path::Path;

use drill_config::StoreConfig;
use drill_core::errors::{StoreError, StoreOp};
use drill_core::ids::{ArtifactMatcher, RecordId};
use drill_core::store::{CardFields, DeckStore, Scope, StoredCard};
use tracing::debug;

use crate::DeckDb;
use crate::error::DatabaseError;
use crate::media::MediaDir;

/// Cards in a libSQL database, diagrams in a directory.
pub struct LocalDeck {
    db: DeckDb,
    media: MediaDir,
}

impl LocalDeck {
    #[must_use]
    pub const fn new(db: DeckDb, media: MediaDir) -> Self {
        Self { db, media }
    }

    /// Open the database and media directory named by `config`, resolving
    /// relative paths against `root`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database directory cannot be created or
    /// the database cannot be opened.
    pub async fn open(config: &StoreConfig, root: &Path) -> Result<Self, DatabaseError> {
        let path = config.database_path(root);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DatabaseError::Other(anyhow::anyhow!(
                    "creating {}: {e}",
                    parent.display()
                ))
            })?;
        }
        debug!(path = %path.display(), "opening deck database");
        let db = DeckDb::open_local(&path.to_string_lossy()).await?;
        Ok(Self::new(db, MediaDir::new(config.media_path(root))))
    }

    #[must_use]
    pub const fn db(&self) -> &DeckDb {
        &self.db
    }

    #[must_use]
    pub const fn media(&self) -> &MediaDir {
        &self.media
    }

    /// Diagrams in the matcher's namespace whose owning card no longer
    /// exists in any deck, e.g. because it was deleted by hand.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the card ids or the media listing cannot be
    /// read.
    pub async fn orphaned_media(
        &self,
        matcher: &ArtifactMatcher,
    ) -> Result<Vec<String>, StoreError> {
        let live = self
            .db
            .card_ids()
            .await
            .map_err(|e| e.into_store(StoreOp::ListCards))?;
        let orphans: Vec<String> = self
            .media
            .list(matcher.namespace())
            .await?
            .into_iter()
            .filter(|name| {
                matcher
                    .parse(name)
                    .is_some_and(|artifact| !live.contains(&artifact.record))
            })
            .collect();
        debug!(orphans = orphans.len(), live = live.len(), "scanned media");
        Ok(orphans)
    }

    async fn deck_id(&self, deck: &str, op: StoreOp) -> Result<i64, StoreError> {
        self.db
            .deck_id(deck)
            .await
            .map_err(|e| e.into_store(op))?
            .ok_or_else(|| StoreError::UnknownDeck(deck.to_string()))
    }
}

impl DeckStore for LocalDeck {
    async fn check_scope(&self, scope: &Scope) -> Result<(), StoreError> {
        self.deck_id(&scope.deck, StoreOp::CheckScope).await?;
        self.db
            .notetype_id(&scope.notetype)
            .await
            .map_err(|e| e.into_store(StoreOp::CheckScope))?
            .ok_or_else(|| StoreError::UnknownNotetype(scope.notetype.clone()))?;
        Ok(())
    }

    async fn list_cards(&self, scope: &Scope) -> Result<Vec<StoredCard>, StoreError> {
        let deck = self.deck_id(&scope.deck, StoreOp::ListCards).await?;
        self.db
            .list_cards(deck)
            .await
            .map_err(|e| e.into_store(StoreOp::ListCards))
    }

    async fn create_card(
        &self,
        scope: &Scope,
        fields: &CardFields,
    ) -> Result<RecordId, StoreError> {
        let deck = self.deck_id(&scope.deck, StoreOp::CreateCard).await?;
        let notetype = self
            .db
            .notetype_id(&scope.notetype)
            .await
            .map_err(|e| e.into_store(StoreOp::CreateCard))?
            .ok_or_else(|| StoreError::UnknownNotetype(scope.notetype.clone()))?;
        self.db
            .insert_card(deck, notetype, fields)
            .await
            .map_err(|e| e.into_store(StoreOp::CreateCard))
    }

    async fn update_card(&self, id: RecordId, fields: &CardFields) -> Result<(), StoreError> {
        let found = self
            .db
            .update_card(id, fields)
            .await
            .map_err(|e| e.into_store(StoreOp::UpdateCard))?;
        if found {
            Ok(())
        } else {
            Err(StoreError::CardNotFound(id))
        }
    }

    async fn delete_cards(&self, ids: &[RecordId]) -> Result<(), StoreError> {
        self.db
            .delete_cards(ids)
            .await
            .map_err(|e| e.into_store(StoreOp::DeleteCards))?;
        Ok(())
    }

    async fn list_media(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.media.list(namespace).await?)
    }

    async fn write_media(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        Ok(self.media.write(name, bytes).await?)
    }

    async fn delete_media(&self, names: &[String]) -> Result<(), StoreError> {
        Ok(self.media.delete(names).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> LocalDeck {
        LocalDeck::open(&StoreConfig::default(), dir.path())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn check_scope_reports_missing_deck_and_notetype() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;

        let err = store
            .check_scope(&Scope::new("Openings", "Basic"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownDeck(ref d) if d == "Openings"));

        store.db().create_deck("Openings").await.unwrap();
        let err = store
            .check_scope(&Scope::new("Openings", "Cloze"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownNotetype(ref n) if n == "Cloze"));

        store
            .check_scope(&Scope::new("Openings", "Basic"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cards_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let scope = Scope::new("Openings", "Basic");
        let fields = CardFields {
            question: "1. e4".into(),
            answer: "1... c5".into(),
            line: "{}".into(),
            fen: String::new(),
        };

        let id = {
            let store = open(&dir).await;
            store.db().create_deck("Openings").await.unwrap();
            store.create_card(&scope, &fields).await.unwrap()
        };

        let store = open(&dir).await;
        let cards = store.list_cards(&scope).await.unwrap();
        assert_eq!(cards, vec![StoredCard { id, fields }]);
    }

    #[tokio::test]
    async fn update_of_deleted_card_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        store.db().create_deck("Openings").await.unwrap();
        let scope = Scope::new("Openings", "Basic");
        let id = store
            .create_card(&scope, &CardFields::default())
            .await
            .unwrap();
        store.delete_cards(&[id]).await.unwrap();

        let err = store
            .update_card(id, &CardFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CardNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn diagrams_of_removed_cards_are_orphans() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        store.db().create_deck("Openings").await.unwrap();
        let scope = Scope::new("Openings", "Basic");
        let kept = store
            .create_card(&scope, &CardFields::default())
            .await
            .unwrap();
        let removed = store
            .create_card(&scope, &CardFields::default())
            .await
            .unwrap();
        let hash = "0123456789abcdef0123456789abcdef01234567";
        let kept_name = format!("chess-opening-trainer-{kept}-{hash}.svg");
        let removed_name = format!("chess-opening-trainer-{removed}-{hash}.svg");
        for name in [kept_name.as_str(), removed_name.as_str(), "portrait.png"] {
            store.write_media(name, b"<svg/>").await.unwrap();
        }
        store.delete_cards(&[removed]).await.unwrap();

        let matcher = ArtifactMatcher::new("chess-opening-trainer").unwrap();
        assert_eq!(
            store.orphaned_media(&matcher).await.unwrap(),
            vec![removed_name]
        );
    }

    #[tokio::test]
    async fn media_goes_to_the_configured_directory() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        store
            .write_media("chess-opening-trainer-1-abc.svg", b"<svg/>")
            .await
            .unwrap();
        assert!(dir.path().join(".drill/media/chess-opening-trainer-1-abc.svg").exists());
        assert_eq!(
            store.list_media("chess-opening-trainer").await.unwrap(),
            vec!["chess-opening-trainer-1-abc.svg".to_string()]
        );
    }
}

//! Persistence-adapter contract.
//!
//! The host's note and media stores are external collaborators. The sync
//! engine talks to them only through [`DeckStore`], so the libSQL adapter,
//! the in-memory adapter, and any host integration are interchangeable via
//! static dispatch.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send`, which `tokio::spawn` requires when a run
//! is offloaded to a background task.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::ids::RecordId;

/// Destination of a synchronization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Deck (collection scope) holding the cards.
    pub deck: String,
    /// Record type (note type) used for new cards.
    pub notetype: String,
}

impl Scope {
    pub fn new(deck: impl Into<String>, notetype: impl Into<String>) -> Self {
        Self {
            deck: deck.into(),
            notetype: notetype.into(),
        }
    }
}

/// The fields of one card record.
///
/// Field order mirrors the note type: `Moves`, `Responses`, `Line`, `FEN`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    /// Question side: the forced move sequence and the diagram.
    pub question: String,
    /// Answer side: the candidate continuations.
    pub answer: String,
    /// Versioned JSON line payload; the persisted signature derives from it.
    pub line: String,
    /// FEN of the decision-point position.
    pub fen: String,
}

/// A card record as currently persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCard {
    pub id: RecordId,
    pub fields: CardFields,
}

/// Note + media store consumed by the sync engine.
pub trait DeckStore: Send + Sync {
    /// Verify that the deck and note type exist.
    ///
    /// Called once before any other work; failures are configuration errors.
    fn check_scope(&self, scope: &Scope) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All cards currently in the deck.
    fn list_cards(
        &self,
        scope: &Scope,
    ) -> impl Future<Output = Result<Vec<StoredCard>, StoreError>> + Send;

    /// Create a card and return its identifier.
    fn create_card(
        &self,
        scope: &Scope,
        fields: &CardFields,
    ) -> impl Future<Output = Result<RecordId, StoreError>> + Send;

    /// Replace all fields of an existing card.
    fn update_card(
        &self,
        id: RecordId,
        fields: &CardFields,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete cards by id. Unknown ids are ignored.
    fn delete_cards(&self, ids: &[RecordId])
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Names of stored media starting with `<namespace>-`.
    fn list_media(
        &self,
        namespace: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Write (or overwrite) a media file.
    fn write_media(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete media files by name. Missing names are ignored.
    fn delete_media(&self, names: &[String])
    -> impl Future<Output = Result<(), StoreError>> + Send;
}

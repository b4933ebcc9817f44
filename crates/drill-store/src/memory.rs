//! In-memory [`DeckStore`].
//!
//! Used for previews (nothing touches disk) and by tests, which can inject a
//! failure into any operation and inspect the order in which operations ran.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use drill_core::errors::{StoreError, StoreOp};
use drill_core::ids::RecordId;
use drill_core::store::{CardFields, DeckStore, Scope, StoredCard};

#[derive(Debug, Clone, Copy)]
struct Fault {
    op: StoreOp,
    /// Successful calls of `op` still allowed before it fails.
    remaining: usize,
}

#[derive(Debug, Default)]
struct State {
    decks: BTreeSet<String>,
    notetypes: BTreeSet<String>,
    cards: BTreeMap<RecordId, (String, CardFields)>,
    media: BTreeMap<String, Vec<u8>>,
    next_id: i64,
    fault: Option<Fault>,
    ops: Vec<StoreOp>,
}

impl State {
    fn enter(&mut self, op: StoreOp) -> Result<(), StoreError> {
        self.ops.push(op);
        match self.fault.as_mut() {
            Some(fault) if fault.op == op => {
                if fault.remaining == 0 {
                    Err(StoreError::rejected(op, "injected failure"))
                } else {
                    fault.remaining -= 1;
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    fn require_deck(&self, deck: &str) -> Result<(), StoreError> {
        if self.decks.contains(deck) {
            Ok(())
        } else {
            Err(StoreError::UnknownDeck(deck.to_string()))
        }
    }

    fn require_notetype(&self, notetype: &str) -> Result<(), StoreError> {
        if self.notetypes.contains(notetype) {
            Ok(())
        } else {
            Err(StoreError::UnknownNotetype(notetype.to_string()))
        }
    }
}

/// A deck store that lives in memory.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let state = State {
            notetypes: BTreeSet::from(["Basic".to_string()]),
            next_id: 1,
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }
}

impl MemoryStore {
    /// An empty store knowing only the `Basic` note type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with one empty deck.
    #[must_use]
    pub fn with_deck(deck: &str) -> Self {
        let store = Self::new();
        store.add_deck(deck);
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_deck(&self, deck: &str) {
        self.lock().decks.insert(deck.to_string());
    }

    pub fn add_notetype(&self, notetype: &str) {
        self.lock().notetypes.insert(notetype.to_string());
    }

    /// Make every call of `op` fail.
    pub fn fail_on(&self, op: StoreOp) {
        self.fail_after(op, 0);
    }

    /// Let `successes` calls of `op` through, then fail the rest.
    pub fn fail_after(&self, op: StoreOp, successes: usize) {
        self.lock().fault = Some(Fault {
            op,
            remaining: successes,
        });
    }

    pub fn clear_fault(&self) {
        self.lock().fault = None;
    }

    /// Store a card directly, bypassing fault injection.
    pub fn insert_raw(&self, deck: &str, fields: CardFields) -> RecordId {
        let mut state = self.lock();
        let id = RecordId::new(state.next_id);
        state.next_id += 1;
        state.cards.insert(id, (deck.to_string(), fields));
        id
    }

    /// Store a media file directly, bypassing fault injection.
    pub fn put_media(&self, name: &str, bytes: &[u8]) {
        self.lock().media.insert(name.to_string(), bytes.to_vec());
    }

    /// Cards of `deck`, by id.
    #[must_use]
    pub fn cards(&self, deck: &str) -> Vec<StoredCard> {
        self.lock()
            .cards
            .iter()
            .filter(|(_, (d, _))| d == deck)
            .map(|(id, (_, fields))| StoredCard {
                id: *id,
                fields: fields.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn card(&self, id: RecordId) -> Option<CardFields> {
        self.lock().cards.get(&id).map(|(_, fields)| fields.clone())
    }

    /// All media names, sorted.
    #[must_use]
    pub fn media_names(&self) -> Vec<String> {
        self.lock().media.keys().cloned().collect()
    }

    #[must_use]
    pub fn media(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().media.get(name).cloned()
    }

    /// Operations attempted so far, in call order.
    #[must_use]
    pub fn ops(&self) -> Vec<StoreOp> {
        self.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.lock().ops.clear();
    }
}

impl DeckStore for MemoryStore {
    async fn check_scope(&self, scope: &Scope) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::CheckScope)?;
        state.require_deck(&scope.deck)?;
        state.require_notetype(&scope.notetype)
    }

    async fn list_cards(&self, scope: &Scope) -> Result<Vec<StoredCard>, StoreError> {
        {
            let mut state = self.lock();
            state.enter(StoreOp::ListCards)?;
            state.require_deck(&scope.deck)?;
        }
        Ok(self.cards(&scope.deck))
    }

    async fn create_card(
        &self,
        scope: &Scope,
        fields: &CardFields,
    ) -> Result<RecordId, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::CreateCard)?;
        state.require_deck(&scope.deck)?;
        state.require_notetype(&scope.notetype)?;
        let id = RecordId::new(state.next_id);
        state.next_id += 1;
        state.cards.insert(id, (scope.deck.clone(), fields.clone()));
        Ok(id)
    }

    async fn update_card(&self, id: RecordId, fields: &CardFields) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::UpdateCard)?;
        match state.cards.get_mut(&id) {
            Some((_, stored)) => {
                *stored = fields.clone();
                Ok(())
            }
            None => Err(StoreError::CardNotFound(id)),
        }
    }

    async fn delete_cards(&self, ids: &[RecordId]) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::DeleteCards)?;
        for id in ids {
            state.cards.remove(id);
        }
        Ok(())
    }

    async fn list_media(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::ListMedia)?;
        let prefix = format!("{namespace}-");
        Ok(state
            .media
            .keys()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn write_media(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::WriteMedia)?;
        state.media.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete_media(&self, names: &[String]) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::DeleteMedia)?;
        for name in names {
            state.media.remove(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope() -> Scope {
        Scope::new("Openings", "Basic")
    }

    #[tokio::test]
    async fn scope_checks_deck_then_notetype() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.check_scope(&scope()).await,
            Err(StoreError::UnknownDeck(_))
        ));
        store.add_deck("Openings");
        store.check_scope(&scope()).await.unwrap();
        assert!(matches!(
            store.check_scope(&Scope::new("Openings", "Cloze")).await,
            Err(StoreError::UnknownNotetype(_))
        ));
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryStore::with_deck("Openings");
        let a = store.create_card(&scope(), &CardFields::default()).await.unwrap();
        store.delete_cards(&[a]).await.unwrap();
        let b = store.create_card(&scope(), &CardFields::default()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn fail_after_lets_some_calls_through() {
        let store = MemoryStore::with_deck("Openings");
        store.fail_after(StoreOp::CreateCard, 1);
        store.create_card(&scope(), &CardFields::default()).await.unwrap();
        let err = store
            .create_card(&scope(), &CardFields::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "create_card rejected: injected failure");
        assert_eq!(store.cards("Openings").len(), 1);

        store.clear_fault();
        store.create_card(&scope(), &CardFields::default()).await.unwrap();
        assert_eq!(store.cards("Openings").len(), 2);
    }

    #[tokio::test]
    async fn media_listing_respects_namespace() {
        let store = MemoryStore::new();
        store.put_media("ns-1-a.svg", b"x");
        store.put_media("other-1-a.svg", b"y");
        assert_eq!(store.list_media("ns").await.unwrap(), vec!["ns-1-a.svg"]);
        store.delete_media(&["ns-1-a.svg".into()]).await.unwrap();
        assert_eq!(store.media_names(), vec!["other-1-a.svg"]);
    }

    #[tokio::test]
    async fn ops_are_logged_in_order() {
        let store = MemoryStore::with_deck("Openings");
        store.list_cards(&scope()).await.unwrap();
        store.write_media("ns-1-a.svg", b"x").await.unwrap();
        assert_eq!(store.ops(), vec![StoreOp::ListCards, StoreOp::WriteMedia]);
    }
}

//! Diff between the desired cards and the persisted deck.
//!
//! Cards are matched by signature. Diagrams are matched by name, and since
//! every diagram name embeds the id of its owning record, reconciliation only
//! ever looks at media owned by records this run touches.

use std::collections::{BTreeMap, BTreeSet};

use drill_core::errors::StoreError;
use drill_core::ids::{ArtifactMatcher, RecordId};
use drill_core::payload::signature_from_stored;
use drill_core::responses::SyncReport;
use drill_core::store::{CardFields, DeckStore, Scope, StoredCard};
use drill_render::{CardDraft, DiagramArtifact};
use tracing::debug;

use crate::error::SyncError;

/// Persisted state, read once at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub cards: Vec<StoredCard>,
    /// Media names in the artifact namespace.
    pub media: Vec<String>,
}

impl Snapshot {
    /// Read the cards of `scope` and the media of `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if either listing fails.
    pub async fn take<S: DeckStore>(
        store: &S,
        scope: &Scope,
        namespace: &str,
    ) -> Result<Self, StoreError> {
        let cards = store.list_cards(scope).await?;
        let media = store.list_media(namespace).await?;
        debug!(cards = cards.len(), media = media.len(), "took snapshot");
        Ok(Self { cards, media })
    }
}

/// Full replacement of a matched card's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUpdate {
    pub id: RecordId,
    pub fields: CardFields,
}

/// Everything a run has to change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    pub deletes: Vec<RecordId>,
    pub updates: Vec<CardUpdate>,
    /// Cards to create. Each one gets its diagram once its id exists.
    pub inserts: Vec<CardDraft>,
    /// Missing diagrams of matched cards.
    pub diagram_creates: Vec<DiagramArtifact>,
    /// Orphaned diagrams.
    pub diagram_deletes: Vec<String>,
}

pub(crate) fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl PatchSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty()
            && self.updates.is_empty()
            && self.inserts.is_empty()
            && self.diagram_creates.is_empty()
            && self.diagram_deletes.is_empty()
    }

    /// The report applying this patch would produce.
    #[must_use]
    pub fn projected(&self) -> SyncReport {
        SyncReport {
            inserted: count(self.inserts.len()),
            updated: count(self.updates.len()),
            deleted: count(self.deletes.len()),
            diagrams_created: count(
                self.diagram_creates.len()
                    + self
                        .inserts
                        .iter()
                        .map(CardDraft::diagram_count)
                        .sum::<usize>(),
            ),
            diagrams_deleted: count(self.diagram_deletes.len()),
            skipped_documents: Vec::new(),
        }
    }
}

/// Compute the patch turning `snapshot` into `drafts`.
///
/// Stored cards without a readable payload, and all but the oldest of several
/// stored cards sharing a signature, are deleted.
///
/// # Errors
///
/// Returns `SyncError::Invariant` if two drafts share a signature.
pub fn plan(
    drafts: &[CardDraft],
    snapshot: &Snapshot,
    matcher: &ArtifactMatcher,
) -> Result<PatchSet, SyncError> {
    let mut desired: BTreeMap<&str, &CardDraft> = BTreeMap::new();
    for draft in drafts {
        if desired.insert(&draft.signature, draft).is_some() {
            return Err(SyncError::Invariant(format!(
                "two cards share the signature '{}'",
                draft.signature
            )));
        }
    }

    let mut stored: Vec<&StoredCard> = snapshot.cards.iter().collect();
    stored.sort_by_key(|card| card.id);

    let mut patch = PatchSet::default();
    let mut matched: BTreeMap<String, &StoredCard> = BTreeMap::new();
    for card in stored {
        match signature_from_stored(&card.fields.line) {
            Some(signature)
                if desired.contains_key(signature.as_str())
                    && !matched.contains_key(&signature) =>
            {
                matched.insert(signature, card);
            }
            _ => patch.deletes.push(card.id),
        }
    }

    let mut required = Vec::with_capacity(matched.len());
    for (signature, card) in &matched {
        let draft = desired[signature.as_str()];
        let (fields, _) = draft.fields_for(card.id, matcher.namespace());
        if fields != card.fields {
            patch.updates.push(CardUpdate {
                id: card.id,
                fields,
            });
        }
        required.extend(draft.artifacts_for(card.id, matcher.namespace()));
    }

    patch.inserts = drafts
        .iter()
        .filter(|draft| !matched.contains_key(&draft.signature))
        .cloned()
        .collect();

    let touched: BTreeSet<RecordId> = patch
        .deletes
        .iter()
        .copied()
        .chain(matched.values().map(|card| card.id))
        .collect();
    let mut candidates: BTreeSet<&str> = snapshot
        .media
        .iter()
        .filter(|name| {
            matcher
                .parse(name)
                .is_some_and(|artifact| touched.contains(&artifact.record))
        })
        .map(String::as_str)
        .collect();

    for artifact in required {
        if !candidates.remove(artifact.name.as_str()) {
            patch.diagram_creates.push(artifact);
        }
    }
    patch.diagram_deletes = candidates.into_iter().map(str::to_string).collect();

    debug!(
        deletes = patch.deletes.len(),
        updates = patch.updates.len(),
        inserts = patch.inserts.len(),
        diagram_creates = patch.diagram_creates.len(),
        diagram_deletes = patch.diagram_deletes.len(),
        "planned patch"
    );
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::enums::{PreamblePolicy, Side};
    use drill_core::ids::DEFAULT_NAMESPACE;
    use drill_render::{RenderContext, render_line};
    use drill_study::{TreeBuilder, extract_lines, parse_study};
    use pretty_assertions::assert_eq;

    fn drafts(pgn: &str) -> Vec<CardDraft> {
        let mut builder = TreeBuilder::new();
        builder
            .ingest("study.pgn", &parse_study(pgn.as_bytes()).unwrap())
            .unwrap();
        let table = builder.finish();
        extract_lines(&table, Side::White, PreamblePolicy::Attach)
            .unwrap()
            .iter()
            .map(|line| render_line(line, &RenderContext::default()).unwrap())
            .collect()
    }

    fn matcher() -> ArtifactMatcher {
        ArtifactMatcher::new(DEFAULT_NAMESPACE).unwrap()
    }

    /// The snapshot a previous run over `drafts` would have left behind.
    fn materialized(drafts: &[CardDraft]) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for (i, draft) in drafts.iter().enumerate() {
            let id = RecordId::new(i64::try_from(i).unwrap() + 1);
            let (fields, _) = draft.fields_for(id, DEFAULT_NAMESPACE);
            snapshot.cards.push(StoredCard { id, fields });
            snapshot.media.extend(
                draft
                    .artifacts_for(id, DEFAULT_NAMESPACE)
                    .into_iter()
                    .map(|artifact| artifact.name.into_string()),
            );
        }
        snapshot
    }

    #[test]
    fn empty_store_inserts_everything() {
        let drafts = drafts("1. e4 e5 2. Nf3 *");
        let patch = plan(&drafts, &Snapshot::default(), &matcher()).unwrap();
        assert_eq!(patch.inserts.len(), 2);
        assert!(patch.deletes.is_empty());
        assert!(patch.updates.is_empty());
        assert_eq!(patch.projected().quintuple(), (2, 0, 0, 2, 0));
    }

    #[test]
    fn materialized_deck_needs_nothing() {
        let drafts = drafts("1. e4 e5 2. Nf3 (2. Bc4) *");
        let patch = plan(&drafts, &materialized(&drafts), &matcher()).unwrap();
        assert!(patch.is_empty(), "{patch:?}");
    }

    #[test]
    fn vanished_line_deletes_card_and_diagram() {
        let old = drafts("1. e4 e5 2. Nf3 Nc6 (2... d6 3. d4) 3. Bb5 *");
        let new = drafts("1. e4 e5 2. Nf3 Nc6 3. Bb5 *");
        let snapshot = materialized(&old);
        let patch = plan(&new, &snapshot, &matcher()).unwrap();

        assert_eq!(patch.deletes.len(), 1);
        assert_eq!(patch.diagram_deletes.len(), 1);
        let gone = ArtifactMatcher::new(DEFAULT_NAMESPACE)
            .unwrap()
            .parse(&patch.diagram_deletes[0])
            .unwrap();
        assert_eq!(gone.record, patch.deletes[0]);
        assert_eq!(patch.projected().quintuple(), (0, 0, 1, 0, 1));
    }

    #[test]
    fn comment_change_updates_in_place() {
        let old = drafts("1. e4 e5 2. Nf3 { Develops } *");
        let new = drafts("1. e4 e5 2. Nf3 { Attacks e5 } *");
        let patch = plan(&new, &materialized(&old), &matcher()).unwrap();
        assert_eq!(patch.updates.len(), 1);
        assert!(patch.updates[0].fields.answer.contains("Attacks e5"));
        // Same board, so the diagram survives.
        assert!(patch.diagram_creates.is_empty());
        assert!(patch.diagram_deletes.is_empty());
    }

    #[test]
    fn highlight_change_swaps_the_diagram() {
        let old = drafts("1. e4 e5 2. Nf3 *");
        let new = drafts("1. e4 e5 { [%cal Gf1c4] } 2. Nf3 *");
        let patch = plan(&new, &materialized(&old), &matcher()).unwrap();
        assert_eq!(patch.updates.len(), 1);
        assert_eq!(patch.diagram_creates.len(), 1);
        assert_eq!(patch.diagram_deletes.len(), 1);
        assert_ne!(
            patch.diagram_creates[0].name.as_str(),
            patch.diagram_deletes[0]
        );
    }

    #[test]
    fn missing_diagram_is_recreated() {
        let drafts = drafts("1. e4 e5 2. Nf3 *");
        let mut snapshot = materialized(&drafts);
        let lost = snapshot.media.remove(0);
        let patch = plan(&drafts, &snapshot, &matcher()).unwrap();
        assert!(patch.updates.is_empty());
        assert_eq!(patch.diagram_creates.len(), 1);
        assert_eq!(patch.diagram_creates[0].name.as_str(), lost);
    }

    #[test]
    fn duplicates_and_unreadable_payloads_are_deleted() {
        let drafts = drafts("1. e4 e5 *");
        let mut snapshot = materialized(&drafts);
        let original = snapshot.cards[0].clone();
        snapshot.cards.push(StoredCard {
            id: RecordId::new(10),
            fields: original.fields.clone(),
        });
        snapshot.cards.push(StoredCard {
            id: RecordId::new(11),
            fields: CardFields {
                line: "not json".into(),
                ..CardFields::default()
            },
        });
        let patch = plan(&drafts, &snapshot, &matcher()).unwrap();
        assert_eq!(patch.deletes, vec![RecordId::new(10), RecordId::new(11)]);
        assert!(patch.updates.is_empty());
        assert!(patch.inserts.is_empty());
    }

    #[test]
    fn foreign_media_is_left_alone() {
        let drafts = drafts("1. e4 e5 *");
        let mut snapshot = materialized(&drafts);
        snapshot.media.push("portrait.png".into());
        snapshot.media.push(format!(
            "{DEFAULT_NAMESPACE}-99-0123456789abcdef0123456789abcdef01234567.svg"
        ));
        let patch = plan(&drafts, &snapshot, &matcher()).unwrap();
        assert!(patch.is_empty(), "{patch:?}");
    }

    #[test]
    fn duplicate_drafts_are_an_invariant_fault() {
        let mut drafts = drafts("1. e4 e5 *");
        drafts.push(drafts[0].clone());
        let err = plan(&drafts, &Snapshot::default(), &matcher()).unwrap_err();
        assert!(matches!(err, SyncError::Invariant(_)));
    }
}

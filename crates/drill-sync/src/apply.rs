//! Apply a [`PatchSet`] to a store.

use drill_core::responses::SyncReport;
use drill_core::store::{CardFields, DeckStore, Scope};
use drill_render::{DiagramArtifact, Rasterizer};
use tracing::{debug, trace};

use crate::error::SyncError;
use crate::plan::{PatchSet, count};

async fn write_diagram<S: DeckStore, R: Rasterizer>(
    store: &S,
    rasterizer: &R,
    artifact: &DiagramArtifact,
) -> Result<(), SyncError> {
    let bytes = rasterizer.rasterize(&artifact.diagram)?;
    store.write_media(artifact.name.as_str(), &bytes).await?;
    trace!(name = %artifact.name, "wrote diagram");
    Ok(())
}

/// Apply `patch`, in order: card deletes, orphaned diagram deletes, updates
/// and the missing diagrams of matched cards, then inserts.
///
/// Each insert reserves an empty record first, because its diagram name
/// embeds the new record's id.
///
/// # Errors
///
/// Returns the first store or rendering failure. Everything applied before it
/// stays applied.
pub async fn apply<S: DeckStore, R: Rasterizer>(
    patch: &PatchSet,
    store: &S,
    rasterizer: &R,
    scope: &Scope,
    namespace: &str,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    if !patch.deletes.is_empty() {
        store.delete_cards(&patch.deletes).await?;
        report.deleted = count(patch.deletes.len());
    }

    if !patch.diagram_deletes.is_empty() {
        store.delete_media(&patch.diagram_deletes).await?;
        report.diagrams_deleted = count(patch.diagram_deletes.len());
    }

    for update in &patch.updates {
        store.update_card(update.id, &update.fields).await?;
        report.updated += 1;
    }
    for artifact in &patch.diagram_creates {
        write_diagram(store, rasterizer, artifact).await?;
        report.diagrams_created += 1;
    }

    for draft in &patch.inserts {
        let id = store.create_card(scope, &CardFields::default()).await?;
        let (fields, _) = draft.fields_for(id, namespace);
        store.update_card(id, &fields).await?;
        report.inserted += 1;
        for artifact in draft.artifacts_for(id, namespace) {
            write_diagram(store, rasterizer, &artifact).await?;
            report.diagrams_created += 1;
        }
        debug!(%id, signature = %draft.signature, "inserted card");
    }

    Ok(report)
}

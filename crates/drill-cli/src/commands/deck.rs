use std::path::Path;

use drill_config::DrillConfig;
use drill_core::ids::ArtifactMatcher;
use drill_core::responses::{DeckCreated, MediaCollected};
use drill_store::LocalDeck;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DeckCommands;
use crate::output::output;

pub async fn handle(
    action: &DeckCommands,
    root: &Path,
    config: &DrillConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = LocalDeck::open(&config.store, root).await?;
    match action {
        DeckCommands::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("deck name must not be empty");
            }
            let created = store.db().create_deck(name).await?;
            output(
                &DeckCreated {
                    name: name.to_string(),
                    created,
                },
                flags.format,
            )
        }
        DeckCommands::List => output(&store.db().list_decks().await?, flags.format),
        DeckCommands::Gc { dry_run } => {
            let collected = collect(&store, config, *dry_run).await?;
            output(&collected, flags.format)
        }
    }
}

async fn collect(
    store: &LocalDeck,
    config: &DrillConfig,
    dry_run: bool,
) -> anyhow::Result<MediaCollected> {
    config.validate()?;
    let namespace = config.store.namespace.clone();
    let matcher = ArtifactMatcher::new(&namespace)?;
    let orphans = store.orphaned_media(&matcher).await?;
    if !dry_run && !orphans.is_empty() {
        store.media().delete(&orphans).await?;
        tracing::info!(removed = orphans.len(), "deleted orphaned diagrams");
    }
    Ok(MediaCollected {
        namespace,
        orphans,
        deleted: !dry_run,
    })
}

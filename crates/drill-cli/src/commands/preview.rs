use drill_config::DrillConfig;
use drill_core::enums::Side;
use drill_core::responses::{CardPreview, PreviewResponse};
use drill_render::SvgBoard;
use drill_store::MemoryStore;
use drill_sync::{SyncEngine, SyncOptions};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PreviewArgs;
use crate::discover::discover_studies;
use crate::output::output;

/// Deck name used when none is configured; preview never reads the deck.
const PREVIEW_DECK: &str = "preview";

pub async fn handle(
    args: &PreviewArgs,
    config: &DrillConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = execute(args, config).await?;
    output(&response, flags.format)
}

async fn execute(args: &PreviewArgs, config: &DrillConfig) -> anyhow::Result<PreviewResponse> {
    let side = args.side.map_or(config.deck.side, Side::from);
    let deck = if config.deck.is_configured() {
        config.deck.name.as_str()
    } else {
        PREVIEW_DECK
    };
    let studies = discover_studies(&args.paths)?;

    let options = SyncOptions::from_config(config, deck, side)?;
    let engine = SyncEngine::new(MemoryStore::with_deck(deck), SvgBoard::default(), options)?;
    let rendered = engine.preview(&studies).await?;

    Ok(PreviewResponse {
        side: side.to_string(),
        cards: rendered
            .drafts
            .iter()
            .map(|draft| CardPreview {
                signature: draft.signature.clone(),
                question: draft.preview_question(),
                answer: draft.answer.clone(),
            })
            .collect(),
        skipped_documents: rendered.skipped,
    })
}

#[cfg(test)]
mod tests {
    use drill_config::DrillConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::execute;
    use crate::cli::SideArg;
    use crate::cli::root_commands::PreviewArgs;

    #[tokio::test]
    async fn preview_renders_cards_for_the_chosen_side() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.pgn"), "1. e4 e5 (1... c5) *").unwrap();
        let args = PreviewArgs {
            paths: vec![dir.path().to_path_buf()],
            side: Some(SideArg::Black),
        };

        let response = execute(&args, &DrillConfig::default()).await.unwrap();
        assert_eq!(response.side, "black");
        assert_eq!(response.cards.len(), 1);
        assert_eq!(response.cards[0].answer, "1... c5<br>1... e5");
        assert!(response.cards[0].question.contains(".svg"));
        assert!(response.skipped_documents.is_empty());
    }

    #[tokio::test]
    async fn preview_reports_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let args = PreviewArgs {
            paths: vec![dir.path().join("missing.pgn")],
            side: None,
        };

        let response = execute(&args, &DrillConfig::default()).await.unwrap();
        assert!(response.cards.is_empty());
        assert_eq!(response.skipped_documents.len(), 1);
    }
}

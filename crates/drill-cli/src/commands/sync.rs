use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use drill_config::{DrillConfig, ImportConfig, PROJECT_DIR};
use drill_core::enums::Side;
use drill_core::responses::SyncReport;
use drill_render::SvgBoard;
use drill_store::LocalDeck;
use drill_sync::{SyncEngine, SyncOptions};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SyncArgs;
use crate::discover::discover_studies;
use crate::output::output;

pub async fn handle(
    args: &SyncArgs,
    root: &Path,
    config: &DrillConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let report = execute(args, root, config).await?;
    output(&report, flags.format)
}

async fn execute(
    args: &SyncArgs,
    root: &Path,
    config: &DrillConfig,
) -> anyhow::Result<SyncReport> {
    let deck = match &args.deck {
        Some(deck) => deck.clone(),
        None => config.require_deck()?.to_string(),
    };
    let side = resolve_side(args, config, &deck);
    let inputs: Vec<PathBuf> = if args.paths.is_empty() {
        config
            .studies_for(&deck)?
            .files
            .iter()
            .map(|file| root.join(file))
            .collect()
    } else {
        args.paths.clone()
    };
    let studies = discover_studies(&inputs)?;
    tracing::debug!(%deck, %side, studies = studies.len(), "starting sync");

    let store = LocalDeck::open(&config.store, root).await?;
    let options = SyncOptions::from_config(config, &deck, side)?;
    let engine = Arc::new(SyncEngine::new(store, SvgBoard::default(), options)?);

    if args.dry_run {
        return Ok(engine.plan_only(&studies).await?.report());
    }

    let worker = Arc::clone(&engine);
    let report = tokio::spawn(async move { worker.run(&studies).await })
        .await
        .context("sync task panicked")??;

    if !args.paths.is_empty() {
        record_import(root, &deck, side, &args.paths).await?;
    }
    Ok(report)
}

/// `--side`, then the side recorded for the deck, then `deck.side`.
fn resolve_side(args: &SyncArgs, config: &DrillConfig, deck: &str) -> Side {
    args.side.map_or_else(
        || {
            config
                .imports
                .get(deck)
                .map_or(config.deck.side, |import| import.side)
        },
        Side::from,
    )
}

/// Remember `paths` as the studies of `deck` in the project config, so later
/// runs can omit them.
async fn record_import(
    root: &Path,
    deck: &str,
    side: Side,
    paths: &[PathBuf],
) -> anyhow::Result<()> {
    let config_path = root.join(PROJECT_DIR).join("config.toml");
    let mut document = match tokio::fs::read_to_string(&config_path).await {
        Ok(text) => text
            .parse::<toml::Table>()
            .with_context(|| format!("failed to parse {}", config_path.display()))?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read {}", config_path.display()));
        }
    };

    let import = ImportConfig {
        side,
        files: paths.iter().map(|path| project_relative(root, path)).collect(),
    };
    let imports = document
        .entry("imports")
        .or_insert(toml::Value::Table(toml::Table::new()));
    let Some(imports) = imports.as_table_mut() else {
        anyhow::bail!("'imports' in {} is not a table", config_path.display());
    };
    imports.insert(deck.to_string(), toml::Value::try_from(&import)?);

    if let Some(parent) = config_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&config_path, toml::to_string_pretty(&document)?)
        .await
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    tracing::debug!(%deck, files = import.files.len(), "recorded import");
    Ok(())
}

fn project_relative(root: &Path, path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    absolute
        .strip_prefix(&root)
        .map_or(absolute.clone(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use drill_config::{DrillConfig, ImportConfig};
    use drill_core::enums::Side;
    use drill_store::LocalDeck;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{execute, record_import, resolve_side};
    use crate::cli::SideArg;
    use crate::cli::root_commands::SyncArgs;

    const DECK: &str = "Repertoire";

    fn args(paths: Vec<PathBuf>, side: Option<SideArg>, dry_run: bool) -> SyncArgs {
        SyncArgs {
            paths,
            side,
            deck: Some(DECK.to_string()),
            dry_run,
        }
    }

    async fn project_with_deck() -> TempDir {
        let dir = TempDir::new().unwrap();
        let store = LocalDeck::open(&DrillConfig::default().store, dir.path())
            .await
            .unwrap();
        store.db().create_deck(DECK).await.unwrap();
        std::fs::create_dir(dir.path().join("studies")).unwrap();
        std::fs::write(
            dir.path().join("studies/open.pgn"),
            "1. e4 e5 2. Nf3 Nc6 3. Bb5 *",
        )
        .unwrap();
        dir
    }

    #[test]
    fn side_prefers_flag_then_import_then_deck_default() {
        let mut config = DrillConfig::default();
        assert_eq!(resolve_side(&args(vec![], None, false), &config, DECK), config.deck.side);

        config.imports.insert(
            DECK.to_string(),
            ImportConfig {
                side: Side::Black,
                files: vec![PathBuf::from("a.pgn")],
            },
        );
        assert_eq!(resolve_side(&args(vec![], None, false), &config, DECK), Side::Black);
        assert_eq!(
            resolve_side(&args(vec![], Some(SideArg::White), false), &config, DECK),
            Side::White
        );
    }

    #[tokio::test]
    async fn sync_then_resync_from_recorded_import() {
        let dir = project_with_deck().await;
        let studies = dir.path().join("studies");

        let first = execute(
            &args(vec![studies], Some(SideArg::White), false),
            dir.path(),
            &DrillConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(first.quintuple(), (3, 0, 0, 3, 0));

        let config = DrillConfig::load_from(dir.path()).unwrap();
        let import = config.studies_for(DECK).unwrap();
        assert_eq!(import.side, Side::White);
        assert_eq!(import.files, vec![PathBuf::from("studies")]);

        let second = execute(&args(vec![], None, false), dir.path(), &config)
            .await
            .unwrap();
        assert!(second.is_noop(), "{second:?}");
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let dir = project_with_deck().await;
        let report = execute(
            &args(vec![dir.path().join("studies")], None, true),
            dir.path(),
            &DrillConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.inserted, 3);
        assert!(!dir.path().join(".drill/media").exists());
        assert!(!dir.path().join(".drill/config.toml").exists());
    }

    #[tokio::test]
    async fn sync_without_files_or_import_fails() {
        let dir = project_with_deck().await;
        let err = execute(&args(vec![], None, false), dir.path(), &DrillConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No study files"), "{err:#}");
    }

    #[tokio::test]
    async fn unknown_deck_is_a_configuration_error() {
        let dir = project_with_deck().await;
        let mut sync = args(vec![dir.path().join("studies")], None, false);
        sync.deck = Some("Missing".to_string());

        let err = execute(&sync, dir.path(), &DrillConfig::default())
            .await
            .unwrap_err();
        let sync_error = err.downcast_ref::<drill_sync::SyncError>().unwrap();
        assert_eq!(sync_error.kind(), "config");
    }

    #[tokio::test]
    async fn recording_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".drill")).unwrap();
        std::fs::write(
            dir.path().join(".drill/config.toml"),
            "[deck]\nname = \"Repertoire\"\n",
        )
        .unwrap();

        record_import(dir.path(), DECK, Side::Black, &[dir.path().join("a.pgn")])
            .await
            .unwrap();

        let config = DrillConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.deck.name, DECK);
        assert_eq!(
            config.imports[DECK].files,
            vec![Path::new("a.pgn").to_path_buf()]
        );
    }
}

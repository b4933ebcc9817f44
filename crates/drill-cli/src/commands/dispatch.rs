use std::path::Path;

use drill_config::DrillConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    root: &Path,
    config: &DrillConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::handle(&args, root, config, flags).await,
        Commands::Preview(args) => commands::preview::handle(&args, config, flags).await,
        Commands::Deck { action } => commands::deck::handle(&action, root, config, flags).await,
        Commands::Config => commands::config::handle(config),
    }
}

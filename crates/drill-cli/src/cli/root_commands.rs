use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::global::SideArg;
use crate::cli::subcommands::DeckCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Bring a deck in sync with PGN studies.
    Sync(SyncArgs),
    /// Render cards without touching the deck.
    Preview(PreviewArgs),
    /// Deck management.
    Deck {
        #[command(subcommand)]
        action: DeckCommands,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Study files or directories (directories are searched for *.pgn).
    /// Defaults to the files recorded for the deck.
    pub paths: Vec<PathBuf>,

    /// Side whose moves are drilled
    #[arg(long, value_enum)]
    pub side: Option<SideArg>,

    /// Destination deck (defaults to deck.name)
    #[arg(long)]
    pub deck: Option<String>,

    /// Compute the changes without applying them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PreviewArgs {
    /// Study files or directories (directories are searched for *.pgn)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Side whose moves are drilled
    #[arg(long, value_enum)]
    pub side: Option<SideArg>,
}

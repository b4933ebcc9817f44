use clap::Subcommand;

/// Deck management.
#[derive(Clone, Debug, Subcommand)]
pub enum DeckCommands {
    /// Create a deck.
    Add {
        /// Deck name
        name: String,
    },
    /// List decks with their card counts.
    List,
    /// Delete diagrams whose card no longer exists.
    Gc {
        /// List the orphaned diagrams without deleting them
        #[arg(long)]
        dry_run: bool,
    },
}

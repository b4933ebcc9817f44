use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat, SideArg};
pub use root_commands::Commands;

/// Top-level CLI parser for the `drill` binary.
#[derive(Debug, Parser)]
#[command(
    name = "drill",
    version,
    about = "Opening Drill - PGN studies to drill cards"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::subcommands::DeckCommands;
    use super::{Cli, Commands, GlobalFlags, OutputFormat, SideArg};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["drill", "--format", "table", "--verbose", "config"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["drill", "deck", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Deck {
                action: DeckCommands::List
            }
        ));
    }

    #[test]
    fn deck_gc_takes_dry_run() {
        let cli = Cli::try_parse_from(["drill", "deck", "gc", "--dry-run"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Deck {
                action: DeckCommands::Gc { dry_run: true }
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["drill", "--format", "xml", "config"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn sync_takes_paths_and_options() {
        let cli = Cli::try_parse_from([
            "drill",
            "sync",
            "studies",
            "extra.pgn",
            "--side",
            "black",
            "--deck",
            "Sicilian",
            "--dry-run",
        ])
        .expect("cli should parse");

        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(
            args.paths,
            vec![PathBuf::from("studies"), PathBuf::from("extra.pgn")]
        );
        assert_eq!(args.side, Some(SideArg::Black));
        assert_eq!(args.deck.as_deref(), Some("Sicilian"));
        assert!(args.dry_run);
    }

    #[test]
    fn sync_paths_are_optional() {
        let cli = Cli::try_parse_from(["drill", "sync"]).expect("cli should parse");
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert!(args.paths.is_empty());
        assert!(!args.dry_run);
    }

    #[test]
    fn preview_requires_paths() {
        assert!(Cli::try_parse_from(["drill", "preview"]).is_err());
    }

    #[test]
    fn side_rejects_unknown_color() {
        assert!(Cli::try_parse_from(["drill", "sync", "--side", "green"]).is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["drill", "--project", "/tmp/demo", "config"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::{ExpiryPolicy, SortBy, SortOrder};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "qcd",
    version,
    about = "Quick countdown timers from free-form text like \"1d 2h 20m food is ready\".",
    after_help = "Examples:\n  qcd                          Launch the TUI (same as `qcd tui`)\n  qcd parse 12h cat is 30h old\n  qcd run 3m tea is ready\n  qcd tui --sort-by time --order asc"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the tracing filter (e.g. "info", "qcd_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    /// What to do with countdowns once they reach zero
    #[arg(long, value_enum, global = true)]
    pub expiry: Option<ExpiryPolicy>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui(TuiArgs),
    /// Show how a piece of text is split into a duration and a label
    Parse(ParseArgs),
    /// Run a single countdown in the foreground, printing once per second
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct TuiArgs {
    /// Skip the single-instance check
    #[arg(long)]
    pub allow_multiple: bool,

    /// Initial sort field
    #[arg(long = "sort-by", value_enum, value_name = "FIELD")]
    pub sort_by: Option<SortBy>,

    /// Initial sort order
    #[arg(long, value_enum, value_name = "ORDER")]
    pub order: Option<SortOrder>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Countdown text, e.g. `29m Singing bowl`
    #[arg(value_name = "TEXT", required = true, allow_negative_numbers = true)]
    pub text: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Countdown text, e.g. `3m tea is ready`
    #[arg(value_name = "TEXT", required = true, allow_negative_numbers = true)]
    pub text: Vec<String>,
}

impl ParseArgs {
    pub fn joined(&self) -> String {
        self.text.join(" ")
    }
}

impl RunArgs {
    pub fn joined(&self) -> String {
        self.text.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_subcommand_collects_text() {
        let cli = Cli::parse_from(["qcd", "parse", "1", "day", "cat", "--json"]);
        match cli.command {
            Some(CliCommand::Parse(args)) => {
                assert_eq!(args.joined(), "1 day cat");
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::parse_from(["qcd", "tui", "--expiry", "remove", "--sort-by", "time"]);
        assert_eq!(cli.expiry, Some(ExpiryPolicy::Remove));
        match cli.command {
            Some(CliCommand::Tui(args)) => {
                assert_eq!(args.sort_by, Some(SortBy::RemainingTime));
                assert!(!args.allow_multiple);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::parse_from(["qcd"]);
        assert!(cli.command.is_none());
    }
}

//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Host alerting tool
///
/// Evaluate threshold rules against host snapshots and deliver alerts through
/// push services with mail fallback.
#[derive(Parser, Debug)]
#[command(name = "hostalert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HOSTALERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Push destination URL (repeatable, replaces configured URLs)
    #[arg(
        long = "notify-url",
        global = true,
        env = "HOSTALERT_NOTIFY_URL",
        value_delimiter = ','
    )]
    pub notify_urls: Vec<String>,

    /// Base URL used for deep links
    #[arg(long, global = true)]
    pub app_url: Option<String>,

    /// Per-attempt delivery timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Dry run mode - log notifications instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a snapshot update and deliver resulting alerts
    Evaluate(EvaluateArgs),

    /// Send a test notification to a destination URL
    TestSend {
        /// Destination URL (e.g. ntfy://ntfy.sh/alerts, mailto:ops@example.com)
        url: String,
    },

    /// Show configured channels and known capabilities
    Channels,

    /// List rules and recipients from the rule file
    Rules {
        /// Rule file (defaults to the configured path)
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the evaluate command
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Snapshot update JSON file ("-" for stdin)
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Rule file (defaults to the configured path)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_channels() {
        let args = Cli::try_parse_from(["hostalert", "channels"]).unwrap();
        assert!(matches!(args.command, Commands::Channels));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["hostalert", "-v", "channels"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_evaluate() {
        let args = Cli::try_parse_from([
            "hostalert",
            "evaluate",
            "--snapshot",
            "snap.json",
            "--rules",
            "rules.toml",
        ])
        .unwrap();

        if let Commands::Evaluate(eval) = args.command {
            assert_eq!(eval.snapshot, PathBuf::from("snap.json"));
            assert_eq!(eval.rules, Some(PathBuf::from("rules.toml")));
        } else {
            panic!("Expected Evaluate command");
        }
    }

    #[test]
    fn test_cli_evaluate_requires_snapshot() {
        assert!(Cli::try_parse_from(["hostalert", "evaluate"]).is_err());
    }

    #[test]
    fn test_cli_parse_test_send() {
        let args = Cli::try_parse_from(["hostalert", "test-send", "ntfy://ntfy.sh/alerts"]).unwrap();
        if let Commands::TestSend { url } = args.command {
            assert_eq!(url, "ntfy://ntfy.sh/alerts");
        } else {
            panic!("Expected TestSend command");
        }
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let args = Cli::try_parse_from([
            "hostalert",
            "--notify-url",
            "ntfy://a.example.com/x",
            "--notify-url",
            "discord://token@channel",
            "--timeout",
            "5",
            "--dry-run",
            "channels",
        ])
        .unwrap();

        assert_eq!(args.notify_urls.len(), 2);
        assert_eq!(args.timeout, Some(5));
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_timeout_validation() {
        let result = Cli::try_parse_from(["hostalert", "--timeout", "0", "channels"]);
        assert!(result.is_err());
    }
}

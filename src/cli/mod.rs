//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PiiFlag using clap.
//!
//! Exit codes:
//! - `0` success
//! - `2` configuration or model artifact error
//! - `3` input error (unreadable source, no text column, empty batch)
//! - `5` fatal error

pub mod commands;

use crate::domain::PiiFlagError;
use clap::{Parser, Subcommand};

/// Success
pub const EXIT_OK: i32 = 0;
/// Configuration or model artifact error
pub const EXIT_CONFIG: i32 = 2;
/// Input error
pub const EXIT_INPUT: i32 = 3;
/// Fatal error
pub const EXIT_FATAL: i32 = 5;

/// PiiFlag - Hybrid PII flagging for free-text records
#[derive(Parser, Debug)]
#[command(name = "piiflag")]
#[command(version, about, long_about = None)]
#[command(author = "PiiFlag Contributors")]
pub struct Cli {
    /// Path to configuration file (built-in defaults when absent)
    #[arg(short, long, default_value = "piiflag.toml", env = "PIIFLAG_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PIIFLAG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every record of a CSV or JSON Lines file
    Score(commands::score::ScoreArgs),

    /// Summarise a scored output file
    Report(commands::report::ReportArgs),

    /// Show how a single text is scored
    Explain(commands::explain::ExplainArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Exit code for a library error
pub fn exit_code_for(error: &PiiFlagError) -> i32 {
    match error {
        PiiFlagError::Configuration(_) | PiiFlagError::Model(_) => EXIT_CONFIG,
        PiiFlagError::Input(_) | PiiFlagError::EmptyBatch => EXIT_INPUT,
        _ => EXIT_FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelError;
    use crate::scoring::ScoringMode;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_score() {
        let cli = Cli::parse_from(["piiflag", "score", "--input", "in.csv", "--output", "out.csv"]);
        assert_eq!(cli.config, "piiflag.toml");
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.input, PathBuf::from("in.csv"));
                assert_eq!(args.scoring.mode, ScoringMode::Auto);
                assert!(args.scoring.alpha.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_score_mode() {
        let cli = Cli::parse_from([
            "piiflag", "score", "-i", "in.jsonl", "-o", "out.csv", "--mode", "regex",
            "--threshold", "0.4",
        ]);
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.scoring.mode, ScoringMode::Regex);
                assert_eq!(args.scoring.threshold, Some(0.4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["piiflag", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["piiflag", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_report() {
        let cli = Cli::parse_from(["piiflag", "report", "--preds", "out.csv"]);
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.top, 15);
                assert_eq!(args.borderline, 0.35);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_explain() {
        let cli = Cli::parse_from(["piiflag", "explain", "Contato: maria@x.com"]);
        assert!(matches!(cli.command, Commands::Explain(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&PiiFlagError::Configuration("x".into())), EXIT_CONFIG);
        assert_eq!(
            exit_code_for(&PiiFlagError::Model(ModelError::NotFound("m.json".into()))),
            EXIT_CONFIG
        );
        assert_eq!(exit_code_for(&PiiFlagError::EmptyBatch), EXIT_INPUT);
        assert_eq!(exit_code_for(&PiiFlagError::Input("x".into())), EXIT_INPUT);
        assert_eq!(exit_code_for(&PiiFlagError::Io("x".into())), EXIT_FATAL);
    }
}

//! Command-line interface for pair-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **pair**: Compute this round's pairing table from the directory
//! - **swap**: Exchange two participants between rows of the stored table
//! - **show**: Print the stored table
//! - **publish**: Archive the table and record it in everyone's history
//! - **score**: Explain the compatibility score of two participants
//!
//! ## Usage
//!
//! ```text
//! # Pair everyone who confirmed
//! pair-solver pair --store data/
//!
//! # Preview without saving, with a softer avoid penalty
//! pair-solver pair --store data/ --dry-run --weight-avoid 200
//!
//! # Swap participant 1 of row 1 with participant 2 of row 3
//! pair-solver swap --store data/ A1,B3
//!
//! # Publish for a meeting date
//! pair-solver publish --store data/ --date 2024-05-06
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::matching::engine::EngineConfig;
use crate::store::JsonFileStore;

pub mod pair;
pub mod publish;
pub mod score;
pub mod show;
pub mod swap;

#[derive(Parser)]
#[command(name = "pair-solver")]
#[command(version)]
#[command(about = "Pair community members for one-on-one meetings")]
#[command(
    long_about = "pair-solver pairs the members of a community for recurring one-on-one meetings.\n\nIt reads the participant directory, scores every possible pair and picks the exact best perfect matching:\n- Shared interests raise a score, explicit preferences adjust it\n- People who have met before are steered apart\n- Operators can swap people between rows before publishing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a pairing table for the current round
    Pair(pair::PairArgs),

    /// Swap two participants between rows, e.g. A1,B2
    Swap(swap::SwapArgs),

    /// Show the stored pairing table
    Show(show::ShowArgs),

    /// Archive the stored table and update history
    Publish(publish::PublishArgs),

    /// Show the score breakdown for two participants
    Score(score::ScoreArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Store location and engine settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Directory holding userdata.json and the pairing tables
    #[arg(long, required = true)]
    pub store: PathBuf,

    /// JSON file with weights, padding ids and the history date format
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bonus when either participant promotes the other
    #[arg(long)]
    pub weight_promote: Option<i64>,

    /// Penalty when either participant avoids the other
    #[arg(long)]
    pub weight_avoid: Option<i64>,

    /// Penalty when the two have met before
    #[arg(long)]
    pub weight_history: Option<i64>,

    /// Penalty for pairing someone with themself
    #[arg(long)]
    pub weight_self: Option<i64>,
}

impl EngineArgs {
    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store)
    }

    /// Configuration file (or defaults) with weight flags applied on top
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        let weights = &mut config.weights;
        if let Some(w) = self.weight_promote {
            weights.promote = w;
        }
        if let Some(w) = self.weight_avoid {
            weights.avoid = w;
        }
        if let Some(w) = self.weight_history {
            weights.history = w;
        }
        if let Some(w) = self.weight_self {
            weights.self_match = w;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(config: Option<PathBuf>) -> EngineArgs {
        EngineArgs {
            store: PathBuf::from("."),
            config,
            weight_promote: None,
            weight_avoid: Some(50),
            weight_history: None,
            weight_self: None,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"weights": {{"avoid": 700, "history": 30}}}}"#).unwrap();
        file.flush().unwrap();

        let config = args(Some(file.path().to_path_buf())).engine_config().unwrap();
        assert_eq!(config.weights.avoid, 50);
        assert_eq!(config.weights.history, 30);
        assert_eq!(config.weights.promote, 10);
    }

    #[test]
    fn test_missing_config_file() {
        let result = args(Some(PathBuf::from("/nonexistent/config.json"))).engine_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "pair-solver",
            "--format",
            "json",
            "show",
            "--store",
            "data",
            "--view",
            "tiny",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Show(_)));
    }
}

//! Pair command - compute this round's pairing table.
//!
//! Reads the directory, pairs the eligible participants and replaces the
//! stored table unless `--dry-run` is given.

use clap::Args;

use crate::cli::show::{print_snapshot, TableView};
use crate::cli::{EngineArgs, OutputFormat};
use crate::core::types::ParticipantId;
use crate::matching::engine::PairingEngine;

#[derive(Args)]
pub struct PairArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Pair exactly these ids (comma-separated) instead of everyone who
    /// confirmed for the round
    #[arg(long, value_delimiter = ',')]
    pub participants: Option<Vec<String>>,

    /// Compute and print the table without saving it
    #[arg(long)]
    pub dry_run: bool,

    /// Which columns to print
    #[arg(long, default_value = "short")]
    pub view: TableView,
}

/// Execute the pair command
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the directory cannot
/// be read, or pairing fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: PairArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.engine.engine_config()?;
    let store = args.engine.open_store();
    let engine = PairingEngine::with_config(&store, config)?;

    let eligible: Option<Vec<ParticipantId>> = args.participants.as_ref().map(|ids| {
        ids.iter()
            .map(|id| ParticipantId::new(id.trim()))
            .collect()
    });

    let run = if args.dry_run {
        engine.generate(eligible.as_deref())?
    } else {
        engine.run(eligible.as_deref())?
    };

    if verbose {
        let w = engine.config().weights;
        eprintln!(
            "Weights: promote {}, avoid {}, history {}, self {}",
            w.promote, w.avoid, w.history, w.self_match
        );
        eprintln!(
            "Paired {} participants into {} pairs{}",
            run.participants,
            run.table().len(),
            run.placeholder
                .as_ref()
                .map(|id| format!(" (placeholder {id} dropped)"))
                .unwrap_or_default()
        );
    }

    print_snapshot(&run.snapshot, args.view, format)?;

    if matches!(format, OutputFormat::Text) {
        println!("\nTotal score: {}", run.table().total_score());
        if args.dry_run {
            println!("Dry run: table not saved");
        }
    }

    Ok(())
}

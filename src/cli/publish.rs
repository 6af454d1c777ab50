//! Publish command - archive the stored table and record it in history.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;

use crate::cli::{EngineArgs, OutputFormat};
use crate::matching::engine::PairingEngine;

#[derive(Args)]
pub struct PublishArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Meeting date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

/// Execute the publish command
///
/// # Errors
///
/// Returns an error if the date cannot be parsed, no table is stored, or a
/// row names a participant missing from the directory.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: PublishArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let date = match &args.date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?,
        None => chrono::Local::now().date_naive(),
    };

    let config = args.engine.engine_config()?;
    let store = args.engine.open_store();
    let engine = PairingEngine::with_config(&store, config)?;

    if verbose {
        eprintln!("Publishing for {date}");
    }

    let report = engine.publish(date)?;

    match format {
        OutputFormat::Text => {
            println!(
                "Published {} pairs under {} ({} new history entries)",
                report.pairs, report.date_key, report.history_added
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => {
            println!("date_key\tpairs\thistory_added");
            println!(
                "{}\t{}\t{}",
                report.date_key, report.pairs, report.history_added
            );
        }
    }

    Ok(())
}

//! Swap command - exchange two participants between rows of the stored table.

use clap::Args;

use crate::cli::show::{print_snapshot, TableView};
use crate::cli::{EngineArgs, OutputFormat};
use crate::matching::engine::PairingEngine;
use crate::matching::swap::SwapDirective;

#[derive(Args)]
pub struct SwapArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Two selectors, e.g. A1,B2: slot letter A (participant 1) or
    /// B (participant 2) followed by the 1-based row number
    #[arg(required = true)]
    pub directive: String,

    /// Which columns to print
    #[arg(long, default_value = "short")]
    pub view: TableView,
}

/// Execute the swap command
///
/// # Errors
///
/// Returns an error for a malformed or out-of-range directive, or if the
/// table or directory cannot be read. The stored table is unchanged then.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: SwapArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let directive: SwapDirective = args.directive.parse()?;

    let config = args.engine.engine_config()?;
    let store = args.engine.open_store();
    let engine = PairingEngine::with_config(&store, config)?;

    let snapshot = engine.swap(&directive)?;

    if verbose {
        eprintln!(
            "Swapped {} and {}; rows {} and {} rescored",
            directive.first,
            directive.second,
            directive.first.row + 1,
            directive.second.row + 1
        );
    }

    print_snapshot(&snapshot, args.view, format)
}

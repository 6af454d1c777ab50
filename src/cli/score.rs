//! Score command - explain the compatibility score of two participants.
//!
//! Useful before a swap to see what a new pair would score, or to check why
//! two people were kept apart.

use clap::Args;

use crate::cli::{EngineArgs, OutputFormat};
use crate::core::types::ParticipantId;
use crate::matching::engine::PairingEngine;
use crate::matching::scoring::{CompatibilityScore, ScoringWeights};

#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// First participant id
    #[arg(required = true)]
    pub first: String,

    /// Second participant id
    #[arg(required = true)]
    pub second: String,
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if either participant is not in the directory.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.engine.engine_config()?;
    let store = args.engine.open_store();
    let engine = PairingEngine::with_config(&store, config)?;

    let first = ParticipantId::new(args.first.trim());
    let second = ParticipantId::new(args.second.trim());
    let score = engine.score(&first, &second)?;
    let weights = engine.config().weights;

    if verbose {
        eprintln!(
            "Weights: promote {}, avoid {}, history {}, self {}",
            weights.promote, weights.avoid, weights.history, weights.self_match
        );
    }

    match format {
        OutputFormat::Text => print_text_result(&first, &second, &score, &weights),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "first": first,
                "second": second,
                "score": score,
                "weights": weights,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("first\tsecond\ttotal\tcommon\tpromoted\tavoided\tmet_before\tsame");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                first,
                second,
                score.total,
                score.common_interests.join(","),
                score.promoted,
                score.avoided,
                score.met_before,
                score.same_participant
            );
        }
    }

    Ok(())
}

fn print_text_result(
    first: &ParticipantId,
    second: &ParticipantId,
    score: &CompatibilityScore,
    weights: &ScoringWeights,
) {
    println!("Score {first} <> {second}: {}", score.total);
    println!(
        "\n   Common interests: {} ({})",
        score.common_interests.len(),
        if score.common_interests.is_empty() {
            "none".to_string()
        } else {
            score.common_interests.join(", ")
        }
    );
    if score.promoted {
        println!("   Promoted: +{}", weights.promote);
    }
    if score.avoided {
        println!("   Avoided: -{}", weights.avoid);
    }
    if score.met_before {
        println!("   Met before: -{}", weights.history);
    }
    if score.same_participant {
        println!("   Same participant: -{}", weights.self_match);
    }
}

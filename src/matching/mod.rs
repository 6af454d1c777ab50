//! Pairing engine: scoring, solving, assembly and post-hoc repair.
//!
//! - [`CompatibilityScorer`]: symmetric score between two participants
//! - [`CompatibilityMatrix`]: scores over one run's [`Roster`]
//! - [`AssignmentSolver`]: exact maximum-weight perfect matching
//! - [`PairingAssembler`]: solved index pairs to display rows
//! - [`SwapAdjuster`]: operator-directed exchange between two rows
//! - [`HistoryTracker`]: folds a published table into participant history
//! - [`PairingEngine`]: ties the above to a store
//!
//! ## Pipeline
//!
//! 1. **Roster**: eligible participants in a fixed order, plus one
//!    placeholder if the count is odd
//! 2. **Matrix**: every pair scored; the diagonal carries the self-match
//!    penalty
//! 3. **Solve**: weighted blossom on lifted scores, then the
//!    lexicographically smallest optimal matching
//! 4. **Assemble**: one row per pair (lower index first), placeholder pairs
//!    dropped
//!
//! ## Scoring
//!
//! ```text
//! score = |common interests|
//!       + promote    if either promotes the other
//!       - avoid      if either avoids the other
//!       - history    if they have met before
//!       - self_match if both sides are the same participant
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use pair_solver::{JsonFileStore, PairingEngine};
//!
//! let store = JsonFileStore::new("data");
//! let engine = PairingEngine::new(&store);
//! let run = engine.run(None).unwrap();
//!
//! for row in run.table() {
//!     println!("{} <> {} ({})", row.name1, row.name2, row.score);
//! }
//! ```

pub mod assembler;
pub(crate) mod blossom;
pub mod engine;
pub mod history;
pub mod matrix;
pub mod roster;
pub mod scoring;
pub mod solver;
pub mod swap;

pub use assembler::PairingAssembler;
pub use engine::{EngineConfig, PairingEngine, PairingRun, PublishReport};
pub use history::HistoryTracker;
pub use matrix::CompatibilityMatrix;
pub use roster::Roster;
pub use scoring::{CompatibilityScore, CompatibilityScorer, ScoringWeights};
pub use solver::{AssignmentSolver, Matching};
pub use swap::{DirectiveError, Selector, SwapAdjuster, SwapDirective};

//! # pair-solver
//!
//! A library for pairing community members for recurring one-on-one
//! meetings.
//!
//! Each round, everyone who confirmed is paired with exactly one other
//! person. Pairs are chosen to maximize shared interests while honouring
//! explicit "meet" and "avoid" preferences and steering away from repeats.
//!
//! ## Features
//!
//! - **Exact matching**: maximum-weight perfect matching, not a heuristic
//! - **Reproducible**: ties broken deterministically, runs fingerprinted
//! - **Odd rosters**: padded with a placeholder that never appears in output
//! - **Local repair**: swap two people between rows without re-solving
//! - **History**: publishing a table records who met whom
//!
//! ## Example
//!
//! ```rust,no_run
//! use pair_solver::{JsonFileStore, PairingEngine};
//!
//! let store = JsonFileStore::new("data");
//! let engine = PairingEngine::new(&store);
//!
//! // Pair everyone who confirmed and store the table
//! let run = engine.run(None).unwrap();
//! println!("{} pairs, total score {}", run.table().len(), run.table().total_score());
//!
//! // Move participant 1 of row 1 and participant 2 of row 2
//! engine.swap(&"A1,B2".parse().unwrap()).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Participants, directory and pairing table types
//! - [`matching`]: Scoring, solving, assembly, swaps and history
//! - [`store`]: Whole-snapshot persistence
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod error;
pub mod matching;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::pairing::{PairingRecord, PairingTable};
pub use core::participant::{Directory, Participant};
pub use core::types::*;
pub use error::{PairingError, Result};
pub use matching::engine::{EngineConfig, PairingEngine};
pub use store::{DirectoryStore, JsonFileStore, MemoryStore, PairingStore};

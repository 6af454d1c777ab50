//! Core data types for community pairing.
//!
//! - [`Participant`] and [`Directory`]: the member snapshot the engine reads
//! - [`PairingRecord`] and [`PairingTable`]: the display-ready output
//! - [`ParticipantId`], [`Slot`]: identifiers and swap addressing
//!
//! ## Table Layout
//!
//! Every stored row has exactly eight columns:
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |---|---|---|---|---|---|---|---|
//! | name1 | name2 | score | interests1 | interests2 | common | id1 | id2 |
//!
//! Slot `A` owns columns 0, 3, 6 and slot `B` owns 1, 4, 7.

pub mod pairing;
pub mod participant;
pub mod types;

pub use pairing::{PairingRecord, PairingTable};
pub use participant::{Directory, Participant};
pub use types::{ParticipantId, Slot};

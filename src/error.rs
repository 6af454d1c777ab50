use thiserror::Error;

use crate::core::types::ParticipantId;
use crate::store::StoreError;

/// Errors raised by the pairing engine.
///
/// Callers branch on the variant: validation problems are the operator's to
/// fix, missing participants point at a stale directory, and computation
/// errors indicate a solver bug. Store failures pass through unchanged.
#[derive(Error, Debug)]
pub enum PairingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Participant '{0}' not found in directory")]
    DataNotFound(ParticipantId),

    #[error("Solver invariant violated: {0}")]
    Computation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PairingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PairingError>;

use crate::core::pairing::{PairingRecord, PairingTable};
use crate::core::participant::{common_interests, join, Participant};
use crate::error::{PairingError, Result};
use crate::matching::matrix::CompatibilityMatrix;
use crate::matching::roster::Roster;
use crate::matching::solver::Matching;

/// Turns a solved matching into display rows
#[derive(Debug, Clone, Copy, Default)]
pub struct PairingAssembler;

impl PairingAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the pairing table for `matching`.
    ///
    /// Rows follow the lower index of each pair. Pairs with a placeholder
    /// are dropped.
    ///
    /// # Errors
    ///
    /// `Computation` if the matching is not a consistent involution over the
    /// roster, `Validation` if the number of real pairs does not equal half
    /// the real participant count (rounded down).
    pub fn assemble(
        &self,
        roster: &Roster,
        matrix: &CompatibilityMatrix,
        matching: &Matching,
    ) -> Result<PairingTable> {
        if matrix.dim() != roster.len() {
            return Err(PairingError::validation(format!(
                "matrix is {0}x{0} but the roster has {1} entries",
                matrix.dim(),
                roster.len()
            )));
        }

        let mates = matching.mates();
        if mates.len() != roster.len() {
            return Err(PairingError::computation(format!(
                "matching covers {} indices, roster has {}",
                mates.len(),
                roster.len()
            )));
        }

        let mut rows = Vec::with_capacity(mates.len() / 2);
        for (i, &j) in mates.iter().enumerate() {
            if mates.get(j) != Some(&i) || i == j {
                return Err(PairingError::computation(format!(
                    "index {i} is not paired consistently"
                )));
            }
            if i > j || roster.is_padding(i) || roster.is_padding(j) {
                continue;
            }
            let (Some(a), Some(b)) = (roster.participant(i), roster.participant(j)) else {
                continue;
            };
            rows.push(record(a, b, matrix.get(i, j)));
        }

        let expected = roster.real_count() / 2;
        if rows.len() != expected {
            return Err(PairingError::validation(format!(
                "assembled {} pairs for {} participants, expected {expected}",
                rows.len(),
                roster.real_count()
            )));
        }

        Ok(PairingTable::new(rows))
    }
}

/// Display row for `a` and `b` with an already known score
pub(crate) fn record(a: &Participant, b: &Participant, score: i64) -> PairingRecord {
    PairingRecord {
        name1: a.display_name.clone(),
        name2: b.display_name.clone(),
        score,
        interests1: a.interest_list(),
        interests2: b.interest_list(),
        common_interests: join(common_interests(a, b)),
        id1: a.id.clone(),
        id2: b.id.clone(),
    }
}

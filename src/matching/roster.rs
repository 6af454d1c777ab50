use std::collections::HashSet;

use crate::core::participant::{Directory, Participant};
use crate::core::types::ParticipantId;
use crate::error::{PairingError, Result};
use crate::utils::validation::check_participant_id;

/// Placeholder id used when none is configured
pub const DEFAULT_PADDING_ID: &str = "__padding__";

/// One position in the ordering the matrix is indexed by
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub participant: Participant,
    pub padding: bool,
}

/// Ordered snapshot of the participants taking part in one run, padded to
/// even length
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Resolve `eligible` against the directory and pad for parity.
    ///
    /// At most one placeholder is added: the first of `padding_ids` that is
    /// not itself eligible, or [`DEFAULT_PADDING_ID`].
    ///
    /// # Errors
    ///
    /// `Validation` for duplicate or malformed ids, `DataNotFound` for an
    /// eligible id missing from the directory.
    pub fn build(
        directory: &Directory,
        eligible: &[ParticipantId],
        padding_ids: &[ParticipantId],
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(eligible.len() + 1);

        for id in eligible {
            if let Some(problem) = check_participant_id(id.as_str()) {
                return Err(PairingError::validation(problem));
            }
            if !seen.insert(id) {
                return Err(PairingError::validation(format!(
                    "participant '{id}' listed more than once"
                )));
            }
            let participant = directory.require(id)?.clone();
            entries.push(RosterEntry {
                participant,
                padding: false,
            });
        }

        if entries.len() % 2 == 1 {
            let default_id = ParticipantId::new(DEFAULT_PADDING_ID);
            let placeholder = padding_ids
                .iter()
                .find(|id| !seen.contains(id))
                .unwrap_or(&default_id);
            if seen.contains(placeholder) {
                return Err(PairingError::validation(format!(
                    "placeholder id '{placeholder}' is also an eligible participant"
                )));
            }
            tracing::debug!(placeholder = %placeholder, "Padding odd roster");
            entries.push(RosterEntry {
                participant: Participant::placeholder(placeholder),
                padding: true,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn participant(&self, index: usize) -> Option<&Participant> {
        self.entries.get(index).map(|e| &e.participant)
    }

    pub fn is_padding(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.padding)
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.entries.iter().map(|e| e.participant.id.clone()).collect()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter().map(|e| &e.participant)
    }

    /// Number of entries, padding included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn real_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.padding).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Directory {
        ["U1", "U2", "U3"]
            .into_iter()
            .map(|id| Participant::new(id, id).confirmed())
            .collect()
    }

    fn ids(raw: &[&str]) -> Vec<ParticipantId> {
        raw.iter().map(|s| ParticipantId::new(*s)).collect()
    }

    #[test]
    fn test_even_roster_is_not_padded() {
        let roster = Roster::build(&directory(), &ids(&["U1", "U2"]), &[]).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.real_count(), 2);
        assert!(!roster.is_padding(1));
    }

    #[test]
    fn test_odd_roster_gets_one_default_placeholder() {
        let roster = Roster::build(&directory(), &ids(&["U1", "U2", "U3"]), &[]).unwrap();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.real_count(), 3);
        assert!(roster.is_padding(3));
        assert_eq!(
            roster.participant(3).unwrap().id,
            ParticipantId::new(DEFAULT_PADDING_ID)
        );
    }

    #[test]
    fn test_configured_placeholder_skips_eligible_ids() {
        let roster = Roster::build(
            &directory(),
            &ids(&["U1", "U2", "U3"]),
            &ids(&["U1", "BYE"]),
        )
        .unwrap();
        assert_eq!(roster.participant(3).unwrap().id, ParticipantId::new("BYE"));
    }

    #[test]
    fn test_only_parity_padding_is_added() {
        // A long configured list never adds more than parity needs
        let roster = Roster::build(
            &directory(),
            &ids(&["U1", "U2"]),
            &ids(&["X1", "X2", "X3"]),
        )
        .unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_missing_participant() {
        let err = Roster::build(&directory(), &ids(&["U1", "U9"]), &[]).unwrap_err();
        assert!(matches!(err, PairingError::DataNotFound(id) if id.as_str() == "U9"));
    }

    #[test]
    fn test_duplicate_participant() {
        let err = Roster::build(&directory(), &ids(&["U1", "U1"]), &[]).unwrap_err();
        assert!(matches!(err, PairingError::Validation(_)));
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::build(&directory(), &[], &[]).unwrap();
        assert!(roster.is_empty());
    }
}

//! Operator-directed local repair of a pairing table.
//!
//! A directive names two `(row, slot)` selectors, written `A1,B2`: the letter
//! picks participant 1 (`A`) or participant 2 (`B`) of a row, the number is the
//! 1-based row. The selected column groups are exchanged and only the
//! affected rows are re-scored.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::pairing::PairingTable;
use crate::core::participant::Directory;
use crate::core::types::Slot;
use crate::error::{PairingError, Result};
use crate::matching::assembler::record;
use crate::matching::scoring::CompatibilityScorer;

/// Problems parsing a swap directive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("empty swap directive")]
    Empty,

    #[error("expected two selectors separated by a comma, got {0}")]
    Arity(usize),

    #[error("selector '{0}' must be a slot letter followed by a row number")]
    Malformed(String),

    #[error("unknown slot '{0}', expected A or B")]
    UnknownSlot(char),

    #[error("row numbers start at 1")]
    ZeroRow,
}

impl From<DirectiveError> for PairingError {
    fn from(err: DirectiveError) -> Self {
        PairingError::Validation(err.to_string())
    }
}

/// One side of a swap: a row position and a column group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Zero-based row index
    pub row: usize,
    pub slot: Slot,
}

impl FromStr for Selector {
    type Err = DirectiveError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| DirectiveError::Malformed(s.to_string()))?;
        let digits = chars.as_str().trim();

        if !letter.is_ascii_alphabetic() {
            return Err(DirectiveError::Malformed(s.to_string()));
        }
        let slot = Slot::from_letter(letter).ok_or(DirectiveError::UnknownSlot(letter))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DirectiveError::Malformed(s.to_string()));
        }
        let number: usize = digits
            .parse()
            .map_err(|_| DirectiveError::Malformed(s.to_string()))?;
        let row = number.checked_sub(1).ok_or(DirectiveError::ZeroRow)?;

        Ok(Self { row, slot })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.slot, self.row + 1)
    }
}

/// Two selectors whose column groups are exchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapDirective {
    pub first: Selector,
    pub second: Selector,
}

impl FromStr for SwapDirective {
    type Err = DirectiveError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let inner = s.trim();
        let inner = inner
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(inner)
            .trim();
        if inner.is_empty() {
            return Err(DirectiveError::Empty);
        }

        let parts: Vec<&str> = inner.split(',').collect();
        let [first, second] = parts.as_slice() else {
            return Err(DirectiveError::Arity(parts.len()));
        };
        Ok(Self {
            first: first.parse()?,
            second: second.parse()?,
        })
    }
}

impl fmt::Display for SwapDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.first, self.second)
    }
}

/// Applies swap directives and re-scores the touched rows
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapAdjuster {
    scorer: CompatibilityScorer,
}

impl SwapAdjuster {
    pub fn new(scorer: CompatibilityScorer) -> Self {
        Self { scorer }
    }

    /// Exchange the two selected column groups in `table`.
    ///
    /// Score and common interests of each affected row are recomputed from
    /// the directory. On any error `table` is left unchanged.
    ///
    /// # Errors
    ///
    /// `Validation` for a row outside the table, `DataNotFound` if a
    /// participant in an affected row is missing from the directory.
    pub fn apply(
        &self,
        table: &mut PairingTable,
        directive: &SwapDirective,
        directory: &Directory,
    ) -> Result<()> {
        let SwapDirective { first, second } = *directive;
        for selector in [first, second] {
            if selector.row >= table.len() {
                return Err(PairingError::validation(format!(
                    "row {} is out of range for a table of {} rows",
                    selector.row + 1,
                    table.len()
                )));
            }
        }
        if first == second {
            return Ok(());
        }

        let mut updated = table.clone();
        let rows = updated.rows_mut();
        let a = rows[first.row].columns(first.slot);
        let b = rows[second.row].columns(second.slot);
        rows[first.row].set_columns(first.slot, b);
        rows[second.row].set_columns(second.slot, a);

        for index in [first.row, second.row] {
            let row = &rows[index];
            let p1 = directory.require(&row.id1)?;
            let p2 = directory.require(&row.id2)?;
            let mut rescored = record(p1, p2, self.scorer.score(p1, p2));
            // Display columns travel with the swap, only derived fields change
            rescored.name1.clone_from(&row.name1);
            rescored.name2.clone_from(&row.name2);
            rescored.interests1.clone_from(&row.interests1);
            rescored.interests2.clone_from(&row.interests2);
            rows[index] = rescored;
        }

        *table = updated;
        tracing::info!(directive = %directive, "Applied swap");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pairing::PairingRecord;
    use crate::core::participant::Participant;
    use crate::core::types::ParticipantId;

    fn directory() -> Directory {
        [
            Participant::new("P1", "One").with_interests(["a", "b"]),
            Participant::new("P2", "Two").with_interests(["b", "c"]),
            Participant::new("P3", "Three").with_interests(["a", "c"]),
            Participant::new("P4", "Four").with_interests(["a", "b", "c"]),
        ]
        .into_iter()
        .collect()
    }

    fn row(dir: &Directory, a: &str, b: &str) -> PairingRecord {
        let p1 = dir.get(&ParticipantId::new(a)).unwrap();
        let p2 = dir.get(&ParticipantId::new(b)).unwrap();
        record(p1, p2, CompatibilityScorer::default().score(p1, p2))
    }

    fn table(dir: &Directory) -> PairingTable {
        PairingTable::new(vec![row(dir, "P1", "P2"), row(dir, "P3", "P4")])
    }

    #[test]
    fn test_parse_directive() {
        let d: SwapDirective = "A1,B2".parse().unwrap();
        assert_eq!(d.first, Selector { row: 0, slot: Slot::First });
        assert_eq!(d.second, Selector { row: 1, slot: Slot::Second });
        assert_eq!(d.to_string(), "A1,B2");
    }

    #[test]
    fn test_parse_tolerates_case_brackets_and_spaces() {
        let d: SwapDirective = " [a12, b3] ".parse().unwrap();
        assert_eq!(d.first, Selector { row: 11, slot: Slot::First });
        assert_eq!(d.second, Selector { row: 2, slot: Slot::Second });
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!("".parse::<SwapDirective>(), Err(DirectiveError::Empty));
        assert_eq!("A1".parse::<SwapDirective>(), Err(DirectiveError::Arity(1)));
        assert_eq!(
            "A1,B2,A3".parse::<SwapDirective>(),
            Err(DirectiveError::Arity(3))
        );
        assert_eq!(
            "C1,B2".parse::<SwapDirective>(),
            Err(DirectiveError::UnknownSlot('C'))
        );
        assert_eq!("A0,B2".parse::<SwapDirective>(), Err(DirectiveError::ZeroRow));
        assert!(matches!(
            "A,B2".parse::<SwapDirective>(),
            Err(DirectiveError::Malformed(_))
        ));
        assert!(matches!(
            "1A,B2".parse::<SwapDirective>(),
            Err(DirectiveError::Malformed(_))
        ));
        assert!(matches!(
            "A-1,B2".parse::<SwapDirective>(),
            Err(DirectiveError::Malformed(_))
        ));
    }

    #[test]
    fn test_scenario_d_swap_rescores_both_rows() {
        let dir = directory();
        let mut t = table(&dir);
        let directive: SwapDirective = "A1,B2".parse().unwrap();

        SwapAdjuster::default().apply(&mut t, &directive, &dir).unwrap();

        // Row 1: P4 moved into slot A; row 2: P1 moved into slot B
        let r1 = &t.rows()[0];
        assert_eq!((r1.id1.as_str(), r1.id2.as_str()), ("P4", "P2"));
        assert_eq!(r1.name1, "Four");
        assert_eq!(r1.interests1, "a, b, c");
        let r2 = &t.rows()[1];
        assert_eq!((r2.id1.as_str(), r2.id2.as_str()), ("P3", "P1"));
        assert_eq!(r2.name2, "One");
        assert_eq!(r2.interests2, "a, b");

        assert_eq!(r1, &row(&dir, "P4", "P2"));
        assert_eq!(r2, &row(&dir, "P3", "P1"));
        assert_eq!(r1.score, 2);
        assert_eq!(r1.common_interests, "b, c");
        assert_eq!(r2.score, 1);
        assert_eq!(r2.common_interests, "a");
    }

    #[test]
    fn test_swap_is_its_own_inverse() {
        let dir = directory();
        let original = table(&dir);
        let mut t = original.clone();
        let directive: SwapDirective = "B1,A2".parse().unwrap();
        let adjuster = SwapAdjuster::default();

        adjuster.apply(&mut t, &directive, &dir).unwrap();
        assert_ne!(t, original);
        adjuster.apply(&mut t, &directive, &dir).unwrap();
        assert_eq!(t, original);
    }

    #[test]
    fn test_swap_within_one_row() {
        let dir = directory();
        let mut t = table(&dir);
        SwapAdjuster::default()
            .apply(&mut t, &"A2,B2".parse().unwrap(), &dir)
            .unwrap();
        assert_eq!(t.rows()[1], row(&dir, "P4", "P3"));
        assert_eq!(t.rows()[0], row(&dir, "P1", "P2"));
    }

    #[test]
    fn test_same_selector_is_noop() {
        let dir = directory();
        let mut t = table(&dir);
        SwapAdjuster::default()
            .apply(&mut t, &"A1,a1".parse().unwrap(), &dir)
            .unwrap();
        assert_eq!(t, table(&dir));
    }

    #[test]
    fn test_out_of_range_leaves_table_unchanged() {
        let dir = directory();
        let mut t = table(&dir);
        let err = SwapAdjuster::default()
            .apply(&mut t, &"A1,B3".parse().unwrap(), &dir)
            .unwrap_err();
        assert!(matches!(err, PairingError::Validation(_)));
        assert_eq!(t, table(&dir));
    }

    #[test]
    fn test_missing_participant_leaves_table_unchanged() {
        let dir = directory();
        let mut t = table(&dir);
        let partial: Directory = dir
            .iter()
            .filter(|p| p.id.as_str() != "P4")
            .cloned()
            .collect();
        let err = SwapAdjuster::default()
            .apply(&mut t, &"A1,B2".parse().unwrap(), &partial)
            .unwrap_err();
        assert!(matches!(err, PairingError::DataNotFound(_)));
        assert_eq!(t, table(&dir));
    }

    #[test]
    fn test_directive_error_is_validation() {
        let err: PairingError = DirectiveError::ZeroRow.into();
        assert!(matches!(err, PairingError::Validation(_)));
    }
}

use crate::error::{PairingError, Result};
use crate::matching::roster::Roster;
use crate::matching::scoring::CompatibilityScorer;

/// Square, symmetric score matrix over one run's roster.
///
/// Entry (i, j) is the compatibility of roster entries i and j; the diagonal
/// holds the self-match penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    dim: usize,
    entries: Vec<i64>,
}

impl CompatibilityMatrix {
    /// Score every pair of the roster
    #[must_use]
    pub fn build(roster: &Roster, scorer: &CompatibilityScorer) -> Self {
        let people: Vec<_> = roster.participants().collect();
        let dim = people.len();
        let mut entries = vec![scorer.self_penalty(); dim * dim];

        for i in 0..dim {
            for j in (i + 1)..dim {
                let score = scorer.score(people[i], people[j]);
                entries[i * dim + j] = score;
                entries[j * dim + i] = score;
            }
        }

        Self { dim, entries }
    }

    /// Build from explicit rows, checking shape and symmetry
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the rows are ragged, not square, or not
    /// symmetric.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let dim = rows.len();
        let mut entries = Vec::with_capacity(dim * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(PairingError::validation(format!(
                    "matrix row {i} has {} entries, expected {dim}",
                    row.len()
                )));
            }
            entries.extend(row);
        }

        let matrix = Self { dim, entries };
        if let Some((i, j)) = matrix.first_asymmetry() {
            return Err(PairingError::validation(format!(
                "matrix is not symmetric at ({i}, {j})"
            )));
        }
        Ok(matrix)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.entries[i * self.dim + j]
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row-major entries
    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    fn first_asymmetry(&self) -> Option<(usize, usize)> {
        (0..self.dim)
            .flat_map(|i| ((i + 1)..self.dim).map(move |j| (i, j)))
            .find(|&(i, j)| self.get(i, j) != self.get(j, i))
    }
}

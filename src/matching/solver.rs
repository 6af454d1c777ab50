//! Exact maximum-weight perfect matching on the complete graph.
//!
//! Scores are lifted so every pair weighs at least 1 and any perfect
//! matching outweighs any smaller one; the weighted blossom algorithm then
//! yields a maximum-weight perfect matching in O(n³).
//!
//! Ties are broken deterministically: among all optimal matchings the one
//! whose partner vector (read from index 0 upward) is lexicographically
//! smallest is returned. Pairs are fixed from the lowest free index; a
//! partner below the current one is taken only when re-solving the rest
//! still reaches the optimum.

use crate::error::{PairingError, Result};
use crate::matching::blossom::max_weight_matching;
use crate::matching::matrix::CompatibilityMatrix;

const UNMATCHED: usize = usize::MAX;

/// A perfect matching over matrix indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    /// Canonical pairs (i < j) ordered by i
    pub pairs: Vec<(usize, usize)>,

    /// Sum of pair scores
    pub total: i64,
}

impl Matching {
    /// Partner of every index: the full assignment in both orientations
    #[must_use]
    pub fn mates(&self) -> Vec<usize> {
        let n = self.pairs.len() * 2;
        let mut mates = vec![UNMATCHED; n];
        for &(i, j) in &self.pairs {
            if i < n && j < n {
                mates[i] = j;
                mates[j] = i;
            }
        }
        mates
    }
}

/// Computes maximum-weight perfect matchings
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentSolver;

impl AssignmentSolver {
    pub fn new() -> Self {
        Self
    }

    /// Find the maximum-weight perfect matching of `matrix`.
    ///
    /// # Errors
    ///
    /// `Validation` when the dimension is odd (callers pad first);
    /// `Computation` if scores are too large to lift safely or the result
    /// fails to cover every index exactly once.
    pub fn solve(&self, matrix: &CompatibilityMatrix) -> Result<Matching> {
        let n = matrix.dim();
        if n % 2 == 1 {
            return Err(PairingError::validation(format!(
                "cannot solve a {n}x{n} matrix: dimension must be even"
            )));
        }
        if n == 0 {
            return Ok(Matching {
                pairs: Vec::new(),
                total: 0,
            });
        }

        let all: Vec<usize> = (0..n).collect();
        let mut mates = vec![UNMATCHED; n];
        let optimum = solve_subset(matrix, &all, &mut mates)?;
        let mut solves = 1_u32;

        let mut remaining = all;
        let mut target = optimum;
        let mut pairs = Vec::with_capacity(n / 2);
        while let Some(&i) = remaining.first() {
            let incumbent = mates[i];
            let mut partner = incumbent;
            for &j in remaining[1..].iter().take_while(|&&j| j < incumbent) {
                let rest = without(&remaining, i, j);
                let mut trial = mates.clone();
                solves += 1;
                if solve_subset(matrix, &rest, &mut trial)? + matrix.get(i, j) == target {
                    mates = trial;
                    mates[i] = j;
                    mates[j] = i;
                    partner = j;
                    break;
                }
            }
            if partner == UNMATCHED {
                return Err(PairingError::computation(format!(
                    "no optimal partner for index {i}"
                )));
            }
            pairs.push((i, partner));
            target -= matrix.get(i, partner);
            remaining = without(&remaining, i, partner);
        }

        let matching = Matching {
            total: pairs.iter().map(|&(i, j)| matrix.get(i, j)).sum(),
            pairs,
        };
        verify_cover(n, &matching)?;
        if matching.total != optimum {
            return Err(PairingError::computation(format!(
                "matching total {} differs from optimum {optimum}",
                matching.total
            )));
        }

        tracing::debug!(n, total = matching.total, solves, "Solved perfect matching");
        Ok(matching)
    }
}

/// Check that every index in `0..n` appears in exactly one pair
///
/// # Errors
///
/// Returns `Computation` describing the first violation.
pub fn verify_cover(n: usize, matching: &Matching) -> Result<()> {
    if matching.pairs.len() * 2 != n {
        return Err(PairingError::computation(format!(
            "{} pairs cannot cover {n} indices",
            matching.pairs.len()
        )));
    }
    let mut seen = vec![false; n];
    for &(i, j) in &matching.pairs {
        for k in [i, j] {
            if k >= n || std::mem::replace(&mut seen[k], true) {
                return Err(PairingError::computation(format!(
                    "index {k} is out of range or paired twice"
                )));
            }
        }
    }
    Ok(())
}

fn without(set: &[usize], a: usize, b: usize) -> Vec<usize> {
    set.iter().copied().filter(|&k| k != a && k != b).collect()
}

/// Best perfect matching restricted to `set` (even, ascending).
///
/// Writes the partners of `set` into `mates` and returns the total score.
fn solve_subset(matrix: &CompatibilityMatrix, set: &[usize], mates: &mut [usize]) -> Result<i64> {
    if set.is_empty() {
        return Ok(0);
    }

    let mut lo = i64::MAX;
    let mut hi = i64::MIN;
    for (a, &i) in set.iter().enumerate() {
        for &j in &set[a + 1..] {
            lo = lo.min(matrix.get(i, j));
            hi = hi.max(matrix.get(i, j));
        }
    }

    // Shift to weights >= 1, then lift each edge by more than any
    // non-perfect matching could gain over a perfect one
    let half = i64::try_from(set.len() / 2).unwrap_or(i64::MAX);
    let lift = hi
        .checked_sub(lo)
        .and_then(|span| span.checked_add(1))
        .and_then(|span| span.checked_mul(half).map(|lift| (span, lift)))
        .filter(|&(span, lift)| {
            lift.checked_add(span)
                .and_then(|w| w.checked_mul(4))
                .is_some()
        })
        .map(|(_, lift)| lift)
        .ok_or_else(|| PairingError::computation("scores are too large to solve exactly"))?;

    let weights: Vec<Vec<i64>> = set
        .iter()
        .map(|&i| {
            set.iter()
                .map(|&j| if i == j { 0 } else { matrix.get(i, j) - lo + 1 + lift })
                .collect()
        })
        .collect();

    let mut total = 0;
    for (a, partner) in max_weight_matching(&weights).into_iter().enumerate() {
        let b = partner.ok_or_else(|| {
            PairingError::computation(format!("index {} left unmatched", set[a]))
        })?;
        mates[set[a]] = set[b];
        if a < b {
            total += matrix.get(set[a], set[b]);
        }
    }
    Ok(total)
}

use serde::{Deserialize, Serialize};

use crate::core::participant::{common_interests, Participant};

/// Upper bound for any single weight, keeps matrix sums far from overflow
pub const MAX_WEIGHT: i64 = 1_000_000_000;

/// Configurable weights for the compatibility terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Bonus when either participant promotes the other
    pub promote: i64,
    /// Penalty when either participant avoids the other
    pub avoid: i64,
    /// Penalty when the two have been paired before
    pub history: i64,
    /// Penalty for pairing a participant with themself
    pub self_match: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            promote: 10,
            avoid: 1000,
            history: 100,
            self_match: 10_000,
        }
    }
}

impl ScoringWeights {
    /// Check that every weight is in range and the self-match penalty
    /// dominates the other adjustments.
    ///
    /// Returns an error message describing the problem, None if valid.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        let named = [
            ("promote", self.promote),
            ("avoid", self.avoid),
            ("history", self.history),
            ("self_match", self.self_match),
        ];
        for (name, value) in named {
            if !(0..=MAX_WEIGHT).contains(&value) {
                return Some(format!(
                    "weight '{name}' must be between 0 and {MAX_WEIGHT}, got {value}"
                ));
            }
        }
        if self.self_match <= self.promote + self.avoid + self.history {
            return Some(format!(
                "self_match weight ({}) must exceed promote + avoid + history ({})",
                self.self_match,
                self.promote + self.avoid + self.history
            ));
        }
        None
    }
}

/// Breakdown of the compatibility score between two participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityScore {
    /// Interests both participants listed, sorted
    pub common_interests: Vec<String>,

    /// Either participant promotes the other
    pub promoted: bool,

    /// Either participant avoids the other
    pub avoided: bool,

    /// Either history records the other
    pub met_before: bool,

    /// Both sides are the same participant
    pub same_participant: bool,

    /// Weighted total
    pub total: i64,
}

impl CompatibilityScore {
    /// Calculate the score between `a` and `b`.
    ///
    /// Every term is an OR over both directions, so the result is symmetric.
    #[must_use]
    pub fn calculate(a: &Participant, b: &Participant, weights: &ScoringWeights) -> Self {
        let common_interests: Vec<String> = common_interests(a, b)
            .into_iter()
            .map(str::to_string)
            .collect();

        let promoted = a.profile.promote.contains(&b.id) || b.profile.promote.contains(&a.id);
        let avoided = a.profile.avoid.contains(&b.id) || b.profile.avoid.contains(&a.id);
        let met_before = a.history.contains(&b.id) || b.history.contains(&a.id);
        let same_participant = a.id == b.id;

        #[allow(clippy::cast_possible_wrap)] // interest sets are tiny
        let mut total = common_interests.len() as i64;
        if promoted {
            total += weights.promote;
        }
        if avoided {
            total -= weights.avoid;
        }
        if met_before {
            total -= weights.history;
        }
        if same_participant {
            total -= weights.self_match;
        }

        Self {
            common_interests,
            promoted,
            avoided,
            met_before,
            same_participant,
            total,
        }
    }
}

/// Pure, symmetric compatibility function over a directory snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityScorer {
    weights: ScoringWeights,
}

impl CompatibilityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    #[must_use]
    pub fn score(&self, a: &Participant, b: &Participant) -> i64 {
        CompatibilityScore::calculate(a, b, &self.weights).total
    }

    #[must_use]
    pub fn breakdown(&self, a: &Participant, b: &Participant) -> CompatibilityScore {
        CompatibilityScore::calculate(a, b, &self.weights)
    }

    /// Diagonal entry of the compatibility matrix
    #[must_use]
    pub fn self_penalty(&self) -> i64 {
        -self.weights.self_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ParticipantId;

    fn scenario_a() -> Vec<Participant> {
        vec![
            Participant::new("P1", "One").with_interests(["a", "b"]),
            Participant::new("P2", "Two").with_interests(["b", "c"]),
            Participant::new("P3", "Three").with_interests(["a", "c"]),
            Participant::new("P4", "Four").with_interests(["a", "b", "c"]),
        ]
    }

    #[test]
    fn test_shared_interest_counts() {
        let p = scenario_a();
        let scorer = CompatibilityScorer::default();

        assert_eq!(scorer.score(&p[0], &p[1]), 1);
        assert_eq!(scorer.score(&p[0], &p[2]), 1);
        assert_eq!(scorer.score(&p[0], &p[3]), 2);
        assert_eq!(scorer.score(&p[1], &p[2]), 1);
        assert_eq!(scorer.score(&p[1], &p[3]), 2);
        assert_eq!(scorer.score(&p[2], &p[3]), 2);
    }

    #[test]
    fn test_score_is_symmetric() {
        let mut p = scenario_a();
        p[0] = p[0].clone().avoiding("P2").promoting("P3");
        p[1].history.record("01-01-24", &ParticipantId::new("P4"));
        let scorer = CompatibilityScorer::default();

        for a in &p {
            for b in &p {
                assert_eq!(scorer.score(a, b), scorer.score(b, a), "{} vs {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_avoid_is_one_directional_indicator() {
        let p1 = Participant::new("P1", "One").with_interests(["a"]).avoiding("P2");
        let p2 = Participant::new("P2", "Two").with_interests(["a"]).avoiding("P1");
        let weights = ScoringWeights::default();

        let score = CompatibilityScore::calculate(&p1, &p2, &weights);
        assert!(score.avoided);
        // Both directions count once, not twice
        assert_eq!(score.total, 1 - weights.avoid);
    }

    #[test]
    fn test_promote_and_history_terms() {
        let mut p1 = Participant::new("P1", "One").promoting("P2");
        let p2 = Participant::new("P2", "Two");
        let weights = ScoringWeights::default();

        assert_eq!(
            CompatibilityScore::calculate(&p1, &p2, &weights).total,
            weights.promote
        );

        p1.history.record("01-01-24", &p2.id);
        let score = CompatibilityScore::calculate(&p2, &p1, &weights);
        assert!(score.met_before);
        assert_eq!(score.total, weights.promote - weights.history);
    }

    #[test]
    fn test_self_match_dominates() {
        let p = Participant::new("P1", "One").with_interests(["a", "b"]).promoting("P1");
        let weights = ScoringWeights::default();
        let score = CompatibilityScore::calculate(&p, &p, &weights);
        assert!(score.same_participant);
        assert_eq!(score.total, 2 + weights.promote - weights.self_match);
        assert!(score.total < -weights.avoid);
    }

    #[test]
    fn test_weights_check() {
        assert!(ScoringWeights::default().check().is_none());

        let weak_self = ScoringWeights {
            self_match: 50,
            ..ScoringWeights::default()
        };
        assert!(weak_self.check().is_some());

        let negative = ScoringWeights {
            avoid: -1,
            ..ScoringWeights::default()
        };
        assert!(negative.check().is_some());
    }
}

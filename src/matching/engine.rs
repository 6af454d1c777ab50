use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::pairing::PairingTable;
use crate::core::types::ParticipantId;
use crate::error::{PairingError, Result};
use crate::matching::assembler::PairingAssembler;
use crate::matching::history::{HistoryTracker, DEFAULT_DATE_FORMAT};
use crate::matching::matrix::CompatibilityMatrix;
use crate::matching::roster::Roster;
use crate::matching::scoring::{CompatibilityScore, CompatibilityScorer, ScoringWeights};
use crate::matching::solver::AssignmentSolver;
use crate::matching::swap::{SwapAdjuster, SwapDirective};
use crate::store::{DirectoryStore, PairingStore, TableSnapshot};
use crate::utils::validation::{check_participant_id, compute_fingerprint};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration for the pairing engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weights for the compatibility terms
    pub weights: ScoringWeights,

    /// Preferred placeholder ids for odd rosters, first unused one wins
    pub padding_ids: Vec<ParticipantId>,

    /// strftime pattern for history keys
    pub history_date_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            padding_ids: Vec::new(),
            history_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn load_from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// # Errors
    ///
    /// `Validation` for out-of-range weights, a self-match weight that does
    /// not dominate, unusable placeholder ids or a bad date format.
    pub fn validate(&self) -> Result<()> {
        if let Some(problem) = self.weights.check() {
            return Err(PairingError::validation(problem));
        }
        for id in &self.padding_ids {
            if let Some(problem) = check_participant_id(id.as_str()) {
                return Err(PairingError::validation(format!(
                    "padding id: {problem}"
                )));
            }
        }
        if self.history_date_format.trim().is_empty()
            || StrftimeItems::new(&self.history_date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(PairingError::validation(format!(
                "invalid history date format '{}'",
                self.history_date_format
            )));
        }
        Ok(())
    }
}

/// Outcome of one pairing run
#[derive(Debug, Clone)]
pub struct PairingRun {
    pub snapshot: TableSnapshot,

    /// Real participants taken into the run
    pub participants: usize,

    /// Placeholder added for parity, if any
    pub placeholder: Option<ParticipantId>,
}

impl PairingRun {
    pub fn table(&self) -> &PairingTable {
        &self.snapshot.rows
    }
}

/// Outcome of publishing the current table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// History key the table was archived and recorded under
    pub date_key: String,

    /// Number of pairs published
    pub pairs: usize,

    /// History entries that were not already present
    pub history_added: usize,
}

/// The pairing engine: one store, one configuration
pub struct PairingEngine<'a, S> {
    store: &'a S,
    config: EngineConfig,
    scorer: CompatibilityScorer,
}

impl<'a, S> PairingEngine<'a, S>
where
    S: DirectoryStore + PairingStore,
{
    /// Create an engine with default configuration
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            scorer: CompatibilityScorer::default(),
        }
    }

    /// Create an engine with custom configuration
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate.
    pub fn with_config(store: &'a S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let scorer = CompatibilityScorer::new(config.weights);
        Ok(Self {
            store,
            config,
            scorer,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute a pairing table without persisting it.
    ///
    /// With no explicit list, everyone who confirmed for the round takes
    /// part, in id order. An explicit list is used in the given order.
    pub fn generate(&self, eligible: Option<&[ParticipantId]>) -> Result<PairingRun> {
        let directory = self.store.get_snapshot()?;
        let eligible = match eligible {
            Some(ids) => ids.to_vec(),
            None => directory.eligible_ids(),
        };

        let roster = Roster::build(&directory, &eligible, &self.config.padding_ids)?;
        let matrix = CompatibilityMatrix::build(&roster, &self.scorer);
        let fingerprint = compute_fingerprint(&roster.ids(), matrix.entries());

        let matching = AssignmentSolver::new().solve(&matrix)?;
        let table = PairingAssembler::new().assemble(&roster, &matrix, &matching)?;

        let placeholder = roster
            .entries()
            .iter()
            .find(|e| e.padding)
            .map(|e| e.participant.id.clone());

        tracing::info!(
            participants = roster.real_count(),
            pairs = table.len(),
            total = table.total_score(),
            fingerprint = %fingerprint,
            "Generated pairing table"
        );

        Ok(PairingRun {
            snapshot: TableSnapshot::new(table, Some(fingerprint)),
            participants: roster.real_count(),
            placeholder,
        })
    }

    /// Generate a table and replace the stored one with it
    pub fn run(&self, eligible: Option<&[ParticipantId]>) -> Result<PairingRun> {
        let run = self.generate(eligible)?;
        self.store.save_table(&run.snapshot)?;
        Ok(run)
    }

    /// Apply a swap directive to the stored table and save the result
    pub fn swap(&self, directive: &SwapDirective) -> Result<TableSnapshot> {
        let mut snapshot = self.store.load_table()?;
        let directory = self.store.get_snapshot()?;

        SwapAdjuster::new(self.scorer).apply(&mut snapshot.rows, directive, &directory)?;
        self.store.save_table(&snapshot)?;
        Ok(snapshot)
    }

    /// Archive the stored table under `date` and fold it into history.
    ///
    /// History is computed before anything is written, so a table naming an
    /// unknown participant leaves the store untouched.
    pub fn publish(&self, date: NaiveDate) -> Result<PublishReport> {
        let snapshot = self.store.load_table()?;
        let directory = self.store.get_snapshot()?;

        let tracker = HistoryTracker::new(self.config.history_date_format.as_str());
        let date_key = tracker.date_key(date)?;
        let (updated, history_added) = tracker.commit(&directory, &snapshot.rows, date)?;

        self.store.archive_table(&date_key, &snapshot)?;
        self.store.put_snapshot(&updated)?;

        tracing::info!(
            date = %date_key,
            pairs = snapshot.rows.len(),
            history_added,
            "Published pairing table"
        );

        Ok(PublishReport {
            date_key,
            pairs: snapshot.rows.len(),
            history_added,
        })
    }

    /// Score breakdown for two participants of the current directory
    pub fn score(&self, a: &ParticipantId, b: &ParticipantId) -> Result<CompatibilityScore> {
        let directory = self.store.get_snapshot()?;
        let p1 = directory.require(a)?;
        let p2 = directory.require(b)?;
        Ok(self.scorer.breakdown(p1, p2))
    }
}

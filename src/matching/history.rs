use std::fmt::Write;

use chrono::NaiveDate;

use crate::core::pairing::PairingTable;
use crate::core::participant::Directory;
use crate::error::{PairingError, Result};

/// Date key format used by existing directory snapshots
pub const DEFAULT_DATE_FORMAT: &str = "%m-%d-%y";

/// Folds a published table into participant history
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    date_format: String,
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl HistoryTracker {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// History key for a meeting date
    ///
    /// # Errors
    ///
    /// `Validation` if the format string is not a valid strftime pattern.
    pub fn date_key(&self, date: NaiveDate) -> Result<String> {
        let mut key = String::new();
        write!(key, "{}", date.format(&self.date_format)).map_err(|_| {
            PairingError::validation(format!(
                "invalid history date format '{}'",
                self.date_format
            ))
        })?;
        Ok(key)
    }

    /// Record every pair of `table` in both participants' history.
    ///
    /// Works on a copy of `directory`; the caller persists the returned
    /// snapshot as a whole. Also returns the number of entries that were
    /// new, so a repeated commit for the same date reports 0.
    ///
    /// # Errors
    ///
    /// `DataNotFound` if a row names a participant missing from the
    /// directory. Nothing is returned in that case.
    pub fn commit(
        &self,
        directory: &Directory,
        table: &PairingTable,
        date: NaiveDate,
    ) -> Result<(Directory, usize)> {
        let key = self.date_key(date)?;
        if key.is_empty() {
            return Err(PairingError::validation(
                "history date format produced an empty key",
            ));
        }

        let mut updated = directory.clone();
        let mut added = 0;
        for row in table {
            for (owner, partner) in [(&row.id1, &row.id2), (&row.id2, &row.id1)] {
                let participant = updated
                    .get_mut(owner)
                    .ok_or_else(|| PairingError::DataNotFound(owner.clone()))?;
                if participant.history.record(&key, partner) {
                    added += 1;
                }
            }
        }

        tracing::debug!(date = %key, rows = table.len(), added, "Committed history");
        Ok((updated, added))
    }
}

use serde::{Deserialize, Serialize};

use crate::core::types::{ParticipantId, Slot};

/// Column headers of the stored table, in storage order
pub const COLUMN_HEADERS: [&str; 8] = [
    "Person 1",
    "Person 2",
    "Score",
    "Person 1 Interests",
    "Person 2 Interests",
    "Common Interests",
    "Person 1 ID",
    "Person 2 ID",
];

/// The three columns that travel together when a participant is swapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantColumns {
    pub name: String,
    pub interests: String,
    pub id: ParticipantId,
}

/// One accepted pair, ready for display.
///
/// Stored as an 8-element array:
/// `[name1, name2, score, interests1, interests2, common_interests, id1, id2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PairingRow", from = "PairingRow")]
pub struct PairingRecord {
    pub name1: String,
    pub name2: String,
    pub score: i64,
    pub interests1: String,
    pub interests2: String,
    pub common_interests: String,
    pub id1: ParticipantId,
    pub id2: ParticipantId,
}

#[derive(Serialize, Deserialize)]
struct PairingRow(
    String,
    String,
    i64,
    String,
    String,
    String,
    ParticipantId,
    ParticipantId,
);

impl From<PairingRecord> for PairingRow {
    fn from(r: PairingRecord) -> Self {
        Self(
            r.name1,
            r.name2,
            r.score,
            r.interests1,
            r.interests2,
            r.common_interests,
            r.id1,
            r.id2,
        )
    }
}

impl From<PairingRow> for PairingRecord {
    fn from(row: PairingRow) -> Self {
        Self {
            name1: row.0,
            name2: row.1,
            score: row.2,
            interests1: row.3,
            interests2: row.4,
            common_interests: row.5,
            id1: row.6,
            id2: row.7,
        }
    }
}

impl PairingRecord {
    #[must_use]
    pub fn id(&self, slot: Slot) -> &ParticipantId {
        match slot {
            Slot::First => &self.id1,
            Slot::Second => &self.id2,
        }
    }

    #[must_use]
    pub fn columns(&self, slot: Slot) -> ParticipantColumns {
        match slot {
            Slot::First => ParticipantColumns {
                name: self.name1.clone(),
                interests: self.interests1.clone(),
                id: self.id1.clone(),
            },
            Slot::Second => ParticipantColumns {
                name: self.name2.clone(),
                interests: self.interests2.clone(),
                id: self.id2.clone(),
            },
        }
    }

    pub fn set_columns(&mut self, slot: Slot, columns: ParticipantColumns) {
        match slot {
            Slot::First => {
                self.name1 = columns.name;
                self.interests1 = columns.interests;
                self.id1 = columns.id;
            }
            Slot::Second => {
                self.name2 = columns.name;
                self.interests2 = columns.interests;
                self.id2 = columns.id;
            }
        }
    }

    /// Cell text for column `index` in storage order
    #[must_use]
    pub fn cell(&self, index: usize) -> String {
        match index {
            0 => self.name1.clone(),
            1 => self.name2.clone(),
            2 => self.score.to_string(),
            3 => self.interests1.clone(),
            4 => self.interests2.clone(),
            5 => self.common_interests.clone(),
            6 => self.id1.to_string(),
            7 => self.id2.to_string(),
            _ => String::new(),
        }
    }

    pub fn involves(&self, id: &ParticipantId) -> bool {
        &self.id1 == id || &self.id2 == id
    }
}

/// Ordered pairing rows; rows are addressed by position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingTable {
    rows: Vec<PairingRecord>,
}

impl PairingTable {
    pub fn new(rows: Vec<PairingRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PairingRecord] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&PairingRecord> {
        self.rows.get(index)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [PairingRecord] {
        &mut self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PairingRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of row scores
    pub fn total_score(&self) -> i64 {
        self.rows.iter().map(|r| r.score).sum()
    }

    /// The row a participant sits in, if any
    pub fn row_of(&self, id: &ParticipantId) -> Option<usize> {
        self.rows.iter().position(|r| r.involves(id))
    }
}

impl<'a> IntoIterator for &'a PairingTable {
    type Item = &'a PairingRecord;
    type IntoIter = std::slice::Iter<'a, PairingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PairingRecord {
        PairingRecord {
            name1: "Ada".to_string(),
            name2: "Grace".to_string(),
            score: 2,
            interests1: "chess, hiking".to_string(),
            interests2: "chess, hiking, music".to_string(),
            common_interests: "chess, hiking".to_string(),
            id1: ParticipantId::new("U1"),
            id2: ParticipantId::new("U2"),
        }
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let json = serde_json::to_value(record()).unwrap();
        let row = json.as_array().unwrap();
        assert_eq!(row.len(), COLUMN_HEADERS.len());
        assert_eq!(row[0], "Ada");
        assert_eq!(row[2], 2);
        assert_eq!(row[5], "chess, hiking");
        assert_eq!(row[7], "U2");
    }

    #[test]
    fn test_cells_follow_slot_columns() {
        let r = record();
        for slot in [Slot::First, Slot::Second] {
            let [name, interests, id] = slot.columns();
            let group = r.columns(slot);
            assert_eq!(r.cell(name), group.name);
            assert_eq!(r.cell(interests), group.interests);
            assert_eq!(r.cell(id), group.id.to_string());
        }
    }

    #[test]
    fn test_set_columns_leaves_other_slot() {
        let mut r = record();
        r.set_columns(
            Slot::First,
            ParticipantColumns {
                name: "Linus".to_string(),
                interests: "kernels".to_string(),
                id: ParticipantId::new("U7"),
            },
        );
        assert_eq!(r.id1, ParticipantId::new("U7"));
        assert_eq!(r.name2, "Grace");
        assert_eq!(r.score, 2);
    }

    #[test]
    fn test_table_row_of() {
        let table = PairingTable::new(vec![record()]);
        assert_eq!(table.row_of(&ParticipantId::new("U2")), Some(0));
        assert_eq!(table.row_of(&ParticipantId::new("U3")), None);
        assert_eq!(table.total_score(), 2);
    }
}

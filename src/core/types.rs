use serde::{Deserialize, Serialize};

/// Unique, stable identifier for a participant in the directory
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which of the two participant column groups of a pairing row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Participant 1: columns 0 (name), 3 (interests), 6 (id)
    First,
    /// Participant 2: columns 1 (name), 4 (interests), 7 (id)
    Second,
}

impl Slot {
    /// Parse the directive letter (`A` or `B`, case-insensitive)
    #[must_use]
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::First),
            'B' => Some(Self::Second),
            _ => None,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::First => 'A',
            Self::Second => 'B',
        }
    }

    /// Column indices (name, interests, id) in the stored 8-column layout
    #[must_use]
    pub fn columns(self) -> [usize; 3] {
        match self {
            Self::First => [0, 3, 6],
            Self::Second => [1, 4, 7],
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Whether a participant has joined the programme at all.
///
/// Values written by other tools are kept verbatim in `Other` so a
/// whole-snapshot write gives them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MembershipStatus {
    Joined,
    #[default]
    NoResponse,
    Declined,
    Left,
    Other(String),
}

impl MembershipStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Joined => "joined",
            Self::NoResponse => "noResponse",
            Self::Declined => "declined",
            Self::Left => "left",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for MembershipStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "joined" => Self::Joined,
            "noResponse" => Self::NoResponse,
            "declined" => Self::Declined,
            "left" => Self::Left,
            _ => Self::Other(raw),
        }
    }
}

impl From<MembershipStatus> for String {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A participant's answer for the current round
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeeklyInterest {
    Confirmed,
    #[default]
    NoResponse,
    Declined,
    Paused,
    Skipping,
    Other(String),
}

impl WeeklyInterest {
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Confirmed => "confirmed",
            Self::NoResponse => "noResponse",
            Self::Declined => "declined",
            Self::Paused => "paused",
            Self::Skipping => "skipping",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for WeeklyInterest {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "confirmed" => Self::Confirmed,
            "noResponse" => Self::NoResponse,
            "declined" => Self::Declined,
            "paused" => Self::Paused,
            "skipping" => Self::Skipping,
            _ => Self::Other(raw),
        }
    }
}

impl From<WeeklyInterest> for String {
    fn from(interest: WeeklyInterest) -> Self {
        match interest {
            WeeklyInterest::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_from_letter_is_case_insensitive() {
        assert_eq!(Slot::from_letter('a'), Some(Slot::First));
        assert_eq!(Slot::from_letter('B'), Some(Slot::Second));
        assert_eq!(Slot::from_letter('c'), None);
    }

    #[test]
    fn test_slot_columns_match_table_layout() {
        assert_eq!(Slot::First.columns(), [0, 3, 6]);
        assert_eq!(Slot::Second.columns(), [1, 4, 7]);
    }

    #[test]
    fn test_weekly_interest_wire_names() {
        let parsed: WeeklyInterest = serde_json::from_str("\"noResponse\"").unwrap();
        assert_eq!(parsed, WeeklyInterest::NoResponse);
        let parsed: WeeklyInterest = serde_json::from_str("\"confirmed\"").unwrap();
        assert!(parsed.is_eligible());
        assert!(!WeeklyInterest::Paused.is_eligible());
        assert!(!WeeklyInterest::Skipping.is_eligible());
    }

    #[test]
    fn test_unknown_wire_values_are_kept() {
        let status: MembershipStatus = serde_json::from_str("\"declined\"").unwrap();
        assert_eq!(status, MembershipStatus::Declined);
        let status: MembershipStatus = serde_json::from_str("\"banned\"").unwrap();
        assert_eq!(status, MembershipStatus::Other("banned".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"banned\"");

        let interest: WeeklyInterest = serde_json::from_str("\"skipping\"").unwrap();
        assert_eq!(interest, WeeklyInterest::Skipping);
        assert_eq!(serde_json::to_string(&interest).unwrap(), "\"skipping\"");
        let interest: WeeklyInterest = serde_json::from_str("\"later\"").unwrap();
        assert!(!interest.is_eligible());
        assert_eq!(serde_json::to_string(&interest).unwrap(), "\"later\"");
    }

    #[test]
    fn test_participant_id_serializes_as_plain_string() {
        let id = ParticipantId::new("U01");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"U01\"");
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{MembershipStatus, ParticipantId, WeeklyInterest};
use crate::error::{PairingError, Result};

/// Interests and social preferences a participant filled in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "all_interests", default)]
    pub interests: BTreeSet<String>,

    /// Free-text interest; shown to operators, not scored
    #[serde(default)]
    pub custom_interest: String,

    #[serde(rename = "promoted_people", default)]
    pub promote: BTreeSet<ParticipantId>,

    #[serde(rename = "avoid_people", default)]
    pub avoid: BTreeSet<ParticipantId>,
}

/// Previous partners keyed by meeting date string.
///
/// Older snapshots stored a single id (sometimes several joined with commas)
/// per date; both shapes are accepted on read and lists are always written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct History(BTreeMap<String, Vec<ParticipantId>>);

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryEntry {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for History {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, HistoryEntry>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .map(|(date, entry)| {
                let ids: Vec<String> = match entry {
                    HistoryEntry::One(s) => vec![s],
                    HistoryEntry::Many(v) => v,
                };
                let partners = ids
                    .iter()
                    .flat_map(|s| s.split(','))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ParticipantId::new)
                    .collect();
                (date, partners)
            })
            .collect();
        Ok(Self(entries))
    }
}

impl History {
    /// Record `partner` under `date`. Returns false if already recorded.
    pub fn record(&mut self, date: &str, partner: &ParticipantId) -> bool {
        let partners = self.0.entry(date.to_string()).or_default();
        if partners.contains(partner) {
            return false;
        }
        partners.push(partner.clone());
        true
    }

    /// Has `other` ever been recorded as a partner on any date?
    #[must_use]
    pub fn contains(&self, other: &ParticipantId) -> bool {
        self.0.values().any(|partners| partners.contains(other))
    }

    #[must_use]
    pub fn partners_on(&self, date: &str) -> &[ParticipantId] {
        self.0.get(date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ParticipantId>)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A community member as stored in the directory snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Filled from the directory key on load
    #[serde(skip)]
    pub id: ParticipantId,

    #[serde(rename = "real_name")]
    pub display_name: String,

    #[serde(default)]
    pub status: MembershipStatus,

    #[serde(default)]
    pub weekly_interest: WeeklyInterest,

    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub history: History,

    /// Fields owned by other collaborators (surveys etc.), carried through
    /// untouched so a whole-snapshot write does not drop them
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Participant {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Synthetic entry used only to reach even cardinality.
    /// No interests, preferences or history, so it scores neutrally.
    pub fn placeholder(id: &ParticipantId) -> Self {
        Self {
            id: id.clone(),
            display_name: id.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn avoiding(mut self, other: impl Into<String>) -> Self {
        self.profile.avoid.insert(ParticipantId::new(other));
        self
    }

    #[must_use]
    pub fn promoting(mut self, other: impl Into<String>) -> Self {
        self.profile.promote.insert(ParticipantId::new(other));
        self
    }

    #[must_use]
    pub fn confirmed(mut self) -> Self {
        self.status = MembershipStatus::Joined;
        self.weekly_interest = WeeklyInterest::Confirmed;
        self
    }

    /// Interests joined for display, in sorted order
    #[must_use]
    pub fn interest_list(&self) -> String {
        join(self.profile.interests.iter())
    }
}

/// Interests shared by two participants, sorted
#[must_use]
pub fn common_interests<'a>(a: &'a Participant, b: &'a Participant) -> Vec<&'a str> {
    a.profile
        .interests
        .intersection(&b.profile.interests)
        .map(String::as_str)
        .collect()
}

pub(crate) fn join<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Snapshot of the participant directory.
///
/// Read whole and written whole; the engine never patches it in place in the
/// store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    participants: BTreeMap<ParticipantId, Participant>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a directory snapshot from its JSON blob
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: BTreeMap<ParticipantId, Participant> = serde_json::from_str(json)?;
        let mut directory = Self::new();
        for (id, mut participant) in raw {
            participant.id = id;
            directory.insert(participant);
        }
        Ok(directory)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.participants)
    }

    pub fn insert(&mut self, participant: Participant) {
        self.participants.insert(participant.id.clone(), participant);
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(id)
    }

    /// Look up a participant or fail with `DataNotFound`
    pub fn require(&self, id: &ParticipantId) -> Result<&Participant> {
        self.get(id)
            .ok_or_else(|| PairingError::DataNotFound(id.clone()))
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.contains_key(id)
    }

    /// Participants who confirmed for the current round, ordered by id
    pub fn eligible_ids(&self) -> Vec<ParticipantId> {
        self.participants
            .values()
            .filter(|p| p.weekly_interest.is_eligible())
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl FromIterator<Participant> for Directory {
    fn from_iter<T: IntoIterator<Item = Participant>>(iter: T) -> Self {
        let mut directory = Self::new();
        for participant in iter {
            directory.insert(participant);
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_SNAPSHOT: &str = r#"{
        "U1": {
            "real_name": "Ada",
            "status": "joined",
            "weekly_interest": "confirmed",
            "profile": {
                "all_interests": ["hiking", "chess"],
                "custom_interest": "",
                "promoted_people": [],
                "avoid_people": ["U3"]
            },
            "history": {"05-01-23": "U2", "05-08-23": ", U3"},
            "surveys": {"05/01/23": {"MetUp": "MetUp_yes", "Rating": "5"}}
        },
        "U2": {
            "real_name": "Grace",
            "status": "joined",
            "weekly_interest": "paused",
            "history": {"05-01-23": ["U1"]}
        }
    }"#;

    #[test]
    fn test_from_json_fills_ids_and_profiles() {
        let directory = Directory::from_json(LEGACY_SNAPSHOT).unwrap();
        assert_eq!(directory.len(), 2);

        let ada = directory.get(&ParticipantId::new("U1")).unwrap();
        assert_eq!(ada.id, ParticipantId::new("U1"));
        assert_eq!(ada.display_name, "Ada");
        assert_eq!(ada.interest_list(), "chess, hiking");
        assert!(ada.profile.avoid.contains(&ParticipantId::new("U3")));
    }

    #[test]
    fn test_legacy_history_strings_are_split() {
        let directory = Directory::from_json(LEGACY_SNAPSHOT).unwrap();
        let ada = directory.get(&ParticipantId::new("U1")).unwrap();

        assert!(ada.history.contains(&ParticipantId::new("U2")));
        assert!(ada.history.contains(&ParticipantId::new("U3")));
        assert_eq!(
            ada.history.partners_on("05-08-23"),
            &[ParticipantId::new("U3")]
        );
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let directory = Directory::from_json(LEGACY_SNAPSHOT).unwrap();
        let json = directory.to_json().unwrap();
        assert!(json.contains("\"surveys\""));
        assert!(json.contains("MetUp_yes"));

        let reloaded = Directory::from_json(&json).unwrap();
        assert_eq!(reloaded, directory);
    }

    #[test]
    fn test_declined_and_skipping_members_load_and_write_back() {
        let json = r#"{
            "U1": {"real_name": "Ada", "status": "joined", "weekly_interest": "confirmed"},
            "U2": {"real_name": "Grace", "status": "declined", "weekly_interest": "noResponse"},
            "U3": {"real_name": "Linus", "status": "joined", "weekly_interest": "skipping"},
            "U4": {"real_name": "Barbara", "status": "onLeave", "weekly_interest": "maybe"}
        }"#;
        let directory = Directory::from_json(json).unwrap();
        let grace = directory.get(&ParticipantId::new("U2")).unwrap();
        assert_eq!(grace.status, MembershipStatus::Declined);
        let linus = directory.get(&ParticipantId::new("U3")).unwrap();
        assert_eq!(linus.weekly_interest, WeeklyInterest::Skipping);
        assert_eq!(directory.eligible_ids(), vec![ParticipantId::new("U1")]);

        let written: serde_json::Value =
            serde_json::from_str(&directory.to_json().unwrap()).unwrap();
        assert_eq!(written["U2"]["status"], "declined");
        assert_eq!(written["U3"]["weekly_interest"], "skipping");
        assert_eq!(written["U4"]["status"], "onLeave");
        assert_eq!(written["U4"]["weekly_interest"], "maybe");
    }

    #[test]
    fn test_eligible_ids_only_confirmed() {
        let directory = Directory::from_json(LEGACY_SNAPSHOT).unwrap();
        assert_eq!(directory.eligible_ids(), vec![ParticipantId::new("U1")]);
    }

    #[test]
    fn test_require_missing_participant() {
        let directory = Directory::new();
        let err = directory.require(&ParticipantId::new("ghost")).unwrap_err();
        assert!(matches!(err, PairingError::DataNotFound(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn test_history_record_is_set_union() {
        let mut history = History::default();
        let partner = ParticipantId::new("U9");
        assert!(history.record("01-02-24", &partner));
        assert!(!history.record("01-02-24", &partner));
        assert_eq!(history.partners_on("01-02-24").len(), 1);
    }

    #[test]
    fn test_common_interests_sorted() {
        let a = Participant::new("a", "A").with_interests(["music", "art", "food"]);
        let b = Participant::new("b", "B").with_interests(["food", "art"]);
        assert_eq!(common_interests(&a, &b), vec!["art", "food"]);
    }
}

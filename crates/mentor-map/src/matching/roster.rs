use super::assignments::{AssignmentMap, MentorLoadIndex};
use super::domain::{Mentor, MentorId, Scholar, ScholarId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Caller-owned matching state: both rosters, the assignment map and shared notes.
///
/// This is also the persisted snapshot payload, so field names follow the stored
/// `{mentors, scholars, assignments, notes, lastSyncedAt}` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    #[serde(default, deserialize_with = "nullable_list")]
    pub mentors: Vec<Mentor>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub scholars: Vec<Scholar>,
    #[serde(default)]
    pub assignments: AssignmentMap,
    #[serde(default, deserialize_with = "nullable_text")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl Roster {
    pub fn new(mentors: Vec<Mentor>, scholars: Vec<Scholar>) -> Self {
        Self {
            mentors,
            scholars,
            ..Self::default()
        }
    }

    /// Parse and normalize a stored payload.
    pub fn from_json(raw: &str) -> Result<Self, RosterError> {
        serde_json::from_str(raw).map_err(RosterError::Malformed)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RosterError> {
        serde_json::from_value(value).map_err(RosterError::Malformed)
    }

    pub fn to_json_pretty(&self) -> Result<String, RosterError> {
        serde_json::to_string_pretty(self).map_err(RosterError::Encode)
    }

    pub fn mentor(&self, id: &MentorId) -> Option<&Mentor> {
        self.mentors.iter().find(|mentor| &mentor.id == id)
    }

    pub fn scholar(&self, id: &ScholarId) -> Option<&Scholar> {
        self.scholars.iter().find(|scholar| &scholar.id == id)
    }

    /// The scholar's mentor, provided the assignment still resolves to a roster entry.
    pub fn assigned_mentor(&self, scholar_id: &ScholarId) -> Option<&Mentor> {
        self.assignments
            .mentor_for(scholar_id)
            .and_then(|mentor_id| self.mentor(mentor_id))
    }

    pub fn is_covered(&self, scholar_id: &ScholarId) -> bool {
        self.assigned_mentor(scholar_id).is_some()
    }

    pub fn load_index(&self) -> MentorLoadIndex {
        MentorLoadIndex::build(&self.scholars, &self.assignments)
    }

    /// Whole-record replacement by id, appending when the id is new.
    pub fn upsert_mentor(&mut self, mentor: Mentor) {
        match self.mentors.iter_mut().find(|existing| existing.id == mentor.id) {
            Some(existing) => *existing = mentor,
            None => self.mentors.push(mentor),
        }
    }

    pub fn upsert_scholar(&mut self, scholar: Scholar) {
        match self
            .scholars
            .iter_mut()
            .find(|existing| existing.id == scholar.id)
        {
            Some(existing) => *existing = scholar,
            None => self.scholars.push(scholar),
        }
    }
}

/// Raised when a payload is not structurally a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster payload is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("roster could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

use super::domain::{MentorId, Scholar, ScholarId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Scholar id to mentor id. A scholar holds at most one active mentor.
///
/// Capacity is advisory and never enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentMap(BTreeMap<ScholarId, MentorId>);

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mentor_for(&self, scholar_id: &ScholarId) -> Option<&MentorId> {
        self.0.get(scholar_id)
    }

    pub fn is_assigned(&self, scholar_id: &ScholarId) -> bool {
        self.0.contains_key(scholar_id)
    }

    /// Sets the mentor unconditionally, returning the replaced mentor if any.
    pub fn assign(&mut self, scholar_id: ScholarId, mentor_id: MentorId) -> Option<MentorId> {
        self.0.insert(scholar_id, mentor_id)
    }

    pub fn unassign(&mut self, scholar_id: &ScholarId) -> Option<MentorId> {
        self.0.remove(scholar_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScholarId, &MentorId)> {
        self.0.iter()
    }
}

impl FromIterator<(ScholarId, MentorId)> for AssignmentMap {
    fn from_iter<T: IntoIterator<Item = (ScholarId, MentorId)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for AssignmentMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Option::<BTreeMap<ScholarId, MentorId>>::deserialize(deserializer)?;
        Ok(Self(map.unwrap_or_default()))
    }
}

/// Count and hours currently carried by a mentor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadFigures {
    pub count: usize,
    pub hours: u32,
}

#[derive(Debug, Clone, Default)]
struct MentorLoad {
    scholars: Vec<ScholarId>,
    hours: u32,
}

/// Mentor to assigned scholars, derived from an [`AssignmentMap`] on demand.
///
/// Only scholars present on the roster contribute, so stale map entries carry no load.
#[derive(Debug, Clone, Default)]
pub struct MentorLoadIndex {
    loads: HashMap<MentorId, MentorLoad>,
}

impl MentorLoadIndex {
    pub fn build(scholars: &[Scholar], assignments: &AssignmentMap) -> Self {
        let mut index = Self::default();
        for scholar in scholars {
            if let Some(mentor_id) = assignments.mentor_for(&scholar.id) {
                index.place(mentor_id, scholar);
            }
        }
        index
    }

    pub fn figures(&self, mentor_id: &MentorId) -> LoadFigures {
        self.loads
            .get(mentor_id)
            .map(|load| LoadFigures {
                count: load.scholars.len(),
                hours: load.hours,
            })
            .unwrap_or_default()
    }

    /// Load as seen by `scholar`, leaving out the scholar's own seat with this mentor.
    pub fn figures_without(&self, mentor_id: &MentorId, scholar: &Scholar) -> LoadFigures {
        let mut figures = self.figures(mentor_id);
        if self.holds(mentor_id, &scholar.id) {
            figures.count -= 1;
            figures.hours = figures.hours.saturating_sub(scholar.intensity);
        }
        figures
    }

    pub fn scholars(&self, mentor_id: &MentorId) -> &[ScholarId] {
        self.loads
            .get(mentor_id)
            .map(|load| load.scholars.as_slice())
            .unwrap_or(&[])
    }

    pub fn holds(&self, mentor_id: &MentorId, scholar_id: &ScholarId) -> bool {
        self.scholars(mentor_id).contains(scholar_id)
    }

    pub(crate) fn place(&mut self, mentor_id: &MentorId, scholar: &Scholar) {
        let load = self.loads.entry(mentor_id.clone()).or_default();
        if !load.scholars.contains(&scholar.id) {
            load.scholars.push(scholar.id.clone());
            load.hours = load.hours.saturating_add(scholar.intensity);
        }
    }

    pub(crate) fn release(&mut self, mentor_id: &MentorId, scholar: &Scholar) {
        if let Some(load) = self.loads.get_mut(mentor_id) {
            if let Some(position) = load.scholars.iter().position(|id| id == &scholar.id) {
                load.scholars.remove(position);
                load.hours = load.hours.saturating_sub(scholar.intensity);
            }
        }
    }
}

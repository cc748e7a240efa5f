use super::domain::{MentorId, ScholarId};
use super::ranking::{is_eligible, ranked_positions};
use super::roster::Roster;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of a single assignment-map mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssignmentChange {
    Assigned { previous: Option<MentorId> },
    Unassigned { previous: MentorId },
    Unchanged,
    /// The scholar or mentor id is not on the roster; nothing was touched.
    Ignored,
}

/// Seat `scholar_id` with `mentor_id`, replacing any prior mentor.
///
/// Capacity is not checked; that is the job of scoring and eligibility upstream.
pub fn assign(roster: &mut Roster, scholar_id: &ScholarId, mentor_id: &MentorId) -> AssignmentChange {
    if roster.scholar(scholar_id).is_none() || roster.mentor(mentor_id).is_none() {
        return AssignmentChange::Ignored;
    }

    if roster.assignments.mentor_for(scholar_id) == Some(mentor_id) {
        return AssignmentChange::Unchanged;
    }

    let previous = roster
        .assignments
        .assign(scholar_id.clone(), mentor_id.clone());
    AssignmentChange::Assigned { previous }
}

pub fn unassign(roster: &mut Roster, scholar_id: &ScholarId) -> AssignmentChange {
    match roster.assignments.unassign(scholar_id) {
        Some(previous) => AssignmentChange::Unassigned { previous },
        None => AssignmentChange::Unchanged,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAssignOptions {
    /// Place only scholars without a live assignment; seated scholars keep their mentor.
    #[serde(default)]
    pub open_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub scholar_id: ScholarId,
    pub mentor_id: MentorId,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<MentorId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoAssignReport {
    pub placements: Vec<Placement>,
    /// Scholars considered for whom no mentor passed the hard constraints.
    pub unplaced: Vec<ScholarId>,
}

/// Greedy single-pass placement over the whole cohort.
///
/// Seated scholars move when a better eligible mentor exists. Scholars go in order of urgency, then intensity (both descending, roster order
/// on ties). Each takes the highest-scoring mentor that still has a slot and the
/// hours, measured against the loads left by earlier placements in the same pass.
/// Filled slots are never reclaimed for later scholars.
pub fn auto_assign(roster: &mut Roster, options: AutoAssignOptions) -> AutoAssignReport {
    let mut order: Vec<usize> = (0..roster.scholars.len()).collect();
    order.sort_by(|&left, &right| {
        let left = &roster.scholars[left];
        let right = &roster.scholars[right];
        right
            .urgency
            .cmp(&left.urgency)
            .then(right.intensity.cmp(&left.intensity))
    });

    let mut loads = roster.load_index();
    let mut report = AutoAssignReport::default();

    for position in order {
        let scholar = &roster.scholars[position];
        let current = roster.assigned_mentor(&scholar.id).map(|mentor| mentor.id.clone());
        if current.is_some() && options.open_only {
            continue;
        }

        let choice = ranked_positions(scholar, &roster.mentors, &loads)
            .into_iter()
            .find(|(candidate, _)| is_eligible(&roster.mentors[*candidate], scholar, &loads));

        let Some((candidate, breakdown)) = choice else {
            debug!(scholar = %scholar.id, "no eligible mentor; leaving scholar unchanged");
            report.unplaced.push(scholar.id.clone());
            continue;
        };

        let mentor_id = roster.mentors[candidate].id.clone();
        if current.as_ref() == Some(&mentor_id) {
            continue;
        }

        // A stale seat (mentor no longer on the roster) carries no load to release.
        let previous = roster.assignments.mentor_for(&scholar.id).cloned();
        if let Some(previous_id) = &previous {
            loads.release(previous_id, scholar);
        }
        loads.place(&mentor_id, scholar);

        debug!(
            scholar = %scholar.id,
            mentor = %mentor_id,
            score = breakdown.total,
            "auto-assigned scholar"
        );

        report.placements.push(Placement {
            scholar_id: scholar.id.clone(),
            mentor_id: mentor_id.clone(),
            score: breakdown.total,
            previous: current,
        });
        roster.assignments.assign(scholar.id.clone(), mentor_id);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{Mentor, MentorStage, Scholar, TagSet};

    fn mentor(id: &str, tags: &str, availability: u32, capacity: u32) -> Mentor {
        Mentor {
            id: MentorId::new(id),
            name: id.to_string(),
            role: String::new(),
            timezone: "ET".to_string(),
            tags: TagSet::parse(tags),
            availability,
            capacity,
            stage: MentorStage::Active,
            notes: String::new(),
        }
    }

    fn scholar(id: &str, needs: &str, intensity: u32, urgency: u8) -> Scholar {
        Scholar {
            id: ScholarId::new(id),
            name: id.to_string(),
            cohort: "Spring 2026".to_string(),
            timezone: "ET".to_string(),
            needs: TagSet::parse(needs),
            intensity,
            urgency,
            notes: String::new(),
        }
    }

    #[test]
    fn assign_is_idempotent_and_replaces_prior_mentor() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 8, 2), mentor("m2", "finance", 8, 2)],
            vec![scholar("s1", "finance", 2, 3)],
        );
        let s1 = ScholarId::new("s1");

        assert_eq!(
            assign(&mut roster, &s1, &MentorId::new("m1")),
            AssignmentChange::Assigned { previous: None }
        );
        let once = roster.assignments.clone();
        assert_eq!(
            assign(&mut roster, &s1, &MentorId::new("m1")),
            AssignmentChange::Unchanged
        );
        assert_eq!(roster.assignments, once);

        assert_eq!(
            assign(&mut roster, &s1, &MentorId::new("m2")),
            AssignmentChange::Assigned {
                previous: Some(MentorId::new("m1"))
            }
        );
    }

    #[test]
    fn assign_ignores_unknown_ids() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 8, 2)],
            vec![scholar("s1", "finance", 2, 3)],
        );
        assert_eq!(
            assign(&mut roster, &ScholarId::new("ghost"), &MentorId::new("m1")),
            AssignmentChange::Ignored
        );
        assert_eq!(
            assign(&mut roster, &ScholarId::new("s1"), &MentorId::new("ghost")),
            AssignmentChange::Ignored
        );
        assert!(roster.assignments.is_empty());
    }

    #[test]
    fn assign_does_not_enforce_capacity() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 8, 0)],
            vec![scholar("s1", "finance", 2, 3)],
        );
        assert!(matches!(
            assign(&mut roster, &ScholarId::new("s1"), &MentorId::new("m1")),
            AssignmentChange::Assigned { .. }
        ));
    }

    #[test]
    fn unassign_is_a_no_op_when_absent() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 8, 2)],
            vec![scholar("s1", "finance", 2, 3)],
        );
        let s1 = ScholarId::new("s1");
        assert_eq!(unassign(&mut roster, &s1), AssignmentChange::Unchanged);

        assign(&mut roster, &s1, &MentorId::new("m1"));
        assert_eq!(
            unassign(&mut roster, &s1),
            AssignmentChange::Unassigned {
                previous: MentorId::new("m1")
            }
        );
        assert!(roster.assignments.is_empty());
    }

    #[test]
    fn auto_assign_orders_by_urgency_then_intensity() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 0, 1)],
            vec![
                scholar("light", "finance", 1, 4),
                scholar("heavy", "finance", 5, 4),
                scholar("calm", "finance", 9, 2),
            ],
        );

        let report = auto_assign(&mut roster, AutoAssignOptions::default());
        assert_eq!(report.placements.len(), 1);
        assert_eq!(report.placements[0].scholar_id, ScholarId::new("heavy"));
        assert_eq!(
            report.unplaced,
            vec![ScholarId::new("light"), ScholarId::new("calm")]
        );
    }

    #[test]
    fn auto_assign_skips_ineligible_top_choice() {
        let needs = "finance, networking, internships, career";
        let mut roster = Roster::new(
            vec![mentor("best", needs, 2, 3), mentor("fallback", "finance", 10, 3)],
            vec![scholar("s1", needs, 5, 5)],
        );

        let ranked = ranked_positions(&roster.scholars[0], &roster.mentors, &roster.load_index());
        assert_eq!(ranked[0].0, 0, "hours penalty still leaves the best overlap on top");

        let report = auto_assign(&mut roster, AutoAssignOptions::default());
        assert_eq!(report.placements[0].mentor_id, MentorId::new("fallback"));
    }

    #[test]
    fn auto_assign_moves_seated_scholars_to_a_better_mentor() {
        let mut roster = Roster::new(
            vec![mentor("weak", "policy", 8, 2), mentor("strong", "finance", 8, 2)],
            vec![scholar("s1", "finance", 2, 3)],
        );
        assign(&mut roster, &ScholarId::new("s1"), &MentorId::new("weak"));

        let report = auto_assign(&mut roster, AutoAssignOptions::default());
        assert_eq!(report.placements.len(), 1);
        assert_eq!(report.placements[0].previous, Some(MentorId::new("weak")));
        assert_eq!(
            roster.assignments.mentor_for(&ScholarId::new("s1")),
            Some(&MentorId::new("strong"))
        );

        let again = auto_assign(&mut roster, AutoAssignOptions::default());
        assert!(again.placements.is_empty(), "best seat is already held");
    }

    #[test]
    fn open_only_leaves_existing_seats_alone() {
        let mut roster = Roster::new(
            vec![mentor("weak", "policy", 8, 2), mentor("strong", "finance", 8, 2)],
            vec![scholar("s1", "finance", 2, 3), scholar("s2", "finance", 2, 3)],
        );
        assign(&mut roster, &ScholarId::new("s1"), &MentorId::new("weak"));

        let report = auto_assign(&mut roster, AutoAssignOptions { open_only: true });
        assert_eq!(report.placements.len(), 1);
        assert_eq!(report.placements[0].scholar_id, ScholarId::new("s2"));
        assert_eq!(
            roster.assignments.mentor_for(&ScholarId::new("s1")),
            Some(&MentorId::new("weak"))
        );
    }

    #[test]
    fn auto_assign_replaces_stale_seats() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 8, 2)],
            vec![scholar("s1", "finance", 2, 3)],
        );
        roster
            .assignments
            .assign(ScholarId::new("s1"), MentorId::new("departed"));

        let report = auto_assign(&mut roster, AutoAssignOptions::default());
        assert_eq!(report.placements.len(), 1);
        assert_eq!(
            roster.assignments.mentor_for(&ScholarId::new("s1")),
            Some(&MentorId::new("m1"))
        );
    }
}

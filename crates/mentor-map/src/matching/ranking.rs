use super::assignments::MentorLoadIndex;
use super::domain::{Mentor, MentorId, Scholar, ScholarId};
use super::roster::Roster;
use super::scoring::{self, MatchScore};
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 3;

/// A soft-scored candidate. Over-capacity mentors stay in the list so staff can
/// knowingly override the warning.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMentor {
    pub mentor: Mentor,
    pub score: f64,
    pub breakdown: MatchScore,
    pub rationale: Vec<String>,
}

/// Top candidates for one scholar alongside the scholar's current seat.
#[derive(Debug, Clone, Serialize)]
pub struct ScholarMatches {
    pub scholar_id: ScholarId,
    pub scholar_name: String,
    pub cohort: String,
    pub urgency: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mentor: Option<MentorId>,
    pub candidates: Vec<RankedMentor>,
}

/// A mentor who could take the scholar over right now under hard constraints.
#[derive(Debug, Clone, Serialize)]
pub struct BackupCandidate {
    pub mentor: Mentor,
    pub overlap: usize,
    pub score: f64,
}

pub fn rank_mentors_for_scholar(
    scholar: &Scholar,
    mentors: &[Mentor],
    loads: &MentorLoadIndex,
    top_n: usize,
) -> Vec<RankedMentor> {
    ranked_positions(scholar, mentors, loads)
        .into_iter()
        .take(top_n)
        .map(|(position, breakdown)| {
            let mentor = &mentors[position];
            RankedMentor {
                mentor: mentor.clone(),
                score: breakdown.total,
                breakdown,
                rationale: scoring::rationale(mentor, scholar, loads),
            }
        })
        .collect()
}

/// Roster positions ordered by score descending; ties keep roster order.
pub(crate) fn ranked_positions(
    scholar: &Scholar,
    mentors: &[Mentor],
    loads: &MentorLoadIndex,
) -> Vec<(usize, MatchScore)> {
    let mut ranked: Vec<(usize, MatchScore)> = mentors
        .iter()
        .enumerate()
        .map(|(position, mentor)| (position, scoring::breakdown(mentor, scholar, loads)))
        .collect();
    ranked.sort_by(|left, right| right.1.total.total_cmp(&left.1.total));
    ranked
}

pub fn build_matches(roster: &Roster, top_n: usize) -> Vec<ScholarMatches> {
    let loads = roster.load_index();
    roster
        .scholars
        .iter()
        .map(|scholar| ScholarMatches {
            scholar_id: scholar.id.clone(),
            scholar_name: scholar.name.clone(),
            cohort: scholar.cohort.clone(),
            urgency: scholar.urgency,
            current_mentor: roster.assignments.mentor_for(&scholar.id).cloned(),
            candidates: rank_mentors_for_scholar(scholar, &roster.mentors, &loads, top_n),
        })
        .collect()
}

/// Capacity and hours constraints only, evaluated without the scholar's own seat.
pub fn is_eligible(mentor: &Mentor, scholar: &Scholar, loads: &MentorLoadIndex) -> bool {
    let figures = loads.figures_without(&mentor.id, scholar);
    scoring::has_open_slot(mentor, figures)
        && scoring::fits_hours(mentor, figures, scholar.intensity)
}

/// Mentors other than `exclude` who share a need (when the scholar has any) and
/// can absorb the scholar without breaching capacity or hours.
pub fn find_eligible_backups(
    scholar: &Scholar,
    exclude: Option<&MentorId>,
    mentors: &[Mentor],
    loads: &MentorLoadIndex,
) -> Vec<BackupCandidate> {
    let mut candidates: Vec<BackupCandidate> = mentors
        .iter()
        .filter(|mentor| Some(&mentor.id) != exclude)
        .filter_map(|mentor| {
            let overlap = scholar.needs.overlap(&mentor.tags);
            if !scholar.needs.is_empty() && overlap == 0 {
                return None;
            }
            if !is_eligible(mentor, scholar, loads) {
                return None;
            }
            Some(BackupCandidate {
                mentor: mentor.clone(),
                overlap,
                score: scoring::score(mentor, scholar, loads),
            })
        })
        .collect();
    candidates.sort_by(|left, right| right.score.total_cmp(&left.score));
    candidates
}

/// Backups for a scholar on the roster, excluding their current mentor.
pub fn backups_for(roster: &Roster, scholar_id: &ScholarId) -> Vec<BackupCandidate> {
    let Some(scholar) = roster.scholar(scholar_id) else {
        return Vec::new();
    };
    let loads = roster.load_index();
    find_eligible_backups(
        scholar,
        roster.assignments.mentor_for(scholar_id),
        &roster.mentors,
        &loads,
    )
}

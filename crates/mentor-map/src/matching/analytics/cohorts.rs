use super::super::domain::{MentorId, Scholar};
use super::super::roster::Roster;
use super::gaps::ranked_needs;
use super::load::rounded_pct;
use super::views::{CohortRisk, CohortRiskLevel};
use std::collections::{BTreeMap, BTreeSet};

pub const UNASSIGNED_COHORT: &str = "Unassigned cohort";

const HIGH_UNASSIGNED_SHARE: f64 = 0.30;
const HIGH_AVERAGE_URGENCY: f64 = 4.0;
const TOP_UNMET_NEEDS: usize = 3;

/// Coverage and pressure per cohort, in first-seen roster order.
pub fn cohort_risks(roster: &Roster) -> Vec<CohortRisk> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&Scholar>> = BTreeMap::new();
    for scholar in &roster.scholars {
        let cohort = match scholar.cohort.trim() {
            "" => UNASSIGNED_COHORT,
            name => name,
        };
        if !groups.contains_key(cohort) {
            order.push(cohort);
        }
        groups.entry(cohort).or_default().push(scholar);
    }

    order
        .into_iter()
        .filter_map(|cohort| {
            groups
                .get(cohort)
                .map(|members| assess_cohort(roster, cohort, members))
        })
        .collect()
}

fn assess_cohort(roster: &Roster, cohort: &str, members: &[&Scholar]) -> CohortRisk {
    let scholars = members.len();
    let mut mentors: BTreeSet<&MentorId> = BTreeSet::new();
    let mut unmet: BTreeMap<&str, usize> = BTreeMap::new();

    for scholar in members {
        match roster.assigned_mentor(&scholar.id) {
            Some(mentor) => {
                mentors.insert(&mentor.id);
            }
            None => {
                for need in scholar.needs.iter() {
                    *unmet.entry(need).or_default() += 1;
                }
            }
        }
    }

    let assigned = members
        .iter()
        .filter(|scholar| roster.is_covered(&scholar.id))
        .count();
    let unassigned = scholars - assigned;
    let average_urgency =
        members.iter().map(|scholar| scholar.urgency as f64).sum::<f64>() / scholars as f64;
    let average_intensity =
        members.iter().map(|scholar| scholar.intensity as f64).sum::<f64>() / scholars as f64;
    let unassigned_share = unassigned as f64 / scholars as f64;

    let mut reasons = Vec::new();
    if unassigned_share > HIGH_UNASSIGNED_SHARE {
        reasons.push(format!(
            "{unassigned} of {scholars} scholar(s) without a mentor"
        ));
    }
    if average_urgency >= HIGH_AVERAGE_URGENCY {
        reasons.push(format!("Average urgency {average_urgency:.1}"));
    }
    if mentors.len() <= 1 && scholars > 2 {
        reasons.push(format!(
            "{} mentor(s) carrying {scholars} scholars",
            mentors.len()
        ));
    }

    let level = if !reasons.is_empty() {
        CohortRiskLevel::High
    } else if unassigned > 0 {
        reasons.push(format!("{unassigned} scholar(s) awaiting a match"));
        CohortRiskLevel::Watch
    } else {
        CohortRiskLevel::Stable
    };

    let mut top_unmet_needs = ranked_needs(unmet);
    top_unmet_needs.truncate(TOP_UNMET_NEEDS);

    CohortRisk {
        cohort: cohort.to_string(),
        scholars,
        assigned,
        coverage_pct: rounded_pct(assigned as u64, scholars as u64),
        average_urgency,
        average_intensity,
        distinct_mentors: mentors.len(),
        top_unmet_needs,
        level,
        level_label: level.label(),
        reasons,
    }
}

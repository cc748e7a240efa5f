use super::super::roster::Roster;
use super::cohorts::cohort_risks;
use super::continuity::continuity_risks_with;
use super::gaps::coverage_gaps;
use super::load::{capacity_alerts_from, coverage, fairness_from, headline_from, mentor_loads_with};
use super::views::{CohortRiskLevel, Criticality, SignalReport};

/// Spread above which mentor loads are considered lopsided.
const LOPSIDED_SPREAD: usize = 2;

impl SignalReport {
    /// Every aggregate signal for the roster, computed from a single load index.
    pub fn build(roster: &Roster) -> Self {
        let loads = roster.load_index();
        let mentor_loads = mentor_loads_with(roster, &loads);
        let coverage = coverage(roster);
        let fairness = fairness_from(&mentor_loads);
        let headline = headline_from(roster, &mentor_loads, &coverage);
        let capacity_alerts = capacity_alerts_from(&mentor_loads);
        let coverage_gaps = coverage_gaps(roster);
        let continuity = continuity_risks_with(roster, &loads);
        let cohorts = cohort_risks(roster);

        let mut report = Self {
            headline,
            coverage,
            fairness,
            mentor_loads,
            capacity_alerts,
            coverage_gaps,
            continuity,
            cohorts,
            recommended_actions: Vec::new(),
        };
        report.recommended_actions = generate_actions(&report);
        report
    }
}

pub(crate) fn generate_actions(report: &SignalReport) -> Vec<String> {
    let mut actions = Vec::new();

    if !report.coverage_gaps.recruitment.is_empty() {
        let tags: Vec<&str> = report
            .coverage_gaps
            .recruitment
            .iter()
            .take(3)
            .map(|gap| gap.tag.as_str())
            .collect();
        actions.push(format!("Recruit mentors for {}", tags.join(", ")));
    }

    let over_capacity = report.capacity_alerts.over_capacity.len();
    if report
        .mentor_loads
        .iter()
        .any(|entry| entry.open_slots < 0)
    {
        actions.push("Rebalance scholars away from mentors past capacity".to_string());
    } else if over_capacity > 0 {
        actions.push(format!(
            "Hold new placements for {} mentor{} at capacity",
            over_capacity,
            if over_capacity == 1 { "" } else { "s" }
        ));
    }

    if !report.capacity_alerts.over_hours.is_empty() {
        actions.push("Trim weekly hours for mentors over their availability".to_string());
    }

    let stranded: usize = report
        .continuity
        .iter()
        .map(|risk| risk.single_points_of_failure.len())
        .sum();
    if stranded > 0 {
        actions.push(format!(
            "Line up backup mentors for {} scholar{} with no alternative",
            stranded,
            if stranded == 1 { "" } else { "s" }
        ));
    }

    for risk in report
        .continuity
        .iter()
        .filter(|risk| risk.criticality == Criticality::Critical)
    {
        actions.push(format!("Schedule a continuity check-in with {}", risk.name));
    }

    for cohort in report
        .cohorts
        .iter()
        .filter(|cohort| cohort.level == CohortRiskLevel::High)
    {
        actions.push(format!("Staff up {} before the next cohort session", cohort.cohort));
    }

    if report.coverage.assigned < report.coverage.scholars && report.headline.open_slots > 0 {
        actions.push("Run auto-assign to fill open mentor slots".to_string());
    }

    if report.fairness.spread > LOPSIDED_SPREAD {
        actions.push(format!(
            "Even out mentor loads (spread of {} scholars)",
            report.fairness.spread
        ));
    }

    if actions.is_empty() {
        actions.push("No action needed; coverage and load are balanced".to_string());
    }

    actions
}

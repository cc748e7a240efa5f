use super::super::assignments::MentorLoadIndex;
use super::super::domain::Mentor;
use super::super::ranking::find_eligible_backups;
use super::super::roster::Roster;
use super::load::rounded_pct;
use super::views::{ContinuityRisk, Criticality};
use std::collections::HashMap;

const COUNT_WEIGHT: f64 = 2.0;
const HOURS_WEIGHT: f64 = 0.5;
const UTILIZATION_DIVISOR: f64 = 50.0;
const SCARCITY_WEIGHT: f64 = 3.0;
const SPOF_WEIGHT: f64 = 4.0;

const CRITICAL_SPOF: usize = 2;
const CRITICAL_RISK: f64 = 18.0;
const WATCH_SPOF: usize = 1;
const WATCH_RISK: f64 = 10.0;

/// How many mentors list each tag.
pub fn tag_holders(mentors: &[Mentor]) -> HashMap<&str, usize> {
    let mut holders: HashMap<&str, usize> = HashMap::new();
    for mentor in mentors {
        for tag in mentor.tags.iter() {
            *holders.entry(tag).or_default() += 1;
        }
    }
    holders
}

/// Sum of `1 / holders` over the mentor's tags; rare expertise weighs more.
pub fn scarcity(mentor: &Mentor, holders: &HashMap<&str, usize>) -> f64 {
    mentor
        .tags
        .iter()
        .map(|tag| match holders.get(tag) {
            Some(&count) if count > 0 => 1.0 / count as f64,
            _ => 1.0,
        })
        .sum()
}

pub fn classify(risk_score: f64, single_points_of_failure: usize) -> Criticality {
    if single_points_of_failure >= CRITICAL_SPOF || risk_score >= CRITICAL_RISK {
        Criticality::Critical
    } else if single_points_of_failure >= WATCH_SPOF || risk_score >= WATCH_RISK {
        Criticality::Watch
    } else {
        Criticality::Stable
    }
}

/// Dependency risk for every mentor currently carrying scholars, riskiest first.
pub fn continuity_risks(roster: &Roster) -> Vec<ContinuityRisk> {
    continuity_risks_with(roster, &roster.load_index())
}

pub(crate) fn continuity_risks_with(roster: &Roster, loads: &MentorLoadIndex) -> Vec<ContinuityRisk> {
    let holders = tag_holders(&roster.mentors);

    let mut risks: Vec<ContinuityRisk> = roster
        .mentors
        .iter()
        .filter_map(|mentor| {
            let figures = loads.figures(&mentor.id);
            if figures.count == 0 {
                return None;
            }

            let single_points_of_failure: Vec<_> = loads
                .scholars(&mentor.id)
                .iter()
                .filter_map(|scholar_id| roster.scholar(scholar_id))
                .filter(|scholar| {
                    find_eligible_backups(scholar, Some(&mentor.id), &roster.mentors, loads)
                        .is_empty()
                })
                .map(|scholar| scholar.id.clone())
                .collect();

            let capacity_pct = rounded_pct(figures.count as u64, mentor.capacity as u64);
            let hours_pct = rounded_pct(figures.hours as u64, mentor.availability as u64);
            let scarcity = scarcity(mentor, &holders);

            let raw = COUNT_WEIGHT * figures.count as f64
                + HOURS_WEIGHT * figures.hours as f64
                + (capacity_pct + hours_pct) as f64 / UTILIZATION_DIVISOR
                + SCARCITY_WEIGHT * scarcity
                + SPOF_WEIGHT * single_points_of_failure.len() as f64;
            let risk_score = (raw * 100.0).round() / 100.0;
            let criticality = classify(risk_score, single_points_of_failure.len());

            let unique_tags = mentor
                .tags
                .iter()
                .filter(|tag| holders.get(tag).copied() == Some(1))
                .map(str::to_string)
                .collect();

            Some(ContinuityRisk {
                mentor_id: mentor.id.clone(),
                name: mentor.name.clone(),
                criticality,
                criticality_label: criticality.label(),
                risk_score,
                assigned: figures.count,
                assigned_hours: figures.hours,
                capacity_pct,
                hours_pct,
                scarcity,
                single_points_of_failure,
                unique_tags,
            })
        })
        .collect();

    risks.sort_by(|left, right| right.risk_score.total_cmp(&left.risk_score));
    risks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{MentorId, MentorStage, Scholar, ScholarId, TagSet};

    fn mentor(id: &str, tags: &str, availability: u32, capacity: u32) -> Mentor {
        Mentor {
            id: MentorId::new(id),
            name: id.to_string(),
            role: String::new(),
            timezone: String::new(),
            tags: TagSet::parse(tags),
            availability,
            capacity,
            stage: MentorStage::Active,
            notes: String::new(),
        }
    }

    fn scholar(id: &str, needs: &str, intensity: u32) -> Scholar {
        Scholar {
            id: ScholarId::new(id),
            name: id.to_string(),
            cohort: String::new(),
            timezone: String::new(),
            needs: TagSet::parse(needs),
            intensity,
            urgency: 3,
            notes: String::new(),
        }
    }

    #[test]
    fn scarcity_weights_rare_tags() {
        let mentors = vec![mentor("m1", "finance, robotics", 0, 2), mentor("m2", "finance", 0, 2)];
        let holders = tag_holders(&mentors);
        assert_eq!(scarcity(&mentors[0], &holders), 1.5);
        assert_eq!(scarcity(&mentors[1], &holders), 0.5);
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify(5.0, 2), Criticality::Critical);
        assert_eq!(classify(18.0, 0), Criticality::Critical);
        assert_eq!(classify(2.0, 1), Criticality::Watch);
        assert_eq!(classify(10.0, 0), Criticality::Watch);
        assert_eq!(classify(9.99, 0), Criticality::Stable);
    }

    #[test]
    fn sole_holder_with_stranded_scholars_is_critical() {
        let mut roster = Roster::new(
            vec![mentor("m1", "robotics", 10, 4), mentor("m2", "finance", 10, 4)],
            vec![scholar("s1", "robotics", 2), scholar("s2", "robotics", 2)],
        );
        roster
            .assignments
            .assign(ScholarId::new("s1"), MentorId::new("m1"));
        roster
            .assignments
            .assign(ScholarId::new("s2"), MentorId::new("m1"));

        let risks = continuity_risks(&roster);
        assert_eq!(risks.len(), 1, "idle mentors are not listed");

        let risk = &risks[0];
        assert_eq!(risk.single_points_of_failure.len(), 2);
        assert_eq!(risk.unique_tags, vec!["robotics"]);
        assert_eq!(risk.capacity_pct, 50);
        assert_eq!(risk.hours_pct, 40);
        // 2*2 + 0.5*4 + 90/50 + 3*1 + 4*2
        assert_eq!(risk.risk_score, 18.8);
        assert_eq!(risk.criticality, Criticality::Critical);
    }

    #[test]
    fn scholars_with_backups_are_not_single_points_of_failure() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance", 0, 2), mentor("m2", "finance", 0, 2)],
            vec![scholar("s1", "finance", 1)],
        );
        roster
            .assignments
            .assign(ScholarId::new("s1"), MentorId::new("m1"));

        let risks = continuity_risks(&roster);
        assert!(risks[0].single_points_of_failure.is_empty());
        assert_eq!(risks[0].criticality, Criticality::Stable);
    }
}

use super::super::assignments::MentorLoadIndex;
use super::super::domain::{MentorId, MentorStage};
use super::super::roster::Roster;
use super::views::{
    CapacityAlerts, CoverageSummary, FairnessSummary, HeadlineMetrics, LowCapacityAlert,
    MentorLoadEntry, StageCount,
};

/// Rounded percentage, zero when the denominator is zero.
pub(crate) fn rounded_pct(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator as f64 / denominator as f64) * 100.0).round() as u32
}

pub fn mentor_loads(roster: &Roster) -> Vec<MentorLoadEntry> {
    mentor_loads_with(roster, &roster.load_index())
}

pub(crate) fn mentor_loads_with(roster: &Roster, loads: &MentorLoadIndex) -> Vec<MentorLoadEntry> {
    roster
        .mentors
        .iter()
        .map(|mentor| {
            let figures = loads.figures(&mentor.id);
            MentorLoadEntry {
                mentor_id: mentor.id.clone(),
                name: mentor.name.clone(),
                stage: mentor.stage,
                load_count: figures.count,
                load_hours: figures.hours,
                capacity: mentor.capacity,
                availability: mentor.availability,
                open_slots: mentor.capacity as i64 - figures.count as i64,
                capacity_pct: rounded_pct(figures.count as u64, mentor.capacity as u64),
                hours_pct: rounded_pct(figures.hours as u64, mentor.availability as u64),
                over_capacity: figures.count as u64 >= mentor.capacity as u64,
                // Zero availability is never an hours violation.
                over_hours: mentor.availability > 0 && figures.hours > mentor.availability,
            }
        })
        .collect()
}

/// Population standard deviation of per-mentor scholar counts; zero with no mentors.
pub fn load_stdev(roster: &Roster) -> f64 {
    fairness(roster).load_stdev
}

pub fn fairness(roster: &Roster) -> FairnessSummary {
    fairness_from(&mentor_loads(roster))
}

pub(crate) fn fairness_from(entries: &[MentorLoadEntry]) -> FairnessSummary {
    if entries.is_empty() {
        return FairnessSummary {
            load_stdev: 0.0,
            average_load: 0.0,
            max_load: 0,
            min_load: 0,
            spread: 0,
        };
    }

    let count = entries.len() as f64;
    let average = entries.iter().map(|entry| entry.load_count as f64).sum::<f64>() / count;
    let variance = entries
        .iter()
        .map(|entry| {
            let delta = entry.load_count as f64 - average;
            delta * delta
        })
        .sum::<f64>()
        / count;
    let max_load = entries.iter().map(|entry| entry.load_count).max().unwrap_or(0);
    let min_load = entries.iter().map(|entry| entry.load_count).min().unwrap_or(0);

    FairnessSummary {
        load_stdev: variance.sqrt(),
        average_load: average,
        max_load,
        min_load,
        spread: max_load - min_load,
    }
}

/// Share of scholars seated with a mentor that is still on the roster.
pub fn coverage(roster: &Roster) -> CoverageSummary {
    let scholars = roster.scholars.len();
    let assigned = roster
        .scholars
        .iter()
        .filter(|scholar| roster.is_covered(&scholar.id))
        .count();
    let ratio = if scholars == 0 {
        0.0
    } else {
        assigned as f64 / scholars as f64
    };

    CoverageSummary {
        scholars,
        assigned,
        ratio,
        pct: rounded_pct(assigned as u64, scholars as u64),
    }
}

pub fn headline(roster: &Roster) -> HeadlineMetrics {
    headline_from(roster, &mentor_loads(roster), &coverage(roster))
}

pub(crate) fn headline_from(
    roster: &Roster,
    entries: &[MentorLoadEntry],
    coverage: &CoverageSummary,
) -> HeadlineMetrics {
    let stages = MentorStage::ordered()
        .into_iter()
        .map(|stage| StageCount {
            stage,
            stage_label: stage.label(),
            count: roster
                .mentors
                .iter()
                .filter(|mentor| mentor.stage == stage)
                .count(),
        })
        .collect();

    HeadlineMetrics {
        mentors: roster.mentors.len(),
        scholars: roster.scholars.len(),
        assigned_pct: coverage.pct,
        open_slots: entries
            .iter()
            .map(|entry| entry.open_slots.max(0) as u64)
            .sum(),
        stages,
    }
}

pub fn over_capacity_mentors(roster: &Roster) -> Vec<MentorId> {
    capacity_alerts(roster).over_capacity
}

pub fn over_hours_mentors(roster: &Roster) -> Vec<MentorId> {
    capacity_alerts(roster).over_hours
}

pub fn capacity_alerts(roster: &Roster) -> CapacityAlerts {
    capacity_alerts_from(&mentor_loads(roster))
}

pub(crate) fn capacity_alerts_from(entries: &[MentorLoadEntry]) -> CapacityAlerts {
    let mut alerts = CapacityAlerts::default();
    for entry in entries {
        if entry.over_capacity {
            alerts.over_capacity.push(entry.mentor_id.clone());
        }
        if entry.over_hours {
            alerts.over_hours.push(entry.mentor_id.clone());
        }
        if entry.open_slots == 1 {
            alerts.low_capacity.push(LowCapacityAlert {
                mentor_id: entry.mentor_id.clone(),
                name: entry.name.clone(),
                open_slots: entry.open_slots,
            });
        }
    }
    alerts
}

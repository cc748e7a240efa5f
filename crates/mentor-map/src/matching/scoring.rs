//! Additive compatibility scoring for a mentor/scholar pair.
//!
//! Scores are contextual: the mentor's current load (taken from the
//! [`MentorLoadIndex`], minus the scholar's own seat) drives the capacity and
//! hours penalties. Nothing here fails; absent data simply scores lower.

use super::assignments::{LoadFigures, MentorLoadIndex};
use super::domain::{Mentor, Scholar};
use serde::Serialize;

pub const OVERLAP_WEIGHT: f64 = 5.0;
pub const TIMEZONE_BOOST: f64 = 2.0;
pub const URGENCY_PIVOT: f64 = 3.0;
pub const URGENCY_WEIGHT: f64 = 1.5;
pub const CAPACITY_PENALTY: f64 = 100.0;
pub const HOURS_PENALTY: f64 = 10.0;

/// Per-component view of a score so callers can audit a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScore {
    pub overlap: usize,
    pub overlap_points: f64,
    pub timezone_boost: f64,
    pub urgency_boost: f64,
    /// Zero or `-CAPACITY_PENALTY`.
    pub capacity_penalty: f64,
    /// Zero or `-HOURS_PENALTY`.
    pub hours_penalty: f64,
    pub total: f64,
}

pub fn breakdown(mentor: &Mentor, scholar: &Scholar, loads: &MentorLoadIndex) -> MatchScore {
    let figures = loads.figures_without(&mentor.id, scholar);
    breakdown_with(mentor, scholar, figures)
}

pub fn score(mentor: &Mentor, scholar: &Scholar, loads: &MentorLoadIndex) -> f64 {
    breakdown(mentor, scholar, loads).total
}

pub(crate) fn breakdown_with(mentor: &Mentor, scholar: &Scholar, figures: LoadFigures) -> MatchScore {
    let overlap = scholar.needs.overlap(&mentor.tags);
    let overlap_points = overlap as f64 * OVERLAP_WEIGHT;

    let timezone_boost = match timezones_align(mentor, scholar) {
        Some(true) => TIMEZONE_BOOST,
        _ => 0.0,
    };

    let urgency_boost = (scholar.urgency as f64 - URGENCY_PIVOT) * URGENCY_WEIGHT;

    let capacity_penalty = if has_open_slot(mentor, figures) {
        0.0
    } else {
        -CAPACITY_PENALTY
    };

    let hours_penalty = if fits_hours(mentor, figures, scholar.intensity) {
        0.0
    } else {
        -HOURS_PENALTY
    };

    MatchScore {
        overlap,
        overlap_points,
        timezone_boost,
        urgency_boost,
        capacity_penalty,
        hours_penalty,
        total: overlap_points + timezone_boost + urgency_boost + capacity_penalty + hours_penalty,
    }
}

/// Human-readable explanation, produced independently of the numeric score.
pub fn rationale(mentor: &Mentor, scholar: &Scholar, loads: &MentorLoadIndex) -> Vec<String> {
    let figures = loads.figures_without(&mentor.id, scholar);
    rationale_with(mentor, scholar, figures)
}

pub(crate) fn rationale_with(mentor: &Mentor, scholar: &Scholar, figures: LoadFigures) -> Vec<String> {
    let mut notes = Vec::with_capacity(3);

    let shared = scholar.needs.shared_with(&mentor.tags);
    if shared.is_empty() {
        notes.push("No direct overlap".to_string());
    } else {
        notes.push(format!("Shared needs: {}", shared.join(", ")));
    }

    notes.push(match timezones_align(mentor, scholar) {
        Some(true) => format!("Timezone aligned ({})", mentor.timezone.trim()),
        Some(false) => format!(
            "Timezone mismatch ({} vs {})",
            mentor.timezone.trim(),
            scholar.timezone.trim()
        ),
        None => "Timezone unknown".to_string(),
    });

    let open_slots = mentor.capacity as i64 - figures.count as i64;
    let slots_note = if open_slots >= 0 {
        format!("{open_slots} slot(s) left")
    } else {
        format!("over by {}", -open_slots)
    };

    let hours_note = if mentor.availability == 0 {
        "Open".to_string()
    } else {
        let remaining = mentor.availability as i64 - figures.hours as i64;
        if remaining >= 0 {
            format!("{remaining} hr(s)/week left")
        } else {
            format!("over by {} hr(s)/week", -remaining)
        }
    };

    notes.push(format!("Capacity: {slots_note}; hours: {hours_note}"));
    notes
}

/// `None` when either side has no timezone recorded. Labels must match exactly.
pub fn timezones_align(mentor: &Mentor, scholar: &Scholar) -> Option<bool> {
    let ours = mentor.timezone.trim();
    let theirs = scholar.timezone.trim();
    if ours.is_empty() || theirs.is_empty() {
        None
    } else {
        Some(ours == theirs)
    }
}

pub(crate) fn has_open_slot(mentor: &Mentor, figures: LoadFigures) -> bool {
    (figures.count as u64) < mentor.capacity as u64
}

/// Zero availability reads as "not hour-constrained".
pub(crate) fn fits_hours(mentor: &Mentor, figures: LoadFigures, intensity: u32) -> bool {
    mentor.availability == 0
        || figures.hours as u64 + intensity as u64 <= mentor.availability as u64
}

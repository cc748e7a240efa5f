//! Mentor/scholar matching: entity model, compatibility scoring, greedy
//! assignment and roster-wide coverage, fairness and continuity signals.
//!
//! The core functions take the caller-owned [`Roster`] explicitly and never fail;
//! the service, router, importer and snapshot contract wrap them for the API.

pub mod analytics;
pub mod assignments;
pub mod domain;
pub mod engine;
pub mod import;
pub mod ranking;
pub mod roster;
pub mod router;
pub mod sample;
pub mod scoring;
pub mod service;
pub mod snapshots;

#[cfg(test)]
mod tests;

pub use analytics::views::{
    CapacityAlerts, CohortRisk, CohortRiskLevel, ContinuityRisk, CoverageGaps, CoverageSummary,
    Criticality, FairnessSummary, HeadlineMetrics, MentorLoadEntry, NeedGap, SignalReport,
};
pub use assignments::{AssignmentMap, LoadFigures, MentorLoadIndex};
pub use domain::{
    Mentor, MentorDraft, MentorId, MentorStage, Scholar, ScholarDraft, ScholarId, TagSet,
};
pub use engine::{
    assign, auto_assign, unassign, AssignmentChange, AutoAssignOptions, AutoAssignReport,
    Placement,
};
pub use import::{RosterCsvImporter, RosterImportError};
pub use ranking::{
    build_matches, find_eligible_backups, is_eligible, rank_mentors_for_scholar, BackupCandidate,
    RankedMentor, ScholarMatches, DEFAULT_TOP_N,
};
pub use roster::{Roster, RosterError};
pub use router::roster_router;
pub use sample::sample_roster;
pub use scoring::{rationale, score, MatchScore};
pub use service::{MentorMapService, MentorMapServiceError, ServiceSettings};
pub use snapshots::{
    SnapshotError, SnapshotRecord, SnapshotStore, SnapshotSummary, DEFAULT_SNAPSHOT_KEY,
};

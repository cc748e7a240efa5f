use super::super::domain::{MentorId, MentorStage, ScholarId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorLoadEntry {
    pub mentor_id: MentorId,
    pub name: String,
    pub stage: MentorStage,
    pub load_count: usize,
    pub load_hours: u32,
    pub capacity: u32,
    pub availability: u32,
    /// Negative when the mentor carries more scholars than capacity.
    pub open_slots: i64,
    pub capacity_pct: u32,
    pub hours_pct: u32,
    pub over_capacity: bool,
    pub over_hours: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairnessSummary {
    /// Population standard deviation of per-mentor scholar counts.
    pub load_stdev: f64,
    pub average_load: f64,
    pub max_load: usize,
    pub min_load: usize,
    pub spread: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub scholars: usize,
    pub assigned: usize,
    pub ratio: f64,
    pub pct: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: MentorStage,
    pub stage_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub mentors: usize,
    pub scholars: usize,
    pub assigned_pct: u32,
    pub open_slots: u64,
    pub stages: Vec<StageCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowCapacityAlert {
    pub mentor_id: MentorId,
    pub name: String,
    pub open_slots: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapacityAlerts {
    pub over_capacity: Vec<MentorId>,
    pub over_hours: Vec<MentorId>,
    /// Mentors down to their last open slot.
    pub low_capacity: Vec<LowCapacityAlert>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeedGap {
    pub tag: String,
    pub scholars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageGaps {
    /// Needs of unassigned scholars that no mentor lists, most frequent first.
    pub recruitment: Vec<NeedGap>,
    /// Any scholar need that no mentor lists.
    pub uncovered_needs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Critical,
    Watch,
    Stable,
}

impl Criticality {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Watch => "Watch",
            Self::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuityRisk {
    pub mentor_id: MentorId,
    pub name: String,
    pub criticality: Criticality,
    pub criticality_label: &'static str,
    pub risk_score: f64,
    pub assigned: usize,
    pub assigned_hours: u32,
    pub capacity_pct: u32,
    pub hours_pct: u32,
    pub scarcity: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub single_points_of_failure: Vec<ScholarId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortRiskLevel {
    High,
    Watch,
    Stable,
}

impl CohortRiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Watch => "Watch",
            Self::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortRisk {
    pub cohort: String,
    pub scholars: usize,
    pub assigned: usize,
    pub coverage_pct: u32,
    pub average_urgency: f64,
    pub average_intensity: f64,
    pub distinct_mentors: usize,
    pub top_unmet_needs: Vec<NeedGap>,
    pub level: CohortRiskLevel,
    pub level_label: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReport {
    pub headline: HeadlineMetrics,
    pub coverage: CoverageSummary,
    pub fairness: FairnessSummary,
    pub mentor_loads: Vec<MentorLoadEntry>,
    pub capacity_alerts: CapacityAlerts,
    pub coverage_gaps: CoverageGaps,
    pub continuity: Vec<ContinuityRisk>,
    pub cohorts: Vec<CohortRisk>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
}

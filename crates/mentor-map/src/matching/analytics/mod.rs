mod cohorts;
mod continuity;
mod gaps;
mod load;
mod report;
pub mod views;

pub use cohorts::{cohort_risks, UNASSIGNED_COHORT};
pub use continuity::{classify, continuity_risks, scarcity, tag_holders};
pub use gaps::coverage_gaps;
pub use load::{
    capacity_alerts, coverage, fairness, headline, load_stdev, mentor_loads,
    over_capacity_mentors, over_hours_mentors,
};

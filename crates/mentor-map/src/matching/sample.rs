use super::domain::{Mentor, MentorId, MentorStage, Scholar, ScholarId, TagSet};
use super::roster::Roster;

struct MentorSeed {
    id: &'static str,
    name: &'static str,
    role: &'static str,
    tags: &'static [&'static str],
    availability: u32,
    capacity: u32,
    timezone: &'static str,
    notes: &'static str,
}

struct ScholarSeed {
    id: &'static str,
    name: &'static str,
    needs: &'static [&'static str],
    intensity: u32,
    urgency: u8,
    timezone: &'static str,
    notes: &'static str,
}

const SAMPLE_COHORT: &str = "Spring 2026";

const MENTORS: &[MentorSeed] = &[
    MentorSeed {
        id: "m-000001",
        name: "Dr. Aisha Karim",
        role: "Biotech Research Lead",
        tags: &["biotech", "grant writing", "career pivots"],
        availability: 6,
        capacity: 3,
        timezone: "ET",
        notes: "Enjoys early-stage scholars with research goals.",
    },
    MentorSeed {
        id: "m-000002",
        name: "Luis Romero",
        role: "Product Design Director",
        tags: &["product", "design", "portfolio"],
        availability: 4,
        capacity: 2,
        timezone: "PT",
        notes: "Prefers visual portfolios and weekly check-ins.",
    },
    MentorSeed {
        id: "m-000003",
        name: "Priya Nandakumar",
        role: "Finance & Partnerships",
        tags: &["finance", "internships", "networking"],
        availability: 8,
        capacity: 4,
        timezone: "CT",
        notes: "Strong on internship pipelines and sponsor outreach.",
    },
    MentorSeed {
        id: "m-000004",
        name: "Malik Grant",
        role: "Data Science Manager",
        tags: &["data science", "ml", "career planning"],
        availability: 5,
        capacity: 3,
        timezone: "ET",
        notes: "Focuses on project-based mentoring and portfolio clarity.",
    },
    MentorSeed {
        id: "m-000005",
        name: "Sofia Reyes",
        role: "Policy & Advocacy Strategist",
        tags: &["policy", "storytelling", "community"],
        availability: 3,
        capacity: 2,
        timezone: "MT",
        notes: "Best for scholars with civic impact goals.",
    },
];

const SCHOLARS: &[ScholarSeed] = &[
    ScholarSeed {
        id: "s-000001",
        name: "Maya Chen",
        needs: &["biotech", "research", "grant writing"],
        intensity: 4,
        urgency: 4,
        timezone: "ET",
        notes: "Targeting lab placement in Q2.",
    },
    ScholarSeed {
        id: "s-000002",
        name: "Jordan Ali",
        needs: &["product", "design", "portfolio"],
        intensity: 3,
        urgency: 3,
        timezone: "PT",
        notes: "Needs a portfolio review sprint.",
    },
    ScholarSeed {
        id: "s-000003",
        name: "Elena Torres",
        needs: &["finance", "networking"],
        intensity: 5,
        urgency: 5,
        timezone: "CT",
        notes: "Urgent: summer internship outreach.",
    },
    ScholarSeed {
        id: "s-000004",
        name: "Samir Patel",
        needs: &["data science", "ml", "career planning"],
        intensity: 4,
        urgency: 4,
        timezone: "ET",
        notes: "Needs clarity on capstone scope and industry targets.",
    },
    ScholarSeed {
        id: "s-000005",
        name: "Nia Brooks",
        needs: &["policy", "storytelling"],
        intensity: 2,
        urgency: 3,
        timezone: "MT",
        notes: "Developing advocacy narrative for fellowship applications.",
    },
];

/// Scholar index to mentor index for the seeded placements.
const SEEDED_ASSIGNMENTS: &[(usize, usize)] = &[(0, 0), (1, 1), (2, 2)];

/// A five-by-five roster with three placements, used by `demo`, `seed` and tests.
///
/// Ids are fixed so the output is reproducible.
pub fn sample_roster() -> Roster {
    let mentors: Vec<Mentor> = MENTORS
        .iter()
        .map(|seed| Mentor {
            id: MentorId::new(seed.id),
            name: seed.name.to_string(),
            role: seed.role.to_string(),
            timezone: seed.timezone.to_string(),
            tags: TagSet::from_tags(seed.tags.iter().copied()),
            availability: seed.availability,
            capacity: seed.capacity,
            stage: MentorStage::Active,
            notes: seed.notes.to_string(),
        })
        .collect();

    let scholars: Vec<Scholar> = SCHOLARS
        .iter()
        .map(|seed| Scholar {
            id: ScholarId::new(seed.id),
            name: seed.name.to_string(),
            cohort: SAMPLE_COHORT.to_string(),
            timezone: seed.timezone.to_string(),
            needs: TagSet::from_tags(seed.needs.iter().copied()),
            intensity: seed.intensity,
            urgency: seed.urgency,
            notes: seed.notes.to_string(),
        })
        .collect();

    let mut roster = Roster::new(mentors, scholars);
    for &(scholar, mentor) in SEEDED_ASSIGNMENTS {
        let scholar_id = roster.scholars[scholar].id.clone();
        let mentor_id = roster.mentors[mentor].id.clone();
        roster.assignments.assign(scholar_id, mentor_id);
    }
    roster.notes = "Seeded snapshot for mentor map shared use.".to_string();
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roster_is_consistent() {
        let roster = sample_roster();
        assert_eq!(roster.mentors.len(), 5);
        assert_eq!(roster.scholars.len(), 5);
        assert_eq!(roster.assignments.len(), 3);
        assert!(roster
            .assignments
            .iter()
            .all(|(scholar, mentor)| roster.scholar(scholar).is_some()
                && roster.mentor(mentor).is_some()));
    }
}

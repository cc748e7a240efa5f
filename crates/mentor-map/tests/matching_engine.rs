use mentor_map::matching::analytics::{load_stdev, over_hours_mentors};
use mentor_map::matching::scoring::breakdown;
use mentor_map::matching::{
    assign, auto_assign, sample_roster, AutoAssignOptions, Mentor, MentorId, MentorLoadIndex,
    MentorStage, Roster, Scholar, ScholarId, TagSet,
};

fn mentor(id: &str, tags: &str, availability: u32, capacity: u32, timezone: &str) -> Mentor {
    Mentor {
        id: MentorId::new(id),
        name: id.to_string(),
        role: String::new(),
        timezone: timezone.to_string(),
        tags: TagSet::parse(tags),
        availability,
        capacity,
        stage: MentorStage::Active,
        notes: String::new(),
    }
}

fn scholar(id: &str, needs: &str, intensity: u32, urgency: u8, timezone: &str) -> Scholar {
    Scholar {
        id: ScholarId::new(id),
        name: id.to_string(),
        cohort: "Spring 2026".to_string(),
        timezone: timezone.to_string(),
        needs: TagSet::parse(needs),
        intensity,
        urgency,
        notes: String::new(),
    }
}

#[test]
fn scholars_without_needs_score_on_timezone_urgency_and_penalties_only() {
    let mentors = vec![
        mentor("m1", "biotech, policy", 6, 2, "ET"),
        mentor("m2", "finance", 2, 0, "PT"),
        mentor("m3", "", 0, 1, ""),
    ];
    let target = scholar("s1", "", 3, 5, "ET");
    let loads = MentorLoadIndex::default();

    for mentor in &mentors {
        let score = breakdown(mentor, &target, &loads);
        assert_eq!(score.overlap_points, 0.0);
        assert_eq!(
            score.total,
            score.timezone_boost + score.urgency_boost + score.capacity_penalty + score.hours_penalty
        );
    }
}

#[test]
fn freeing_a_slot_raises_the_score_by_exactly_the_capacity_penalty() {
    let seated = scholar("s0", "biotech", 1, 3, "ET");
    let target = scholar("s1", "biotech", 1, 3, "ET");
    let scholars = vec![seated.clone(), target.clone()];
    let mut roster = Roster::new(vec![mentor("m1", "biotech", 0, 1, "ET")], scholars);
    roster
        .assignments
        .assign(seated.id.clone(), MentorId::new("m1"));

    let at_capacity = breakdown(&roster.mentors[0], &target, &roster.load_index()).total;
    roster.mentors[0].capacity = 2;
    let with_room = breakdown(&roster.mentors[0], &target, &roster.load_index()).total;

    assert_eq!(with_room - at_capacity, 100.0);
}

#[test]
fn urgent_scholar_wins_the_only_slot() {
    let mut roster = Roster::new(
        vec![mentor("m1", "finance", 0, 1, "ET")],
        vec![
            scholar("calm", "finance", 2, 1, "ET"),
            scholar("urgent", "finance", 2, 5, "ET"),
        ],
    );

    auto_assign(&mut roster, AutoAssignOptions::default());

    assert_eq!(
        roster.assignments.mentor_for(&ScholarId::new("urgent")),
        Some(&MentorId::new("m1"))
    );
    assert!(!roster.assignments.is_assigned(&ScholarId::new("calm")));
}

#[test]
fn assigning_twice_equals_assigning_once() {
    let mut once = sample_roster();
    let mut twice = sample_roster();
    let scholar_id = ScholarId::new("s-000004");
    let mentor_id = MentorId::new("m-000004");

    assign(&mut once, &scholar_id, &mentor_id);
    assign(&mut twice, &scholar_id, &mentor_id);
    assign(&mut twice, &scholar_id, &mentor_id);

    assert_eq!(once, twice);
}

#[test]
fn uniform_loads_are_perfectly_fair() {
    let mut roster = Roster::new(
        vec![
            mentor("m1", "", 0, 3, ""),
            mentor("m2", "", 0, 3, ""),
            mentor("m3", "", 0, 3, ""),
        ],
        (1..=6)
            .map(|n| scholar(&format!("s{n}"), "", 1, 3, ""))
            .collect(),
    );
    for (n, mentor) in [(1, "m1"), (2, "m1"), (3, "m2"), (4, "m2"), (5, "m3"), (6, "m3")] {
        roster
            .assignments
            .assign(ScholarId::new(format!("s{n}")), MentorId::new(mentor));
    }

    assert_eq!(load_stdev(&roster), 0.0);
}

#[test]
fn roster_json_round_trip_is_structurally_equal() {
    let mut roster = sample_roster();
    auto_assign(&mut roster, AutoAssignOptions::default());

    let encoded = roster.to_json_pretty().expect("roster encodes");
    let decoded = Roster::from_json(&encoded).expect("roster decodes");

    assert_eq!(decoded, roster);
}

#[test]
fn capacity_one_mentor_takes_the_more_urgent_biotech_scholar() {
    let mut roster = Roster::new(
        vec![mentor("A", "biotech", 6, 1, "ET")],
        vec![
            scholar("X", "biotech", 4, 4, "ET"),
            scholar("Y", "biotech", 4, 2, ""),
        ],
    );

    let report = auto_assign(&mut roster, AutoAssignOptions::default());

    assert_eq!(
        roster.assignments.mentor_for(&ScholarId::new("X")),
        Some(&MentorId::new("A"))
    );
    assert!(!roster.assignments.is_assigned(&ScholarId::new("Y")));
    assert_eq!(report.unplaced, vec![ScholarId::new("Y")]);
}

#[test]
fn open_availability_never_counts_as_over_hours() {
    let mut roster = Roster::new(
        vec![mentor("open", "biotech", 0, 10, "ET")],
        (1..=5)
            .map(|n| scholar(&format!("s{n}"), "biotech", 20, 3, "ET"))
            .collect(),
    );
    for n in 1..=5 {
        roster
            .assignments
            .assign(ScholarId::new(format!("s{n}")), MentorId::new("open"));
    }

    assert!(over_hours_mentors(&roster).is_empty());
}

#[test]
fn later_scholars_see_loads_left_by_earlier_placements() {
    let mut roster = Roster::new(
        vec![
            mentor("best", "finance, networking", 6, 3, "CT"),
            mentor("fallback", "finance", 10, 3, "CT"),
        ],
        vec![
            scholar("first", "finance, networking", 5, 5, "CT"),
            scholar("second", "finance, networking", 3, 4, "CT"),
        ],
    );

    auto_assign(&mut roster, AutoAssignOptions::default());

    assert_eq!(
        roster.assignments.mentor_for(&ScholarId::new("first")),
        Some(&MentorId::new("best"))
    );
    assert_eq!(
        roster.assignments.mentor_for(&ScholarId::new("second")),
        Some(&MentorId::new("fallback")),
        "five of six hours are already spoken for"
    );
}

use super::super::roster::Roster;
use super::views::{CoverageGaps, NeedGap};
use std::collections::{BTreeMap, BTreeSet};

/// Needs no mentor lists, split into the recruitment queue (unassigned scholars
/// only, ranked by how many scholars are waiting on the tag) and the roster-wide set.
pub fn coverage_gaps(roster: &Roster) -> CoverageGaps {
    let offered: BTreeSet<&str> = roster
        .mentors
        .iter()
        .flat_map(|mentor| mentor.tags.iter())
        .collect();

    let mut waiting: BTreeMap<&str, usize> = BTreeMap::new();
    let mut uncovered: BTreeSet<&str> = BTreeSet::new();

    for scholar in &roster.scholars {
        let seated = roster.is_covered(&scholar.id);
        for need in scholar.needs.iter().filter(|need| !offered.contains(need)) {
            uncovered.insert(need);
            if !seated {
                *waiting.entry(need).or_default() += 1;
            }
        }
    }

    CoverageGaps {
        recruitment: ranked_needs(waiting),
        uncovered_needs: uncovered.into_iter().map(str::to_string).collect(),
    }
}

/// Frequency descending, tag ascending on ties.
pub(crate) fn ranked_needs(counts: BTreeMap<&str, usize>) -> Vec<NeedGap> {
    let mut gaps: Vec<NeedGap> = counts
        .into_iter()
        .map(|(tag, scholars)| NeedGap {
            tag: tag.to_string(),
            scholars,
        })
        .collect();
    // BTreeMap iteration is already tag-ordered, so a stable sort keeps ties alphabetical.
    gaps.sort_by(|left, right| right.scholars.cmp(&left.scholars));
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{Mentor, MentorId, MentorStage, Scholar, ScholarId, TagSet};

    fn mentor(id: &str, tags: &str) -> Mentor {
        Mentor {
            id: MentorId::new(id),
            name: id.to_string(),
            role: String::new(),
            timezone: String::new(),
            tags: TagSet::parse(tags),
            availability: 0,
            capacity: 3,
            stage: MentorStage::Active,
            notes: String::new(),
        }
    }

    fn scholar(id: &str, needs: &str) -> Scholar {
        Scholar {
            id: ScholarId::new(id),
            name: id.to_string(),
            cohort: String::new(),
            timezone: String::new(),
            needs: TagSet::parse(needs),
            intensity: 1,
            urgency: 3,
            notes: String::new(),
        }
    }

    #[test]
    fn recruitment_gaps_count_unassigned_scholars_only() {
        let mut roster = Roster::new(
            vec![mentor("m1", "finance")],
            vec![
                scholar("s1", "finance, robotics"),
                scholar("s2", "robotics, climate"),
                scholar("s3", "robotics"),
                scholar("s4", "law"),
            ],
        );
        roster
            .assignments
            .assign(ScholarId::new("s4"), MentorId::new("m1"));

        let gaps = coverage_gaps(&roster);
        assert_eq!(
            gaps.recruitment,
            vec![
                NeedGap {
                    tag: "robotics".to_string(),
                    scholars: 3
                },
                NeedGap {
                    tag: "climate".to_string(),
                    scholars: 1
                },
            ]
        );
        assert_eq!(gaps.uncovered_needs, vec!["climate", "law", "robotics"]);
    }

    #[test]
    fn fully_staffed_roster_has_no_gaps() {
        let roster = Roster::new(vec![mentor("m1", "finance, law")], vec![scholar("s1", "law")]);
        assert_eq!(coverage_gaps(&roster), CoverageGaps::default());
    }
}

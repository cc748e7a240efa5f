use super::domain::{
    coerce_count, coerce_urgency, parse_number, Mentor, MentorId, MentorStage, Scholar, ScholarId,
    TagSet,
};
use super::roster::Roster;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds a roster from a mentors export and a scholars export.
///
/// Blank ids are generated from the 1-based data row (`m-row-3`, `s-row-7`). A
/// repeated id replaces the earlier row. `mentor_id` on a scholar row seeds the
/// assignment map when it names an imported mentor and is dropped otherwise.
pub struct RosterCsvImporter;

impl RosterCsvImporter {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        mentors: P,
        scholars: Q,
    ) -> Result<Roster, RosterImportError> {
        let mentors = std::fs::File::open(mentors)?;
        let scholars = std::fs::File::open(scholars)?;
        Self::from_readers(mentors, scholars)
    }

    pub fn from_readers<M: Read, S: Read>(
        mentors: M,
        scholars: S,
    ) -> Result<Roster, RosterImportError> {
        let mut roster = Roster::default();

        for (row, record) in csv_reader(mentors).deserialize::<MentorRow>().enumerate() {
            roster.upsert_mentor(record?.into_mentor(row + 1));
        }

        let mut seeded = Vec::new();
        for (row, record) in csv_reader(scholars).deserialize::<ScholarRow>().enumerate() {
            let row_data = record?;
            let mentor_id = row_data.mentor_id.clone();
            let scholar = row_data.into_scholar(row + 1);
            if let Some(mentor_id) = mentor_id {
                seeded.push((scholar.id.clone(), MentorId::new(mentor_id)));
            }
            roster.upsert_scholar(scholar);
        }

        for (scholar_id, mentor_id) in seeded {
            if roster.mentor(&mentor_id).is_some() {
                roster.assignments.assign(scholar_id, mentor_id);
            } else {
                debug!(scholar = %scholar_id, mentor = %mentor_id, "dropping assignment to unknown mentor");
            }
        }

        Ok(roster)
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

#[derive(Debug, Deserialize)]
struct MentorRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    availability: String,
    #[serde(default)]
    capacity: String,
    #[serde(default)]
    stage: String,
    #[serde(default)]
    notes: String,
}

impl MentorRow {
    fn into_mentor(self, row: usize) -> Mentor {
        Mentor {
            id: MentorId::new(self.id.unwrap_or_else(|| format!("m-row-{row}"))),
            name: clean(&self.name),
            role: self.role,
            timezone: self.timezone,
            tags: TagSet::parse(&self.tags),
            availability: coerce_count(parse_number(&self.availability)),
            capacity: coerce_count(parse_number(&self.capacity)),
            stage: MentorStage::from_label(&self.stage),
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScholarRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    cohort: String,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    needs: String,
    #[serde(default)]
    intensity: String,
    #[serde(default)]
    urgency: String,
    #[serde(default)]
    notes: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mentor_id: Option<String>,
}

impl ScholarRow {
    fn into_scholar(self, row: usize) -> Scholar {
        Scholar {
            id: ScholarId::new(self.id.unwrap_or_else(|| format!("s-row-{row}"))),
            name: clean(&self.name),
            cohort: self.cohort,
            timezone: self.timezone,
            needs: TagSet::parse(&self.needs),
            intensity: coerce_count(parse_number(&self.intensity)),
            urgency: coerce_urgency(parse_number(&self.urgency)),
            notes: self.notes,
        }
    }
}

/// Strips byte-order and zero-width marks that spreadsheet exports leave behind.
fn clean(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENTORS: &str = "\
id,name,role,timezone,tags,availability,capacity,stage,notes
m1,Avery  Chen,Product Lead,ET,\"AI; scholarships, product\",6,4,onboarding,
,Kiana Ngu,Designer,PT,design,four,2,,Prefers evenings
";

    const SCHOLARS: &str = "\
id,name,cohort,timezone,needs,intensity,urgency,notes,mentor_id
s1,Malik Robinson,Spring 2026,ET,\"ai, product\",2,9,,m1
,Lena Ortiz,Spring 2026,PT,design,3,,,ghost
";

    #[test]
    fn imports_both_exports_with_generated_ids() {
        let roster = RosterCsvImporter::from_readers(MENTORS.as_bytes(), SCHOLARS.as_bytes())
            .expect("fixtures import");

        assert_eq!(roster.mentors.len(), 2);
        assert_eq!(roster.mentors[0].name, "Avery Chen");
        assert_eq!(
            roster.mentors[0].tags,
            TagSet::from_tags(["ai", "scholarships", "product"])
        );
        assert_eq!(roster.mentors[0].stage, MentorStage::Onboarding);
        assert_eq!(roster.mentors[1].id, MentorId::new("m-row-2"));
        assert_eq!(roster.mentors[1].availability, 0, "non-numeric hours coerce to zero");
        assert_eq!(roster.mentors[1].stage, MentorStage::Active);

        assert_eq!(roster.scholars[0].urgency, 5);
        assert_eq!(roster.scholars[1].id, ScholarId::new("s-row-2"));
        assert_eq!(roster.scholars[1].urgency, 1);
    }

    #[test]
    fn seeds_only_assignments_to_known_mentors() {
        let roster = RosterCsvImporter::from_readers(MENTORS.as_bytes(), SCHOLARS.as_bytes())
            .expect("fixtures import");

        assert_eq!(roster.assignments.len(), 1);
        assert_eq!(
            roster.assignments.mentor_for(&ScholarId::new("s1")),
            Some(&MentorId::new("m1"))
        );
    }

    #[test]
    fn repeated_ids_replace_earlier_rows() {
        let mentors = "id,name,capacity\nm1,First,1\nm1,Second,3\n";
        let roster = RosterCsvImporter::from_readers(mentors.as_bytes(), "id\n".as_bytes())
            .expect("fixtures import");

        assert_eq!(roster.mentors.len(), 1);
        assert_eq!(roster.mentors[0].name, "Second");
        assert_eq!(roster.mentors[0].capacity, 3);
        assert!(roster.scholars.is_empty());
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let error = RosterCsvImporter::from_paths("does-not-exist.csv", "nor-this.csv")
            .expect_err("missing file");
        assert!(matches!(error, RosterImportError::Io(_)));
    }
}

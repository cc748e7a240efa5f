use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Identifier wrapper for mentors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MentorId(pub String);

/// Identifier wrapper for scholars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScholarId(pub String);

impl MentorId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ScholarId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MentorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ScholarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of lowercase expertise or need keywords.
///
/// Elements are trimmed, lowercased and non-empty; duplicates collapse. Accepts
/// either a JSON array or a single comma-separated string on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tags.into_iter()
                .filter_map(|tag| normalize_tag(tag.as_ref()))
                .collect(),
        )
    }

    /// Parse free-form input such as `"Biotech, grant writing"`.
    pub fn parse(raw: &str) -> Self {
        Self::from_tags(raw.split([',', ';']))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tags present in both sets, in sorted order.
    pub fn shared_with<'a>(&'a self, other: &'a TagSet) -> Vec<&'a str> {
        self.0.intersection(&other.0).map(String::as_str).collect()
    }

    pub fn overlap(&self, other: &TagSet) -> usize {
        self.0.intersection(&other.0).count()
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => {
                TagSet::from_tags(items.iter().filter_map(value_as_text))
            }
            Some(Value::String(raw)) => TagSet::parse(&raw),
            _ => TagSet::default(),
        })
    }
}

fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Lifecycle position of a mentor in the program pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentorStage {
    Invited,
    Onboarding,
    #[default]
    Active,
    Paused,
}

impl MentorStage {
    pub const fn ordered() -> [Self; 4] {
        [Self::Invited, Self::Onboarding, Self::Active, Self::Paused]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Invited => "Invited",
            Self::Onboarding => "Onboarding",
            Self::Active => "Active",
            Self::Paused => "Paused",
        }
    }

    /// Unrecognized values fall back to `Active`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "invited" => Self::Invited,
            "onboarding" => Self::Onboarding,
            "paused" => Self::Paused,
            _ => Self::Active,
        }
    }
}

/// A mentor on the roster. Load is derived from the assignment map, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: MentorId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timezone: String,
    #[serde(default)]
    pub tags: TagSet,
    /// Hours per week. Zero means the mentor is not hour-constrained.
    #[serde(default, deserialize_with = "lenient::count")]
    pub availability: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "lenient::stage")]
    pub stage: MentorStage,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

/// A scholar on the roster. The assigned mentor lives in the assignment map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholar {
    pub id: ScholarId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cohort: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timezone: String,
    #[serde(default)]
    pub needs: TagSet,
    /// Hours per week of mentoring required.
    #[serde(default, deserialize_with = "lenient::count")]
    pub intensity: u32,
    #[serde(
        default = "default_urgency",
        deserialize_with = "lenient::urgency"
    )]
    pub urgency: u8,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

pub const MIN_URGENCY: u8 = 1;
pub const MAX_URGENCY: u8 = 5;

fn default_urgency() -> u8 {
    MIN_URGENCY
}

/// Mentor fields supplied by intake forms; the id is generated on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorDraft {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timezone: String,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default, deserialize_with = "lenient::count")]
    pub availability: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "lenient::stage")]
    pub stage: MentorStage,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

impl MentorDraft {
    pub fn into_mentor(self, id: MentorId) -> Mentor {
        Mentor {
            id,
            name: self.name,
            role: self.role,
            timezone: self.timezone,
            tags: self.tags,
            availability: self.availability,
            capacity: self.capacity,
            stage: self.stage,
            notes: self.notes,
        }
    }
}

/// Scholar fields supplied by intake forms; the id is generated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarDraft {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cohort: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timezone: String,
    #[serde(default)]
    pub needs: TagSet,
    #[serde(default, deserialize_with = "lenient::count")]
    pub intensity: u32,
    #[serde(
        default = "default_urgency",
        deserialize_with = "lenient::urgency"
    )]
    pub urgency: u8,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

impl Default for ScholarDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            cohort: String::new(),
            timezone: String::new(),
            needs: TagSet::default(),
            intensity: 0,
            urgency: MIN_URGENCY,
            notes: String::new(),
        }
    }
}

impl ScholarDraft {
    pub fn into_scholar(self, id: ScholarId) -> Scholar {
        Scholar {
            id,
            name: self.name,
            cohort: self.cohort,
            timezone: self.timezone,
            needs: self.needs,
            intensity: self.intensity,
            urgency: self.urgency,
            notes: self.notes,
        }
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|number| number.is_finite()),
        Value::String(text) => parse_number(text),
        _ => None,
    }
}

/// Non-negative whole count; anything else reads as zero.
pub(crate) fn coerce_count(raw: Option<f64>) -> u32 {
    match raw {
        Some(number) if number > 0.0 => number.min(u32::MAX as f64).trunc() as u32,
        _ => 0,
    }
}

/// Urgency in `1..=5`; missing or sub-one values read as 1.
pub(crate) fn coerce_urgency(raw: Option<f64>) -> u8 {
    match raw {
        Some(number) if number >= MIN_URGENCY as f64 => {
            number.min(MAX_URGENCY as f64).trunc() as u8
        }
        _ => MIN_URGENCY,
    }
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

mod lenient {
    use super::{coerce_count, coerce_urgency, value_as_number, value_as_text, MentorStage};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(coerce_count(value.as_ref().and_then(value_as_number)))
    }

    pub(super) fn urgency<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(coerce_urgency(value.as_ref().and_then(value_as_number)))
    }

    pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_as_text).unwrap_or_default())
    }

    pub(super) fn stage<'de, D>(deserializer: D) -> Result<MentorStage, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(label)) => MentorStage::from_label(&label),
            _ => MentorStage::Active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_set_normalizes_case_whitespace_and_duplicates() {
        let tags = TagSet::parse(" Biotech, grant writing ,,BIOTECH;  ");
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["biotech", "grant writing"]);
    }

    #[test]
    fn mentor_deserialization_defaults_missing_and_invalid_fields() {
        let mentor: Mentor = serde_json::from_value(json!({
            "id": "m1",
            "tags": "AI, Funding",
            "availability": "six",
            "capacity": -2,
            "stage": "retired",
            "notes": null
        }))
        .expect("lenient mentor parses");

        assert_eq!(mentor.availability, 0);
        assert_eq!(mentor.capacity, 0);
        assert_eq!(mentor.stage, MentorStage::Active);
        assert!(mentor.tags.contains("ai"));
        assert!(mentor.tags.contains("funding"));
        assert!(mentor.name.is_empty());
        assert!(mentor.notes.is_empty());
    }

    #[test]
    fn scholar_urgency_defaults_and_clamps() {
        let missing: Scholar =
            serde_json::from_value(json!({ "id": "s1" })).expect("scholar parses");
        assert_eq!(missing.urgency, 1);
        assert!(missing.needs.is_empty());

        let high: Scholar = serde_json::from_value(json!({ "id": "s2", "urgency": 9 }))
            .expect("scholar parses");
        assert_eq!(high.urgency, 5);

        let text: Scholar =
            serde_json::from_value(json!({ "id": "s3", "urgency": "4", "intensity": 3.7 }))
                .expect("scholar parses");
        assert_eq!(text.urgency, 4);
        assert_eq!(text.intensity, 3);

        let zero: Scholar = serde_json::from_value(json!({ "id": "s4", "urgency": 0 }))
            .expect("scholar parses");
        assert_eq!(zero.urgency, 1);
    }

    #[test]
    fn stage_labels_are_case_insensitive() {
        assert_eq!(MentorStage::from_label("Onboarding"), MentorStage::Onboarding);
        assert_eq!(MentorStage::from_label(" PAUSED "), MentorStage::Paused);
        assert_eq!(MentorStage::from_label(""), MentorStage::Active);
    }

    #[test]
    fn shared_with_lists_intersection_in_order() {
        let tags = TagSet::from_tags(["ml", "data science", "career planning"]);
        let needs = TagSet::from_tags(["ml", "career planning", "funding"]);
        assert_eq!(tags.shared_with(&needs), vec!["career planning", "ml"]);
        assert_eq!(tags.overlap(&needs), 2);
    }
}

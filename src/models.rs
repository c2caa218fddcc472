use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Text rendered wherever a value could not be derived.
pub const NOT_AVAILABLE: &str = "N/A";

/// Branch code used when the enrolment field is missing.
pub const UNKNOWN_BRANCH: &str = "Unknown";

/// One student's labeled text blobs as exported by the source portal.
///
/// Each field in the export is an object carrying a `content` string
/// (`{"CGPA": {"content": "CGPA : 8.72"}}`); bare strings are accepted too.
/// Anything else is treated as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    fields: BTreeMap<String, String>,
}

impl RawEntry {
    pub fn from_value(value: &Value) -> Self {
        let mut fields = BTreeMap::new();

        if let Value::Object(map) = value {
            for (label, field) in map {
                let content = match field {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(inner) => inner.get("content").and_then(Value::as_str),
                    _ => None,
                };
                if let Some(content) = content {
                    fields.insert(label.clone(), content.to_string());
                }
            }
        }

        Self { fields }
    }

    pub fn with_field(mut self, label: &str, content: &str) -> Self {
        self.fields.insert(label.to_string(), content.to_string());
        self
    }

    pub fn content(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    /// Renders the entry back into the export's `{label: {content}}` shape.
    pub fn to_value(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(label, content)| (label.clone(), serde_json::json!({ "content": content })))
            .collect();
        Value::Object(map)
    }
}

/// Grade point average, or the marker for a value that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cgpa {
    Value(f64),
    Unavailable,
}

impl Cgpa {
    pub fn value(self) -> Option<f64> {
        match self {
            Cgpa::Value(value) => Some(value),
            Cgpa::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Cgpa::Value(_))
    }

    /// Ascending order with `Unavailable` below every defined value.
    pub fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Cgpa::Value(a), Cgpa::Value(b)) => a.total_cmp(&b),
            (Cgpa::Value(_), Cgpa::Unavailable) => Ordering::Greater,
            (Cgpa::Unavailable, Cgpa::Value(_)) => Ordering::Less,
            (Cgpa::Unavailable, Cgpa::Unavailable) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Cgpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cgpa::Value(value) => write!(f, "{value}"),
            Cgpa::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Cgpa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cgpa::Value(value) => serializer.serialize_f64(*value),
            Cgpa::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub name: String,
    pub enrolment_no: String,
    pub apaar_id: String,
    pub cgpa: Cgpa,
    pub branch: String,
}

impl AsRef<StudentRecord> for StudentRecord {
    fn as_ref(&self) -> &StudentRecord {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    pub rank: usize,
    #[serde(flatten)]
    pub record: StudentRecord,
}

impl AsRef<StudentRecord> for RankedRecord {
    fn as_ref(&self) -> &StudentRecord {
        &self.record
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchAverage {
    pub branch: String,
    #[serde(rename = "studentCount")]
    pub student_count: usize,
    #[serde(rename = "averageCGPA")]
    pub average_cgpa: f64,
}

/// A headline statistic; `NotAvailable` when there is nothing to compute over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    Value(f64),
    NotAvailable,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Value(value) => write!(f, "{value:.2}"),
            Stat::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Value(value) => serializer.serialize_f64(*value),
            Stat::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    #[serde(rename = "totalStudents")]
    pub total_students: usize,
    #[serde(rename = "overallAvgCGPA")]
    pub overall_avg_cgpa: Stat,
    #[serde(rename = "highestCGPA")]
    pub highest_cgpa: Stat,
    #[serde(rename = "lowestCGPA")]
    pub lowest_cgpa: Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    #[serde(rename = "perBranch")]
    pub per_branch: Vec<BranchAverage>,
    pub overall: OverallStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_entry_reads_content_objects_and_strings() {
        let value = serde_json::json!({
            "Student Name": {"content": "Student Name : Riya"},
            "CGPA": "CGPA : 9.1",
            "Broken": 42,
        });
        let entry = RawEntry::from_value(&value);
        assert_eq!(entry.content("Student Name"), Some("Student Name : Riya"));
        assert_eq!(entry.content("CGPA"), Some("CGPA : 9.1"));
        assert_eq!(entry.content("Broken"), None);
    }

    #[test]
    fn non_object_entry_has_no_fields() {
        let entry = RawEntry::from_value(&serde_json::json!("just text"));
        assert_eq!(entry, RawEntry::default());
    }

    #[test]
    fn unavailable_sorts_below_zero() {
        assert_eq!(Cgpa::Unavailable.compare(Cgpa::Value(0.0)), Ordering::Less);
        assert_eq!(Cgpa::Value(7.5).compare(Cgpa::Value(7.0)), Ordering::Greater);
        assert_eq!(Cgpa::Unavailable.compare(Cgpa::Unavailable), Ordering::Equal);
    }

    #[test]
    fn sentinels_serialize_as_text() {
        assert_eq!(serde_json::to_string(&Cgpa::Unavailable).unwrap(), "\"N/A\"");
        assert_eq!(serde_json::to_string(&Cgpa::Value(8.5)).unwrap(), "8.5");
        assert_eq!(serde_json::to_string(&Stat::NotAvailable).unwrap(), "\"N/A\"");
        assert_eq!(Stat::Value(8.0).to_string(), "8.00");
    }
}

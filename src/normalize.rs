use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::extract::{extract, parse_cgpa, FieldPath};
use crate::models::{Cgpa, RawEntry, StudentRecord, NOT_AVAILABLE, UNKNOWN_BRANCH};

/// Where each record attribute is read from in a raw entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: FieldPath,
    pub enrolment_no: FieldPath,
    pub apaar_id: FieldPath,
    pub cgpa: FieldPath,
    pub branch: FieldPath,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            name: FieldPath::new("Student Name", "Student Name :", 1),
            enrolment_no: FieldPath::new("Enrolment No.", ":", 2),
            apaar_id: FieldPath::new("Enrolment No.", ":", 1),
            cgpa: FieldPath::new("CGPA", ":", 1),
            branch: FieldPath::new("Enrolment No.", ":", 2).truncated(3),
        }
    }
}

impl FieldLayout {
    pub fn paths(&self) -> [(&'static str, &FieldPath); 5] {
        [
            ("name", &self.name),
            ("enrolment_no", &self.enrolment_no),
            ("apaar_id", &self.apaar_id),
            ("cgpa", &self.cgpa),
            ("branch", &self.branch),
        ]
    }

    /// Returns a description of the first path that can never match.
    pub fn problem(&self) -> Option<String> {
        self.paths().iter().find_map(|(attribute, path)| {
            if path.label.trim().is_empty() {
                Some(format!("{attribute}: label must not be empty"))
            } else if path.delimiter.is_empty() {
                Some(format!("{attribute}: delimiter must not be empty"))
            } else if path.max_chars == Some(0) {
                Some(format!("{attribute}: max_chars must be at least 1"))
            } else {
                None
            }
        })
    }
}

/// Builds one record from one raw entry. Never fails: each attribute falls
/// back to its own default independently.
pub fn normalize(entry: &RawEntry, layout: &FieldLayout) -> StudentRecord {
    let text_or = |path: &FieldPath, fallback: &str| {
        extract(entry, path).map_or_else(
            || {
                debug!(label = %path.label, segment = path.segment, "field missing, using {fallback}");
                fallback.to_string()
            },
            str::to_string,
        )
    };

    let cgpa = match extract(entry, &layout.cgpa) {
        Some(text) => parse_cgpa(text),
        None => Cgpa::Unavailable,
    };
    if !cgpa.is_available() {
        debug!(label = %layout.cgpa.label, "cgpa unavailable");
    }

    StudentRecord {
        name: text_or(&layout.name, NOT_AVAILABLE),
        enrolment_no: text_or(&layout.enrolment_no, NOT_AVAILABLE),
        apaar_id: text_or(&layout.apaar_id, NOT_AVAILABLE),
        cgpa,
        branch: text_or(&layout.branch, UNKNOWN_BRANCH),
    }
}

/// Turns the parsed export into records, one per array element.
///
/// Only a non-array top level is rejected; malformed elements degrade to
/// records full of sentinels.
pub fn load_records(raw: &Value, layout: &FieldLayout) -> Result<Vec<StudentRecord>> {
    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Null => {
            return Err(DashboardError::invalid_input(
                "expected a JSON array of records, found null",
            ))
        }
        other => {
            return Err(DashboardError::invalid_input(format!(
                "expected a JSON array of records, found {}",
                json_kind(other)
            )))
        }
    };

    let records: Vec<StudentRecord> = entries
        .iter()
        .map(|value| normalize(&RawEntry::from_value(value), layout))
        .collect();

    let unavailable = records.iter().filter(|r| !r.cgpa.is_available()).count();
    info!(
        records = records.len(),
        unavailable_cgpa = unavailable,
        "normalized student records"
    );

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str, enrolment: &str, cgpa: &str) -> RawEntry {
        RawEntry::default()
            .with_field("Student Name", name)
            .with_field("Enrolment No.", enrolment)
            .with_field("CGPA", cgpa)
    }

    #[test]
    fn derives_every_attribute() {
        let record = normalize(
            &entry(
                "Student Name : Aarav Sharma",
                "Enrolment No. : 482913067215 : IIT2023014",
                "CGPA : 8.72",
            ),
            &FieldLayout::default(),
        );
        assert_eq!(record.name, "Aarav Sharma");
        assert_eq!(record.apaar_id, "482913067215");
        assert_eq!(record.enrolment_no, "IIT2023014");
        assert_eq!(record.cgpa, Cgpa::Value(8.72));
        assert_eq!(record.branch, "IIT");
    }

    #[test]
    fn missing_fields_degrade_independently() {
        let record = normalize(
            &RawEntry::default().with_field("CGPA", "CGPA : pending"),
            &FieldLayout::default(),
        );
        assert_eq!(record.name, NOT_AVAILABLE);
        assert_eq!(record.enrolment_no, NOT_AVAILABLE);
        assert_eq!(record.apaar_id, NOT_AVAILABLE);
        assert_eq!(record.cgpa, Cgpa::Unavailable);
        assert_eq!(record.branch, UNKNOWN_BRANCH);
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = entry("Student Name : Kiara", "Enrolment No. : 1 : IFI2022009", "CGPA : 7.1");
        let layout = FieldLayout::default();
        assert_eq!(normalize(&raw, &layout), normalize(&raw, &layout));
    }

    #[test]
    fn load_rejects_non_arrays() {
        let layout = FieldLayout::default();
        let err = load_records(&Value::Null, &layout).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput { .. }));
        let err = load_records(&json!({"CGPA": "CGPA : 9"}), &layout).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn load_keeps_malformed_elements() {
        let raw = json!([
            {"Student Name": {"content": "Student Name : Riya"}, "CGPA": {"content": "CGPA : 9.2"}},
            17,
            null,
        ]);
        let records = load_records(&raw, &FieldLayout::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Riya");
        assert_eq!(records[0].branch, UNKNOWN_BRANCH);
        assert_eq!(records[1].name, NOT_AVAILABLE);
        assert_eq!(records[2].cgpa, Cgpa::Unavailable);
    }

    #[test]
    fn layout_problems_are_reported() {
        let mut layout = FieldLayout::default();
        assert_eq!(layout.problem(), None);
        layout.cgpa.delimiter.clear();
        assert_eq!(
            layout.problem().as_deref(),
            Some("cgpa: delimiter must not be empty")
        );
    }
}

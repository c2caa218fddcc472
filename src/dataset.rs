use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::models::{RawEntry, StudentRecord};
use crate::normalize::{load_records, FieldLayout};

/// Reads the export at `path` and normalizes it into a snapshot.
pub fn load_snapshot(path: &Path, layout: &FieldLayout) -> Result<Vec<StudentRecord>> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Value = serde_json::from_slice(&bytes).map_err(|source| DashboardError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = load_records(&raw, layout)?;
    info!(path = %path.display(), records = records.len(), "loaded snapshot");
    Ok(records)
}

/// Finds the record with the given enrolment number, ignoring case and
/// surrounding whitespace.
pub fn find_by_enrolment<'a>(
    records: &'a [StudentRecord],
    enrolment_no: &str,
) -> Result<Option<&'a StudentRecord>> {
    let wanted = enrolment_no.trim();
    if wanted.is_empty() {
        return Err(DashboardError::invalid_input("enrolment number is required"));
    }

    Ok(records
        .iter()
        .find(|record| record.enrolment_no.eq_ignore_ascii_case(wanted)))
}

/// A small export in the portal's raw format.
pub fn sample_entries() -> Vec<RawEntry> {
    let students = [
        ("Aarav Sharma", "482913067215", "IIT2023014", "8.72"),
        ("Meera Iyer", "530118274906", "IIT2023031", "9.14"),
        ("Kabir Singh", "611402938571", "IFI2023007", "7.65"),
        ("Ananya Gupta", "702856193420", "IFI2023022", "9.14"),
        ("Rohan Verma", "819273645018", "IIB2023005", "6.98"),
        ("Zoya Khan", "927364518209", "IIB2023019", "Result withheld"),
        ("Ishaan Mehta", "104958372615", "IIT2023040", "8.05"),
    ];

    students
        .iter()
        .map(|(name, apaar, enrolment, cgpa)| {
            RawEntry::default()
                .with_field("Student Name", &format!("Student Name : {name}"))
                .with_field("Enrolment No.", &format!("Enrolment No. : {apaar} : {enrolment}"))
                .with_field("CGPA", &format!("CGPA : {cgpa}"))
        })
        .collect()
}

/// Writes [`sample_entries`] as pretty JSON and returns how many were written.
pub fn write_sample(path: &Path) -> Result<usize> {
    let entries: Vec<Value> = sample_entries().iter().map(RawEntry::to_value).collect();
    let json = serde_json::to_string_pretty(&entries).map_err(|source| DashboardError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(entries.len())
}

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;
use crate::models::{RankedRecord, StudentRecord};

/// Ranking context: every record, or the records of one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Overall,
    Branch(String),
}

impl Scope {
    pub fn includes(&self, record: &StudentRecord) -> bool {
        match self {
            Scope::Overall => true,
            Scope::Branch(code) => record.branch == *code,
        }
    }
}

impl FromStr for Scope {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            Err(DashboardError::invalid_input("scope must be 'overall' or a branch code"))
        } else if value.eq_ignore_ascii_case("overall") {
            Ok(Scope::Overall)
        } else {
            Ok(Scope::Branch(value.to_string()))
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Overall => f.write_str("overall"),
            Scope::Branch(code) => f.write_str(code),
        }
    }
}

/// Highest CGPA first; unavailable grades after every real one.
pub fn by_cgpa_desc(a: &StudentRecord, b: &StudentRecord) -> Ordering {
    b.cgpa.compare(a.cgpa)
}

/// Orders the in-scope records by CGPA and numbers them 1..=n.
///
/// The sort is stable, so equal grades keep their input order, and every
/// position gets its own rank even when grades tie.
pub fn rank(records: &[StudentRecord], scope: &Scope) -> Vec<RankedRecord> {
    let mut in_scope: Vec<StudentRecord> = records
        .iter()
        .filter(|record| scope.includes(record))
        .cloned()
        .collect();
    in_scope.sort_by(by_cgpa_desc);

    in_scope
        .into_iter()
        .enumerate()
        .map(|(index, record)| RankedRecord {
            rank: index + 1,
            record,
        })
        .collect()
}

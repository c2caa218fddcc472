//! Search, column sorting, and the derived table view.
//!
//! All state lives in [`ViewState`]; [`derive_view`] recomputes the table from
//! the snapshot every time that state changes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;
use crate::models::{RankedRecord, StudentRecord};
use crate::rank::{rank, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    EnrolmentNo,
    ApaarId,
    Cgpa,
    Branch,
}

impl SortKey {
    pub fn compare(self, a: &StudentRecord, b: &StudentRecord) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::EnrolmentNo => a.enrolment_no.cmp(&b.enrolment_no),
            SortKey::ApaarId => a.apaar_id.cmp(&b.apaar_id),
            SortKey::Cgpa => a.cgpa.compare(b.cgpa),
            SortKey::Branch => a.branch.cmp(&b.branch),
        }
    }
}

impl FromStr for SortKey {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "enrolment" | "enrolment_no" | "enrollment" => Ok(SortKey::EnrolmentNo),
            "apaar" | "apaar_id" => Ok(SortKey::ApaarId),
            "cgpa" => Ok(SortKey::Cgpa),
            "branch" => Ok(SortKey::Branch),
            other => Err(DashboardError::invalid_input(format!(
                "unknown sort key '{other}' (expected name, enrolment, apaar, cgpa or branch)"
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Name => "name",
            SortKey::EnrolmentNo => "enrolment",
            SortKey::ApaarId => "apaar",
            SortKey::Cgpa => "cgpa",
            SortKey::Branch => "branch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: Direction) -> Self {
        Self { key, direction }
    }

    /// Sort state after a column is selected: the same column flips
    /// direction, a different column starts ascending.
    pub fn select(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        match current {
            Some(config) if config.key == key => SortConfig::new(key, config.direction.toggled()),
            _ => SortConfig::new(key, Direction::Ascending),
        }
    }
}

/// Records whose name, enrolment number or APAAR id contains `term`,
/// ignoring case. An empty term keeps everything.
pub fn filter(records: &[StudentRecord], term: &str) -> Vec<StudentRecord> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            [&record.name, &record.enrolment_no, &record.apaar_id]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Stable sort of any row type that exposes a student record.
pub fn sort_by<T>(rows: &[T], key: SortKey, direction: Direction) -> Vec<T>
where
    T: AsRef<StudentRecord> + Clone,
{
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = key.compare(a.as_ref(), b.as_ref());
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
    sorted
}

/// Everything the table view depends on besides the snapshot itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort: Option<SortConfig>,
    pub scope: Scope,
}

impl ViewState {
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Applies a column click to the current sort.
    #[must_use]
    pub fn select_column(mut self, key: SortKey) -> Self {
        self.sort = Some(SortConfig::select(self.sort, key));
        self
    }
}

/// Filter, then rank within scope, then reorder by the chosen column.
/// Ranks always reflect CGPA order within the filtered scope.
pub fn derive_view(records: &[StudentRecord], state: &ViewState) -> Vec<RankedRecord> {
    let filtered = filter(records, &state.search_term);
    let ranked = rank(&filtered, &state.scope);

    match state.sort {
        Some(SortConfig { key, direction }) => sort_by(&ranked, key, direction),
        None => ranked,
    }
}

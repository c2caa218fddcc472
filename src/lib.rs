//! CGPA dashboard: turns a student-portal export into normalized records,
//! then ranks, aggregates, searches and sorts them.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod rank;
pub mod report;
pub mod view;

pub use aggregate::compute_aggregates;
pub use error::{DashboardError, Result};
pub use models::{
    Aggregates, BranchAverage, Cgpa, OverallStats, RankedRecord, RawEntry, Stat, StudentRecord,
};
pub use normalize::{load_records, normalize, FieldLayout};
pub use rank::{rank, Scope};
pub use view::{derive_view, filter, sort_by, Direction, SortConfig, SortKey, ViewState};

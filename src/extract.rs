//! Field extraction from labeled export text.
//!
//! The portal export packs every value into a labeled string such as
//! `"CGPA : 8.72"` or `"Enrolment No. : 482913067215 : IIT2023014"`. A
//! [`FieldPath`] describes where a value lives inside such a string, so a
//! change in the export format is a layout change rather than a code change.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Cgpa, RawEntry};

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid numeric pattern")
});

/// Location of one value: which labeled field, how to split it, which segment
/// to keep, and an optional character cap applied after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPath {
    pub label: String,
    pub delimiter: String,
    pub segment: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

impl FieldPath {
    pub fn new(label: &str, delimiter: &str, segment: usize) -> Self {
        Self {
            label: label.to_string(),
            delimiter: delimiter.to_string(),
            segment,
            max_chars: None,
        }
    }

    #[must_use]
    pub fn truncated(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }
}

/// Returns the trimmed segment at `index` after splitting on `delimiter`.
///
/// `None` when the delimiter is empty or absent, the index is out of range,
/// or the segment is blank.
pub fn split_segment<'a>(text: &'a str, delimiter: &str, index: usize) -> Option<&'a str> {
    if delimiter.is_empty() || !text.contains(delimiter) {
        return None;
    }

    let segment = text.split(delimiter).nth(index)?.trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

/// Keeps at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Resolves `path` against an entry.
pub fn extract<'a>(entry: &'a RawEntry, path: &FieldPath) -> Option<&'a str> {
    let content = entry.content(&path.label)?;
    let segment = split_segment(content, &path.delimiter, path.segment)?;

    match path.max_chars {
        Some(limit) => Some(truncate_chars(segment, limit)).filter(|value| !value.is_empty()),
        None => Some(segment),
    }
}

/// Parses the leading decimal number of `text`, ignoring any trailing remark
/// such as `"8.5 (provisional)"`. Non-numeric or non-finite input is
/// `Cgpa::Unavailable`; a literal zero stays zero.
pub fn parse_cgpa(text: &str) -> Cgpa {
    LEADING_NUMBER
        .find(text.trim())
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map_or(Cgpa::Unavailable, Cgpa::Value)
}

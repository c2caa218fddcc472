use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Aggregates, RankedRecord};
use crate::rank::Scope;

pub fn build_report(
    scope: &Scope,
    generated_at: DateTime<Utc>,
    aggregates: &Aggregates,
    ranked: &[RankedRecord],
    top: usize,
) -> String {
    let mut output = String::new();
    let overall = &aggregates.overall;

    let _ = writeln!(output, "# Student Performance Report");
    let _ = writeln!(
        output,
        "Generated {} for scope {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        scope
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Total students: {}", overall.total_students);
    let _ = writeln!(output, "- Overall average CGPA: {}", overall.overall_avg_cgpa);
    let _ = writeln!(output, "- Highest CGPA: {}", overall.highest_cgpa);
    let _ = writeln!(output, "- Lowest CGPA: {}", overall.lowest_cgpa);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Branch Averages");

    if aggregates.per_branch.is_empty() {
        let _ = writeln!(output, "No branches configured.");
    } else {
        for branch in aggregates.per_branch.iter() {
            let _ = writeln!(
                output,
                "- {}: {:.2} across {} graded students",
                branch.branch, branch.average_cgpa, branch.student_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Students");

    if ranked.is_empty() {
        let _ = writeln!(output, "No students in this scope.");
    } else {
        for row in ranked.iter().take(top) {
            let _ = writeln!(
                output,
                "{}. {} ({}, {}) CGPA {}",
                row.rank, row.record.name, row.record.enrolment_no, row.record.branch, row.record.cgpa
            );
        }
    }

    output
}

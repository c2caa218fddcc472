use std::collections::HashMap;

use crate::models::{Aggregates, BranchAverage, Cgpa, OverallStats, Stat, StudentRecord};

/// Rounds to two decimal places, the precision every average is reported at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average CGPA per known branch, counting only records with a real grade.
pub fn branch_averages(records: &[StudentRecord], branches: &[String]) -> Vec<BranchAverage> {
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();

    for record in records {
        if let Cgpa::Value(cgpa) = record.cgpa {
            let entry = totals.entry(record.branch.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += cgpa;
        }
    }

    branches
        .iter()
        .map(|branch| {
            let (count, total) = totals.get(branch.as_str()).copied().unwrap_or((0, 0.0));
            BranchAverage {
                branch: branch.clone(),
                student_count: count,
                average_cgpa: if count == 0 {
                    0.0
                } else {
                    round2(total / count as f64)
                },
            }
        })
        .collect()
}

/// Headline statistics over every record.
///
/// The overall average substitutes 0 for unavailable grades while the
/// branch averages leave them out; both behaviours are relied on downstream.
pub fn overall_stats(records: &[StudentRecord]) -> OverallStats {
    if records.is_empty() {
        return OverallStats {
            total_students: 0,
            overall_avg_cgpa: Stat::NotAvailable,
            highest_cgpa: Stat::NotAvailable,
            lowest_cgpa: Stat::NotAvailable,
        };
    }

    let zero_filled = || records.iter().map(|r| r.cgpa.value().unwrap_or(0.0));
    let total: f64 = zero_filled().sum();
    let highest = zero_filled().fold(f64::NEG_INFINITY, f64::max);
    let lowest = records
        .iter()
        .filter_map(|r| r.cgpa.value())
        .reduce(f64::min);

    OverallStats {
        total_students: records.len(),
        overall_avg_cgpa: Stat::Value(round2(total / records.len() as f64)),
        highest_cgpa: Stat::Value(round2(highest)),
        lowest_cgpa: lowest.map_or(Stat::NotAvailable, |value| Stat::Value(round2(value))),
    }
}

pub fn compute_aggregates(records: &[StudentRecord], branches: &[String]) -> Aggregates {
    Aggregates {
        per_branch: branch_averages(records, branches),
        overall: overall_stats(records),
    }
}

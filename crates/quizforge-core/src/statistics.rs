//! Per-course aggregate statistics over recorded results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{mean_percentage, round_div};
use crate::traits::StudentResult;

/// Aggregates for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    pub course_id: String,
    /// Number of recorded results.
    pub attempts: usize,
    /// Distinct students with at least one result.
    pub students: usize,
    pub mean_percentage: u32,
    pub best: u32,
    pub worst: u32,
    /// Share of attempts at or above the pass mark, in percent.
    pub pass_rate: u32,
}

/// Compute statistics per course, ordered by course id.
pub fn compute_course_stats(results: &[StudentResult], threshold: u32) -> Vec<CourseStats> {
    let mut by_course: BTreeMap<&str, Vec<&StudentResult>> = BTreeMap::new();
    for r in results {
        by_course.entry(&r.result.course_id).or_default().push(r);
    }

    by_course
        .into_iter()
        .map(|(course_id, rows)| {
            let percentages: Vec<u32> = rows.iter().map(|r| r.result.percentage).collect();
            let passed = rows.iter().filter(|r| r.result.passed(threshold)).count();
            let mut students: Vec<&str> = rows.iter().map(|r| r.student_id.as_str()).collect();
            students.sort_unstable();
            students.dedup();

            CourseStats {
                course_id: course_id.to_string(),
                attempts: rows.len(),
                students: students.len(),
                mean_percentage: mean_percentage(percentages.iter().copied()),
                best: percentages.iter().copied().max().unwrap_or(0),
                worst: percentages.iter().copied().min().unwrap_or(0),
                pass_rate: round_div(passed as u64 * 100, rows.len() as u64) as u32,
            }
        })
        .collect()
}

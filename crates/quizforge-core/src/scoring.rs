//! Score computation.
//!
//! All rounding is round-half-up on exact integer ratios, so a score of
//! 1/8 (12.5%) always reports 13 and no float error can flip a boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default pass mark, in percent.
pub const DEFAULT_PASSING_THRESHOLD: u32 = 50;

/// Immutable outcome of one submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub course_id: String,
    pub correct_count: u32,
    pub total_questions: u32,
    /// `round(correct_count * 100 / total_questions)`.
    pub percentage: u32,
    pub completed_at: DateTime<Utc>,
}

impl ScoreResult {
    pub fn new(
        course_id: impl Into<String>,
        correct_count: u32,
        total_questions: u32,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            correct_count,
            total_questions,
            percentage: percentage(correct_count, total_questions),
            completed_at,
        }
    }

    /// Whether the result meets `threshold` percent.
    pub fn passed(&self, threshold: u32) -> bool {
        self.percentage >= threshold
    }
}

/// `numerator / denominator` rounded half up. Returns 0 for a zero denominator.
pub fn round_div(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (2 * numerator + denominator) / (2 * denominator)
}

/// Percentage of `correct` out of `total`, rounded half up.
pub fn percentage(correct: u32, total: u32) -> u32 {
    round_div(correct as u64 * 100, total as u64) as u32
}

/// Rounded arithmetic mean of a set of percentages. Empty input yields 0.
pub fn mean_percentage<I>(percentages: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let (sum, n) = percentages
        .into_iter()
        .fold((0u64, 0u64), |(sum, n), p| (sum + p as u64, n + 1));
    round_div(sum, n) as u32
}

/// How one question was answered, for the post-submit review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerReview {
    pub position: usize,
    pub question_id: String,
    pub text: String,
    /// Selected option text, `None` if unanswered.
    pub selected: Option<String>,
    pub correct: String,
    pub is_correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_of_five_is_sixty() {
        assert_eq!(percentage(3, 5), 60);
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(10, 10), 100);
    }

    #[test]
    fn mean_of_three_results() {
        assert_eq!(mean_percentage([80, 90, 70]), 80);
        assert_eq!(mean_percentage([80, 85]), 83);
        assert_eq!(mean_percentage(std::iter::empty()), 0);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let now = Utc::now();
        assert!(ScoreResult::new("c1", 5, 10, now).passed(DEFAULT_PASSING_THRESHOLD));
        assert!(!ScoreResult::new("c1", 4, 10, now).passed(DEFAULT_PASSING_THRESHOLD));
    }
}

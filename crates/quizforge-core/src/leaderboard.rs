//! Leaderboard entries, composite scoring and ranking.
//!
//! A student's composite `total_score` blends their quiz average with
//! attendance and course completion. Weights are whole percentages summing
//! to 100, which keeps the weighted sum exact before rounding.

use serde::{Deserialize, Serialize};

use crate::scoring::{mean_percentage, round_div, ScoreResult};
use crate::traits::LeaderboardStore;

/// Weights of the composite leaderboard score, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_quiz_weight")]
    pub quiz: u32,
    #[serde(default = "default_other_weight")]
    pub attendance: u32,
    #[serde(default = "default_other_weight")]
    pub completion: u32,
}

fn default_quiz_weight() -> u32 {
    40
}

fn default_other_weight() -> u32 {
    30
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            quiz: default_quiz_weight(),
            attendance: default_other_weight(),
            completion: default_other_weight(),
        }
    }
}

impl ScoringWeights {
    /// Whether the weights add up to 100%.
    pub fn is_normalized(&self) -> bool {
        self.quiz + self.attendance + self.completion == 100
    }

    /// `round(quiz*wq + attendance*wa + completion*wc)` with weights as fractions.
    pub fn composite(&self, quiz: u32, attendance: u32, completion: u32) -> u32 {
        let weighted = quiz as u64 * self.quiz as u64
            + attendance as u64 * self.attendance as u64
            + completion as u64 * self.completion as u64;
        round_div(weighted, 100) as u32
    }
}

/// One student's row on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Rounded mean of all the student's quiz percentages.
    #[serde(default)]
    pub quiz_score: u32,
    /// Attendance percentage, supplied by the trainer.
    #[serde(default)]
    pub attendance: u32,
    /// Course completion percentage.
    #[serde(default)]
    pub completion: u32,
    #[serde(default)]
    pub total_score: u32,
}

impl LeaderboardEntry {
    /// An empty entry: every component zero.
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            display_name: None,
            quiz_score: 0,
            attendance: 0,
            completion: 0,
            total_score: 0,
        }
    }

    pub fn recompute_total(&mut self, weights: &ScoringWeights) {
        self.total_score = weights.composite(self.quiz_score, self.attendance, self.completion);
    }

    /// Name to display, falling back to the student id.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.student_id)
    }
}

/// Partial update for [`LeaderboardStore::upsert`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub display_name: Option<String>,
    pub quiz_score: Option<u32>,
    pub attendance: Option<u32>,
    pub completion: Option<u32>,
}

impl EntryUpdate {
    pub fn quiz_score(score: u32) -> Self {
        Self {
            quiz_score: Some(score),
            ..Default::default()
        }
    }

    pub fn attendance(percentage: u32) -> Self {
        Self {
            attendance: Some(percentage),
            ..Default::default()
        }
    }

    pub fn completion(percentage: u32) -> Self {
        Self {
            completion: Some(percentage),
            ..Default::default()
        }
    }

    /// Copy set fields onto `entry`, clamping percentages to 0..=100.
    pub fn apply_to(self, entry: &mut LeaderboardEntry) {
        if let Some(name) = self.display_name {
            entry.display_name = Some(name);
        }
        if let Some(q) = self.quiz_score {
            entry.quiz_score = q.min(100);
        }
        if let Some(a) = self.attendance {
            entry.attendance = a.min(100);
        }
        if let Some(c) = self.completion {
            entry.completion = c.min(100);
        }
    }
}

/// Recompute a student's quiz average from all their results and store it.
pub fn record_quiz_results(
    store: &mut dyn LeaderboardStore,
    student_id: &str,
    results: &[ScoreResult],
    weights: &ScoringWeights,
) -> LeaderboardEntry {
    let quiz_score = mean_percentage(results.iter().map(|r| r.percentage));
    store.upsert(student_id, EntryUpdate::quiz_score(quiz_score), weights)
}

/// A leaderboard entry with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Sort by `total_score` descending; ties go to the lower `student_id`.
/// Ranks are sequential, so tied students still get distinct positions.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry { rank: i + 1, entry })
        .collect()
}

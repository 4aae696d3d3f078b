//! Collaborator traits for the quiz engine.
//!
//! The engine and service never own global state: question banks, result
//! logs, leaderboards, notification sinks and clocks are all passed in as
//! implementations of these traits. `quizforge-store` provides in-memory
//! versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leaderboard::{EntryUpdate, LeaderboardEntry, ScoringWeights};
use crate::model::Question;
use crate::scoring::ScoreResult;

// ---------------------------------------------------------------------------
// Question source
// ---------------------------------------------------------------------------

/// Lookup of a course's questions in bank order.
pub trait QuestionSource {
    /// The course's questions, or `None` if the course is unknown or empty.
    fn questions(&self, course_id: &str) -> Option<&[Question]>;

    /// Human-readable course title, if known.
    fn course_title(&self, course_id: &str) -> Option<&str>;

    /// Course the source itself names as the stand-in for an empty course.
    fn default_course(&self) -> Option<&str> {
        None
    }
}

// ---------------------------------------------------------------------------
// Results store
// ---------------------------------------------------------------------------

/// A score result tagged with the student who produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResult {
    pub student_id: String,
    pub result: ScoreResult,
}

/// Append-only log of completed sessions. No deduplication happens here;
/// attempt limiting belongs to the gate in front of the engine.
pub trait ResultsStore {
    /// Append a result for `student_id`.
    fn append(&mut self, student_id: &str, result: ScoreResult);

    /// All results in append order.
    fn all(&self) -> Vec<StudentResult>;

    /// Every result recorded for `student_id`, across all courses.
    fn results_for(&self, student_id: &str) -> Vec<ScoreResult> {
        self.all()
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .map(|r| r.result)
            .collect()
    }

    /// Whether `student_id` already has a result for `course_id`.
    fn has_attempt(&self, student_id: &str, course_id: &str) -> bool {
        self.results_for(student_id)
            .iter()
            .any(|r| r.course_id == course_id)
    }
}

// ---------------------------------------------------------------------------
// Leaderboard store
// ---------------------------------------------------------------------------

/// Leaderboard entries keyed by student id.
pub trait LeaderboardStore {
    fn get(&self, student_id: &str) -> Option<LeaderboardEntry>;

    /// Insert or replace the entry for `entry.student_id`.
    fn put(&mut self, entry: LeaderboardEntry);

    /// All entries, unranked.
    fn entries(&self) -> Vec<LeaderboardEntry>;

    /// Apply a partial update, creating the entry if absent, and recompute
    /// its total with `weights`. Returns the stored entry.
    fn upsert(
        &mut self,
        student_id: &str,
        update: EntryUpdate,
        weights: &ScoringWeights,
    ) -> LeaderboardEntry {
        let mut entry = self
            .get(student_id)
            .unwrap_or_else(|| LeaderboardEntry::new(student_id));
        update.apply_to(&mut entry);
        entry.recompute_total(weights);
        self.put(entry.clone());
        entry
    }

    /// Recompute every stored total with `weights`. Returns the number of
    /// entries whose total changed.
    fn recompute_all(&mut self, weights: &ScoringWeights) -> usize {
        let mut changed = 0;
        for mut entry in self.entries() {
            let before = entry.total_score;
            entry.recompute_total(weights);
            if entry.total_score != before {
                changed += 1;
                self.put(entry);
            }
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Severity of a notification shown to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
}

/// A message for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub student_id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Receives notifications emitted by the service.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

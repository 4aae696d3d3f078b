//! In-memory collaborator implementations.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use quizforge_core::leaderboard::LeaderboardEntry;
use quizforge_core::scoring::ScoreResult;
use quizforge_core::traits::{
    Clock, LeaderboardStore, Notification, NotificationSink, ResultsStore, StudentResult,
};

/// Append-only results log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryResults {
    rows: Vec<StudentResult>,
}

impl MemoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[StudentResult] {
        &self.rows
    }
}

impl ResultsStore for MemoryResults {
    fn append(&mut self, student_id: &str, result: ScoreResult) {
        self.rows.push(StudentResult {
            student_id: student_id.to_string(),
            result,
        });
    }

    fn all(&self) -> Vec<StudentResult> {
        self.rows.clone()
    }
}

/// Leaderboard keyed by student id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryLeaderboard {
    entries: BTreeMap<String, LeaderboardEntry>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LeaderboardStore for MemoryLeaderboard {
    fn get(&self, student_id: &str) -> Option<LeaderboardEntry> {
        self.entries.get(student_id).cloned()
    }

    fn put(&mut self, entry: LeaderboardEntry) {
        self.entries.insert(entry.student_id.clone(), entry);
    }

    fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries.values().cloned().collect()
    }
}

/// Notifications in the order they were posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryNotifications {
    items: Vec<Notification>,
}

impl MemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    /// Notifications addressed to `student_id`, oldest first.
    pub fn for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a Notification> {
        self.items.iter().filter(move |n| n.student_id == student_id)
    }

    pub fn unread_count(&self, student_id: &str) -> usize {
        self.for_student(student_id).filter(|n| !n.read).count()
    }

    /// Mark every notification for `student_id` as read.
    pub fn mark_all_read(&mut self, student_id: &str) {
        for n in self.items.iter_mut().filter(|n| n.student_id == student_id) {
            n.read = true;
        }
    }
}

impl NotificationSink for MemoryNotifications {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(student = %notification.student_id, "{}", notification.message);
        self.items.push(notification);
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += Duration::seconds(secs);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

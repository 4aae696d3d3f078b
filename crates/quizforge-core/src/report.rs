//! Quiz reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{AnswerReview, ScoreResult};
use crate::session::{QuizSession, SessionStatus};

/// A submitted session, as handed back to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// Session the report was built from.
    pub session_id: Uuid,
    pub student_id: String,
    /// Course title at the time of the attempt, if the bank knew it.
    pub course_title: Option<String>,
    pub result: ScoreResult,
    pub passed: bool,
    /// Seconds between start and submit, capped at the time limit.
    pub time_taken_secs: u64,
    pub review: Vec<AnswerReview>,
}

impl QuizReport {
    /// Build a report for a submitted session.
    pub fn from_session(
        session: &QuizSession,
        result: ScoreResult,
        passing_threshold: u32,
        course_title: Option<&str>,
    ) -> Result<Self> {
        anyhow::ensure!(
            session.status() == SessionStatus::Submitted,
            "session {} is {}, not submitted",
            session.id(),
            session.status()
        );
        Ok(Self {
            id: Uuid::new_v4(),
            session_id: session.id(),
            student_id: session.student_id().to_string(),
            course_title: course_title.map(str::to_string),
            passed: result.passed(passing_threshold),
            time_taken_secs: session.elapsed_secs(result.completed_at),
            review: session.review(),
            result,
        })
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.result.completed_at
    }

    /// Questions answered wrong or left blank.
    pub fn missed(&self) -> impl Iterator<Item = &AnswerReview> {
        self.review.iter().filter(|r| !r.is_correct)
    }

    /// Default file name: `<student>-<course>-<timestamp>.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.json",
            self.student_id,
            self.result.course_id,
            self.result.completed_at.format("%Y%m%dT%H%M%S")
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

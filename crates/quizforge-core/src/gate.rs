//! Access gate in front of the engine: trainer enablement and the
//! single-attempt policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::QuestionBank;
use crate::traits::ResultsStore;

/// Which course quizzes are open to students.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizGate {
    enabled: BTreeMap<String, bool>,
}

impl QuizGate {
    /// Gate initialised from each course's `enabled` flag.
    pub fn from_bank(bank: &QuestionBank) -> Self {
        Self {
            enabled: bank
                .courses
                .iter()
                .map(|c| (c.id.clone(), c.enabled))
                .collect(),
        }
    }

    /// Unknown courses are closed.
    pub fn is_enabled(&self, course_id: &str) -> bool {
        self.enabled.get(course_id).copied().unwrap_or(false)
    }

    /// Whether the course has a flag at all.
    pub fn knows(&self, course_id: &str) -> bool {
        self.enabled.contains_key(course_id)
    }

    pub fn set_enabled(&mut self, course_id: &str, enabled: bool) {
        self.enabled.insert(course_id.to_string(), enabled);
    }

    /// Flip a course's flag and return the new value.
    pub fn toggle(&mut self, course_id: &str) -> bool {
        let flag = !self.is_enabled(course_id);
        self.set_enabled(course_id, flag);
        flag
    }

    /// Reject a start for a closed course or a repeat attempt.
    pub fn check(
        &self,
        student_id: &str,
        course_id: &str,
        results: &dyn ResultsStore,
    ) -> Result<(), QuizError> {
        if !self.is_enabled(course_id) {
            return Err(QuizError::QuizDisabled {
                course_id: course_id.to_string(),
            });
        }
        if results.has_attempt(student_id, course_id) {
            return Err(QuizError::AlreadyAttempted {
                student_id: student_id.to_string(),
                course_id: course_id.to_string(),
            });
        }
        Ok(())
    }
}

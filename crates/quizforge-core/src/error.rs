//! Quiz engine error types.
//!
//! Every rejected operation maps to one of these variants. Nothing here is
//! retryable: all operations are local and synchronous, so the caller either
//! fixes its input or surfaces the error.

use thiserror::Error;

use crate::session::SessionStatus;

/// Errors raised by the quiz engine and the services around it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The course has no questions and no fallback course applies.
    #[error("no questions found for course '{course_id}'")]
    NotFound { course_id: String },

    /// The session is not in the state the operation requires.
    #[error("invalid session state: expected {expected}, found {actual}")]
    InvalidState {
        expected: SessionStatus,
        actual: SessionStatus,
    },

    /// A question position outside the session.
    #[error("question position {position} out of range (session has {len} questions)")]
    PositionOutOfRange { position: usize, len: usize },

    /// An option index outside the question at `position`.
    #[error("option {option} out of range for question {position} ({len} options)")]
    OptionOutOfRange {
        position: usize,
        option: usize,
        len: usize,
    },

    /// The trainer has not enabled the quiz for this course.
    #[error("quiz for course '{course_id}' is not enabled")]
    QuizDisabled { course_id: String },

    /// The student already has a result for this course.
    #[error("student '{student_id}' already attempted the quiz for course '{course_id}'")]
    AlreadyAttempted {
        student_id: String,
        course_id: String,
    },

    /// A question failed structural validation.
    #[error("invalid question '{question_id}': {reason}")]
    InvalidQuestion { question_id: String, reason: String },
}

impl QuizError {
    /// Returns `true` for errors produced by the single-attempt and
    /// enablement gate rather than by the engine itself.
    pub fn is_gate_rejection(&self) -> bool {
        matches!(
            self,
            QuizError::QuizDisabled { .. } | QuizError::AlreadyAttempted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_message_names_both_states() {
        let err = QuizError::InvalidState {
            expected: SessionStatus::InProgress,
            actual: SessionStatus::Submitted,
        };
        assert_eq!(
            err.to_string(),
            "invalid session state: expected in-progress, found submitted"
        );
    }

    #[test]
    fn gate_rejections_are_classified() {
        assert!(QuizError::QuizDisabled {
            course_id: "c2".into()
        }
        .is_gate_rejection());
        assert!(!QuizError::NotFound {
            course_id: "c9".into()
        }
        .is_gate_rejection());
    }
}

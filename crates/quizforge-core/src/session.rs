//! The quiz session state machine.
//!
//! ```text
//! NotStarted --start--> InProgress --submit | timeout--> Submitted
//! ```
//!
//! `Submitted` is terminal. Every operation attempted in the wrong state
//! fails with [`QuizError::InvalidState`] and leaves the session untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::SessionQuestion;
use crate::scoring::{AnswerReview, ScoreResult};

/// Default time limit: 15 minutes.
pub const DEFAULT_DURATION_SECS: u64 = 900;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Submitted,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NotStarted => write!(f, "not-started"),
            SessionStatus::InProgress => write!(f, "in-progress"),
            SessionStatus::Submitted => write!(f, "submitted"),
        }
    }
}

/// What caused a submit. Only logged; both paths yield the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitTrigger {
    Manual,
    Timeout,
}

impl fmt::Display for SubmitTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitTrigger::Manual => write!(f, "manual"),
            SubmitTrigger::Timeout => write!(f, "timeout"),
        }
    }
}

/// One student's single attempt at one course's quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    id: Uuid,
    student_id: String,
    course_id: String,
    questions: Vec<SessionQuestion>,
    answers: Vec<Option<usize>>,
    started_at: Option<DateTime<Utc>>,
    duration_secs: u64,
    status: SessionStatus,
}

impl QuizSession {
    /// A not-yet-started session over an already randomized question list.
    pub fn new(
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        questions: Vec<SessionQuestion>,
        duration_secs: u64,
    ) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            id: Uuid::new_v4(),
            student_id: student_id.into(),
            course_id: course_id.into(),
            questions,
            answers,
            started_at: None,
            duration_secs,
            status: SessionStatus::NotStarted,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn expect_status(&self, expected: SessionStatus) -> Result<(), QuizError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                expected,
                actual: self.status,
            })
        }
    }

    fn check_position(&self, position: usize) -> Result<(), QuizError> {
        if position >= self.questions.len() {
            return Err(QuizError::PositionOutOfRange {
                position,
                len: self.questions.len(),
            });
        }
        Ok(())
    }

    /// Start the clock.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), QuizError> {
        self.expect_status(SessionStatus::NotStarted)?;
        self.started_at = Some(now);
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    /// Record `option` as the answer at `position`. Re-selecting overwrites.
    pub fn select_answer(&mut self, position: usize, option: usize) -> Result<(), QuizError> {
        self.expect_status(SessionStatus::InProgress)?;
        self.check_position(position)?;
        let len = self.questions[position].options.len();
        if option >= len {
            return Err(QuizError::OptionOutOfRange {
                position,
                option,
                len,
            });
        }
        self.answers[position] = Some(option);
        Ok(())
    }

    /// Return the question at `position` to unanswered.
    pub fn clear_answer(&mut self, position: usize) -> Result<(), QuizError> {
        self.expect_status(SessionStatus::InProgress)?;
        self.check_position(position)?;
        self.answers[position] = None;
        Ok(())
    }

    /// The selected option at `position`, if any.
    pub fn answer(&self, position: usize) -> Option<usize> {
        self.answers.get(position).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Seconds elapsed since start, capped at the duration.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let elapsed = (now - started).num_seconds().max(0) as u64;
        elapsed.min(self.duration_secs)
    }

    /// Seconds left on the clock, floored at zero. A session that has not
    /// started reports its full duration.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> u64 {
        self.duration_secs - self.elapsed_secs(now)
    }

    /// Whether the time limit has run out.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.started_at.is_some() && self.seconds_remaining(now) == 0
    }

    /// Number of positions whose answer matches the remapped correct index.
    pub fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| **a == Some(q.correct_option))
            .count()
    }

    /// Score the session and close it.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<ScoreResult, QuizError> {
        self.submit_with(now, SubmitTrigger::Manual)
    }

    /// Score the session and close it, recording what triggered the submit.
    pub fn submit_with(
        &mut self,
        now: DateTime<Utc>,
        trigger: SubmitTrigger,
    ) -> Result<ScoreResult, QuizError> {
        self.expect_status(SessionStatus::InProgress)?;
        let result = ScoreResult::new(
            self.course_id.clone(),
            self.correct_count() as u32,
            self.questions.len() as u32,
            now,
        );
        self.status = SessionStatus::Submitted;
        tracing::info!(
            session = %self.id,
            student = %self.student_id,
            course = %self.course_id,
            %trigger,
            "submitted {}/{} ({}%)",
            result.correct_count,
            result.total_questions,
            result.percentage
        );
        Ok(result)
    }

    /// Per-question review of the answers given.
    pub fn review(&self) -> Vec<AnswerReview> {
        self.questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(position, (q, answer))| AnswerReview {
                position,
                question_id: q.question_id.clone(),
                text: q.text.clone(),
                selected: answer.map(|i| q.options[i].clone()),
                correct: q.correct_text().to_string(),
                is_correct: *answer == Some(q.correct_option),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 26, 10, 0, 0).unwrap()
    }

    fn sq(id: &str, correct: usize) -> SessionQuestion {
        SessionQuestion {
            question_id: id.into(),
            text: format!("Question {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: correct,
            option_order: vec![0, 1, 2, 3],
        }
    }

    fn five_question_session() -> QuizSession {
        let questions = (0..5).map(|i| sq(&format!("q{i}"), i % 4)).collect();
        let mut s = QuizSession::new("s1", "c1", questions, DEFAULT_DURATION_SECS);
        s.start(t0()).unwrap();
        s
    }

    #[test]
    fn new_session_is_not_started_and_unanswered() {
        let s = QuizSession::new("s1", "c1", vec![sq("q0", 1)], DEFAULT_DURATION_SECS);
        assert_eq!(s.status(), SessionStatus::NotStarted);
        assert_eq!(s.answers(), &[None]);
        assert_eq!(s.seconds_remaining(t0()), 900);
        assert!(!s.is_expired(t0() + Duration::hours(1)));
    }

    #[test]
    fn cannot_answer_before_start() {
        let mut s = QuizSession::new("s1", "c1", vec![sq("q0", 1)], DEFAULT_DURATION_SECS);
        let err = s.select_answer(0, 1).unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidState {
                expected: SessionStatus::InProgress,
                actual: SessionStatus::NotStarted,
            }
        );
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut s = five_question_session();
        assert!(matches!(
            s.start(t0()),
            Err(QuizError::InvalidState { .. })
        ));
    }

    #[test]
    fn three_of_five_correct_scores_sixty() {
        let mut s = five_question_session();
        for pos in [0, 2, 4] {
            let correct = s.questions()[pos].correct_option;
            s.select_answer(pos, correct).unwrap();
        }
        // wrong answer at 1, position 3 left blank
        let wrong = (s.questions()[1].correct_option + 1) % 4;
        s.select_answer(1, wrong).unwrap();

        let result = s.submit(t0() + Duration::seconds(300)).unwrap();
        assert_eq!(result.correct_count, 3);
        assert_eq!(result.total_questions, 5);
        assert_eq!(result.percentage, 60);
        assert_eq!(s.status(), SessionStatus::Submitted);
    }

    #[test]
    fn last_selection_wins() {
        let mut s = five_question_session();
        s.select_answer(0, 3).unwrap();
        s.select_answer(0, s.questions()[0].correct_option).unwrap();
        assert_eq!(s.correct_count(), 1);
        s.clear_answer(0).unwrap();
        assert_eq!(s.answered_count(), 0);
    }

    #[test]
    fn second_submit_is_rejected() {
        let mut s = five_question_session();
        s.select_answer(0, 0).unwrap();
        let first = s.submit(t0()).unwrap();
        let err = s.submit(t0() + Duration::seconds(5)).unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidState {
                expected: SessionStatus::InProgress,
                actual: SessionStatus::Submitted,
            }
        );
        assert_eq!(first.correct_count, 1);
        assert_eq!(first.completed_at, t0());
    }

    #[test]
    fn answer_after_submit_is_rejected() {
        let mut s = five_question_session();
        s.submit(t0()).unwrap();
        assert!(matches!(
            s.select_answer(0, 0),
            Err(QuizError::InvalidState { .. })
        ));
        assert!(matches!(s.clear_answer(0), Err(QuizError::InvalidState { .. })));
        assert_eq!(s.answer(0), None);
    }

    #[test]
    fn out_of_range_leaves_state_unchanged() {
        let mut s = five_question_session();
        s.select_answer(1, 2).unwrap();
        let before = s.answers().to_vec();

        assert_eq!(
            s.select_answer(5, 0).unwrap_err(),
            QuizError::PositionOutOfRange { position: 5, len: 5 }
        );
        assert_eq!(
            s.select_answer(1, 4).unwrap_err(),
            QuizError::OptionOutOfRange {
                position: 1,
                option: 4,
                len: 4
            }
        );
        assert_eq!(s.answers(), before.as_slice());
        assert_eq!(s.status(), SessionStatus::InProgress);
    }

    #[test]
    fn remaining_time_floors_at_zero() {
        let s = five_question_session();
        assert_eq!(s.seconds_remaining(t0()), 900);
        assert_eq!(s.seconds_remaining(t0() + Duration::seconds(61)), 839);
        assert_eq!(s.seconds_remaining(t0() + Duration::seconds(900)), 0);
        assert_eq!(s.seconds_remaining(t0() + Duration::hours(2)), 0);
        assert!(s.is_expired(t0() + Duration::seconds(900)));
        // a clock that runs backwards never adds time
        assert_eq!(s.seconds_remaining(t0() - Duration::seconds(30)), 900);
    }

    #[test]
    fn unanswered_never_counts() {
        let mut s = five_question_session();
        let result = s.submit(t0()).unwrap();
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn review_reports_each_position() {
        let mut s = five_question_session();
        let correct = s.questions()[0].correct_option;
        s.select_answer(0, correct).unwrap();
        s.select_answer(1, (s.questions()[1].correct_option + 1) % 4).unwrap();
        s.submit(t0()).unwrap();

        let review = s.review();
        assert_eq!(review.len(), 5);
        assert!(review[0].is_correct);
        assert!(!review[1].is_correct);
        assert!(review[1].selected.is_some());
        assert_eq!(review[2].selected, None);
        assert!(!review[2].is_correct);
    }
}

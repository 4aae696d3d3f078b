//! Core data model types for quizforge.
//!
//! Questions, courses and the question bank that the engine draws from.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::traits::QuestionSource;

/// Number of options every bank question is expected to carry.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A multiple-choice question as stored in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its course.
    pub id: String,
    /// The question text.
    pub text: String,
    /// Answer options in bank order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_option: usize,
}

impl Question {
    /// Build a question, rejecting an option count other than
    /// [`OPTIONS_PER_QUESTION`] or a correct index that does not point at
    /// an option.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuizError> {
        let id = id.into();
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuizError::InvalidQuestion {
                question_id: id,
                reason: format!(
                    "question has {} options, expected {OPTIONS_PER_QUESTION}",
                    options.len()
                ),
            });
        }
        if correct_option >= options.len() {
            return Err(QuizError::InvalidQuestion {
                question_id: id,
                reason: format!(
                    "correct option {correct_option} out of range ({} options)",
                    options.len()
                ),
            });
        }
        Ok(Self {
            id,
            text: text.into(),
            options,
            correct_option,
        })
    }

    /// Text of the correct option.
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_option]
    }
}

/// A question as it appears inside one session: options permuted and the
/// correct index remapped to follow the moved option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQuestion {
    /// Id of the bank question this was drawn from.
    pub question_id: String,
    pub text: String,
    /// Options in session order.
    pub options: Vec<String>,
    /// Index into the session-ordered `options`.
    pub correct_option: usize,
    /// `option_order[i]` is the bank index of the option shown at `i`.
    pub option_order: Vec<usize>,
}

impl SessionQuestion {
    /// Text of the correct option.
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_option]
    }
}

/// A course and its quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    /// Whether a trainer has opened the quiz to students.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_true() -> bool {
    true
}

/// All courses' questions, keyed by course id, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Course used when a requested course has no questions.
    #[serde(default)]
    pub default_course: Option<String>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl QuestionBank {
    /// Look up a course by id.
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    /// Total number of questions across all courses.
    pub fn question_count(&self) -> usize {
        self.courses.iter().map(|c| c.questions.len()).sum()
    }

    /// Merge another bank into this one. Courses already present are kept;
    /// the first default course wins.
    pub fn merge(&mut self, other: QuestionBank) {
        if self.default_course.is_none() {
            self.default_course = other.default_course;
        }
        for course in other.courses {
            if self.course(&course.id).is_some() {
                tracing::warn!("course '{}' defined twice, keeping the first", course.id);
                continue;
            }
            self.courses.push(course);
        }
    }
}

impl QuestionSource for QuestionBank {
    fn questions(&self, course_id: &str) -> Option<&[Question]> {
        self.course(course_id)
            .map(|c| c.questions.as_slice())
            .filter(|q| !q.is_empty())
    }

    fn course_title(&self, course_id: &str) -> Option<&str> {
        self.course(course_id).map(|c| c.title.as_str())
    }

    fn default_course(&self) -> Option<&str> {
        self.default_course.as_deref()
    }
}

//! Quiz session engine.
//!
//! Turns a course's bank questions into a randomized, time-boxed session.
//! The engine holds only its configuration and random source; everything
//! else is passed in per call.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::QuizError;
use crate::leaderboard::ScoringWeights;
use crate::model::Question;
use crate::scoring::DEFAULT_PASSING_THRESHOLD;
use crate::session::{QuizSession, DEFAULT_DURATION_SECS};
use crate::shuffle::shuffle_questions;
use crate::traits::QuestionSource;

/// Where questions come from when the requested course has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// The source's own default course, if it names one.
    #[default]
    SourceDefault,
    /// This course, whatever the source says.
    Course(String),
    /// No fallback: an empty course is a hard `NotFound`.
    Disabled,
}

/// Configuration for the quiz engine and the service around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Time limit per session in seconds.
    pub duration_secs: u64,
    /// Pass mark in percent.
    pub passing_threshold: u32,
    /// Stand-in for a course with no questions.
    pub fallback: FallbackPolicy,
    /// Leaderboard composite weights.
    pub weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            passing_threshold: DEFAULT_PASSING_THRESHOLD,
            fallback: FallbackPolicy::default(),
            weights: ScoringWeights::default(),
        }
    }
}

/// The quiz session engine.
pub struct QuizEngine<R = StdRng> {
    rng: R,
    config: EngineConfig,
}

impl QuizEngine<StdRng> {
    /// Engine seeded from OS entropy.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine with a fixed seed, for reproducible sessions.
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self { rng, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a course to its questions, applying the fallback policy.
    fn resolve<'a>(
        &self,
        course_id: &str,
        source: &'a dyn QuestionSource,
    ) -> Result<&'a [Question], QuizError> {
        if let Some(questions) = source.questions(course_id) {
            return Ok(questions);
        }
        let fallback = match &self.config.fallback {
            FallbackPolicy::SourceDefault => source.default_course(),
            FallbackPolicy::Course(id) => Some(id.as_str()),
            FallbackPolicy::Disabled => None,
        };
        let fallback = fallback
            .filter(|f| *f != course_id)
            .and_then(|f| source.questions(f).map(|q| (f, q)));
        match fallback {
            Some((fallback_id, questions)) => {
                tracing::warn!(
                    "course '{course_id}' has no questions, using fallback course '{fallback_id}'"
                );
                Ok(questions)
            }
            None => Err(QuizError::NotFound {
                course_id: course_id.to_string(),
            }),
        }
    }

    /// Build a randomized session that has not started yet.
    pub fn prepare(
        &mut self,
        student_id: &str,
        course_id: &str,
        source: &dyn QuestionSource,
    ) -> Result<QuizSession, QuizError> {
        let questions = self.resolve(course_id, source)?;
        let shuffled = shuffle_questions(questions, &mut self.rng);
        Ok(QuizSession::new(
            student_id,
            course_id,
            shuffled,
            self.config.duration_secs,
        ))
    }

    /// Build a randomized session and start its clock at `now`.
    pub fn start(
        &mut self,
        student_id: &str,
        course_id: &str,
        source: &dyn QuestionSource,
        now: DateTime<Utc>,
    ) -> Result<QuizSession, QuizError> {
        let mut session = self.prepare(student_id, course_id, source)?;
        session.start(now)?;
        tracing::info!(
            session = %session.id(),
            student = student_id,
            course = course_id,
            "quiz started with {} questions, {}s limit",
            session.len(),
            session.duration_secs()
        );
        Ok(session)
    }
}

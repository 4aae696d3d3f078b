//! Quiz service: the engine wired to its collaborators.
//!
//! Gates a start, runs the engine, and on submit appends the result,
//! recomputes the student's leaderboard entry and posts a notification.
//! Manual and timeout submits both end in [`QuizService::finalize`].

use rand::rngs::StdRng;
use rand::Rng;

use crate::engine::QuizEngine;
use crate::error::QuizError;
use crate::gate::QuizGate;
use crate::leaderboard::{rank, record_quiz_results, EntryUpdate, LeaderboardEntry, RankedEntry};
use crate::scoring::ScoreResult;
use crate::session::{QuizSession, SubmitTrigger};
use crate::traits::{
    Clock, LeaderboardStore, Notification, NotificationKind, NotificationSink, QuestionSource,
    ResultsStore,
};

/// Everything the service reads from or writes to.
pub struct Collaborators<'a> {
    pub bank: &'a dyn QuestionSource,
    pub gate: &'a QuizGate,
    pub results: &'a mut dyn ResultsStore,
    pub leaderboard: &'a mut dyn LeaderboardStore,
    pub notifications: &'a mut dyn NotificationSink,
    pub clock: &'a dyn Clock,
}

/// What a completed submit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub result: ScoreResult,
    pub passed: bool,
    /// The student's leaderboard entry after recomputation.
    pub entry: LeaderboardEntry,
}

pub struct QuizService<'a, R = StdRng> {
    engine: QuizEngine<R>,
    ctx: Collaborators<'a>,
}

impl<'a, R: Rng> QuizService<'a, R> {
    pub fn new(engine: QuizEngine<R>, ctx: Collaborators<'a>) -> Self {
        Self { engine, ctx }
    }

    pub fn engine(&self) -> &QuizEngine<R> {
        &self.engine
    }

    /// Check the gate and start a session for `student_id`.
    pub fn begin(&mut self, student_id: &str, course_id: &str) -> Result<QuizSession, QuizError> {
        if let Err(e) = self.ctx.gate.check(student_id, course_id, &*self.ctx.results) {
            tracing::info!("start refused for {student_id}/{course_id}: {e}");
            return Err(e);
        }
        self.engine
            .start(student_id, course_id, self.ctx.bank, self.ctx.clock.now())
    }

    /// Submit on the student's behalf and record the outcome.
    pub fn submit(&mut self, session: &mut QuizSession) -> Result<Submission, QuizError> {
        let result = session.submit_with(self.ctx.clock.now(), SubmitTrigger::Manual)?;
        Ok(self.finalize(session.student_id(), result))
    }

    /// Record a result produced by either submit path.
    pub fn finalize(&mut self, student_id: &str, result: ScoreResult) -> Submission {
        let config = self.engine.config();
        let passed = result.passed(config.passing_threshold);

        self.ctx.results.append(student_id, result.clone());
        let history = self.ctx.results.results_for(student_id);
        let entry = record_quiz_results(
            &mut *self.ctx.leaderboard,
            student_id,
            &history,
            &config.weights,
        );

        let title = self
            .ctx
            .bank
            .course_title(&result.course_id)
            .unwrap_or(&result.course_id);
        self.ctx.notifications.notify(Notification {
            student_id: student_id.to_string(),
            message: format!(
                "Quiz completed! You scored {}/{} ({}%) in \"{}\".",
                result.correct_count, result.total_questions, result.percentage, title
            ),
            kind: if passed {
                NotificationKind::Success
            } else {
                NotificationKind::Warning
            },
            created_at: self.ctx.clock.now(),
            read: false,
        });

        tracing::info!(
            student = student_id,
            course = %result.course_id,
            "quiz average now {}, total {}",
            entry.quiz_score,
            entry.total_score
        );

        Submission {
            result,
            passed,
            entry,
        }
    }

    /// Record a student's attendance percentage.
    pub fn mark_attendance(&mut self, student_id: &str, percentage: u32) -> LeaderboardEntry {
        let weights = self.engine.config().weights;
        self.ctx
            .leaderboard
            .upsert(student_id, EntryUpdate::attendance(percentage), &weights)
    }

    /// Record a student's course completion percentage.
    pub fn set_completion(&mut self, student_id: &str, percentage: u32) -> LeaderboardEntry {
        let weights = self.engine.config().weights;
        self.ctx
            .leaderboard
            .upsert(student_id, EntryUpdate::completion(percentage), &weights)
    }

    /// The current leaderboard, ranked.
    pub fn standings(&self) -> Vec<RankedEntry> {
        rank(self.ctx.leaderboard.entries())
    }
}

//! Countdown and timeout auto-submit.
//!
//! A [`Countdown`] ticks once per second against a shared session. Every
//! tick re-checks the session status under the lock before doing anything,
//! so a tick that fires after a manual submit is a no-op rather than a
//! second submit.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::scoring::ScoreResult;
use crate::session::{QuizSession, SessionStatus, SubmitTrigger};
use crate::traits::Clock;

/// Below this many seconds the clock is shown as a warning.
pub const WARNING_BELOW_SECS: u64 = 300;
/// Below this many seconds the clock is shown as critical.
pub const CRITICAL_BELOW_SECS: u64 = 120;

/// Format seconds as `mm:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// How close the session is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Urgency {
    pub fn from_remaining(secs: u64) -> Self {
        if secs < CRITICAL_BELOW_SECS {
            Urgency::Critical
        } else if secs < WARNING_BELOW_SECS {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

/// How a countdown ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// Time ran out and the session was submitted by the timer.
    AutoSubmitted(ScoreResult),
    /// The session left `InProgress` before time ran out.
    Cancelled { remaining_secs: u64 },
}

/// Per-second countdown over a shared session.
pub struct Countdown {
    session: Arc<Mutex<QuizSession>>,
    clock: Arc<dyn Clock>,
    tick: Duration,
}

fn lock(session: &Mutex<QuizSession>) -> MutexGuard<'_, QuizSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Countdown {
    pub fn new(session: Arc<Mutex<QuizSession>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session,
            clock,
            tick: Duration::from_secs(1),
        }
    }

    /// Override the tick period.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Seconds left according to the session's own start time.
    pub fn remaining(&self) -> u64 {
        lock(&self.session).seconds_remaining(self.clock.now())
    }

    /// Handle one tick. Returns `Some` once the countdown is over.
    pub fn step(&self, remaining: &mut u64) -> Option<CountdownOutcome> {
        let mut session = lock(&self.session);
        if session.status() != SessionStatus::InProgress {
            return Some(CountdownOutcome::Cancelled {
                remaining_secs: *remaining,
            });
        }

        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            tracing::trace!(session = %session.id(), "{} left", format_clock(*remaining));
            return None;
        }

        match session.submit_with(self.clock.now(), SubmitTrigger::Timeout) {
            Ok(result) => Some(CountdownOutcome::AutoSubmitted(result)),
            Err(e) => {
                tracing::debug!("timeout submit skipped: {e}");
                Some(CountdownOutcome::Cancelled { remaining_secs: 0 })
            }
        }
    }

    /// Tick until the session is submitted, by the timer or by someone else.
    pub async fn run(self) -> CountdownOutcome {
        let mut remaining = self.remaining();
        let mut interval = tokio::time::interval(self.tick);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Some(outcome) = self.step(&mut remaining) {
                return outcome;
            }
        }
    }

    /// Run on the current tokio runtime.
    pub fn spawn(self) -> CountdownHandle {
        CountdownHandle {
            task: tokio::spawn(self.run()),
        }
    }
}

/// A running countdown.
pub struct CountdownHandle {
    task: JoinHandle<CountdownOutcome>,
}

impl CountdownHandle {
    /// Stop ticking. Used after a manual submit.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the countdown to finish. A cancelled countdown yields `None`.
    pub async fn join(self) -> Option<CountdownOutcome> {
        self.task.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionQuestion;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 26, 9, 0, 0).unwrap()
    }

    fn session(duration_secs: u64) -> QuizSession {
        let questions = (0..4)
            .map(|i| SessionQuestion {
                question_id: format!("q{i}"),
                text: format!("Question {i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_option: i,
                option_order: vec![0, 1, 2, 3],
            })
            .collect();
        let mut s = QuizSession::new("s1", "c1", questions, duration_secs);
        s.start(t0()).unwrap();
        s
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(900), "15:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(Urgency::from_remaining(300), Urgency::Normal);
        assert_eq!(Urgency::from_remaining(299), Urgency::Warning);
        assert_eq!(Urgency::from_remaining(120), Urgency::Warning);
        assert_eq!(Urgency::from_remaining(119), Urgency::Critical);
    }

    #[test]
    fn step_counts_down_then_submits() {
        let shared = Arc::new(Mutex::new(session(3)));
        let countdown = Countdown::new(shared.clone(), Arc::new(FixedClock(t0())));
        let mut remaining = countdown.remaining();
        assert_eq!(remaining, 3);
        assert_eq!(countdown.step(&mut remaining), None);
        assert_eq!(countdown.step(&mut remaining), None);
        assert!(matches!(
            countdown.step(&mut remaining),
            Some(CountdownOutcome::AutoSubmitted(_))
        ));
        assert_eq!(shared.lock().unwrap().status(), SessionStatus::Submitted);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_submit_matches_manual_submit() {
        let mut s = session(900);
        s.select_answer(0, 0).unwrap();
        s.select_answer(1, 3).unwrap();
        s.select_answer(2, 2).unwrap();

        let mut manual = s.clone();
        let expected = manual.submit(t0()).unwrap();

        let shared = Arc::new(Mutex::new(s));
        let outcome = Countdown::new(shared.clone(), Arc::new(FixedClock(t0())))
            .run()
            .await;

        assert_eq!(outcome, CountdownOutcome::AutoSubmitted(expected));
        assert_eq!(shared.lock().unwrap().status(), SessionStatus::Submitted);
    }

    #[tokio::test(start_paused = true)]
    async fn stray_tick_after_manual_submit_does_nothing() {
        let shared = Arc::new(Mutex::new(session(900)));
        let first = shared.lock().unwrap().submit(t0()).unwrap();

        let outcome = Countdown::new(shared.clone(), Arc::new(FixedClock(t0())))
            .run()
            .await;

        assert_eq!(outcome, CountdownOutcome::Cancelled { remaining_secs: 900 });
        let guard = shared.lock().unwrap();
        assert_eq!(guard.status(), SessionStatus::Submitted);
        assert_eq!(first.correct_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_handle_yields_none() {
        let shared = Arc::new(Mutex::new(session(900)));
        let handle = Countdown::new(shared.clone(), Arc::new(FixedClock(t0()))).spawn();
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.cancel();
        assert_eq!(handle.join().await, None);
        assert_eq!(shared.lock().unwrap().status(), SessionStatus::InProgress);
    }
}

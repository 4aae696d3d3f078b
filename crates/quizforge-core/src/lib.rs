//! quizforge-core — Quiz session engine, scoring and leaderboard.
//!
//! This crate defines the data model, the session state machine, scoring,
//! leaderboard recomputation and the storage traits the rest of quizforge
//! builds on.

pub mod engine;
pub mod error;
pub mod gate;
pub mod leaderboard;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod service;
pub mod session;
pub mod shuffle;
pub mod statistics;
pub mod timer;
pub mod traits;

pub use engine::{EngineConfig, FallbackPolicy, QuizEngine};
pub use error::QuizError;
pub use session::{QuizSession, SessionStatus};

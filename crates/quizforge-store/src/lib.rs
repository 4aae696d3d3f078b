//! quizforge-store — Storage and configuration for quizforge.
//!
//! In-memory implementations of the `quizforge-core` collaborator traits,
//! a JSON state snapshot that persists them between runs, and TOML
//! configuration loading.

pub mod config;
pub mod error;
pub mod memory;
pub mod roster;
pub mod state;

pub use config::{load_config, load_config_from, QuizforgeConfig};
pub use error::StoreError;
pub use memory::{ManualClock, MemoryLeaderboard, MemoryNotifications, MemoryResults};
pub use state::StateSnapshot;

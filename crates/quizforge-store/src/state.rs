//! JSON snapshot of everything a quiz run mutates.
//!
//! The CLI loads a snapshot, lends its parts to the service as
//! collaborators, and writes it back afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use quizforge_core::gate::QuizGate;
use quizforge_core::model::QuestionBank;

use crate::error::StoreError;
use crate::memory::{MemoryLeaderboard, MemoryNotifications, MemoryResults};

/// Current snapshot format.
pub const STATE_VERSION: u32 = 1;

fn default_version() -> u32 {
    STATE_VERSION
}

/// Persisted results, leaderboard, gate flags and notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Set once the gate has been seeded from a bank.
    #[serde(default)]
    pub gate: Option<QuizGate>,
    #[serde(default)]
    pub results: MemoryResults,
    #[serde(default)]
    pub leaderboard: MemoryLeaderboard,
    #[serde(default)]
    pub notifications: MemoryNotifications,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            ..Default::default()
        }
    }

    /// Load a snapshot. A missing file yields an empty snapshot.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            tracing::debug!("no state at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let state: StateSnapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        if state.version != STATE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: state.version,
                expected: STATE_VERSION,
            });
        }
        Ok(state)
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io)
    }

    /// The gate, seeding it from `bank` on first use. Courses the bank adds
    /// later start with the bank's flag.
    pub fn gate_for(&mut self, bank: &QuestionBank) -> &mut QuizGate {
        let gate = self.gate.get_or_insert_with(QuizGate::default);
        for course in &bank.courses {
            if !gate.knows(&course.id) {
                gate.set_enabled(&course.id, course.enabled);
            }
        }
        gate
    }
}

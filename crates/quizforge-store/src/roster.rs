//! Student roster seeding.
//!
//! The roster names students and carries their attendance and completion
//! figures; quiz scores come only from recorded results.

use serde::{Deserialize, Serialize};

use quizforge_core::leaderboard::{EntryUpdate, ScoringWeights};
use quizforge_core::traits::LeaderboardStore;

/// One student as listed in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Attendance percentage.
    #[serde(default)]
    pub attendance: Option<u32>,
    /// Course completion percentage.
    #[serde(default)]
    pub completion: Option<u32>,
}

/// Write roster names and figures into `board`, leaving quiz scores alone.
/// Returns the number of entries touched.
pub fn apply_roster(
    board: &mut dyn LeaderboardStore,
    roster: &[RosterEntry],
    weights: &ScoringWeights,
) -> usize {
    for student in roster {
        let update = EntryUpdate {
            display_name: student.name.clone(),
            quiz_score: None,
            attendance: student.attendance,
            completion: student.completion,
        };
        board.upsert(&student.id, update, weights);
    }
    roster.len()
}

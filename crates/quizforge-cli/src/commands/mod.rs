//! Subcommand implementations and the helpers they share.

use std::path::{Path, PathBuf};

use anyhow::Result;

use quizforge_core::model::QuestionBank;
use quizforge_core::parser;
use quizforge_core::traits::LeaderboardStore;
use quizforge_store::roster::apply_roster;
use quizforge_store::{load_config_from, QuizforgeConfig, StateSnapshot};

pub mod init;
pub mod leaderboard;
pub mod stats;
pub mod take;
pub mod toggle;
pub mod validate;

/// Load the bank at `path`, or the built-in bank when no path is given.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(p) => {
            anyhow::ensure!(p.exists(), "question bank not found: {}", p.display());
            parser::load_bank(p)
        }
        None => parser::builtin_bank(),
    }
}

/// Load config and resolve the state file, preferring the command-line path.
pub fn config_and_state(
    config_path: Option<PathBuf>,
    state: Option<PathBuf>,
) -> Result<(QuizforgeConfig, PathBuf)> {
    let config = load_config_from(config_path.as_deref())?;
    let state = state.unwrap_or_else(|| config.state_path.clone());
    Ok((config, state))
}

/// Seed roster figures and bring every total in line with the configured
/// weights.
pub fn refresh_leaderboard(snapshot: &mut StateSnapshot, config: &QuizforgeConfig) {
    apply_roster(&mut snapshot.leaderboard, &config.roster, &config.weights);
    let changed = snapshot.leaderboard.recompute_all(&config.weights);
    if changed > 0 {
        tracing::info!("recomputed {changed} leaderboard total(s) with current weights");
    }
}

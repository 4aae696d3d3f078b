//! The `quizforge toggle` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_store::StateSnapshot;

pub fn execute(
    course: String,
    bank_path: Option<PathBuf>,
    state: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, state_path) = super::config_and_state(config_path, state)?;
    let bank_path = bank_path.or_else(|| config.bank_path.clone());
    let bank = super::load_bank(bank_path.as_deref())?;
    anyhow::ensure!(
        bank.course(&course).is_some(),
        "course '{course}' is not in the question bank"
    );

    let mut snapshot = StateSnapshot::load(&state_path)?;
    let enabled = snapshot.gate_for(&bank).toggle(&course);
    snapshot
        .save(&state_path)
        .with_context(|| format!("failed to save state to {}", state_path.display()))?;

    let word = if enabled { "enabled" } else { "disabled" };
    tracing::info!(course = %course, "quiz {word}");
    println!("Quiz for {course} is now {word}.");
    Ok(())
}

//! The `quizforge stats` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::statistics::compute_course_stats;
use quizforge_store::StateSnapshot;

pub fn execute(state: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    use comfy_table::{Cell, Table};

    let (config, state_path) = super::config_and_state(config_path, state)?;
    let snapshot = StateSnapshot::load(&state_path)?;

    let stats = compute_course_stats(snapshot.results.rows(), config.quiz.passing_threshold);
    if stats.is_empty() {
        println!("No quiz results recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Course", "Attempts", "Students", "Mean", "Best", "Worst", "Pass rate",
    ]);

    for s in &stats {
        table.add_row(vec![
            Cell::new(&s.course_id),
            Cell::new(s.attempts),
            Cell::new(s.students),
            Cell::new(format!("{}%", s.mean_percentage)),
            Cell::new(format!("{}%", s.best)),
            Cell::new(format!("{}%", s.worst)),
            Cell::new(format!("{}%", s.pass_rate)),
        ]);
    }

    println!("{table}");
    Ok(())
}

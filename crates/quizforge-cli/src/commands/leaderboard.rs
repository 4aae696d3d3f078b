//! The `quizforge leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::leaderboard::{rank, RankedEntry};
use quizforge_core::traits::LeaderboardStore;
use quizforge_store::StateSnapshot;

pub fn execute(state: Option<PathBuf>, json: bool, config_path: Option<PathBuf>) -> Result<()> {
    let (config, state_path) = super::config_and_state(config_path, state)?;
    let mut snapshot = StateSnapshot::load(&state_path)?;
    super::refresh_leaderboard(&mut snapshot, &config);

    let ranked = rank(snapshot.leaderboard.entries());

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else if ranked.is_empty() {
        println!("Leaderboard is empty.");
    } else {
        print_table(&ranked);
    }

    Ok(())
}

fn print_table(ranked: &[RankedEntry]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Student",
        "Quiz",
        "Attendance",
        "Completion",
        "Total",
    ]);

    for r in ranked {
        let e = &r.entry;
        table.add_row(vec![
            Cell::new(r.rank),
            Cell::new(format!("{} ({})", e.name(), e.student_id)),
            Cell::new(format!("{}%", e.quiz_score)),
            Cell::new(format!("{}%", e.attendance)),
            Cell::new(format!("{}%", e.completion)),
            Cell::new(e.total_score),
        ]);
    }

    println!("{table}");
}

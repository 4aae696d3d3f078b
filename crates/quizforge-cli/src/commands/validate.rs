//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::parser::validate_bank;

pub fn execute(bank_path: Option<PathBuf>) -> Result<()> {
    let bank = super::load_bank(bank_path.as_deref())?;
    anyhow::ensure!(!bank.courses.is_empty(), "no courses found");

    let warnings = validate_bank(&bank);

    for course in &bank.courses {
        let status = if course.enabled { "" } else { ", disabled" };
        println!(
            "Course: {} [{}] ({} questions{status})",
            course.title,
            course.id,
            course.questions.len()
        );
    }

    for w in &warnings {
        let prefix = w
            .course_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All courses valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

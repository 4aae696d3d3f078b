//! The `quizforge take` command.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};

use quizforge_core::engine::QuizEngine;
use quizforge_core::report::QuizReport;
use quizforge_core::service::{Collaborators, QuizService, Submission};
use quizforge_core::session::QuizSession;
use quizforge_core::timer::{format_clock, Countdown};
use quizforge_core::traits::{QuestionSource, SystemClock};
use quizforge_store::StateSnapshot;

/// Parse `"B,-,a"` into per-position option indexes.
fn parse_answers(raw: &str) -> Result<Vec<Option<usize>>> {
    raw.split(',')
        .enumerate()
        .map(|(pos, token)| {
            let token = token.trim();
            if token.is_empty() || token == "-" {
                return Ok(None);
            }
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    Ok(Some((c.to_ascii_uppercase() as u8 - b'A') as usize))
                }
                _ => anyhow::bail!(
                    "invalid answer {token:?} at position {}: expected a letter or '-'",
                    pos + 1
                ),
            }
        })
        .collect()
}

fn lock(session: &Mutex<QuizSession>) -> Result<MutexGuard<'_, QuizSession>> {
    session
        .lock()
        .map_err(|_| anyhow::anyhow!("session lock poisoned"))
}

fn apply_answers(session: &mut QuizSession, picks: &[Option<usize>]) -> Result<()> {
    anyhow::ensure!(
        picks.len() <= session.len(),
        "{} answers given for {} questions",
        picks.len(),
        session.len()
    );
    for (pos, pick) in picks.iter().enumerate() {
        if let Some(option) = pick {
            session.select_answer(pos, *option)?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    student: String,
    course: String,
    bank_path: Option<PathBuf>,
    seed: Option<u64>,
    answers: Option<String>,
    state: Option<PathBuf>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, state_path) = super::config_and_state(config_path, state)?;
    let bank_path = bank_path.or_else(|| config.bank_path.clone());
    let bank = super::load_bank(bank_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let picks = answers.as_deref().map(parse_answers).transpose()?;

    let mut snapshot = StateSnapshot::load(&state_path)?;
    super::refresh_leaderboard(&mut snapshot, &config);
    let gate = snapshot.gate_for(&bank).clone();

    let engine_config = config.engine_config();
    let threshold = engine_config.passing_threshold;
    let engine = match seed {
        Some(seed) => QuizEngine::seeded(engine_config, seed),
        None => QuizEngine::new(engine_config),
    };

    let clock = Arc::new(SystemClock);
    let mut service = QuizService::new(
        engine,
        Collaborators {
            bank: &bank,
            gate: &gate,
            results: &mut snapshot.results,
            leaderboard: &mut snapshot.leaderboard,
            notifications: &mut snapshot.notifications,
            clock: &*clock,
        },
    );

    let session = service.begin(&student, &course)?;
    println!(
        "Quiz: {} ({} questions, {} limit)",
        bank.course_title(&course).unwrap_or(&course),
        session.len(),
        format_clock(session.duration_secs())
    );

    let shared = Arc::new(Mutex::new(session));
    let countdown = Countdown::new(shared.clone(), clock.clone()).spawn();

    let submitted = (|| -> Result<Submission> {
        let mut session = lock(&shared)?;
        if let Some(picks) = &picks {
            apply_answers(&mut session, picks)?;
        }
        Ok(service.submit(&mut session)?)
    })();
    countdown.cancel();
    let submission = submitted?;
    drop(service);

    let session = lock(&shared)?.clone();
    let report = QuizReport::from_session(
        &session,
        submission.result.clone(),
        threshold,
        bank.course_title(&course),
    )?;

    print_review(&report);
    print_summary(&submission);

    let report_path = output.join(report.file_name());
    report.save_json(&report_path)?;
    snapshot
        .save(&state_path)
        .with_context(|| format!("failed to save state to {}", state_path.display()))?;

    println!("\nReport saved to {}", report_path.display());
    Ok(())
}

fn print_review(report: &QuizReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", ""]);

    for r in &report.review {
        table.add_row(vec![
            Cell::new(r.position + 1),
            Cell::new(&r.text),
            Cell::new(r.selected.as_deref().unwrap_or("-")),
            Cell::new(&r.correct),
            Cell::new(if r.is_correct { "OK" } else { "MISS" }),
        ]);
    }

    println!("\n{table}");
}

fn print_summary(submission: &Submission) {
    let result = &submission.result;
    let verdict = if submission.passed { "PASSED" } else { "FAILED" };
    println!(
        "\nScore: {}/{} ({}%) {verdict}",
        result.correct_count, result.total_questions, result.percentage
    );
    println!(
        "Leaderboard: quiz average {}%, total score {}",
        submission.entry.quiz_score, submission.entry.total_score
    );
}

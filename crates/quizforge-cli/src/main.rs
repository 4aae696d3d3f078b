//! quizforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Timed course quizzes with scoring and leaderboards"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a course quiz non-interactively
    Take {
        /// Student taking the quiz
        #[arg(long)]
        student: String,

        /// Course whose quiz to take
        #[arg(long)]
        course: String,

        /// Question bank file or directory (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Seed for question and option order
        #[arg(long)]
        seed: Option<u64>,

        /// Answers by position as option letters, "-" to skip (e.g. "B,-,A")
        #[arg(long)]
        answers: Option<String>,

        /// State file with results and leaderboard
        #[arg(long)]
        state: Option<PathBuf>,

        /// Directory for the JSON report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the ranked leaderboard
    Leaderboard {
        /// State file with results and leaderboard
        #[arg(long)]
        state: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show per-course quiz statistics
    Stats {
        /// State file with results and leaderboard
        #[arg(long)]
        state: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Open or close a course quiz
    Toggle {
        /// Course whose quiz to toggle
        #[arg(long)]
        course: String,

        /// Question bank file or directory (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// State file with results and leaderboard
        #[arg(long)]
        state: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Question bank file or directory (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            student,
            course,
            bank,
            seed,
            answers,
            state,
            output,
            config,
        } => {
            commands::take::execute(student, course, bank, seed, answers, state, output, config)
                .await
        }
        Commands::Leaderboard {
            state,
            json,
            config,
        } => commands::leaderboard::execute(state, json, config),
        Commands::Stats { state, config } => commands::stats::execute(state, config),
        Commands::Toggle {
            course,
            bank,
            state,
            config,
        } => commands::toggle::execute(course, bank, state, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

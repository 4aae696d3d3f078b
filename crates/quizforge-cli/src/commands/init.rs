//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizforge.toml
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizforge.toml and add your students to the roster");
    println!("  2. Run: quizforge validate --bank question-banks");
    println!("  3. Run: quizforge take --student s1 --course intro --bank question-banks");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

bank_path = "question-banks"
output_dir = "./quizforge-results"
state_path = "./quizforge-state.json"

[quiz]
duration_secs = 900
passing_threshold = 50
# Course used when a requested course has no questions. Unset uses the
# bank's [bank] default_course; "" disables it.
# fallback_course = "intro"

[weights]
quiz = 40
attendance = 30
completion = 30

[[roster]]
id = "s1"
name = "Alex Johnson"
attendance = 85
completion = 75
"#;

const EXAMPLE_BANK: &str = r#"[bank]
default_course = "intro"

[[courses]]
id = "intro"
title = "Introduction to Rust"
enabled = true

[[courses.questions]]
id = "q1"
text = "Which keyword declares an immutable binding?"
options = ["var", "let", "const", "static"]
correct = 1

[[courses.questions]]
id = "q2"
text = "What does the ? operator do on an Err value?"
options = ["Panics", "Ignores it", "Returns it from the function", "Converts it to None"]
correct = 2

[[courses.questions]]
id = "q3"
text = "Which type owns a growable UTF-8 string?"
options = ["&str", "String", "char", "Vec<u8>"]
correct = 1
"#;

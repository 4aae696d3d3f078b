//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Course, Question, QuestionBank};

/// The bank shipped with the crate: courses c1, c6 and c3.
pub const BUILTIN_BANK: &str = include_str!("../data/builtin_bank.toml");

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    bank: Option<TomlBankHeader>,
    #[serde(default)]
    courses: Vec<TomlCourse>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    #[serde(default)]
    default_course: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlCourse {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    options: Vec<String>,
    correct: usize,
}

fn default_true() -> bool {
    true
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let courses = parsed
        .courses
        .into_iter()
        .map(|c| -> Result<Course> {
            let questions = c
                .questions
                .into_iter()
                .map(|q| {
                    Question::new(q.id, q.text, q.options, q.correct).with_context(|| {
                        format!("course '{}' in {}", c.id, source_path.display())
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Course {
                title: c.title.unwrap_or_else(|| c.id.clone()),
                id: c.id,
                enabled: c.enabled,
                questions,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        default_course: parsed.bank.and_then(|b| b.default_course),
        courses,
    })
}

/// The built-in bank.
pub fn builtin_bank() -> Result<QuestionBank> {
    parse_bank_str(BUILTIN_BANK, Path::new("<builtin>"))
}

/// Recursively load all `.toml` bank files from a directory into one bank.
pub fn load_bank_directory(dir: &Path) -> Result<QuestionBank> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    // deterministic merge order
    paths.sort();

    let mut bank = QuestionBank::default();
    for path in paths {
        if path.is_dir() {
            bank.merge(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(b) => bank.merge(b),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(bank)
}

/// Load a bank from a file or a directory.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        parse_bank(path)
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The course ID (if applicable).
    pub course_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Some(default) = &bank.default_course {
        if bank.course(default).is_none() {
            warnings.push(ValidationWarning {
                course_id: None,
                message: format!("default course '{default}' is not defined"),
            });
        }
    }

    for course in &bank.courses {
        let warn = |message: String| ValidationWarning {
            course_id: Some(course.id.clone()),
            message,
        };

        if course.questions.is_empty() {
            warnings.push(warn("course has no questions".into()));
        }

        let mut seen_ids = HashSet::new();
        for q in &course.questions {
            if !seen_ids.insert(&q.id) {
                warnings.push(warn(format!("duplicate question ID: {}", q.id)));
            }
            if q.text.trim().is_empty() {
                warnings.push(warn(format!("question {} has empty text", q.id)));
            }
            let distinct: HashSet<&str> = q.options.iter().map(|o| o.trim()).collect();
            if distinct.len() != q.options.len() {
                warnings.push(warn(format!("question {} has duplicate options", q.id)));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::QuestionSource;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
default_course = "c6"

[[courses]]
id = "c6"
title = "React 18 - The Complete Guide"

[[courses.questions]]
id = "q1"
text = "What hook manages state in React?"
options = ["useEffect", "useState", "useRef", "useMemo"]
correct = 1

[[courses.questions]]
id = "q2"
text = "JSX stands for?"
options = ["JavaScript XML", "Java Syntax Extension", "JSON XML", "JavaScript XHR"]
correct = 0
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.default_course.as_deref(), Some("c6"));
        assert_eq!(bank.courses.len(), 1);
        let course = &bank.courses[0];
        assert!(course.enabled);
        assert_eq!(course.questions.len(), 2);
        assert_eq!(course.questions[0].correct_text(), "useState");
        assert!(validate_bank(&bank).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[[courses]]
id = "c9"
enabled = false
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(bank.default_course.is_none());
        assert_eq!(bank.courses[0].title, "c9");
        assert!(!bank.courses[0].enabled);
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("no questions")));
    }

    #[test]
    fn correct_index_out_of_range_is_an_error() {
        let toml = r#"
[[courses]]
id = "c1"

[[courses.questions]]
id = "q1"
text = "?"
options = ["a", "b", "c", "d"]
correct = 4
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn wrong_option_count_is_an_error() {
        let toml = r#"
[[courses]]
id = "c1"

[[courses.questions]]
id = "q1"
text = "Only one way to answer"
options = ["yes"]
correct = 0
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("course 'c1' in bad.toml"));
        assert!(msg.contains("1 options, expected 4"));
    }

    #[test]
    fn validate_reports_shape_problems() {
        let toml = r#"
[bank]
default_course = "missing"

[[courses]]
id = "c1"

[[courses.questions]]
id = "q1"
text = "Fine"
options = ["a", "b", "c", "d"]
correct = 0

[[courses.questions]]
id = "q1"
text = "  "
options = ["a", "a", "c", "d"]
correct = 0
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bank(&bank);
        let has = |s: &str| warnings.iter().any(|w| w.message.contains(s));
        assert!(has("default course 'missing'"));
        assert!(has("duplicate question ID"));
        assert!(has("empty text"));
        assert!(has("duplicate options"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn builtin_bank_is_clean() {
        let bank = builtin_bank().unwrap();
        assert_eq!(bank.courses.len(), 3);
        assert_eq!(bank.question_count(), 30);
        for id in ["c1", "c6", "c3"] {
            assert_eq!(bank.questions(id).map(|q| q.len()), Some(10));
        }
        assert!(validate_bank(&bank).is_empty());
    }

    #[test]
    fn load_directory_merges_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("react.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [toml").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/ml.toml"),
            "[[courses]]\nid = \"c1\"\n\n[[courses.questions]]\nid = \"q1\"\ntext = \"?\"\noptions = [\"a\", \"b\", \"c\", \"d\"]\ncorrect = 2\n",
        )
        .unwrap();

        let bank = load_bank(dir.path()).unwrap();
        assert_eq!(bank.courses.len(), 2);
        assert!(bank.course("c1").is_some());
        assert!(bank.course("c6").is_some());
    }
}

//! quizforge configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::engine::{EngineConfig, FallbackPolicy};
use quizforge_core::leaderboard::ScoringWeights;
use quizforge_core::scoring::DEFAULT_PASSING_THRESHOLD;
use quizforge_core::session::DEFAULT_DURATION_SECS;

use crate::roster::RosterEntry;

/// Session settings under `[quiz]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Time limit per session in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
    /// Pass mark in percent.
    #[serde(default = "default_threshold")]
    pub passing_threshold: u32,
    /// Course whose questions stand in for a course with none. Unset defers
    /// to the bank's `default_course`; an empty string disables the fallback.
    #[serde(default)]
    pub fallback_course: Option<String>,
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECS
}
fn default_threshold() -> u32 {
    DEFAULT_PASSING_THRESHOLD
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            passing_threshold: default_threshold(),
            fallback_course: None,
        }
    }
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    #[serde(default)]
    pub quiz: QuizSettings,
    /// Leaderboard composite weights, in percent.
    #[serde(default)]
    pub weights: ScoringWeights,
    /// Question bank file or directory. The built-in bank is used if unset.
    #[serde(default)]
    pub bank_path: Option<PathBuf>,
    /// Directory for quiz reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// State file holding results and the leaderboard.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    /// Students known up front.
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizforge-results")
}
fn default_state_path() -> PathBuf {
    PathBuf::from("./quizforge-state.json")
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            quiz: QuizSettings::default(),
            weights: ScoringWeights::default(),
            bank_path: None,
            output_dir: default_output_dir(),
            state_path: default_state_path(),
            roster: Vec::new(),
        }
    }
}

impl QuizforgeConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        let fallback = match self.quiz.fallback_course.as_deref().map(str::trim) {
            None => FallbackPolicy::SourceDefault,
            Some("") => FallbackPolicy::Disabled,
            Some(id) => FallbackPolicy::Course(id.to_string()),
        };
        EngineConfig {
            duration_secs: self.quiz.duration_secs,
            passing_threshold: self.quiz.passing_threshold,
            fallback,
            weights: self.weights,
        }
    }

    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.weights.is_normalized(),
            "weights must sum to 100, got {}+{}+{}",
            self.weights.quiz,
            self.weights.attendance,
            self.weights.completion
        );
        anyhow::ensure!(
            self.quiz.duration_secs > 0,
            "quiz.duration_secs must be positive"
        );
        anyhow::ensure!(
            self.quiz.passing_threshold <= 100,
            "quiz.passing_threshold must be at most 100, got {}",
            self.quiz.passing_threshold
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

fn env_override<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {name}: {raw:?}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable overrides: `QUIZFORGE_DURATION_SECS`,
/// `QUIZFORGE_PASSING_THRESHOLD`, `QUIZFORGE_BANK`.
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::default(),
    };

    // Apply env var overrides
    if let Some(secs) = env_override("QUIZFORGE_DURATION_SECS")? {
        config.quiz.duration_secs = secs;
    }
    if let Some(threshold) = env_override("QUIZFORGE_PASSING_THRESHOLD")? {
        config.quiz.passing_threshold = threshold;
    }
    if let Ok(bank) = std::env::var("QUIZFORGE_BANK") {
        config.bank_path = Some(PathBuf::from(bank));
    }

    config.bank_path = config.bank_path.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);
    config.state_path = resolve_path(&config.state_path);

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${"), "unterminated ${");
        std::env::remove_var("_QUIZFORGE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizforgeConfig::default();
        assert_eq!(config.quiz.duration_secs, 900);
        assert_eq!(config.quiz.passing_threshold, 50);
        assert_eq!(config.weights, ScoringWeights::default());
        assert!(config.validate().is_ok());

        let engine = config.engine_config();
        assert_eq!(engine.fallback, FallbackPolicy::SourceDefault);
        assert_eq!(engine.duration_secs, 900);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
bank_path = "banks"
output_dir = "./out"

[quiz]
duration_secs = 600
passing_threshold = 70
fallback_course = ""

[weights]
quiz = 50
attendance = 25
completion = 25

[[roster]]
id = "s1"
name = "Alex Johnson"
attendance = 85
completion = 75

[[roster]]
id = "s2"
"#;
        let config: QuizforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.quiz.duration_secs, 600);
        assert_eq!(config.weights.quiz, 50);
        assert_eq!(config.roster.len(), 2);
        assert_eq!(config.roster[1].name, None);
        assert_eq!(config.bank_path.as_deref(), Some(Path::new("banks")));
        assert_eq!(config.engine_config().fallback, FallbackPolicy::Disabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bank_default_course_backs_an_empty_course() {
        use quizforge_core::engine::QuizEngine;
        use quizforge_core::error::QuizError;
        use quizforge_core::parser::parse_bank_str;

        let bank = parse_bank_str(
            r#"
[bank]
default_course = "intro"

[[courses]]
id = "intro"

[[courses.questions]]
id = "q1"
text = "?"
options = ["a", "b", "c", "d"]
correct = 1

[[courses]]
id = "empty"
"#,
            Path::new("bank.toml"),
        )
        .unwrap();
        let now = chrono::Utc::now();

        let defaults = QuizforgeConfig::default().engine_config();
        let session = QuizEngine::seeded(defaults, 1)
            .start("s1", "empty", &bank, now)
            .unwrap();
        assert_eq!(session.course_id(), "empty");
        assert_eq!(session.questions()[0].question_id, "q1");

        let mut disabled = QuizforgeConfig::default();
        disabled.quiz.fallback_course = Some(String::new());
        let err = QuizEngine::seeded(disabled.engine_config(), 1)
            .start("s1", "empty", &bank, now)
            .unwrap_err();
        assert!(matches!(err, QuizError::NotFound { .. }));
    }

    #[test]
    fn weights_must_sum_to_hundred() {
        let toml_str = r#"
[weights]
quiz = 50
"#;
        let config: QuizforgeConfig = toml::from_str(toml_str).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 100"));
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("quizforge.toml");
        assert!(load_config_from(Some(&missing)).is_err());
    }

    #[test]
    fn load_explicit_file_resolves_paths() {
        std::env::set_var("_QUIZFORGE_TEST_ROOT", "/srv/quiz");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizforge.toml");
        std::fs::write(
            &path,
            "state_path = \"${_QUIZFORGE_TEST_ROOT}/state.json\"\n[quiz]\nduration_secs = 300\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.state_path, PathBuf::from("/srv/quiz/state.json"));
        std::env::remove_var("_QUIZFORGE_TEST_ROOT");
    }
}

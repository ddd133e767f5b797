use std::path::{Path, PathBuf};

use crate::agents::OpponentProfile;
use crate::questions::{Difficulty, QuestionBank, QuestionParams, SourceError, DEFAULT_SUBJECT};
use crate::variants::RunnerConfig;

/// Largest accepted `questions.history_len`.
pub const MAX_HISTORY_LEN: usize = 16;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Top-level arcade configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Master seed. When set, every random component derives its seed from it.
    pub seed: Option<u64>,
    pub questions: QuestionsConfig,
    pub runner: RunnerConfig,
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuestionsConfig {
    pub subject: String,
    pub grade_band: String,
    pub difficulty: Option<Difficulty>,
    /// Recently served questions the bank avoids repeating.
    pub history_len: usize,
    /// JSON bank replacing the built-in questions.
    pub bank_path: Option<PathBuf>,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            grade_band: "3-4".to_string(),
            difficulty: None,
            history_len: QuestionBank::DEFAULT_HISTORY_LEN,
            bank_path: None,
        }
    }
}

impl QuestionsConfig {
    pub fn params(&self) -> QuestionParams {
        QuestionParams {
            subject: self.subject.clone(),
            grade_band: self.grade_band.clone(),
            difficulty: self.difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    pub tick_rate_ms: u64,
    /// Key for the progress book.
    pub user: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 16, user: "player".to_string() }
    }
}

impl ArcadeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead { path: path.to_path_buf(), source: e })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ArcadeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.subject.trim().is_empty() {
            return Err(ConfigError::Validation("questions.subject must not be empty".into()));
        }
        if self.questions.history_len > MAX_HISTORY_LEN {
            return Err(ConfigError::Validation(format!(
                "questions.history_len must be <= {MAX_HISTORY_LEN}"
            )));
        }
        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigError::Validation("tui.tick_rate_ms must be > 0".into()));
        }
        if self.tui.user.trim().is_empty() {
            return Err(ConfigError::Validation("tui.user must not be empty".into()));
        }
        self.runner.validate()
    }

    fn derived_seed(&self, salt: u64) -> Option<u64> {
        self.seed.map(|s| s.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(salt))
    }

    pub fn opponent_profile(&self) -> OpponentProfile {
        match self.derived_seed(1) {
            Some(seed) => OpponentProfile::default().with_seed(seed),
            None => OpponentProfile::default(),
        }
    }

    pub fn runner_seed(&self) -> Option<u64> {
        self.derived_seed(2)
    }

    /// The configured question bank: the JSON file at `bank_path`, or the
    /// built-in questions.
    pub fn question_bank(&self) -> Result<QuestionBank, SourceError> {
        let bank = match &self.questions.bank_path {
            Some(path) => QuestionBank::load(path)?,
            None => QuestionBank::builtin(),
        };
        let bank = bank.with_history_len(self.questions.history_len);
        Ok(match self.derived_seed(3) {
            Some(seed) => bank.with_seed(seed),
            None => bank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = ArcadeConfig::from_toml("").unwrap();
        assert_eq!(config, ArcadeConfig::default());
        assert_eq!(config.runner.spawn_interval, 120);
        assert_eq!(config.tui.tick_rate_ms, 16);
        assert_eq!(config.questions.params(), QuestionParams::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ArcadeConfig::from_toml(
            r#"
            seed = 42

            [questions]
            subject = "Science"
            difficulty = "hard"

            [runner]
            gravity = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.questions.subject, "Science");
        assert_eq!(config.questions.difficulty, Some(Difficulty::Hard));
        assert_eq!(config.questions.grade_band, "3-4");
        assert_eq!(config.runner.gravity, 0.75);
        assert_eq!(config.runner.jump_velocity, -12.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ArcadeConfig::from_toml("[runner]\nlevel_every = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let err = ArcadeConfig::from_toml("[questions]\nhistory_len = 99").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let err = ArcadeConfig::from_toml("seed = \"abc\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ArcadeConfig::load_or_default(Path::new("/nonexistent/arcade.toml")).unwrap();
        assert_eq!(config, ArcadeConfig::default());
        let err = ArcadeConfig::load(Path::new("/nonexistent/arcade.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn derived_seeds_differ_per_component() {
        let config = ArcadeConfig::default().with_seed(7);
        assert_ne!(config.derived_seed(1), config.derived_seed(2));
        assert_eq!(ArcadeConfig::default().runner_seed(), None);
    }
}

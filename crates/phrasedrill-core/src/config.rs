//! Drill configuration.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DrillError;
use crate::model::QuestionType;
use crate::question::{GradingSettings, DEFAULT_HINT_CHARS, DEFAULT_WORD_FIELD_THRESHOLD};
use crate::records::INITIAL_WEIGHT;

/// Top-level phrasedrill configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Corpus file (JSON).
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
    /// Records file (JSON), rewritten after every scored session.
    #[serde(default = "default_records")]
    pub records: PathBuf,
    /// Questions per session.
    #[serde(default = "default_questions")]
    pub questions: usize,
    /// Seed weight for items never asked.
    #[serde(default = "default_initial_weight")]
    pub initial_weight: f64,
    /// Letters revealed in idiom hints.
    #[serde(default = "default_hint_chars")]
    pub hint_chars: usize,
    /// Recall ratio needed for full credit on word fields.
    #[serde(default = "default_word_field_threshold")]
    pub word_field_threshold: f64,
    /// Run the recall review after each session.
    #[serde(default)]
    pub review: bool,
    /// Question types drawn from.
    #[serde(default = "default_enabled_types")]
    pub enabled_types: Vec<QuestionType>,
    /// Where session reports are written, if anywhere.
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
}

fn default_corpus() -> PathBuf {
    PathBuf::from("material.json")
}
fn default_records() -> PathBuf {
    PathBuf::from("records.json")
}
fn default_questions() -> usize {
    10
}
fn default_initial_weight() -> f64 {
    INITIAL_WEIGHT
}
fn default_hint_chars() -> usize {
    DEFAULT_HINT_CHARS
}
fn default_word_field_threshold() -> f64 {
    DEFAULT_WORD_FIELD_THRESHOLD
}
fn default_enabled_types() -> Vec<QuestionType> {
    QuestionType::ALL.to_vec()
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            records: default_records(),
            questions: default_questions(),
            initial_weight: default_initial_weight(),
            hint_chars: default_hint_chars(),
            word_field_threshold: default_word_field_threshold(),
            review: false,
            enabled_types: default_enabled_types(),
            report_dir: None,
        }
    }
}

impl DrillConfig {
    /// Reject settings the drill cannot work with.
    pub fn validate(&self) -> std::result::Result<(), DrillError> {
        if !self.initial_weight.is_finite() || self.initial_weight <= 0.0 {
            return Err(DrillError::Config(format!(
                "initial_weight must be positive, got {}",
                self.initial_weight
            )));
        }
        if !self.word_field_threshold.is_finite() || self.word_field_threshold <= 0.0 {
            return Err(DrillError::Config(format!(
                "word_field_threshold must be positive, got {}",
                self.word_field_threshold
            )));
        }
        Ok(())
    }

    /// Enabled types as a set.
    pub fn enabled(&self) -> BTreeSet<QuestionType> {
        self.enabled_types.iter().copied().collect()
    }

    pub fn grading(&self) -> GradingSettings {
        GradingSettings {
            word_field_threshold: self.word_field_threshold,
            phrasal_mode: None,
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `phrasedrill.toml` in the current directory
/// 2. `~/.config/phrasedrill/config.toml`
///
/// Environment variable overrides: `PHRASEDRILL_CORPUS`, `PHRASEDRILL_RECORDS`.
pub fn load_config() -> Result<DrillConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DrillConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("phrasedrill.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DrillConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DrillConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(
    mut config: DrillConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> DrillConfig {
    if let Some(corpus) = lookup("PHRASEDRILL_CORPUS") {
        config.corpus = PathBuf::from(corpus);
    }
    if let Some(records) = lookup("PHRASEDRILL_RECORDS") {
        config.records = PathBuf::from(records);
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("phrasedrill"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DrillConfig::default();
        assert_eq!(config.questions, 10);
        assert_eq!(config.initial_weight, 2.0);
        assert_eq!(config.hint_chars, 3);
        assert_eq!(config.word_field_threshold, 1.0);
        assert_eq!(config.enabled().len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
corpus = "decks/cpe.json"
questions = 25
enabled_types = ["vocabulary", "idiom", "synonyms"]
review = true
"#;
        let config: DrillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.corpus, PathBuf::from("decks/cpe.json"));
        assert_eq!(config.records, PathBuf::from("records.json"));
        assert_eq!(config.questions, 25);
        assert!(config.review);
        assert_eq!(
            config.enabled(),
            [
                QuestionType::Vocabulary,
                QuestionType::WordField,
                QuestionType::Idiom
            ]
            .into_iter()
            .collect()
        );
    }

    #[test]
    fn validate_rejects_bad_weights() {
        let config = DrillConfig {
            initial_weight: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DrillError::Config(_))));

        let config = DrillConfig {
            word_field_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_paths() {
        let config = apply_env_overrides(DrillConfig::default(), |key| match key {
            "PHRASEDRILL_RECORDS" => Some("/tmp/records.json".into()),
            _ => None,
        });
        assert_eq!(config.corpus, PathBuf::from("material.json"));
        assert_eq!(config.records, PathBuf::from("/tmp/records.json"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/phrasedrill.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drill.toml");
        std::fs::write(&path, "questions = 3\nhint_chars = 2\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.questions, 3);
        assert_eq!(config.hint_chars, 2);
    }
}

//! Runtime configuration read from the environment (and `.env` when present).

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

pub const ENV_DATA_DIR: &str = "SINTOMAS_DATA_DIR";
pub const ENV_CONFIDENCE_THRESHOLD: &str = "SINTOMAS_CONFIDENCE_THRESHOLD";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SINTOMAS_REQUEST_TIMEOUT_SECS";
pub const ENV_LEMMA_TABLE: &str = "SINTOMAS_LEMMA_TABLE";

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Process configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Directory holding intents.json, words.json, classes.json and model.json.
    pub data_dir: PathBuf,
    /// Minimum classifier probability required to trust the predicted tag.
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_threshold: f32,
    /// How long a caller waits for the chatbot actor to answer.
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    /// Optional JSON table of extra `form -> lemma` entries.
    pub lemma_table: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PortablePathManager::default_data_dir(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            lemma_table: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads and validates the environment.
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Builds the configuration from environment variables only.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(dir) = read_var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(threshold) = read_var(ENV_CONFIDENCE_THRESHOLD) {
            config.confidence_threshold = threshold.parse()?;
        }
        if let Some(secs) = read_var(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = secs.parse()?;
        }
        if let Some(table) = read_var(ENV_LEMMA_TABLE) {
            config.lemma_table = Some(PathBuf::from(table));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn paths(&self) -> PortablePathManager {
        PortablePathManager::new(&self.data_dir)
    }
}

fn read_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_is_empty() {
        temp_env::with_vars_unset(
            [
                ENV_DATA_DIR,
                ENV_CONFIDENCE_THRESHOLD,
                ENV_REQUEST_TIMEOUT_SECS,
                ENV_LEMMA_TABLE,
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert!((config.confidence_threshold - 0.7).abs() < f32::EPSILON);
                assert_eq!(config.request_timeout_secs, 30);
                assert!(config.lemma_table.is_none());
            },
        );
    }

    #[test]
    fn test_reads_overrides() {
        temp_env::with_vars(
            [
                (ENV_DATA_DIR, Some("/tmp/sintomas")),
                (ENV_CONFIDENCE_THRESHOLD, Some("0.55")),
                (ENV_REQUEST_TIMEOUT_SECS, Some("5")),
                (ENV_LEMMA_TABLE, Some("/tmp/lemmas.json")),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.data_dir, PathBuf::from("/tmp/sintomas"));
                assert!((config.confidence_threshold - 0.55).abs() < 1e-6);
                assert_eq!(config.request_timeout_secs, 5);
                assert_eq!(config.lemma_table, Some(PathBuf::from("/tmp/lemmas.json")));
            },
        );
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        temp_env::with_var(ENV_CONFIDENCE_THRESHOLD, Some("1.5"), || {
            assert!(matches!(
                AppConfig::from_env(),
                Err(AppError::Validation(_))
            ));
        });
    }

    #[test]
    fn test_rejects_garbage_threshold() {
        temp_env::with_var(ENV_CONFIDENCE_THRESHOLD, Some("alto"), || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }
}

//! Engine configuration.
//!
//! Resolution order, lowest to highest precedence:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `CHRONICAT_*` environment variables
//! 4. explicit overrides from the caller (CLI flags)

#![allow(clippy::result_large_err)]

use chronicat_core::errors::{ExError, ExErrorKind, Result};
use chronicat_core::logging_facility::Profile;
use chronicat_core::retrieval::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "CHRONICAT_DB_PATH";
pub const ENV_PAGE_SIZE: &str = "CHRONICAT_PAGE_SIZE";
pub const ENV_MAX_INSERT_ATTEMPTS: &str = "CHRONICAT_MAX_INSERT_ATTEMPTS";
pub const ENV_LOG_PROFILE: &str = "CHRONICAT_LOG_PROFILE";

pub const DEFAULT_DB_PATH: &str = "chronicat.db";
pub const DEFAULT_MAX_INSERT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Records fetched per page when reading history
    pub page_size: usize,
    /// Attempts to persist a changeset before an order conflict is surfaced
    pub max_insert_attempts: u32,
    pub log_profile: Profile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            max_insert_attempts: DEFAULT_MAX_INSERT_ATTEMPTS,
            log_profile: Profile::default(),
        }
    }
}

fn config_error(message: String) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_message(message)
}

impl EngineConfig {
    /// Load from an optional TOML file, then apply process environment overrides.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read; `InvalidInput` if it does not parse or
    /// any value is out of range.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::load`] with a custom environment lookup.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::load`].
    pub fn load_with<F>(file: Option<&Path>, get_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ExError::new(ExErrorKind::Io)
                        .with_op("load_config")
                        .with_entity_id(path.display().to_string())
                        .with_message(e.to_string())
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        let config = base.with_env(get_env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(format!("invalid config file: {}", e)))
    }

    /// Apply `CHRONICAT_*` overrides from `get_env`. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a present value does not parse.
    pub fn with_env<F>(mut self, get_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| {
            get_env(name).and_then(|v| {
                let trimmed = v.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(v) = lookup(ENV_PAGE_SIZE) {
            self.page_size = v
                .parse::<usize>()
                .map_err(|e| config_error(format!("{ENV_PAGE_SIZE} must be a usize: {e}")))?;
        }
        if let Some(v) = lookup(ENV_MAX_INSERT_ATTEMPTS) {
            self.max_insert_attempts = v.parse::<u32>().map_err(|e| {
                config_error(format!("{ENV_MAX_INSERT_ATTEMPTS} must be a u32: {e}"))
            })?;
        }
        if let Some(v) = lookup(ENV_LOG_PROFILE) {
            self.log_profile = v
                .parse::<Profile>()
                .map_err(|e| config_error(format!("{ENV_LOG_PROFILE}: {e}")))?;
        }
        Ok(self)
    }

    /// Override the database path (CLI `--db`)
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// # Errors
    ///
    /// `InvalidInput` when `page_size` or `max_insert_attempts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(config_error("page_size must be at least 1".to_string()));
        }
        if self.max_insert_attempts == 0 {
            return Err(config_error(
                "max_insert_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::load_with(None, env(&[])).unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_insert_attempts, 3);
        assert_eq!(config.db_path, PathBuf::from("chronicat.db"));
        assert_eq!(config.log_profile, Profile::Development);
    }

    #[test]
    fn test_toml_partial() {
        let config = EngineConfig::from_toml_str("page_size = 25\nlog_profile = \"production\"\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_profile, Profile::Production);
        assert_eq!(config.max_insert_attempts, 3);
    }

    #[test]
    fn test_toml_unknown_key_rejected() {
        let err = EngineConfig::from_toml_str("pagesize = 1").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::default()
            .with_env(env(&[
                (ENV_DB_PATH, "/tmp/c.db"),
                (ENV_PAGE_SIZE, " 7 "),
                (ENV_LOG_PROFILE, "test"),
                (ENV_MAX_INSERT_ATTEMPTS, ""),
            ]))
            .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/c.db"));
        assert_eq!(config.page_size, 7);
        assert_eq!(config.log_profile, Profile::Test);
        assert_eq!(config.max_insert_attempts, 3);
    }

    #[test]
    fn test_env_bad_number() {
        let err = EngineConfig::default()
            .with_env(env(&[(ENV_PAGE_SIZE, "lots")]))
            .unwrap_err();
        assert!(err.message().contains(ENV_PAGE_SIZE));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = EngineConfig::load_with(None, env(&[(ENV_PAGE_SIZE, "0")])).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }
}

//! Runtime configuration for glossary front-ends.
//!
//! # Responsibility
//! - Hold the data file location, logging setup and autosave policy.
//! - Apply environment overrides on top of built-in defaults.
//!
//! # Invariants
//! - `log_level` is always a normalized level accepted by `init_logging`.
//! - Invalid overrides are reported, never silently replaced by defaults.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Default persisted document file name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data.json";

pub const ENV_DATA_FILE: &str = "GLOSSARY_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "GLOSSARY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GLOSSARY_LOG_DIR";
pub const ENV_AUTOSAVE: &str = "GLOSSARY_AUTOSAVE";

/// Configuration error for one invalid setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Effective glossary settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryConfig {
    /// Persisted root document, overwritten wholesale on save.
    pub data_file: PathBuf,
    pub log_level: String,
    /// `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    /// Save after every successful mutation.
    pub autosave: bool,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            autosave: true,
        }
    }
}

impl GlossaryConfig {
    /// Defaults overridden by `GLOSSARY_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = value_of(ENV_DATA_FILE) {
            self.data_file = PathBuf::from(path.trim());
        }
        if let Some(level) = value_of(ENV_LOG_LEVEL) {
            self.set_log_level(&level)
                .map_err(|err| ConfigError { key: ENV_LOG_LEVEL, ..err })?;
        }
        if let Some(dir) = value_of(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(flag) = value_of(ENV_AUTOSAVE) {
            self.autosave = parse_flag(&flag).ok_or_else(|| ConfigError {
                key: ENV_AUTOSAVE,
                message: format!("expected true|false|1|0|yes|no|on|off, got `{flag}`"),
            })?;
        }
        Ok(self)
    }

    /// Validates and stores a log level.
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        let normalized = normalize_level(level).map_err(|message| ConfigError {
            key: "log_level",
            message,
        })?;
        self.log_level = normalized.to_string();
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{GlossaryConfig, ENV_AUTOSAVE, ENV_DATA_FILE, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_data_json_and_autosave() {
        let config = GlossaryConfig::default();
        assert_eq!(config.data_file, PathBuf::from("data.json"));
        assert!(config.autosave);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn overrides_apply_and_normalize() {
        let config = GlossaryConfig::default()
            .with_overrides(lookup(&[
                (ENV_DATA_FILE, "/tmp/words.json"),
                (ENV_LOG_LEVEL, "WARNING"),
                (ENV_AUTOSAVE, "off"),
            ]))
            .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/words.json"));
        assert_eq!(config.log_level, "warn");
        assert!(!config.autosave);
    }

    #[test]
    fn invalid_override_names_the_variable() {
        let err = GlossaryConfig::default()
            .with_overrides(lookup(&[(ENV_AUTOSAVE, "maybe")]))
            .unwrap_err();
        assert_eq!(err.key, ENV_AUTOSAVE);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = GlossaryConfig::default()
            .with_overrides(lookup(&[(ENV_DATA_FILE, "   ")]))
            .unwrap();
        assert_eq!(config.data_file, PathBuf::from("data.json"));
    }
}

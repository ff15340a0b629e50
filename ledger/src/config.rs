use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::blockchain::MAX_DIFFICULTY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read the configuration file")]
    Read(#[from] io::Error),

    #[error("failed to parse the configuration file")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Ledger settings, read from TOML and overlaid by command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Leading zero hex characters required of every mined block.
    pub difficulty: u32,
    /// Senders scoring strictly below this are refused.
    pub ban_threshold: i64,
    pub log_level: String,
    pub log_dir: PathBuf,
    /// Upper bound on a single proof-of-work search.
    pub mining_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            difficulty: 3,
            ban_threshold: -1,
            log_level: "info".into(),
            log_dir: "logs".into(),
            mining_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let config = toml::from_str::<Config>(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Config::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty == 0 || self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::Invalid(format!(
                "difficulty must be between 1 and {}, got {}",
                MAX_DIFFICULTY, self.difficulty
            )));
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level must not be empty".into()));
        }

        Ok(())
    }

    pub fn mining_timeout(&self) -> Option<Duration> {
        self.mining_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.difficulty, 3);
        assert_eq!(config.ban_threshold, -1);
        assert_eq!(config.log_level, "info");
        assert!(config.mining_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("difficulty = 2\nmining_timeout_secs = 30\n").unwrap();

        assert_eq!(config.difficulty, 2);
        assert_eq!(config.ban_threshold, -1);
        assert_eq!(config.mining_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_difficulty() {
        assert!(matches!(
            Config::from_toml_str("difficulty = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("difficulty = 65"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            Config::from_toml_str("difficulty = \"hard\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ban_threshold = -10\nlog_dir = \"/tmp/ledger-logs\"").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.ban_threshold, -10);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/ledger-logs"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/ledger.toml"),
            Err(ConfigError::Read(_))
        ));
    }
}

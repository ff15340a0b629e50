use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "reputation-ledger",
    version,
    about = "mine submitted transactions into a reputation ledger"
)]
pub struct Arguments {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub difficulty: Option<u32>,

    #[arg(long, allow_hyphen_values = true)]
    pub ban_threshold: Option<i64>,

    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[arg(long)]
    pub mining_timeout_secs: Option<u64>,

    /// Pretty-print the final snapshot.
    #[arg(long)]
    pub pretty: bool,
}

impl Arguments {
    pub fn from_with_config() -> Result<(Arguments, Config), ConfigError> {
        let args = Arguments::parse();
        let config = args.to_config()?;
        Ok((args, config))
    }

    /// Flags win over the file, the file wins over defaults.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let file_config = if let Some(path) = self.config.as_ref() {
            Config::load(path)?
        } else {
            Config::default()
        };

        let config = Config {
            difficulty: self.difficulty.unwrap_or(file_config.difficulty),
            ban_threshold: self.ban_threshold.unwrap_or(file_config.ban_threshold),
            log_level: self.log_level.clone().unwrap_or(file_config.log_level),
            log_dir: self.log_dir.clone().unwrap_or(file_config.log_dir),
            mining_timeout_secs: self.mining_timeout_secs.or(file_config.mining_timeout_secs),
        };

        config.validate()?;
        Ok(config)
    }
}

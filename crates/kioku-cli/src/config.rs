//! CLI configuration
//!
//! Scheduler constants come from, in increasing priority: built-in defaults,
//! an optional JSON file (`--config`), then `KIOKU_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use kioku_core::{SchedulerConfig, SchedulerError};

/// Environment variable naming the learner when `--learner` is absent
pub const LEARNER_ENV: &str = "KIOKU_LEARNER";

/// Learner used when nothing else is configured
pub const DEFAULT_LEARNER: &str = "local";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine project directories")]
    NoDataDir,
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Data directory from the flag, else the platform default
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match flag {
        Some(dir) => Ok(dir),
        None => ProjectDirs::from("com", "kioku", "kioku")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ConfigError::NoDataDir),
    }
}

/// Learner from the flag, else `KIOKU_LEARNER`, else the default
pub fn resolve_learner(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(LEARNER_ENV).ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEARNER.to_string())
}

/// Scheduler config from an optional file plus environment overrides
pub fn load_scheduler_config(path: Option<&Path>) -> Result<SchedulerConfig, ConfigError> {
    let base = match path {
        Some(path) => read_config_file(path)?,
        None => SchedulerConfig::default(),
    };
    let config = base.with_overrides(|key| std::env::var(key).ok())?;
    tracing::debug!(?config, "Scheduler configuration loaded");
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<SchedulerConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

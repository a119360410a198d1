//! Engine configuration.
//!
//! # Responsibility
//! - Describe storage location, logging setup and stats policies.
//! - Load configuration from JSON with per-field defaults.
//!
//! # Invariants
//! - A config returned by [`EngineConfig::from_json_file`] has passed
//!   [`EngineConfig::validate`].

use crate::logging::default_log_level;
use crate::stats::rating::RatingBands;
use crate::stats::recency::RecencyPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "geoloc.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    InvalidRatingBands { low_max: u8, medium_max: u8 },
    InvalidRecencyWindow(i64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidRatingBands {
                low_max,
                medium_max,
            } => write!(
                f,
                "invalid rating bands low_max={low_max} medium_max={medium_max}; expected 1 <= low_max < medium_max < 5"
            ),
            Self::InvalidRecencyWindow(window_ms) => {
                write!(f, "recency window ({window_ms} ms) must be positive")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// SQLite database file. `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub rating_bands: RatingBands,
    pub recency: RecencyPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: Some(PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_level: default_log_level().to_string(),
            log_dir: None,
            rating_bands: RatingBands::default(),
            recency: RecencyPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rating_bands.validate()?;
        self.recency.validate()?;
        Ok(())
    }
}

//! Application configuration.
//!
//! Settings are read from a JSON file: either the path given with
//! `--config`, or `<config dir>/sortviz/config.json` when that file exists.
//! Every field is optional and falls back to its default.
//!
//! ```json
//! {
//!   "muted": false,
//!   "default_speed": "fast",
//!   "default_algorithm": "merge_sort",
//!   "tone": { "duration_ms": 40, "freq_max": 1500.0 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::sound::ToneConfig;
use crate::types::{AlgorithmKind, SimulationSpeed};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`AppConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tone synthesis settings.
    #[serde(default)]
    pub tone: ToneConfig,

    /// Start with tones muted.
    #[serde(default)]
    pub muted: bool,

    /// Speed used when `--speed` is not given.
    #[serde(default)]
    pub default_speed: SimulationSpeed,

    /// Algorithm used when `--algorithm` is not given.
    #[serde(default)]
    pub default_algorithm: AlgorithmKind,
}

impl AppConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON and `Invalid` for bad values.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as [`from_json`](Self::from_json).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_json(&json, path)
    }

    /// Loads `explicit` if given, else the default file if it exists, else
    /// the defaults.
    ///
    /// # Errors
    ///
    /// An explicit path must exist; a missing default file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tone.validate().map_err(ConfigError::Invalid)
    }
}

/// `<config dir>/sortviz/config.json`, if a config directory exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sortviz").join("config.json"))
}

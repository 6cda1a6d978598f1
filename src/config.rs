//! Configuration file handling.
//!
//! The configuration lives at `<config dir>/vidqa/config.toml`. Every
//! section and field has a default, so a missing file or a partial one is
//! fine.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::timecode::{Interval, TimeCodeError};

/// Overrides the directory holding `config.toml`.
pub const CONFIG_DIR_ENV: &str = "VIDQA_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Errors reading or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Playback(#[from] TimeCodeError),
}

/// Where and how to reach the analysis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,
    /// Per-request timeout; analysis of long videos is slow
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7071/api".to_string(),
            timeout_secs: 600,
        }
    }
}

/// Time code presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds per "minute" when rendering time codes
    pub interval_secs: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_secs: Interval::DEFAULT_SECS,
        }
    }
}

impl PlaybackConfig {
    pub fn interval(&self) -> Result<Interval, TimeCodeError> {
        Interval::new(self.interval_secs)
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub playback: PlaybackConfig,
}

impl Config {
    /// Directory holding the configuration file.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join("vidqa"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load the configuration, falling back to defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration, creating the directory if needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, self.to_toml()?).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playback.interval()?;
        Ok(())
    }
}

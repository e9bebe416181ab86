//! Configuration system
//!
//! Configuration files are TOML or RON, picked by extension. The runtime itself
//! only needs [`RuntimeConfig`]; applications can implement [`Config`] for their
//! own settings and get file loading for free.

pub use serde::{Serialize, Deserialize};

use crate::foundation::time::{DEFAULT_MAX_DELTA, DEFAULT_MIN_FRAME_TIME};
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// On-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for the frame loop driving the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Cap on the delta time handed to a tick, in seconds
    pub max_delta_time: f32,

    /// Minimum wall-clock duration of a frame, in seconds
    pub min_frame_time: f32,

    /// Stop after this many frames (`None` runs until the application quits)
    pub max_frames: Option<u64>,

    /// Fallback log filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_delta_time: DEFAULT_MAX_DELTA,
            min_frame_time: DEFAULT_MIN_FRAME_TIME,
            max_frames: None,
            log_filter: crate::foundation::logging::DEFAULT_FILTER.to_string(),
        }
    }
}

impl Config for RuntimeConfig {}

impl RuntimeConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta_time.is_finite() && self.max_delta_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_delta_time must be positive, got {}",
                self.max_delta_time
            )));
        }
        if !(self.min_frame_time.is_finite() && self.min_frame_time >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_frame_time must be non-negative, got {}",
                self.min_frame_time
            )));
        }
        Ok(())
    }
}

//! Configuration loading and typed config structures for the lineage core.
//!
//! The canonical configuration lives in `culture-config.yaml` at the project
//! root. Every field has a default, so an empty file (or no file at all, via
//! [`TrackerConfig::default`]) yields a working configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Environment variable overriding [`DebounceConfig::delay_ms`].
pub const DEBOUNCE_ENV_VAR: &str = "CULTURE_DEBOUNCE_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration of the lineage core.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackerConfig {
    /// Process graph layout spacing.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Recomputation coalescing.
    #[serde(default)]
    pub debounce: DebounceConfig,

    /// Logging configuration for the embedding application.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TrackerConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// `CULTURE_DEBOUNCE_MS` overrides `debounce.delay_ms` when it holds a
    /// valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.debounce.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        if self.debounce.delay_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "debounce.delay_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Layout spacing for the process graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between ranks.
    #[serde(default = "default_rank_spacing")]
    pub rank_spacing: f64,

    /// Vertical distance between processes sharing a rank.
    #[serde(default = "default_row_spacing")]
    pub row_spacing: f64,

    /// X coordinate of rank 0.
    #[serde(default)]
    pub origin_x: f64,

    /// Y coordinate of the first slot in every rank.
    #[serde(default)]
    pub origin_y: f64,
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("layout.rank_spacing", self.rank_spacing),
            ("layout.row_spacing", self.row_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be a positive number, got {value}"),
                });
            }
        }
        for (name, value) in [
            ("layout.origin_x", self.origin_x),
            ("layout.origin_y", self.origin_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_spacing: default_rank_spacing(),
            row_spacing: default_row_spacing(),
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

/// Trailing-debounce settings for recomputation triggers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DebounceConfig {
    /// Quiet window in milliseconds before the latest call runs.
    #[serde(default = "default_debounce_delay_ms")]
    pub delay_ms: u64,
}

impl DebounceConfig {
    /// The delay as a [`Duration`].
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Override the delay from [`DEBOUNCE_ENV_VAR`] when it parses.
    pub fn apply_env_overrides(&mut self) {
        if let Some(ms) = std::env::var(DEBOUNCE_ENV_VAR)
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
        {
            self.delay_ms = ms;
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_debounce_delay_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_rank_spacing() -> f64 {
    250.0
}

const fn default_row_spacing() -> f64 {
    100.0
}

const fn default_debounce_delay_ms() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_owned()
}

//! Framework configuration
//!
//! Applications embedding the framework can load a TOML configuration file
//! controlling logging and validation limits. Every section has defaults,
//! so a missing or partial file is always usable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PROPERTIES_PER_OWNER, MAX_TEXT_LENGTH};
use crate::error::{FrameworkError, FrameworkResult};
use crate::logging::{LogFormat, LogLevel, LoggingConfig};

/// Main framework configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Logging settings
    pub logging: LoggingSettings,

    /// Validation limit settings
    pub limits: LimitSettings,

    /// Whether coercion failures should also be logged at warn level
    pub strict: bool,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            limits: LimitSettings::default(),
            strict: false,
        }
    }
}

/// Logging settings, string-typed for file friendliness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level ("error", "warn", "info", "debug", "trace")
    pub level: String,

    /// Log format ("compact", "full", "json")
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Validation limit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum number of properties one owner may declare
    pub max_properties_per_owner: usize,

    /// Maximum accepted text value length in bytes
    pub max_text_length: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_properties_per_owner: MAX_PROPERTIES_PER_OWNER,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

impl FrameworkConfig {
    /// Default configuration file location for the current user
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("armature").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> FrameworkResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FrameworkError::Config {
            message: format!("cannot parse {}: {e}", path.display()),
        })
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "using default configuration");
                Self::default()
            }
        }
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> FrameworkResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| FrameworkError::Config {
            message: format!("cannot serialize configuration: {e}"),
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the logging section into a [`LoggingConfig`]
    ///
    /// Unknown level or format strings fall back to the defaults.
    pub fn logging_config(&self) -> LoggingConfig {
        let defaults = LoggingConfig::default();
        LoggingConfig {
            level: LogLevel::from_str(&self.logging.level).unwrap_or(defaults.level),
            format: LogFormat::from_str(&self.logging.format).unwrap_or(defaults.format),
            target: defaults.target,
        }
    }
}

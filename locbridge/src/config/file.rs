//! Configuration file handling for ~/.locbridge/config.ini.
//!
//! ```ini
//! [module]
//! event_channel_capacity = 64
//! suppress_stale_callbacks = false
//!
//! [logging]
//! directory = logs
//! file = locbridge.log
//! ```
//!
//! A missing file yields defaults. Unknown keys are ignored.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::module::ModuleConfig;
use crate::logging::{default_log_dir, default_log_file};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// A value could not be interpreted.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory for log files.
    pub directory: PathBuf,
    /// Log file name inside `directory`.
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(default_log_dir()),
            file: default_log_file().to_string(),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub module: ModuleConfig,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Parse from an INI string.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(content)
            .map_err(|e| ConfigFileError::ReadError(ini::Error::Parse(e)))?;
        parse_ini(&ini)
    }
}

/// Default config file path (`~/.locbridge/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".locbridge")
        .join("config.ini")
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("module")) {
        if let Some(v) = section.get("event_channel_capacity") {
            config.module.event_channel_capacity =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "module".to_string(),
                    key: "event_channel_capacity".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
        if let Some(v) = section.get("suppress_stale_callbacks") {
            config.module.suppress_stale_callbacks = parse_bool(v);
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory").filter(|v| !v.trim().is_empty()) {
            config.logging.directory = PathBuf::from(v.trim());
        }
        if let Some(v) = section.get("file").filter(|v| !v.trim().is_empty()) {
            config.logging.file = v.trim().to_string();
        }
    }

    if config.module.event_channel_capacity == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: "module".to_string(),
            key: "event_channel_capacity".to_string(),
            value: "0".to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }

    Ok(config)
}

/// `true`, `yes`, `1`, `on` (any case) are true; everything else is false.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

//! Writer configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. User-level ($XDG_CONFIG_HOME/scheme-writer/config.toml
//!    or ~/.config/scheme-writer/config.toml)
//! 3. Default values
//! ```
//!
//! # Example
//!
//! ```toml
//! [writer]
//! default_mode = "display"
//! circular = true
//! width_limit = 80
//!
//! [log]
//! level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::logger::LogLevel;
use crate::writer::WriteMode;

/// Configuration of the `scheme-writer` tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Writer defaults
    #[serde(default)]
    pub writer: WriterSection,
    /// Logging
    #[serde(default)]
    pub log: LogSection,
}

/// `[writer]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterSection {
    /// Mode used when none is given on the command line
    #[serde(default)]
    pub default_mode: WriteMode,
    /// Label shared structure by default
    #[serde(default = "default_circular")]
    pub circular: bool,
    /// Truncate output to this many characters
    #[serde(default)]
    pub width_limit: Option<usize>,
}

fn default_circular() -> bool {
    true
}

impl Default for WriterSection {
    fn default() -> Self {
        Self {
            default_mode: WriteMode::Write,
            circular: true,
            width_limit: None,
        }
    }
}

/// `[log]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// Log level
    #[serde(default)]
    pub level: LogLevel,
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("scheme-writer"));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("scheme-writer"));
    }
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("scheme-writer"));
    }
    None
}

/// Get the user config file path
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load the user configuration. Returns the defaults when no file exists.
pub fn load_config() -> Result<WriterConfig, ConfigError> {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(WriterConfig::default()),
    }
}

/// Load configuration from a file. Returns the defaults when it does not
/// exist.
pub fn load_config_from(path: &Path) -> Result<WriterConfig, ConfigError> {
    if !path.exists() {
        return Ok(WriterConfig::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Save configuration to a file, creating parent directories
pub fn save_config_to(
    config: &WriterConfig,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Save the user configuration
pub fn save_config(config: &WriterConfig) -> Result<(), ConfigError> {
    let path = get_config_path().ok_or(ConfigError::NoConfigDir)?;
    save_config_to(config, &path)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Cannot determine config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests;

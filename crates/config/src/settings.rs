// User settings
// Loaded from ~/.config/bankrecon/settings.json (or $BANKRECON_SETTINGS)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::OutputFormat;

/// Overrides the settings file location.
pub const SETTINGS_ENV: &str = "BANKRECON_SETTINGS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Output
    #[serde(rename = "output.format")]
    pub output_format: OutputFormat,

    #[serde(rename = "output.strict")]
    pub strict: bool,

    // Logging
    #[serde(rename = "log.level")]
    pub log_level: Option<String>,  // None = warn
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Json,
            strict: false,
            log_level: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        if let Some(p) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bankrecon")
            .join("settings.json")
    }

    /// Load settings from the default path. A missing file yields defaults.
    pub fn try_load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        if cleaned.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&cleaned)
            .map_err(|e| ConfigError::Parse(format!("settings.json: {e}")))
    }
}

//! Configuration types for ToolVault.
//!
//! Every field has a default so partial files and environment overlays
//! deserialize cleanly.

use crate::error::{Error, Result};
use crate::models::RenderMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOG_LEVELS: [&str; 6] = ["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"];
const OUTPUT_FORMATS: [&str; 3] = ["json", "human", "text"];

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolVaultConfig {
    /// Configuration profile name
    pub profile: String,
    /// Log level (OFF, ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,

    // Rendering
    pub default_mode: RenderMode,
    pub output_format: String,
    /// Maximum number of memoized detection results
    pub cache_capacity: usize,

    // Persistence
    /// Maximum number of history entries kept
    pub history_limit: usize,
    /// Record store directory; platform cache dir when unset
    pub store_dir: Option<PathBuf>,
    pub record_history: bool,
}

impl Default for ToolVaultConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            log_level: "INFO".to_string(),
            default_mode: RenderMode::Interactive,
            output_format: "human".to_string(),
            cache_capacity: 256,
            history_limit: 100,
            store_dir: None,
            record_history: true,
        }
    }
}

impl ToolVaultConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::config_error("cache_capacity must be at least 1"));
        }

        if self.history_limit == 0 {
            return Err(Error::config_error("history_limit must be at least 1"));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_uppercase().as_str()) {
            return Err(Error::config_error(format!(
                "Unknown log level '{}'. Valid options: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if !OUTPUT_FORMATS.contains(&self.output_format.to_lowercase().as_str()) {
            return Err(Error::config_error(format!(
                "Unknown output format '{}'. Valid options: {}",
                self.output_format,
                OUTPUT_FORMATS.join(", ")
            )));
        }

        Ok(())
    }

    /// Directory holding persisted records (history, templates)
    pub fn resolve_store_dir(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_store_dir(),
        }
    }
}

/// Get the platform-specific store directory
pub fn default_store_dir() -> Result<PathBuf> {
    if let Ok(cache_home) = std::env::var("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(cache_home).join("toolvault"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
            return Ok(PathBuf::from(local_app_data).join("toolvault").join("cache"));
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(home) = std::env::var("HOME") {
            return Ok(PathBuf::from(home).join(".cache").join("toolvault"));
        }
    }

    Err(Error::config_error(
        "Cannot determine store directory: HOME not set and no platform-specific override found",
    ))
}

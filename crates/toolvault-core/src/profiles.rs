//! Pre-configured profiles for different deployment scenarios
//!
//! - Development: verbose logging, large caches
//! - Production: quiet logging, history enabled
//! - ReadOnly: display only, no history
//! - Minimal: bare essentials

use crate::config::ToolVaultConfig;
use crate::error::{Error, Result};
use crate::models::RenderMode;
use std::str::FromStr;

/// Profile selector for pre-configured deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigProfile {
    /// Development: debug logging, generous cache
    Development,
    /// Production: info logging, bounded history
    Production,
    /// ReadOnly: renderers never accept overrides, nothing is recorded
    ReadOnly,
    /// Minimal: error logging, tiny cache
    Minimal,
}

impl ConfigProfile {
    /// Create a ToolVaultConfig from this profile
    pub fn create_config(self) -> ToolVaultConfig {
        let mut config = ToolVaultConfig::new();
        config.profile = self.name().to_string();

        match self {
            Self::Development => {
                config.log_level = "DEBUG".to_string();
                config.cache_capacity = 1024;
                config.history_limit = 500;
                config.record_history = true;
            }

            Self::Production => {
                config.log_level = "INFO".to_string();
                config.cache_capacity = 256;
                config.history_limit = 100;
                config.record_history = true;
            }

            Self::ReadOnly => {
                config.log_level = "WARN".to_string();
                config.default_mode = RenderMode::ReadOnly;
                config.record_history = false;
            }

            Self::Minimal => {
                config.log_level = "ERROR".to_string();
                config.cache_capacity = 16;
                config.history_limit = 10;
                config.record_history = false;
            }
        }

        config
    }

    /// Profile name as used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::ReadOnly => "read-only",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for ConfigProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "read-only" | "readonly" => Ok(Self::ReadOnly),
            "minimal" => Ok(Self::Minimal),
            _ => Err(Error::config_error(format!(
                "Unknown profile '{}'. Valid options: development, production, read-only, minimal",
                s
            ))),
        }
    }
}

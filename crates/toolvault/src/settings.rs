//! Layered configuration: profile defaults, then the config file, then
//! `TOOLVAULT_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;
use toolvault_core::{ConfigProfile, ToolVaultConfig};

const ENV_PREFIX: &str = "TOOLVAULT";

/// Resolve the effective configuration
pub fn load_config(path: Option<&Path>, profile: Option<&str>) -> Result<ToolVaultConfig> {
    let base = match profile {
        Some(name) => name.parse::<ConfigProfile>()?.create_config(),
        None => ToolVaultConfig::default(),
    };

    let mut builder = Config::builder()
        .add_source(Config::try_from(&base).context("Failed to seed profile defaults")?);

    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        builder = builder.add_source(File::from(path));
    }

    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to assemble configuration")?;

    let config: ToolVaultConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;
    config.validate()?;

    log::debug!(
        "Loaded config (profile: {}, store: {:?})",
        config.profile,
        config.store_dir
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use toolvault_core::RenderMode;

    #[test]
    fn test_defaults_without_sources() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config.cache_capacity, ToolVaultConfig::default().cache_capacity);
    }

    #[test]
    fn test_profile_seeds_values() {
        let config = load_config(None, Some("read-only")).unwrap();
        assert_eq!(config.default_mode, RenderMode::ReadOnly);
        assert!(!config.record_history);
    }

    #[test]
    fn test_file_overrides_profile() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("toolvault.yaml");
        std::fs::write(&path, "history_limit: 7\noutput_format: json\n").unwrap();

        let config = load_config(Some(&path), Some("minimal")).unwrap();
        assert_eq!(config.history_limit, 7);
        assert_eq!(config.output_format, "json");
        assert_eq!(config.cache_capacity, 16);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        std::fs::write(&path, "cache_capacity: 0\n").unwrap();
        assert!(load_config(Some(&path), None).is_err());
        assert!(load_config(Some(&temp.path().join("missing.yaml")), None).is_err());
        assert!(load_config(None, Some("turbo")).is_err());
    }
}

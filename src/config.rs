//! User settings, persisted as pretty JSON in the platform config directory.
//!
//! A missing or unreadable file is not an error: [`load_config`] falls back to
//! defaults so the CLI always starts.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "dfx";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DfxConfig {
    /// Cache store root; `None` means `<data dir>/dfx/cache`.
    pub store_dir: Option<PathBuf>,
    /// Prefix for links in rendered output (`<prefix>/column/<name>`, ...)
    pub url_prefix: String,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Serve and save describers through the cache store
    pub use_cache: bool,
}

impl Default for DfxConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            url_prefix: String::new(),
            log_filter: "info".to_owned(),
            use_cache: true,
        }
    }
}

impl DfxConfig {
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("cache")
        })
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.json")
}

pub fn load_config() -> DfxConfig {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> DfxConfig {
    if path.exists()
        && let Ok(content) = std::fs::read_to_string(path)
        && let Ok(config) = serde_json::from_str::<DfxConfig>(&content)
    {
        return config;
    }
    DfxConfig::default()
}

pub fn save_config(config: &DfxConfig) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &DfxConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content).context("Failed to write config file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config, DfxConfig::default());
        assert!(config.use_cache);
        assert!(config.store_dir().ends_with("cache"));
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.json");
        let config = DfxConfig {
            store_dir: Some(dir.path().join("store")),
            url_prefix: "/data/people".to_owned(),
            log_filter: "dfx=debug".to_owned(),
            use_cache: false,
        };
        save_config_to(&config, &path)?;
        assert_eq!(load_config_from(&path), config);
        Ok(())
    }

    #[test]
    fn test_partial_and_corrupt_files() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"url_prefix": "/x"}"#)?;
        let partial = load_config_from(&path);
        assert_eq!(partial.url_prefix, "/x");
        assert_eq!(partial.log_filter, "info");

        std::fs::write(&path, "{not json")?;
        assert_eq!(load_config_from(&path), DfxConfig::default());
        Ok(())
    }
}

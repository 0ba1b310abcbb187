use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub setlist: SetlistConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Root of the media archive (search, metadata and download endpoints).
    #[serde(default = "default_archive_root")]
    pub root: String,
    /// Per-request ceiling; a timeout is a transport failure like any other.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ArchiveConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetlistConfig {
    #[serde(default = "default_setlist_root")]
    pub root: String,
    /// API key for the setlist service.  Empty disables setlist lookup;
    /// a key stored in settings.json takes precedence when present.
    #[serde(default)]
    pub api_key: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: default_archive_root(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SetlistConfig {
    fn default() -> Self {
        Self {
            root: default_setlist_root(),
            api_key: String::new(),
        }
    }
}

fn default_archive_root() -> String {
    "https://archive.org".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_setlist_root() -> String {
    "https://api.setlist.fm/rest/1.0".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.archive.root, "https://archive.org");
        assert_eq!(config.archive.timeout(), Duration::from_secs(15));
        assert!(config.setlist.api_key.is_empty());
    }

    #[test]
    fn partial_sections_keep_the_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [archive]
            timeout_secs = 5

            [setlist]
            api_key = "k3y"
            "#,
        )
        .unwrap();
        assert_eq!(config.archive.root, "https://archive.org");
        assert_eq!(config.archive.timeout_secs, 5);
        assert_eq!(config.setlist.root, "https://api.setlist.fm/rest/1.0");
        assert_eq!(config.setlist.api_key, "k3y");
    }
}

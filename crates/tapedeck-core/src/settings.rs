//! Small persisted record: setlist API key plus the last artist and show,
//! so a restart can pick up where the user left off.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub setlist_api_key: String,
    #[serde(default)]
    pub last_artist: String,
    #[serde(default)]
    pub last_show: String,
}

impl Settings {
    pub fn path() -> PathBuf {
        platform::data_dir().join("settings.json")
    }

    /// Fail-soft: a missing or unreadable file is just the defaults.
    pub fn load(path: &Path) -> Settings {
        if let Ok(content) = std::fs::read_to_string(path) {
            if let Ok(settings) = serde_json::from_str::<Settings>(&content) {
                return settings;
            }
        }
        Settings::default()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            setlist_api_key: "k3y".into(),
            last_artist: "Grateful Dead".into(),
            last_show: "gd1977-05-08".into(),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn missing_or_garbled_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("settings.json");
        assert_eq!(Settings::load(&missing), Settings::default());

        std::fs::write(&missing, "not json {").unwrap();
        assert_eq!(Settings::load(&missing), Settings::default());
    }
}

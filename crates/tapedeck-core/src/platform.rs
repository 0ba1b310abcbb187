use std::path::PathBuf;

/// Per-user config directory (`config.toml`, `artists.toml`).
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tapedeck")
}

/// Per-user data directory (`settings.json`).
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tapedeck")
}

//! Configuration: API endpoint and shelf contents.

use crate::shelf::DEFAULT_TITLES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the book API.
    pub base_url: String,
    /// Titles shown on the shelf after login.
    pub shelf_titles: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            shelf_titles: DEFAULT_TITLES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default config file, falling back to
    /// defaults when no file exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = path.map_or_else(|| config_dir().join("config.toml"), Path::to_path_buf);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Path to the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        config_dir().join("session.json")
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("estante"))
        .unwrap_or_else(|| PathBuf::from(".estante"))
}

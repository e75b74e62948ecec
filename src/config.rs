//! Application configuration management.
//!
//! Resolves the backend base URL the stores talk to. Precedence:
//! `TUMBUH_API_BASE` environment variable, then the saved config file,
//! then the development default.
//!
//! Configuration is stored at `~/.config/tumbuh/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "tumbuh";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Development default, matching the backend's default listen address
const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Base URL for the backend API, without the `/api` suffix.
    pub fn api_base(&self) -> String {
        if let Ok(base) = std::env::var("TUMBUH_API_BASE") {
            if !base.is_empty() {
                return base;
            }
        }
        self.api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

//! Service configuration: a JSON file in the user's config directory,
//! overridden by `FROG_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::optim::DEFAULT_OPTIMIZER_URL;

const APP_NAME: &str = "frog";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the activity catalog (without `/activities`).
    pub catalog_url: String,
    /// Endpoint of the optimization service.
    pub optimizer_url: String,
    /// Port the HTTP API listens on.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            optimizer_url: DEFAULT_OPTIMIZER_URL.to_string(),
            port: 3000,
        }
    }
}

impl Config {
    /// Load the config file, then apply environment overrides.
    /// Falls back to defaults if the file is missing or unreadable.
    pub fn load() -> Self {
        let mut config = match config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply `FROG_CATALOG_URL`, `FROG_OPTIMIZER_URL` and `FROG_PORT`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("FROG_CATALOG_URL") {
            self.catalog_url = url;
        }
        if let Some(url) = var("FROG_OPTIMIZER_URL") {
            self.optimizer_url = url;
        }
        if let Some(port) = var("FROG_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid FROG_PORT: {}", port),
            }
        }
    }
}

fn config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

use anyhow::{ensure, Context};
use serde::Deserialize;
use std::fs;

use crate::view::ViewConfig;

/// Environment variable that overrides `backend.base_url`.
pub const BASE_URL_ENV: &str = "LEXOFFERS_BASE_URL";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub general: General,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: String,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
        let mut config = Self::parse(&contents)?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.backend.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.backend.base_url.trim().is_empty(), "backend.base_url is empty");
        ensure!(self.backend.timeout_secs > 0, "backend.timeout_secs must be positive");
        ensure!(self.view.page_size > 0, "view.page_size must be positive");
        Ok(())
    }
}

use crate::error::{PublishError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    pub registry: RegistryTarget,
}

/// Where and how to reach the plugin registry. Read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryTarget {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

impl RegistryTarget {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            registry: RegistryTarget {
                base_url: "http://localhost:8080".to_string(),
                api_key: String::new(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

impl PublishConfig {
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Applies `WEBUI_*` environment variables on top of the current values.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var("WEBUI_URL") {
            if !url.trim().is_empty() {
                self.registry.base_url = url.trim().to_string();
            }
        }

        if let Ok(key) = std::env::var("WEBUI_KEY") {
            self.registry.api_key = key.trim().to_string();
        }

        if let Ok(timeout) = std::env::var("WEBUI_TIMEOUT_SECS") {
            self.registry.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| PublishError::config_error("Invalid WEBUI_TIMEOUT_SECS"))?;
        }

        Ok(self)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PublishError::config_error(format!("Failed to read config file: {}", e))
        })?;

        let config: PublishConfig = toml::from_str(&content).map_err(|e| {
            PublishError::config_error(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.registry.base_url.trim().is_empty() {
            return Err(PublishError::config_error("Registry base URL cannot be empty"));
        }
        if self.registry.api_key.is_empty() {
            return Err(PublishError::config_error(
                "Registry API key is required (set WEBUI_KEY or pass --key)",
            ));
        }
        if self.registry.timeout_secs == 0 {
            return Err(PublishError::config_error("Timeout must be at least one second"));
        }
        Ok(())
    }
}

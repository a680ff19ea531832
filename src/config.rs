use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application (client) id used when none is configured
///
/// A public client registration; override it with `--client-id`, the
/// `M365_CLIENT_ID` environment variable, or the config file.
pub const DEFAULT_CLIENT_ID: &str = "04f0c124-f2bc-4f67-8f80-9e5b0a639777";

/// Token authority used when none is configured
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Microsoft Graph resource base used when none is configured
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// Optional settings read from the user's config file
///
/// Every key is optional; sovereign-cloud tenants point `authority` and
/// `graph_base_url` at their national endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub client_id: Option<String>,
    pub authority: Option<String>,
    pub graph_base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", config_path.display()))?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push("m365-license-report");
        path.push("config.toml");
        Ok(path)
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID)
    }

    pub fn authority(&self) -> &str {
        self.authority.as_deref().unwrap_or(DEFAULT_AUTHORITY)
    }

    pub fn graph_base_url(&self) -> &str {
        self.graph_base_url.as_deref().unwrap_or(DEFAULT_GRAPH_BASE_URL)
    }
}

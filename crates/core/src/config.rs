//! Configuration management
//!
//! Reads the optional `config.toml` from the webotron config directory.
//! Values here are defaults; command-line flags and environment variables
//! take precedence over them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "WEBOTRON_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider session settings
    pub aws: SessionConfig,
}

/// Settings used to build a provider session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Named credential profile from the shared AWS config files
    pub profile: Option<String>,

    /// Region override; falls back to the profile's region
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    pub force_path_style: bool,
}

impl SessionConfig {
    /// Layer explicitly supplied values over these settings
    pub fn with_overrides(
        mut self,
        profile: Option<String>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        if profile.is_some() {
            self.profile = profile;
        }
        if region.is_some() {
            self.region = region;
        }
        if endpoint_url.is_some() {
            self.endpoint_url = endpoint_url;
        }
        self
    }

    /// Check that the settings can be handed to the SDK
    pub fn validate(&self) -> Result<()> {
        if let Some(profile) = &self.profile
            && profile.trim().is_empty()
        {
            return Err(Error::Config("profile name cannot be empty".to_string()));
        }

        if let Some(endpoint) = &self.endpoint_url {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| Error::Config(format!("invalid endpoint_url '{endpoint}': {e}")))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(Error::Config(format!(
                    "endpoint_url must use http or https: {endpoint}"
                )));
            }
        }

        Ok(())
    }
}

/// Locates and loads the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Use `$WEBOTRON_CONFIG_DIR` or the platform config directory
    pub fn new() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .map(|d| d.join("webotron"))
                .ok_or_else(|| Error::Config("cannot determine config directory".to_string()))?,
        };
        Ok(Self::with_dir(dir))
    }

    /// Use an explicit config directory
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: dir.as_ref().join(CONFIG_FILE),
        }
    }

    /// Load the config file. A missing file yields the defaults.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "failed to parse {}: {e}",
                self.config_path.display()
            ))
        })?;
        config.aws.validate()?;

        tracing::debug!(path = %self.config_path.display(), "Loaded config file");
        Ok(config)
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow, bail};
use reqwest::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze";
pub const ENDPOINT_ENV: &str = "COMPASS_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
}

/// Where the effective endpoint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Flag,
    Environment,
    ConfigFile,
    Default,
}

impl EndpointSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointSource::Flag => "command line",
            EndpointSource::Environment => ENDPOINT_ENV,
            EndpointSource::ConfigFile => "config file",
            EndpointSource::Default => "default",
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Like `load`, but an unreadable or corrupt file falls back to defaults.
    pub fn load_or_default() -> Self {
        match Self::get_config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                tracing::warn!(error = %e, "no config directory, using defaults");
                Self::new()
            }
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            Self::new()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("conceptual-compass").join("config.json"))
    }

    /// Pick the endpoint: flag, then environment, then this config, then the default.
    pub fn resolve_endpoint(
        &self,
        flag: Option<&str>,
        env: Option<String>,
    ) -> Result<(String, EndpointSource)> {
        let (raw, source) = if let Some(url) = flag {
            (url.to_string(), EndpointSource::Flag)
        } else if let Some(url) = env.filter(|v| !v.trim().is_empty()) {
            (url, EndpointSource::Environment)
        } else if let Some(url) = &self.endpoint {
            (url.clone(), EndpointSource::ConfigFile)
        } else {
            (DEFAULT_ENDPOINT.to_string(), EndpointSource::Default)
        };

        let endpoint = validate_endpoint(&raw)
            .map_err(|e| anyhow!("Invalid endpoint from {}: {}", source.as_str(), e))?;
        Ok((endpoint, source))
    }

    /// [`Config::resolve_endpoint`] reading `COMPASS_ENDPOINT` from the process environment.
    pub fn effective_endpoint(&self, flag: Option<&str>) -> Result<(String, EndpointSource)> {
        self.resolve_endpoint(flag, std::env::var(ENDPOINT_ENV).ok())
    }
}

/// Check that `raw` is an absolute http(s) URL. Returns it trimmed.
pub fn validate_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| anyhow!("'{}' is not a valid URL: {}", trimmed, e))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => bail!("unsupported scheme '{}' in '{}'", other, trimmed),
    }
}

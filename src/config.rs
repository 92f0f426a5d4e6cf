//! Configuration handling for the wizard

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "NPI_API_URL";

/// Environment variable holding the tracing filter
pub const LOG_FILTER_ENV: &str = "NPI_WIZARD_LOG";

/// User configuration for the wizard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WizardConfig {
    /// Base URL of the application API, e.g. `https://npi.example.gov/api`
    pub api_base_url: Option<String>,
    /// Per-request timeout; the transport default applies when unset
    pub request_timeout_secs: Option<u64>,
    /// Where tracing output goes while the terminal UI is active
    pub log_file: Option<PathBuf>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("gov", "cms", "npi-wizard")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let config: WizardConfig = serde_json::from_str(&content)
                    .with_context(|| format!("parsing {}", path.display()))?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Resolve the API base URL: environment, then config file, then default
    pub fn api_base_url(&self) -> Result<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        self.resolve_api_base_url(env_url.as_deref())
    }

    fn resolve_api_base_url(&self, env_url: Option<&str>) -> Result<String> {
        let raw = env_url
            .filter(|url| !url.trim().is_empty())
            .or(self.api_base_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        validate_base_url(raw)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Log destination: configured file, else the platform data directory
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_local_dir().join("npi-wizard.log"))
        })
    }
}

/// Check that a base URL is usable and strip any trailing slash
fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| anyhow!("Invalid API URL '{}': {}", raw, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "API URL must use http or https; got '{}://'",
            url.scheme()
        ));
    }
    if url.host_str().is_none() {
        return Err(anyhow!("API URL '{}' must include a host", raw));
    }

    Ok(trimmed.to_string())
}

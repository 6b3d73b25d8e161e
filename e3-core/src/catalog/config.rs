//! Catalog configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. `E3_GITLAB_URL`, `E3_GITLAB_TOKEN`, `E3_GROUP_ID` environment variables
//! 2. The file given with `--config`
//! 3. `~/.config/e3/config.yaml` (platform config directory)
//! 4. Built-in defaults
//!
//! ```yaml
//! url: https://gitlab.esss.lu.se
//! private_token: glpat-xxxxxxxx
//! group_id: 215
//! excluded_groups: [archive]
//! excluded_projects: [e3-sandbox]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::E3Error;

/// Default catalog service
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.esss.lu.se";

/// Id of the e3 root group
pub const DEFAULT_GROUP_ID: u64 = 215;

/// Environment variable overriding the service URL
pub const URL_ENV: &str = "E3_GITLAB_URL";

/// Environment variable carrying the access token
pub const TOKEN_ENV: &str = "E3_GITLAB_TOKEN";

/// Environment variable overriding the root group id
pub const GROUP_ID_ENV: &str = "E3_GROUP_ID";

/// Catalog connection and filtering settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the GitLab instance
    #[serde(default = "default_url")]
    pub url: String,

    /// Personal access token sent as `PRIVATE-TOKEN`
    #[serde(default)]
    pub private_token: Option<String>,

    /// Root group of the module catalog
    #[serde(default = "default_group_id")]
    pub group_id: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Page size for listings
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Group names hidden from listings
    #[serde(default)]
    pub excluded_groups: Vec<String>,

    /// Project names hidden from listings
    #[serde(default)]
    pub excluded_projects: Vec<String>,
}

fn default_url() -> String {
    DEFAULT_GITLAB_URL.to_string()
}

fn default_group_id() -> u64 {
    DEFAULT_GROUP_ID
}

fn default_timeout() -> u64 {
    30
}

fn default_per_page() -> u32 {
    100
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            private_token: None,
            group_id: default_group_id(),
            timeout_seconds: default_timeout(),
            per_page: default_per_page(),
            excluded_groups: Vec::new(),
            excluded_projects: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from `explicit` or the default location, then
    /// apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(E3Error::ConfigNotFound {
                        path: path.to_path_buf(),
                    }
                    .into());
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("No catalog config file found, using defaults");
                    Self::default()
                }
            },
        };

        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse catalog config: {}", path.display()))?;
        tracing::debug!("Loaded catalog config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).context("Failed to parse catalog config YAML")
    }

    /// Apply `E3_GITLAB_*` overrides read through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(URL_ENV).filter(|v| !v.is_empty()) {
            self.url = url;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.private_token = Some(token);
        }
        if let Some(group_id) = lookup(GROUP_ID_ENV).filter(|v| !v.is_empty()) {
            self.group_id = group_id.trim().parse().map_err(|_| {
                E3Error::InvalidConfig(format!("{GROUP_ID_ENV} must be a number, got '{group_id}'"))
            })?;
        }
        Ok(self)
    }

    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<(), E3Error> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(E3Error::InvalidConfig(format!(
                "url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(E3Error::InvalidConfig(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(E3Error::InvalidConfig(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a group is hidden from listings
    pub fn is_group_excluded(&self, name: &str) -> bool {
        self.excluded_groups.iter().any(|g| g == name)
    }

    /// Whether a project is hidden from listings
    pub fn is_project_excluded(&self, name: &str) -> bool {
        self.excluded_projects.iter().any(|p| p == name)
    }

    /// Default config file path, if a config directory can be determined
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("eu", "ess", "e3")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("e3")))
            .map(|dir| dir.join("config.yaml"))
    }
}

//! User configuration loaded from `~/.catalog/config.yaml`

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_END_REACHED_THRESHOLD, DEFAULT_PRODUCTS_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    PRODUCTS_PER_PAGE,
};

/// Environment variable that overrides the configured endpoint
pub const API_URL_ENV: &str = "CATALOG_API_URL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint returning the full product collection as a JSON array
    pub api_url: String,
    pub page_size: usize,
    /// Fraction of a screenful from the bottom that triggers the next page
    pub end_reached_threshold: f32,
    /// `None` disables the timeout entirely
    pub request_timeout_secs: Option<u64>,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: String::from(DEFAULT_PRODUCTS_URL),
            page_size: PRODUCTS_PER_PAGE,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Directory holding the config file
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".catalog")
    }

    /// Load the user config, apply environment overrides and validate
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_dir().join("config.yaml"))?;
        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!("api_url must not be empty");
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        let threshold = self.end_reached_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            bail!("end_reached_threshold must be in (0, 1], got {}", threshold);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 4);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_url: http://localhost:9000/items\nrequest_timeout_secs: null\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "http://localhost:9000/items");
        assert_eq!(config.page_size, PRODUCTS_PER_PAGE);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "page_size: [not, a, number]\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_override_replaces_url_unless_blank() {
        let mut config = Config::default();
        config.apply_overrides(Some("  ".into()));
        assert_eq!(config.api_url, DEFAULT_PRODUCTS_URL);
        config.apply_overrides(Some("http://example.test/p".into()));
        assert_eq!(config.api_url, "http://example.test/p");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config { page_size: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { end_reached_threshold: 1.5, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { end_reached_threshold: f32::NAN, ..Config::default() };
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }
}

//! User settings file
//!
//! Read from `<config_dir>/tabview/config.toml`. Every key is optional; a
//! missing file means defaults. Environment variables and flags override
//! the file.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabview_core::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use tabview_remote::{DEFAULT_BASE_URL, DEFAULT_SESSION_ID, RemoteConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub session_id: String,
    pub timeout_secs: u64,
    pub page_size: u64,
    pub page_size_options: Vec<u64>,
    /// Also write a JSON log file under the data directory
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_id: DEFAULT_SESSION_ID.to_string(),
            timeout_secs: 30,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            json_logs: false,
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("tabview"))
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

impl Settings {
    /// Load `path`, or the default settings file when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => settings_file()?,
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings: {:?}", path))?;
        Self::parse(&text).with_context(|| format!("Invalid settings file: {:?}", path))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size_options.is_empty() {
            bail!("page_size_options must not be empty");
        }
        if self.page_size_options.contains(&0) {
            bail!("page sizes must be positive");
        }
        if !self.page_size_options.contains(&self.page_size) {
            bail!(
                "page_size {} is not one of {:?}",
                self.page_size,
                self.page_size_options
            );
        }
        Ok(())
    }

    /// Apply flag/env values on top of the file
    pub fn with_overrides(mut self, base_url: Option<String>, session_id: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(session_id) = session_id {
            self.session_id = session_id;
        }
        self
    }

    /// The requested page size, or the configured default. Only offered sizes
    /// are accepted.
    pub fn check_page_size(&self, requested: Option<u64>) -> Result<u64> {
        let size = requested.unwrap_or(self.page_size);
        if !self.page_size_options.contains(&size) {
            bail!(
                "page size {} is not available; choose one of {:?}",
                size,
                self.page_size_options
            );
        }
        Ok(size)
    }

    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig::default()
            .with_base_url(self.base_url.clone())
            .with_session(self.session_id.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::parse(
            r#"
            base_url = "http://engine:9000/api/v1"
            page_size = 200
            "#,
        )
        .unwrap();
        assert_eq!(settings.base_url, "http://engine:9000/api/v1");
        assert_eq!(settings.page_size, 200);
        assert_eq!(settings.session_id, "default-session");
        assert_eq!(settings.page_size_options, vec![50, 100, 200, 500]);
    }

    #[test]
    fn test_page_size_must_be_offered() {
        assert!(Settings::parse("page_size = 75").is_err());
        assert!(Settings::parse("page_size_options = []").is_err());

        let settings = Settings::default();
        assert_eq!(settings.check_page_size(None).unwrap(), 100);
        assert_eq!(settings.check_page_size(Some(500)).unwrap(), 500);
        assert!(settings.check_page_size(Some(7)).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::default().with_overrides(Some("http://x/api".into()), None);
        assert_eq!(settings.base_url, "http://x/api");
        assert_eq!(settings.session_id, "default-session");

        let remote = settings.remote_config();
        assert_eq!(remote.base_url, "http://x/api");
        assert_eq!(remote.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let path = std::env::temp_dir().join("tabview-no-such-dir/config.toml");
        assert_eq!(Settings::load(Some(&path)).unwrap(), Settings::default());
    }
}

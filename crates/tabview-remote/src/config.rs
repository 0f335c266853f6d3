//! Connection settings for the engine's HTTP API

use std::time::Duration;

use url::Url;

use crate::error::{RemoteError, RemoteResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_SESSION_ID: &str = "default-session";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// API root, including the version segment
    pub base_url: String,
    pub session_id: String,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_id: DEFAULT_SESSION_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RemoteConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse the base URL. The result always ends in `/` so relative joins
    /// keep the version segment.
    pub fn api_root(&self) -> RemoteResult<Url> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(RemoteError::InvalidConfig("base URL is empty".into()));
        }
        let mut root = Url::parse(trimmed)?;
        if root.cannot_be_a_base() {
            return Err(RemoteError::InvalidConfig(format!(
                "'{}' cannot be used as a base URL",
                trimmed
            )));
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(root)
    }
}

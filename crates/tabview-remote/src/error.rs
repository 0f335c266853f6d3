use serde::Deserialize;
use tabview_core::TabviewError;
use thiserror::Error;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failures talking to the engine over HTTP
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Engine returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Error body the engine sends with non-2xx replies
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Most specific text in the body: `message`, then `error`
    pub(crate) fn best_message(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

/// Pick the message to report for a failed reply
pub(crate) fn status_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.best_message()
    {
        return message.to_string();
    }
    let text = body.trim();
    if text.is_empty() || text.starts_with('{') {
        format!("HTTP {}", status)
    } else {
        text.to_string()
    }
}

impl RemoteError {
    /// Convert into the core error, filing HTTP failures under the category
    /// built by `category`
    pub fn into_tabview(self, category: fn(String) -> TabviewError) -> TabviewError {
        match self {
            Self::Transport(e) if e.is_decode() => TabviewError::Other(e.to_string()),
            Self::Transport(e) => TabviewError::Connection(e.to_string()),
            Self::Status { status: 404, message } => TabviewError::NotFound(message),
            Self::Status { message, .. } => category(message),
            Self::InvalidUrl(e) => TabviewError::Configuration(e.to_string()),
            Self::InvalidConfig(message) => TabviewError::Configuration(message),
            Self::Decode(message) => TabviewError::Other(message),
        }
    }
}

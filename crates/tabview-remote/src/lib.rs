//! HTTP transport for the tabview query engine
//!
//! [`HttpEngine`] implements [`tabview_core::QueryEngine`] against the
//! engine's JSON API under `<base_url>/sessions`. Non-2xx replies are turned
//! into core errors carrying the server's `message` (or `error`) text.

mod config;
mod error;
mod http_engine;

pub use config::{DEFAULT_BASE_URL, DEFAULT_SESSION_ID, DEFAULT_TIMEOUT, RemoteConfig};
pub use error::{RemoteError, RemoteResult};
pub use http_engine::HttpEngine;

//! Logging setup for the `tabview` binary
//!
//! Console output goes to stderr so tables on stdout stay clean. A JSON file
//! log can be enabled for bug reports. `RUST_LOG` overrides the default filter.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where JSON log files are written
    pub log_dir: PathBuf,

    pub enable_json_logs: bool,

    pub enable_console_logs: bool,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Whether to log span open/close (request timings)
    pub enable_spans: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: false,
            enable_spans: false,
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Quiet console, JSON file log for bug reports
    pub fn production() -> Self {
        Self {
            enable_json_logs: true,
            default_filter: "warn,tabview_services=info,tabview_remote=info".to_string(),
            ..Self::default()
        }
    }

    /// Verbose console with locations and span timings
    pub fn development() -> Self {
        Self {
            include_location: true,
            enable_spans: true,
            default_filter: "debug,reqwest=info,hyper=info".to_string(),
            ..Self::default()
        }
    }

    /// Console filter from `-v` occurrences. Without `-v`, a JSON file log
    /// means the production preset.
    pub fn for_verbosity(verbose: u8, json_logs: bool) -> Self {
        let base = match verbose {
            0 if json_logs => Self::production(),
            0 => Self::default(),
            1 => Self {
                default_filter: "warn,tabview_services=info,tabview_remote=info,tabview=info"
                    .to_string(),
                ..Self::default()
            },
            _ => Self::development(),
        };
        Self {
            enable_json_logs: json_logs,
            ..base
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the JSON file writer; keep it alive until exit.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    // NEW/CLOSE only: ENTER would fire on every re-poll of an awaited future
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();
    let mut guard = None;

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone())
            .compact()
            .with_filter(env_filter.clone())
            .boxed();
        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "tabview.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "logging initialized"
    );

    Ok(guard)
}

pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabview")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingConfig::for_verbosity(0, false).default_filter, "warn");
        assert!(
            LoggingConfig::for_verbosity(1, false)
                .default_filter
                .contains("tabview_services=info")
        );
        let debug = LoggingConfig::for_verbosity(3, true);
        assert!(debug.default_filter.starts_with("debug"));
        assert!(debug.enable_spans);
        assert!(debug.enable_json_logs);
    }

    #[test]
    fn test_json_logs_without_verbosity_use_production_preset() {
        let config = LoggingConfig::for_verbosity(0, true);
        assert!(config.enable_json_logs);
        assert!(config.default_filter.contains("tabview_remote=info"));
        assert!(!config.enable_spans);
    }

    #[test]
    fn test_log_directory_is_namespaced() {
        assert!(log_directory().ends_with("tabview/logs"));
    }
}

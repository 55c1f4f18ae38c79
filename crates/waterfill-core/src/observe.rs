//! Structured logging via the `tracing` ecosystem.
//!
//! The allocator emits trace-level events on every run (channel counts and
//! the converged water level); this module wires up a subscriber so callers
//! can see them. Level and format come from a [`LogConfig`], with the
//! `RUST_LOG` environment variable taking precedence when set.
//!
//! ```rust,ignore
//! use waterfill_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default());
//! tracing::info!(channels = 16, "allocation service started");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One line per event.
    Compact,
    /// Multi-line, human-oriented.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Compact
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level threshold, used when no filter overrides it.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Explicit filter directive (e.g. `"waterfill_core=trace"`). Overrides
    /// both `level` and `RUST_LOG`.
    pub filter: Option<String>,
}

impl LogConfig {
    /// Verbose development configuration.
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            filter: None,
        }
    }

    /// Errors only.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            filter: None,
        }
    }
}

/// Install the global logging subscriber.
///
/// Call once at startup; later calls are silently ignored so tests and
/// embedders cannot trip over an already-installed subscriber.
pub fn init_logging(config: &LogConfig) {
    let filter = match &config.filter {
        Some(directive) => EnvFilter::try_new(directive)
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string())),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string())),
    };

    let result = match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact());
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty());
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json());
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    // A subscriber may already be installed; that is fine.
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_display_matches_filter_directives() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn presets() {
        let verbose = LogConfig::verbose();
        assert_eq!(verbose.level, LogLevel::Debug);
        assert_eq!(verbose.format, LogFormat::Pretty);

        let quiet = LogConfig::quiet();
        assert_eq!(quiet.level, LogLevel::Error);
        assert_eq!(quiet.format, LogFormat::Compact);

        let default = LogConfig::default();
        assert_eq!(default.level, LogLevel::Info);
        assert!(default.filter.is_none());
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(&LogConfig::quiet());
        // Second call must not panic even though a subscriber is installed.
        init_logging(&LogConfig::verbose());
    }
}

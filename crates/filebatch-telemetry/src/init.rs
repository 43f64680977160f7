//! Logging initialisation primitives.
//!
//! # Design
//! - Build the subscriber as an explicit [`LogHandle`] instead of installing global state, so the
//!   entry point owns its lifecycle and tests can run the engine against a silent handle.
//! - Records the build SHA once to avoid inconsistencies across modules.

use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing::Dispatch;
use tracing::subscriber::NoSubscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::error::{Result, TelemetryError};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Access the build SHA recorded during logging initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Build identifier recorded in structured logs.
    pub build_sha: &'a str,
    /// File to append events to; stderr is used when absent.
    pub log_file: Option<&'a Path>,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
            log_file: None,
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(TelemetryError::UnknownLogFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Explicit logger handle passed to the components that emit events.
///
/// The handle wraps a [`Dispatch`]; [`LogHandle::in_scope`] makes it the default dispatcher for
/// the duration of a closure.
#[derive(Clone, Debug)]
pub struct LogHandle {
    dispatch: Dispatch,
}

impl LogHandle {
    /// Wrap an existing dispatcher.
    #[must_use]
    pub const fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// A handle that discards every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self::from_dispatch(Dispatch::new(NoSubscriber::default()))
    }

    /// Run `op` with this handle as the active dispatcher.
    pub fn in_scope<T>(&self, op: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, op)
    }
}

/// Build the logger handle described by `config`.
///
/// # Errors
///
/// Returns an error when the configured log file (or its directory) cannot be opened.
pub fn build_log_handle(config: &LoggingConfig<'_>) -> Result<LogHandle> {
    BUILD_SHA
        .set(config.build_sha.to_string())
        .ok()
        .or(Some(()));

    let filter = build_env_filter(config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let dispatch = match (config.format, config.log_file) {
        (LogFormat::Json, Some(path)) => Dispatch::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(open_log_file(path)?),
            ),
        ),
        (LogFormat::Pretty, Some(path)) => Dispatch::new(
            registry.with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(open_log_file(path)?),
            ),
        ),
        (LogFormat::Json, None) => Dispatch::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            ),
        ),
        (LogFormat::Pretty, None) => Dispatch::new(
            registry.with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    Ok(LogHandle::from_dispatch(dispatch))
}

fn open_log_file(path: &Path) -> Result<Mutex<File>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TelemetryError::LogDirCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFileOpen {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Mutex::new(file))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result as TestResult;
    use filebatch_test_support::temp_dir;

    #[test]
    fn log_format_parses_known_names() {
        assert!(matches!("json".parse::<LogFormat>(), Ok(LogFormat::Json)));
        assert!(matches!(" Pretty ".parse::<LogFormat>(), Ok(LogFormat::Pretty)));
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(TelemetryError::UnknownLogFormat { .. })
        ));
    }

    #[test]
    fn handle_appends_events_to_log_file() -> TestResult<()> {
        let temp = temp_dir("filebatch-telemetry-")?;
        let path = temp.path().join("logs").join("debug.log");
        let config = LoggingConfig {
            level: "debug",
            format: LogFormat::Pretty,
            build_sha: "test",
            log_file: Some(&path),
        };
        let handle = build_log_handle(&config)?;
        handle.in_scope(|| tracing::warn!(run_id = 7_u64, "handle smoke event"));

        let written = fs::read_to_string(&path)?;
        assert!(written.contains("handle smoke event"));
        Ok(())
    }

    #[test]
    fn json_handle_writes_structured_lines() -> TestResult<()> {
        let temp = temp_dir("filebatch-telemetry-")?;
        let path = temp.path().join("debug.jsonl");
        let config = LoggingConfig {
            level: "debug",
            format: LogFormat::Json,
            build_sha: "test",
            log_file: Some(&path),
        };
        build_log_handle(&config)?.in_scope(|| tracing::error!(command = "Count", "json event"));

        let written = fs::read_to_string(&path)?;
        let line = written.lines().next().unwrap_or_default();
        assert!(line.starts_with('{'));
        assert!(line.contains("json event"));
        Ok(())
    }

    #[test]
    fn disabled_handle_runs_closure() {
        let value = LogHandle::disabled().in_scope(|| {
            tracing::info!("discarded");
            41 + 1
        });
        assert_eq!(value, 42);
    }
}

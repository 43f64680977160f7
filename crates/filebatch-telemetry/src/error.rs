//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// Creating the directory that holds the log file failed.
    LogDirCreate {
        /// Directory path that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Opening the log file for appending failed.
    LogFileOpen {
        /// Log file path that could not be opened.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// A log format name was not recognised.
    UnknownLogFormat {
        /// Offending format name.
        value: String,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogDirCreate { .. } => formatter.write_str("failed to create log directory"),
            Self::LogFileOpen { .. } => formatter.write_str("failed to open log file"),
            Self::UnknownLogFormat { .. } => formatter.write_str("unknown log format"),
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LogDirCreate { source, .. } | Self::LogFileOpen { source, .. } => Some(source),
            Self::UnknownLogFormat { .. } => None,
        }
    }
}

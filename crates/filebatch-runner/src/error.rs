//! # Design
//!
//! - Infrastructure failures only: anything here aborts the batch. Per-command failures are data
//!   and never reach this type.
//! - Constant messages; operation and path travel as fields.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that abort a batch run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// IO failures outside of command execution.
    #[error("runner io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// CSV serialization failures while appending a record.
    #[error("runner csv failure")]
    Csv {
        /// Operation that triggered the CSV failure.
        operation: &'static str,
        /// Artifact being written.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// Directory traversal failures while scanning a bucket.
    #[error("runner walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
}

impl RunnerError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: csv::Error,
    ) -> Self {
        Self::Csv {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Operation identifier carried by every variant.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Io { operation, .. }
            | Self::Csv { operation, .. }
            | Self::Walkdir { operation, .. } => *operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn runner_error_helpers_build_variants() {
        let io_err = RunnerError::io("script.open", "script.txt", io::Error::other("io"));
        assert!(matches!(io_err, RunnerError::Io { .. }));
        assert_eq!(io_err.operation(), "script.open");
        assert!(io_err.source().is_some());
        assert_eq!(io_err.to_string(), "runner io failure");

        let csv_err = RunnerError::csv(
            "sink.append_csv",
            "PASSED1.csv",
            csv::Error::from(io::Error::other("disk full")),
        );
        assert!(matches!(csv_err, RunnerError::Csv { .. }));
        assert!(csv_err.source().is_some());
    }
}

//! # Design
//!
//! - Split construction errors (the script line is unusable) from execution failures (the
//!   command ran and the filesystem said no).
//! - Constant error messages; operation context travels in fields.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for command construction.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while turning a script line into a [`crate::Command`].
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// The command token is not one of the recognised names.
    #[error("unknown command")]
    UnknownCommand {
        /// Token as it appeared in the script.
        name: String,
    },
    /// The argument list was shorter than the command requires.
    #[error("missing command argument")]
    MissingArgument {
        /// Canonical command name.
        command: &'static str,
        /// Zero-based position of the first missing argument.
        index: usize,
        /// Number of arguments the command takes.
        expected: usize,
    },
    /// A size threshold could not be parsed.
    #[error("invalid size threshold")]
    InvalidSize {
        /// Raw threshold text.
        value: String,
        /// Static reason for the failure.
        reason: &'static str,
    },
}

/// Failures reported by an executed command.
///
/// These are recorded as failed results, never propagated as process errors.
#[derive(Debug, Error)]
pub enum CommandFailure {
    /// The named file does not exist.
    #[error("file not found")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The source directory holds no regular files.
    #[error("no files found")]
    NoFilesFound {
        /// Directory that was scanned.
        directory: PathBuf,
    },
    /// The sort criterion is not `name`, `date` or `size`.
    #[error("unknown sort criterion")]
    UnknownCriterion {
        /// Criterion as supplied.
        criterion: String,
    },
    /// The target path exists but is not a directory.
    #[error("not a directory")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// IO failures while interacting with the filesystem.
    #[error("command io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Directory traversal failures.
    #[error("command walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
}

impl CommandFailure {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
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

    /// Short machine-readable label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "file_not_found",
            Self::NoFilesFound { .. } => "no_files_found",
            Self::UnknownCriterion { .. } => "unknown_criterion",
            Self::NotADirectory { .. } => "not_a_directory",
            Self::Io { .. } => "io",
            Self::Walkdir { .. } => "walkdir",
        }
    }
}

//! # Design
//!
//! - Constant error messages; paths and raw values travel as fields.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for runtime persistence.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised while reading or persisting runtime state.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// IO failures while touching the counter file.
    #[error("runtime io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The stored counter was not a decimal integer.
    #[error("run counter is corrupt")]
    CorruptCounter {
        /// Counter file path.
        path: PathBuf,
        /// Raw file contents.
        value: String,
    },
    /// Incrementing the counter would overflow.
    #[error("run counter exhausted")]
    CounterExhausted {
        /// Counter file path.
        path: PathBuf,
    },
}

impl RuntimeError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

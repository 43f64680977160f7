//! Domain models for command results.
//!
//! # Design
//! - An [`Outcome`] is either a success carrying a [`Payload`] or a [`CommandFailure`].
//! - Keep payloads plain data; no IO handles.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CommandFailure;

/// Result of executing one command.
#[derive(Debug)]
pub enum Outcome {
    /// The command's effect completed.
    Success(Payload),
    /// The command did not take effect (or stopped part way) and says why.
    Failure(CommandFailure),
}

impl Outcome {
    /// Whether the command succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Label written into result artifacts.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match self {
            Self::Success(_) => "Success",
            Self::Failure(_) => "Failure",
        }
    }

    /// Success payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    /// Failure detail, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<Result<Payload, CommandFailure>> for Outcome {
    fn from(result: Result<Payload, CommandFailure>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(failure) => Self::Failure(failure),
        }
    }
}

/// Data returned by a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Files moved into the below/above threshold buckets.
    Categorized {
        /// Files moved into `SmallerThanThreshold`.
        smaller: usize,
        /// Files moved into `LargerThanThreshold`.
        larger: usize,
    },
    /// A single file moved between directories.
    Moved {
        /// Original location.
        from: PathBuf,
        /// New location.
        to: PathBuf,
    },
    /// Number of regular files counted.
    Count(usize),
    /// A file was removed.
    Deleted(PathBuf),
    /// A file was renamed in place.
    Renamed {
        /// Previous path.
        from: PathBuf,
        /// New path.
        to: PathBuf,
    },
    /// Entry names, in listing or sort order.
    Entries(Vec<String>),
}

/// Ordering applied by the `Sort` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    /// Case-insensitive file name.
    Name,
    /// Modification time, oldest first.
    Date,
    /// Byte size, smallest first.
    Size,
}

impl SortCriterion {
    /// Lowercase name of the criterion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Size => "size",
        }
    }
}

impl FromStr for SortCriterion {
    type Err = CommandFailure;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "size" => Ok(Self::Size),
            _ => Err(CommandFailure::UnknownCriterion {
                criterion: value.to_string(),
            }),
        }
    }
}

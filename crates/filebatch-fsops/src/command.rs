//! The closed set of script commands and the factory that builds them.

use std::path::PathBuf;

use crate::error::{FsOpsError, FsOpsResult};
use crate::size::parse_size;

/// Names of the recognised command kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Split files into below/above threshold subdirectories.
    Categorize,
    /// Move the newest file to another directory.
    MoveLast,
    /// Count regular files.
    Count,
    /// Delete one file.
    Delete,
    /// Rename one file.
    Rename,
    /// List directory entries.
    List,
    /// Order regular files by a criterion.
    Sort,
}

impl CommandKind {
    /// Resolve a script token. `Mv_last` and `MoveLast` both name [`Self::MoveLast`].
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Categorize" => Some(Self::Categorize),
            "Mv_last" | "MoveLast" => Some(Self::MoveLast),
            "Count" => Some(Self::Count),
            "Delete" => Some(Self::Delete),
            "Rename" => Some(Self::Rename),
            "List" => Some(Self::List),
            "Sort" => Some(Self::Sort),
            _ => None,
        }
    }

    /// Canonical name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categorize => "Categorize",
            Self::MoveLast => "Mv_last",
            Self::Count => "Count",
            Self::Delete => "Delete",
            Self::Rename => "Rename",
            Self::List => "List",
            Self::Sort => "Sort",
        }
    }

    /// Number of positional arguments the command consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Count | Self::List => 1,
            Self::Categorize | Self::MoveLast | Self::Delete | Self::Sort => 2,
            Self::Rename => 3,
        }
    }
}

/// One executable script command.
///
/// Parameters are fixed at construction; [`Command::execute`] runs the command once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move each file in `directory` into `SmallerThanThreshold` or `LargerThanThreshold`.
    Categorize {
        /// Directory whose files are classified.
        directory: PathBuf,
        /// Threshold in bytes; files strictly smaller go to the small bucket.
        threshold: u64,
    },
    /// Move the most recently created file from `source` into `destination`.
    MoveLast {
        /// Directory scanned for the newest file.
        source: PathBuf,
        /// Directory receiving the file.
        destination: PathBuf,
    },
    /// Count regular files in `directory`.
    Count {
        /// Directory to count.
        directory: PathBuf,
    },
    /// Delete `filename` from `directory`.
    Delete {
        /// File name relative to `directory`.
        filename: String,
        /// Directory holding the file.
        directory: PathBuf,
    },
    /// Rename `old_name` to `new_name` within `directory`.
    Rename {
        /// Current file name.
        old_name: String,
        /// Desired file name.
        new_name: String,
        /// Directory holding the file.
        directory: PathBuf,
    },
    /// List every entry of `directory`.
    List {
        /// Directory to list.
        directory: PathBuf,
    },
    /// Order regular files of `directory` by `criterion`.
    Sort {
        /// Directory to sort.
        directory: PathBuf,
        /// Lower-cased criterion; validated when the command runs.
        criterion: String,
    },
}

impl Command {
    /// Build a command from a script token and its positional arguments.
    ///
    /// Extra trailing arguments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::UnknownCommand`] for unrecognised tokens,
    /// [`FsOpsError::MissingArgument`] when too few arguments are supplied, and
    /// [`FsOpsError::InvalidSize`] for a malformed `Categorize` threshold.
    pub fn construct<S: AsRef<str>>(name: &str, args: &[S]) -> FsOpsResult<Self> {
        let kind = CommandKind::from_token(name).ok_or_else(|| FsOpsError::UnknownCommand {
            name: name.to_string(),
        })?;

        let command = match kind {
            CommandKind::Categorize => Self::Categorize {
                directory: PathBuf::from(argument(args, kind, 0)?),
                threshold: parse_size(argument(args, kind, 1)?)?,
            },
            CommandKind::MoveLast => Self::MoveLast {
                source: PathBuf::from(argument(args, kind, 0)?),
                destination: PathBuf::from(argument(args, kind, 1)?),
            },
            CommandKind::Count => Self::Count {
                directory: PathBuf::from(argument(args, kind, 0)?),
            },
            CommandKind::Delete => Self::Delete {
                filename: argument(args, kind, 0)?.to_string(),
                directory: PathBuf::from(argument(args, kind, 1)?),
            },
            CommandKind::Rename => Self::Rename {
                old_name: argument(args, kind, 0)?.to_string(),
                new_name: argument(args, kind, 1)?.to_string(),
                directory: PathBuf::from(argument(args, kind, 2)?),
            },
            CommandKind::List => Self::List {
                directory: PathBuf::from(argument(args, kind, 0)?),
            },
            CommandKind::Sort => Self::Sort {
                directory: PathBuf::from(argument(args, kind, 0)?),
                criterion: argument(args, kind, 1)?.to_lowercase(),
            },
        };
        Ok(command)
    }

    /// Kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Categorize { .. } => CommandKind::Categorize,
            Self::MoveLast { .. } => CommandKind::MoveLast,
            Self::Count { .. } => CommandKind::Count,
            Self::Delete { .. } => CommandKind::Delete,
            Self::Rename { .. } => CommandKind::Rename,
            Self::List { .. } => CommandKind::List,
            Self::Sort { .. } => CommandKind::Sort,
        }
    }
}

fn argument<S: AsRef<str>>(args: &[S], kind: CommandKind, index: usize) -> FsOpsResult<&str> {
    args.get(index)
        .map(AsRef::as_ref)
        .ok_or(FsOpsError::MissingArgument {
            command: kind.as_str(),
            index,
            expected: kind.arity(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_builds_each_kind() -> FsOpsResult<()> {
        let cases: Vec<(&str, Vec<&str>, CommandKind)> = vec![
            ("Categorize", vec!["/data", "1KB"], CommandKind::Categorize),
            ("Mv_last", vec!["/a", "/b"], CommandKind::MoveLast),
            ("MoveLast", vec!["/a", "/b"], CommandKind::MoveLast),
            ("Count", vec!["/data"], CommandKind::Count),
            ("Delete", vec!["x.txt", "/data"], CommandKind::Delete),
            ("Rename", vec!["a", "b", "/data"], CommandKind::Rename),
            ("List", vec!["/data"], CommandKind::List),
            ("Sort", vec!["/data", "Size"], CommandKind::Sort),
        ];
        for (name, args, kind) in cases {
            assert_eq!(Command::construct(name, &args)?.kind(), kind, "{name}");
        }
        Ok(())
    }

    #[test]
    fn construct_parses_threshold_and_lowercases_criterion() -> FsOpsResult<()> {
        let categorize = Command::construct("Categorize", &["/data", "2kb"])?;
        assert_eq!(
            categorize,
            Command::Categorize {
                directory: PathBuf::from("/data"),
                threshold: 2048,
            }
        );

        let sort = Command::construct("Sort", &["/data", "DATE"])?;
        assert_eq!(
            sort,
            Command::Sort {
                directory: PathBuf::from("/data"),
                criterion: "date".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let err = Command::construct("Shred", &["/data"]);
        assert!(matches!(err, Err(FsOpsError::UnknownCommand { name }) if name == "Shred"));
        // Tokens are case-sensitive.
        assert!(Command::construct("count", &["/data"]).is_err());
    }

    #[test]
    fn short_argument_lists_are_construction_errors() {
        let err = Command::construct("Rename", &["a", "b"]);
        assert!(matches!(
            err,
            Err(FsOpsError::MissingArgument {
                command: "Rename",
                index: 2,
                expected: 3,
            })
        ));
        let none: [&str; 0] = [];
        assert!(matches!(
            Command::construct("Count", &none),
            Err(FsOpsError::MissingArgument { index: 0, .. })
        ));
    }

    #[test]
    fn extra_arguments_are_ignored() -> FsOpsResult<()> {
        let command = Command::construct("Count", &["/data", "extra", "more"])?;
        assert_eq!(
            command,
            Command::Count {
                directory: PathBuf::from("/data"),
            }
        );
        Ok(())
    }

    #[test]
    fn bad_threshold_is_a_construction_error() {
        assert!(matches!(
            Command::construct("Categorize", &["/data", "big"]),
            Err(FsOpsError::InvalidSize { .. })
        ));
    }
}

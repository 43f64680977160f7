//! Execution of [`Command`] values against the filesystem.

use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::command::Command;
use crate::error::CommandFailure;
use crate::model::{Outcome, Payload, SortCriterion};

const SMALLER_DIR_NAME: &str = "SmallerThanThreshold";
const LARGER_DIR_NAME: &str = "LargerThanThreshold";

type StepResult<T> = Result<T, CommandFailure>;

/// One entry directly inside a scanned directory.
struct LevelEntry {
    path: PathBuf,
    file_name: OsString,
    /// Display form of `file_name`; never used to build paths.
    name: String,
    metadata: Metadata,
}

impl LevelEntry {
    fn is_file(&self) -> bool {
        self.metadata.is_file()
    }

    fn modified(&self) -> StepResult<SystemTime> {
        self.metadata
            .modified()
            .map_err(|err| CommandFailure::io("metadata.modified", &self.path, err))
    }

    /// Birth time where the platform records it, modification time otherwise.
    fn created(&self) -> StepResult<SystemTime> {
        self.metadata
            .created()
            .or_else(|_| self.metadata.modified())
            .map_err(|err| CommandFailure::io("metadata.created", &self.path, err))
    }
}

impl Command {
    /// Run the command once and report what happened.
    ///
    /// Filesystem problems are returned as [`Outcome::Failure`]; this never panics on IO.
    #[must_use]
    pub fn execute(&self) -> Outcome {
        let result = match self {
            Self::Categorize {
                directory,
                threshold,
            } => categorize(directory, *threshold),
            Self::MoveLast {
                source,
                destination,
            } => move_last(source, destination),
            Self::Count { directory } => count(directory),
            Self::Delete {
                filename,
                directory,
            } => delete(filename, directory),
            Self::Rename {
                old_name,
                new_name,
                directory,
            } => rename(old_name, new_name, directory),
            Self::List { directory } => list(directory),
            Self::Sort {
                directory,
                criterion,
            } => sort(directory, criterion),
        };

        if let Err(failure) = &result {
            warn!(
                command = self.kind().as_str(),
                failure = failure.kind(),
                error = %failure,
                detail = ?failure,
                "command failed"
            );
        }
        Outcome::from(result)
    }
}

fn categorize(directory: &Path, threshold: u64) -> StepResult<Payload> {
    let smaller_dir = directory.join(SMALLER_DIR_NAME);
    let larger_dir = directory.join(LARGER_DIR_NAME);
    for bucket in [&smaller_dir, &larger_dir] {
        fs::create_dir_all(bucket)
            .map_err(|err| CommandFailure::io("categorize.create_bucket", bucket, err))?;
    }

    let (mut smaller, mut larger) = (0_usize, 0_usize);
    for entry in read_level(directory)?.into_iter().filter(LevelEntry::is_file) {
        let size = entry.metadata.len();
        let target_dir = if size < threshold {
            smaller += 1;
            &smaller_dir
        } else {
            larger += 1;
            &larger_dir
        };
        let target = target_dir.join(&entry.file_name);
        move_file(&entry.path, &target)?;
        debug!(
            from = %entry.path.display(),
            to = %target.display(),
            size,
            "categorized file"
        );
    }

    info!(
        directory = %directory.display(),
        threshold,
        smaller,
        larger,
        "files categorized"
    );
    Ok(Payload::Categorized { smaller, larger })
}

fn move_last(source: &Path, destination: &Path) -> StepResult<Payload> {
    let mut newest: Option<(SystemTime, LevelEntry)> = None;
    for entry in read_level(source)?.into_iter().filter(LevelEntry::is_file) {
        let created = entry.created()?;
        if newest.as_ref().is_none_or(|(best, _)| created >= *best) {
            newest = Some((created, entry));
        }
    }
    let Some((_, entry)) = newest else {
        return Err(CommandFailure::NoFilesFound {
            directory: source.to_path_buf(),
        });
    };

    let target = destination.join(&entry.file_name);
    move_file(&entry.path, &target)?;
    info!(from = %entry.path.display(), to = %target.display(), "moved newest file");
    Ok(Payload::Moved {
        from: entry.path,
        to: target,
    })
}

fn count(directory: &Path) -> StepResult<Payload> {
    let total = read_level(directory)?
        .iter()
        .filter(|entry| entry.is_file())
        .count();
    info!(directory = %directory.display(), total, "counted files");
    Ok(Payload::Count(total))
}

fn delete(filename: &str, directory: &Path) -> StepResult<Payload> {
    let target = directory.join(filename);
    if !target.exists() {
        return Err(CommandFailure::FileNotFound { path: target });
    }
    fs::remove_file(&target).map_err(|err| CommandFailure::io("delete.remove", &target, err))?;
    info!(path = %target.display(), "deleted file");
    Ok(Payload::Deleted(target))
}

fn rename(old_name: &str, new_name: &str, directory: &Path) -> StepResult<Payload> {
    let from = directory.join(old_name);
    let to = directory.join(new_name);
    if !from.exists() {
        return Err(CommandFailure::FileNotFound { path: from });
    }
    fs::rename(&from, &to).map_err(|err| CommandFailure::io("rename.rename", &from, err))?;
    info!(from = %from.display(), to = %to.display(), "renamed file");
    Ok(Payload::Renamed { from, to })
}

fn list(directory: &Path) -> StepResult<Payload> {
    let names: Vec<String> = read_level(directory)?
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    info!(directory = %directory.display(), entries = ?names, "listed directory");
    Ok(Payload::Entries(names))
}

fn sort(directory: &Path, criterion: &str) -> StepResult<Payload> {
    let criterion: SortCriterion = criterion.parse()?;
    let mut files: Vec<LevelEntry> = read_level(directory)?
        .into_iter()
        .filter(LevelEntry::is_file)
        .collect();

    match criterion {
        SortCriterion::Name => files.sort_by_cached_key(|entry| entry.name.to_lowercase()),
        SortCriterion::Size => files.sort_by_key(|entry| entry.metadata.len()),
        SortCriterion::Date => {
            let mut keyed = files
                .into_iter()
                .map(|entry| entry.modified().map(|modified| (modified, entry)))
                .collect::<StepResult<Vec<_>>>()?;
            keyed.sort_by_key(|(modified, _)| *modified);
            files = keyed.into_iter().map(|(_, entry)| entry).collect();
        }
    }

    let names: Vec<String> = files.into_iter().map(|entry| entry.name).collect();
    info!(
        directory = %directory.display(),
        criterion = criterion.as_str(),
        files = ?names,
        "sorted files"
    );
    Ok(Payload::Entries(names))
}

/// Entries directly inside `directory`, ordered by file name.
fn read_level(directory: &Path) -> StepResult<Vec<LevelEntry>> {
    let root = fs::metadata(directory)
        .map_err(|err| CommandFailure::io("read_level.stat", directory, err))?;
    if !root.is_dir() {
        return Err(CommandFailure::NotADirectory {
            path: directory.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.map_err(|err| CommandFailure::walkdir("read_level.walk", directory, err))?;
        let path = entry.path().to_path_buf();
        // Follow symlinks so a link to a file counts as a file; a dangling link keeps its own
        // metadata and is listed but never treated as a regular file.
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => entry
                .metadata()
                .map_err(|err| CommandFailure::walkdir("read_level.lstat", &path, err))?,
            Err(err) => return Err(CommandFailure::io("read_level.stat", &path, err)),
        };
        let file_name = entry.file_name().to_os_string();
        entries.push(LevelEntry {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            path,
            metadata,
        });
    }
    Ok(entries)
}

/// Rename `source` onto `target`, replacing it; copy and remove when a rename is not possible.
fn move_file(source: &Path, target: &Path) -> StepResult<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(rename_err) if rename_err.kind() == io::ErrorKind::NotFound => Err(
            CommandFailure::io("move_file.rename", source, rename_err),
        ),
        Err(rename_err) => {
            debug!(
                error = %rename_err,
                from = %source.display(),
                "rename failed; falling back to copy"
            );
            fs::copy(source, target)
                .map_err(|err| CommandFailure::io("move_file.copy", target, err))?;
            fs::remove_file(source)
                .map_err(|err| CommandFailure::io("move_file.cleanup", source, err))
        }
    }
}

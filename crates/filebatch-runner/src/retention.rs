//! Oldest-first eviction of result artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filebatch_telemetry::LogHandle;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{RunnerError, RunnerResult};

/// What a single [`RetentionManager::enforce`] call did to one directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Directory that was enforced.
    pub directory: PathBuf,
    /// Regular files present before eviction.
    pub scanned: usize,
    /// Files left in place.
    pub retained: usize,
    /// Files removed, oldest last.
    pub evicted: Vec<PathBuf>,
    /// Files selected for removal that could not be deleted.
    pub failed: Vec<PathBuf>,
}

/// Caps the number of regular files in a bucket directory.
#[derive(Clone, Debug)]
pub struct RetentionManager {
    log: LogHandle,
}

impl RetentionManager {
    /// Manager emitting its events through `log`.
    #[must_use]
    pub const fn new(log: LogHandle) -> Self {
        Self { log }
    }

    /// Keep the `max_files` most recently modified regular files of `directory` and delete the
    /// rest. Subdirectories are neither counted nor touched.
    ///
    /// A file that cannot be deleted is logged and reported in [`RetentionReport::failed`]; the
    /// remaining excess files are still removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be listed or a file cannot be inspected.
    pub fn enforce(&self, directory: &Path, max_files: usize) -> RunnerResult<RetentionReport> {
        self.log.in_scope(|| enforce_in(directory, max_files))
    }
}

fn enforce_in(directory: &Path, max_files: usize) -> RunnerResult<RetentionReport> {
    let files = list_files(directory)?;
    Ok(evict(directory, files, max_files))
}

/// Delete every listed file past the `max_files` newest. Never fails as a whole.
fn evict(
    directory: &Path,
    mut files: Vec<(SystemTime, PathBuf)>,
    max_files: usize,
) -> RetentionReport {
    // Newest first; equal timestamps keep the later name.
    files.sort_by(|(left_time, left_path), (right_time, right_path)| {
        right_time
            .cmp(left_time)
            .then_with(|| right_path.cmp(left_path))
    });

    let scanned = files.len();
    let mut report = RetentionReport {
        directory: directory.to_path_buf(),
        scanned,
        retained: scanned.min(max_files),
        ..RetentionReport::default()
    };

    for (_, path) in files.into_iter().skip(max_files) {
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "evicted artifact");
                report.evicted.push(path);
            }
            Err(err) => {
                warn!(
                    error = %err,
                    path = %path.display(),
                    "failed to evict artifact"
                );
                report.failed.push(path);
            }
        }
    }

    if !report.evicted.is_empty() || !report.failed.is_empty() {
        info!(
            directory = %directory.display(),
            scanned,
            max_files,
            evicted = report.evicted.len(),
            failed = report.failed.len(),
            "retention enforced"
        );
    }
    report
}

fn list_files(directory: &Path) -> RunnerResult<Vec<(SystemTime, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| RunnerError::walkdir("retention.list", directory, err))?;
        let metadata = entry
            .metadata()
            .map_err(|err| RunnerError::walkdir("retention.stat", entry.path(), err))?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .map_err(|err| RunnerError::io("retention.modified", entry.path(), err))?;
        files.push((modified, entry.into_path()));
    }
    Ok(files)
}

//! Result artifacts: one file per run id and outcome class, appended per command.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use filebatch_config::OutputFormat;
use filebatch_fsops::Outcome;

use crate::error::{RunnerError, RunnerResult};

const PASSED_DIR_NAME: &str = "Passed";
const FAILED_DIR_NAME: &str = "Failed";

/// Outcome class of a recorded command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStatus {
    /// The command succeeded.
    Pass,
    /// The command reported a failure.
    Fail,
}

impl RecordStatus {
    /// Classify an executed command.
    #[must_use]
    pub const fn from_outcome(outcome: &Outcome) -> Self {
        if outcome.is_success() {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// Value written into the artifact.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Success",
            Self::Fail => "Failure",
        }
    }

    const fn artifact_prefix(self) -> &'static str {
        match self {
            Self::Pass => "PASSED",
            Self::Fail => "FAILED",
        }
    }
}

/// One line of a result artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRecord {
    /// Run that executed the command.
    pub run_id: u64,
    /// Command token as written in the script.
    pub command: String,
    /// Outcome class.
    pub status: RecordStatus,
}

/// Where pass and fail artifacts live for a given output root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketLayout {
    passed: PathBuf,
    failed: PathBuf,
}

impl BucketLayout {
    /// `Passed`/`Failed` under `root`, or `root` itself for both when `same_dir` is set.
    #[must_use]
    pub fn new(root: &Path, same_dir: bool) -> Self {
        if same_dir {
            Self {
                passed: root.to_path_buf(),
                failed: root.to_path_buf(),
            }
        } else {
            Self {
                passed: root.join(PASSED_DIR_NAME),
                failed: root.join(FAILED_DIR_NAME),
            }
        }
    }

    /// Bucket directory for `status`.
    #[must_use]
    pub fn directory(&self, status: RecordStatus) -> &Path {
        match status {
            RecordStatus::Pass => &self.passed,
            RecordStatus::Fail => &self.failed,
        }
    }

    /// Each bucket directory once, even when pass and fail share it.
    #[must_use]
    pub fn distinct_directories(&self) -> Vec<&Path> {
        if self.passed == self.failed {
            vec![self.passed.as_path()]
        } else {
            vec![self.passed.as_path(), self.failed.as_path()]
        }
    }

    /// Create every bucket directory.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory cannot be created.
    pub fn ensure(&self) -> RunnerResult<()> {
        for directory in self.distinct_directories() {
            fs::create_dir_all(directory)
                .map_err(|source| RunnerError::io("buckets.create", directory, source))?;
        }
        Ok(())
    }
}

/// Appends [`RunRecord`]s to the artifact matching their status.
///
/// Each append opens, writes, and flushes the artifact before returning, so an interrupted run
/// keeps every record written so far.
#[derive(Clone, Debug)]
pub struct ResultSink {
    layout: BucketLayout,
    format: OutputFormat,
    run_id: u64,
}

impl ResultSink {
    /// Sink writing `format` artifacts for `run_id` into `layout`.
    #[must_use]
    pub const fn new(layout: BucketLayout, format: OutputFormat, run_id: u64) -> Self {
        Self {
            layout,
            format,
            run_id,
        }
    }

    /// Artifact path for `status` in this run, e.g. `Passed/PASSED7.csv`.
    #[must_use]
    pub fn artifact_path(&self, status: RecordStatus) -> PathBuf {
        self.layout.directory(status).join(format!(
            "{}{}.{}",
            status.artifact_prefix(),
            self.run_id,
            self.format.extension()
        ))
    }

    /// Append `record` and return the artifact it went to.
    ///
    /// # Errors
    ///
    /// Returns an error when the artifact cannot be opened or written.
    pub fn append(&self, record: &RunRecord) -> RunnerResult<PathBuf> {
        let path = self.artifact_path(record.status);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RunnerError::io("sink.open", &path, source))?;

        match self.format {
            OutputFormat::Csv => append_csv(file, &path, record)?,
            OutputFormat::Log => append_log(file, &path, record)?,
        }
        Ok(path)
    }
}

fn append_csv(file: File, path: &Path, record: &RunRecord) -> RunnerResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);
    writer
        .write_record([record.command.as_str(), record.status.label()])
        .map_err(|source| RunnerError::csv("sink.write_csv", path, source))?;
    writer
        .flush()
        .map_err(|source| RunnerError::io("sink.flush_csv", path, source))
}

fn append_log(mut file: File, path: &Path, record: &RunRecord) -> RunnerResult<()> {
    writeln!(file, "{}: {}", record.command, record.status.label())
        .map_err(|source| RunnerError::io("sink.write_log", path, source))?;
    file.flush()
        .map_err(|source| RunnerError::io("sink.flush_log", path, source))
}

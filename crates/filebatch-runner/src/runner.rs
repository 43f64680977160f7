//! The execution loop.
//!
//! # Design
//!
//! - One script line is one command; a line that fails to construct is skipped and never counted.
//! - Every executed command produces exactly one record, written before the next line is read.
//! - Retention runs once per bucket directory after the loop, never per command.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use filebatch_config::{OutputFormat, RunnerConfig};
use filebatch_fsops::Command;
use filebatch_telemetry::LogHandle;
use tracing::{debug, info, info_span, warn};

use crate::error::{RunnerError, RunnerResult};
use crate::retention::RetentionManager;
use crate::sink::{BucketLayout, RecordStatus, ResultSink, RunRecord};

/// Parameters of one batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunPlan {
    /// Identifier issued by the run counter.
    pub run_id: u64,
    /// Root directory for result artifacts.
    pub output_root: PathBuf,
    /// Cap on executed commands.
    pub max_commands: usize,
    /// Cap on files kept per bucket directory.
    pub max_retained: usize,
    /// Share one directory between pass and fail artifacts.
    pub same_dir: bool,
    /// Artifact serialization.
    pub format: OutputFormat,
}

impl RunPlan {
    /// Plan for `run_id` using the limits and layout from `config`.
    #[must_use]
    pub fn from_config(config: &RunnerConfig, run_id: u64) -> Self {
        Self {
            run_id,
            output_root: config.output_directory.clone(),
            max_commands: config.max_commands,
            max_retained: config.max_log_files,
            same_dir: config.same_dir,
            format: config.output,
        }
    }

    fn layout(&self) -> BucketLayout {
        BucketLayout::new(&self.output_root, self.same_dir)
    }
}

/// Counters reported after a batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifier of the run.
    pub run_id: u64,
    /// Commands constructed and executed.
    pub executed: usize,
    /// Executed commands that succeeded.
    pub passed: usize,
    /// Executed commands that failed.
    pub failed: usize,
    /// Non-blank lines that did not construct a command.
    pub skipped: usize,
    /// Artifacts removed by retention.
    pub evicted: usize,
    /// Whether the command cap ended the run before the script did.
    pub stopped_early: bool,
}

/// Runs a script of commands and records their outcomes.
#[derive(Clone, Debug)]
pub struct BatchRunner {
    plan: RunPlan,
    log: LogHandle,
}

impl BatchRunner {
    /// Runner for `plan` emitting events through `log`.
    #[must_use]
    pub const fn new(plan: RunPlan, log: LogHandle) -> Self {
        Self { plan, log }
    }

    /// Parameters this runner was built with.
    #[must_use]
    pub const fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Execute `script` line by line, then apply retention to every bucket directory.
    ///
    /// Command failures are recorded and never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error when the bucket directories cannot be created, the script cannot be
    /// read, a record cannot be written, or a bucket cannot be listed for retention.
    pub fn run(&self, script: &Path) -> RunnerResult<RunSummary> {
        self.log.in_scope(|| {
            let span = info_span!("batch_run", run_id = self.plan.run_id);
            let _guard = span.enter();
            self.run_script(script)
        })
    }

    fn run_script(&self, script: &Path) -> RunnerResult<RunSummary> {
        let layout = self.plan.layout();
        layout.ensure()?;
        let sink = ResultSink::new(layout.clone(), self.plan.format, self.plan.run_id);

        let file = File::open(script).map_err(|err| RunnerError::io("script.open", script, err))?;
        info!(
            script = %script.display(),
            output_root = %self.plan.output_root.display(),
            max_commands = self.plan.max_commands,
            "batch run started"
        );

        let mut summary = RunSummary {
            run_id: self.plan.run_id,
            ..RunSummary::default()
        };
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|err| RunnerError::io("script.read", script, err))?;
            if line.trim().is_empty() {
                continue;
            }
            if summary.executed >= self.plan.max_commands {
                summary.stopped_early = true;
                debug!(line = index + 1, "command limit reached");
                break;
            }
            self.run_line(&sink, index + 1, &line, &mut summary)?;
        }

        let retention = RetentionManager::new(self.log.clone());
        for directory in layout.distinct_directories() {
            let report = retention.enforce(directory, self.plan.max_retained)?;
            summary.evicted += report.evicted.len();
        }

        info!(
            executed = summary.executed,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            evicted = summary.evicted,
            stopped_early = summary.stopped_early,
            "batch run finished"
        );
        Ok(summary)
    }

    fn run_line(
        &self,
        sink: &ResultSink,
        line_number: usize,
        line: &str,
        summary: &mut RunSummary,
    ) -> RunnerResult<()> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        let command = match Command::construct(name, &args) {
            Ok(command) => command,
            Err(err) => {
                warn!(
                    line = line_number,
                    command = name,
                    error = %err,
                    "skipping script line"
                );
                summary.skipped += 1;
                return Ok(());
            }
        };

        let outcome = command.execute();
        let status = RecordStatus::from_outcome(&outcome);
        let artifact = sink.append(&RunRecord {
            run_id: self.plan.run_id,
            command: name.to_string(),
            status,
        })?;

        summary.executed += 1;
        match status {
            RecordStatus::Pass => summary.passed += 1,
            RecordStatus::Fail => summary.failed += 1,
        }
        debug!(
            line = line_number,
            command = name,
            status = status.label(),
            artifact = %artifact.display(),
            "command recorded"
        );
        Ok(())
    }
}

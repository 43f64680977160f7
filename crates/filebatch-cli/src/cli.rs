//! Argument parsing and wiring for the `filebatch` binary.

use std::path::PathBuf;

use clap::Parser;
use filebatch_config::{ConfigError, DEFAULT_CONFIG_FILE, load_config};
use filebatch_runner::{BatchRunner, RunPlan, RunSummary};
use filebatch_runtime::{DEFAULT_COUNTER_FILE, RunCounterStore};
use filebatch_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LogHandle, LoggingConfig, build_log_handle, build_sha,
};
use tracing::info;

const DEFAULT_LOG_FILE: &str = "CommandDebugger.log";

/// Parses CLI arguments, runs the batch, and prints a one-line summary.
/// Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    match run_with(&cli) {
        Ok(summary) => {
            println!("{}", render_summary(&summary));
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "filebatch",
    about = "Run a script of file-management commands and record the outcomes"
)]
struct Cli {
    /// Script to execute, one command per line.
    #[arg(short = 'f', long = "file")]
    script: PathBuf,
    /// Overrides `Output_directory` from the configuration.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    #[arg(
        short = 'c',
        long = "config",
        env = "FILEBATCH_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,
    /// File holding the last issued run id.
    #[arg(long, env = "FILEBATCH_COUNTER", default_value = DEFAULT_COUNTER_FILE)]
    counter: PathBuf,
    #[arg(long = "log-file", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
    /// Log to stderr instead of the log file.
    #[arg(long = "no-log-file")]
    no_log_file: bool,
    /// `pretty` or `json`; defaults to pretty in debug builds.
    #[arg(long = "log-format")]
    log_format: Option<LogFormat>,
    #[arg(long = "log-level", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

fn run_with(cli: &Cli) -> CliResult<RunSummary> {
    let log = build_logger(cli)?;

    let mut config = load_config(&cli.config).map_err(|err| config_error(cli, &err))?;
    if let Some(output) = &cli.output {
        config = config.with_output_directory(output);
    }

    let counter = RunCounterStore::new(&cli.counter);
    let run_id = counter.next().map_err(|err| {
        CliError::failure(
            anyhow::Error::new(err)
                .context(format!("failed to issue run id from {}", cli.counter.display())),
        )
    })?;
    let settings = serde_json::to_string(&config)
        .unwrap_or_else(|err| format!("{{\"unencodable\": \"{err}\"}}"));
    log.in_scope(|| {
        info!(
            run_id,
            build_sha = build_sha(),
            config = %cli.config.display(),
            settings = %settings,
            "run id issued"
        );
    });

    let runner = BatchRunner::new(RunPlan::from_config(&config, run_id), log);
    runner.run(&cli.script).map_err(|err| {
        let operation = err.operation();
        CliError::failure(anyhow::Error::new(err).context(format!(
            "batch run {run_id} aborted during {operation} ({})",
            cli.script.display()
        )))
    })
}

fn build_logger(cli: &Cli) -> CliResult<LogHandle> {
    let log_file = (!cli.no_log_file).then_some(cli.log_file.as_path());
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: build_sha(),
        log_file,
    };
    build_log_handle(&config).map_err(|err| {
        CliError::failure(anyhow::Error::new(err).context("failed to initialise logging"))
    })
}

fn config_error(cli: &Cli, err: &ConfigError) -> CliError {
    let path = cli.config.display();
    let detail = match err {
        ConfigError::MissingField { field } => format!("missing required field {field}"),
        ConfigError::InvalidField {
            field,
            value,
            reason,
        } => value.as_ref().map_or_else(
            || format!("field {field} is invalid ({reason})"),
            |value| format!("field {field} has invalid value {value:?} ({reason})"),
        ),
        ConfigError::InvalidDocument { .. } => "document must be a JSON object".to_string(),
        ConfigError::Json { source, .. } => format!("invalid JSON: {source}"),
        ConfigError::Io { source, .. } => format!("cannot read file: {source}"),
    };
    CliError::validation(format!("configuration {path}: {detail}"))
}

fn render_summary(summary: &RunSummary) -> String {
    let mut line = format!(
        "run {}: executed {} (passed {}, failed {}), skipped {}, evicted {}",
        summary.run_id,
        summary.executed,
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.evicted
    );
    if summary.stopped_early {
        line.push_str(", command limit reached");
    }
    line
}

#[derive(Debug)]
enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

type CliResult<T> = Result<T, CliError>;

impl CliError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use filebatch_test_support::{temp_dir, write_file};
    use std::fs;
    use std::path::Path;

    fn cli_for(root: &Path, extra: &[&str]) -> Result<Cli> {
        let script = root.join("script.txt");
        let config = root.join("configuration.json");
        let counter = root.join("counter.txt");
        let log_file = root.join("CommandDebugger.log");
        let mut args = vec![
            "filebatch".to_string(),
            "-f".to_string(),
            script.display().to_string(),
            "-c".to_string(),
            config.display().to_string(),
            "--counter".to_string(),
            counter.display().to_string(),
            "--log-file".to_string(),
            log_file.display().to_string(),
            "--log-format".to_string(),
            "json".to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        Ok(Cli::try_parse_from(args)?)
    }

    #[test]
    fn parses_defaults() -> Result<()> {
        let cli = Cli::try_parse_from(["filebatch", "--file", "script.txt"])?;
        assert_eq!(cli.script, PathBuf::from("script.txt"));
        assert_eq!(cli.counter, PathBuf::from(DEFAULT_COUNTER_FILE));
        assert_eq!(cli.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(cli.log_level, DEFAULT_LOG_LEVEL);
        assert!(cli.output.is_none());
        assert!(cli.log_format.is_none());
        assert!(!cli.no_log_file);
        Ok(())
    }

    #[test]
    fn script_flag_is_required() {
        assert!(Cli::try_parse_from(["filebatch"]).is_err());
        assert!(Cli::try_parse_from(["filebatch", "-f", "s.txt", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn run_with_executes_script_and_issues_run_ids() -> Result<()> {
        let temp = temp_dir("filebatch-cli-")?;
        let root = temp.path();
        let work = root.join("work");
        write_file(&work, "a.txt", b"a")?;
        write_file(
            root,
            "configuration.json",
            br#"{"Max_log_files": 3, "Output_directory": "results"}"#,
        )?;
        write_file(
            root,
            "script.txt",
            format!("Count {dir}\nDelete ghost.txt {dir}\n", dir = work.display()).as_bytes(),
        )?;
        let cli = cli_for(root, &[])?;

        let first = match run_with(&cli) {
            Ok(summary) => summary,
            Err(err) => bail!("run failed: {}", err.display_message()),
        };
        assert_eq!(first.run_id, 1);
        assert_eq!((first.passed, first.failed), (1, 1));
        assert_eq!(
            fs::read_to_string(root.join("results").join("Passed").join("PASSED1.csv"))?,
            "Count,Success\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("results").join("Failed").join("FAILED1.csv"))?,
            "Delete,Failure\n"
        );

        let Ok(second) = run_with(&cli) else {
            bail!("second run failed");
        };
        assert_eq!(second.run_id, 2);
        assert_eq!(fs::read_to_string(root.join("counter.txt"))?.trim(), "2");
        let log = fs::read_to_string(root.join("CommandDebugger.log"))?;
        assert!(log.contains("batch run finished"));
        assert!(log.contains("max_log_files"));
        Ok(())
    }

    #[test]
    fn output_flag_overrides_configured_directory() -> Result<()> {
        let temp = temp_dir("filebatch-cli-")?;
        let root = temp.path();
        write_file(
            root,
            "configuration.json",
            br#"{"Max_log_files": 3, "Output_directory": "results", "Same_dir": true}"#,
        )?;
        write_file(root, "script.txt", format!("List {}\n", root.display()).as_bytes())?;
        let elsewhere = root.join("elsewhere");
        let cli = cli_for(root, &["-o", &elsewhere.display().to_string()])?;

        let Ok(summary) = run_with(&cli) else {
            bail!("run failed");
        };
        assert_eq!(summary.executed, 1);
        assert!(elsewhere.join("PASSED1.csv").is_file());
        assert!(!root.join("results").exists());
        Ok(())
    }

    #[test]
    fn invalid_configuration_is_a_validation_error() -> Result<()> {
        let temp = temp_dir("filebatch-cli-")?;
        let root = temp.path();
        write_file(root, "configuration.json", br#"{"Output_directory": "results"}"#)?;
        write_file(root, "script.txt", b"")?;
        let cli = cli_for(root, &[])?;

        let Err(err) = run_with(&cli) else {
            bail!("expected a configuration error");
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("Max_log_files"));
        assert!(!root.join("counter.txt").exists());
        Ok(())
    }

    #[test]
    fn missing_script_is_a_failure() -> Result<()> {
        let temp = temp_dir("filebatch-cli-")?;
        let root = temp.path();
        write_file(
            root,
            "configuration.json",
            br#"{"Max_log_files": 3, "Output_directory": "results"}"#,
        )?;
        let cli = cli_for(root, &[])?;

        let Err(err) = run_with(&cli) else {
            bail!("expected the run to abort");
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("script.open"));
        assert_eq!(fs::read_to_string(root.join("counter.txt"))?.trim(), "1");
        Ok(())
    }

    #[test]
    fn summary_mentions_command_limit() {
        let summary = RunSummary {
            run_id: 4,
            executed: 2,
            passed: 2,
            stopped_early: true,
            ..RunSummary::default()
        };
        assert_eq!(
            render_summary(&summary),
            "run 4: executed 2 (passed 2, failed 0), skipped 0, evicted 0, command limit reached"
        );
    }
}

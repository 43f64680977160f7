//! Typed runner settings.
//!
//! # Design
//! - Pure data carriers; parsing lives in `validate.rs` and file IO in `loader.rs`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::defaults::{
    DEFAULT_MAX_COMMANDS, KEY_MAX_COMMANDS, KEY_MAX_LOG_FILES, KEY_OUTPUT, KEY_OUTPUT_DIRECTORY,
    KEY_SAME_DIR,
};
use crate::error::{ConfigError, ConfigResult};
use crate::validate::{parse_count, parse_flag, parse_output_format, parse_path};

/// Serialization used for result artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Two-column rows: command name and `Success`/`Failure`.
    #[default]
    Csv,
    /// One `<command>: Success|Failure` line per command.
    Log,
}

impl OutputFormat {
    /// Render the format as its lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Log => "log",
        }
    }

    /// File extension used for artifacts in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> ConfigResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "log" => Ok(Self::Log),
            _ => Err(ConfigError::invalid(KEY_OUTPUT, value, "unsupported_format")),
        }
    }
}

/// Settings consumed by the batch runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerConfig {
    /// Cap on commands executed in one run.
    pub max_commands: usize,
    /// Retention cap applied to each bucket directory.
    pub max_log_files: usize,
    /// Share one directory between pass and fail artifacts.
    pub same_dir: bool,
    /// Result artifact serialization.
    pub output: OutputFormat,
    /// Root directory for result artifacts.
    pub output_directory: PathBuf,
}

impl RunnerConfig {
    /// Build settings from a parsed JSON object.
    ///
    /// A relative `Output_directory` is resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when a required key is missing or a value has the wrong shape.
    pub fn from_document(document: &Map<String, Value>, base_dir: &Path) -> ConfigResult<Self> {
        let max_commands = parse_count(document, KEY_MAX_COMMANDS)?.unwrap_or(DEFAULT_MAX_COMMANDS);
        let max_log_files =
            parse_count(document, KEY_MAX_LOG_FILES)?.ok_or(ConfigError::MissingField {
                field: KEY_MAX_LOG_FILES,
            })?;
        let same_dir = parse_flag(document, KEY_SAME_DIR)?.unwrap_or(false);
        let output = parse_output_format(document, KEY_OUTPUT)?.unwrap_or_default();
        let output_directory =
            parse_path(document, KEY_OUTPUT_DIRECTORY)?.ok_or(ConfigError::MissingField {
                field: KEY_OUTPUT_DIRECTORY,
            })?;

        Ok(Self {
            max_commands,
            max_log_files,
            same_dir,
            output,
            output_directory: resolve_against(base_dir, output_directory),
        })
    }

    /// Replace the output root, e.g. from a command-line override.
    #[must_use]
    pub fn with_output_directory(mut self, output_directory: impl Into<PathBuf>) -> Self {
        self.output_directory = output_directory.into();
        self
    }
}

fn resolve_against(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

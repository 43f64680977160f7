//! Configuration file loading.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::RunnerConfig;

/// File name looked up when no configuration path is supplied.
pub const DEFAULT_CONFIG_FILE: &str = "configuration.json";

/// Read and validate the runner configuration at `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not a JSON object, or fails validation.
pub fn load_config(path: &Path) -> ConfigResult<RunnerConfig> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "load_config.read",
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(fields) = document else {
        return Err(ConfigError::InvalidDocument {
            path: path.to_path_buf(),
        });
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let config = RunnerConfig::from_document(&fields, base_dir)?;
    debug!(
        path = %path.display(),
        max_commands = config.max_commands,
        max_log_files = config.max_log_files,
        same_dir = config.same_dir,
        output = config.output.as_str(),
        output_directory = %config.output_directory.display(),
        "loaded runner configuration"
    );
    Ok(config)
}

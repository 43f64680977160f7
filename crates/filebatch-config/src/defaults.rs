//! Configuration key names and default values.
//!
//! # Design
//! - Keys keep the capitalised spelling used by existing `configuration.json` files.

/// Cap on commands executed per run when `Max_commands` is absent.
pub const DEFAULT_MAX_COMMANDS: usize = 5;

pub(crate) const KEY_MAX_COMMANDS: &str = "Max_commands";
pub(crate) const KEY_MAX_LOG_FILES: &str = "Max_log_files";
pub(crate) const KEY_SAME_DIR: &str = "Same_dir";
pub(crate) const KEY_OUTPUT: &str = "Output";
pub(crate) const KEY_OUTPUT_DIRECTORY: &str = "Output_directory";

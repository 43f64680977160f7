#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! JSON-file configuration for the batch runner.
//!
//! Layout: `model.rs` (typed runner settings), `validate.rs` (field parsing helpers),
//! `loader.rs` (file loading), `defaults.rs` (key names and default values).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use defaults::DEFAULT_MAX_COMMANDS;
pub use error::{ConfigError, ConfigResult};
pub use loader::{DEFAULT_CONFIG_FILE, load_config};
pub use model::{OutputFormat, RunnerConfig};

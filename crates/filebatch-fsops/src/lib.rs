//! File-management commands executed by the batch runner.
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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

pub mod command;
pub mod error;
pub mod model;
mod service;
pub mod size;

pub use command::{Command, CommandKind};
pub use error::{CommandFailure, FsOpsError, FsOpsResult};
pub use model::{Outcome, Payload, SortCriterion};
pub use size::parse_size;

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
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! Persistence for runtime state that outlives a single batch run.

mod counter;
pub mod error;

pub use counter::{DEFAULT_COUNTER_FILE, RunCounterStore};
pub use error::{RuntimeError, RuntimeResult};

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

//! Batch execution engine: runs script commands, records results, and bounds artifact growth.
//!
//! Layout: `runner.rs` (execution loop), `sink.rs` (result artifacts), `retention.rs`
//! (oldest-first eviction), `error.rs` (infrastructure errors).

pub mod error;
pub mod retention;
pub mod runner;
pub mod sink;

pub use error::{RunnerError, RunnerResult};
pub use retention::{RetentionManager, RetentionReport};
pub use runner::{BatchRunner, RunPlan, RunSummary};
pub use sink::{BucketLayout, RecordStatus, ResultSink, RunRecord};

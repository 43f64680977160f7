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
#![allow(clippy::redundant_pub_crate)]

//! Command-line entry point for the batch runner.
//!
//! Layout:
//! - `cli.rs`: argument parsing, wiring, and exit codes
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;

pub use cli::run;

//! Core engine for pkgcount.
//!
//! This crate provides the pieces that count how often each Go package is
//! imported across a source tree:
//! - Scanning import declarations from Go files
//! - Walking a project tree while pruning vendored and tool directories
//! - A generic fan-out/fan-in group for per-file work with first-error cancellation
//! - Concurrent tallies and the count/filter/sort pipeline
//! - Locating the project's module name from `go.mod`

mod cancel;
mod constants;
mod error;
mod group;
mod module;
mod pipeline;
mod scanner;
mod tally;
mod types;
mod walker;

// Re-export public API
pub use cancel::CancellationToken;
pub use constants::{SKIP_DIRS, SOURCE_EXTENSION};
pub use error::{Error, Result};
pub use group::{GroupError, ResultGroup};
pub use module::{find_module_name, parse_module_directive};
pub use pipeline::{CountOptions, count_packages};
pub use scanner::ImportScanner;
pub use tally::Tally;
pub use types::{CountRange, CountResult, Origin, PackageCount, PackageReport};
pub use walker::{WalkerConfig, source_files};

//! Package import counting for Go projects.
//!
//! This crate ties the `pkgcount_core` engine to a command-line
//! configuration and renders the resulting counts as a boxed terminal
//! table, plain markdown, or JSON.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use clap::Parser;
//! use pkgcount_core::CancellationToken;
//! use pkgcount_import_counts::{Config, run_package_count, write_report};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["pkgcount", "-d", "/path/to/project", "--gte", "2"]);
//!
//! let result = run_package_count(&cfg, &CancellationToken::new())?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! write_report(&mut stdout, &result.report, cfg.output_format())?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod reporter;

// Re-export public API
pub use checker::{CheckResult, run_package_count};
pub use config::{Config, OutputFormat};
pub use reporter::{write_json, write_markdown, write_report, write_table};

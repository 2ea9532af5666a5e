use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use regex::Regex;
use std::path::PathBuf;

use pkgcount_core::{CountRange, Error};

#[derive(Debug, Clone, Parser)]
#[command(name = "pkgcount")]
#[command(about = "Count internal and external package imports in a Go codebase")]
pub struct Config {
    /// Directory or file to scan
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub dir: PathBuf,

    /// Skip files whose path matches this regular expression
    #[arg(long)]
    pub exclude: Option<String>,

    /// Only show packages imported at least this many times
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub gte: i64,

    /// Only show packages imported at most this many times
    #[arg(long, allow_negative_numbers = true)]
    pub lte: Option<i64>,

    /// Emit plain markdown instead of a rendered table
    #[arg(short = 'u', long)]
    pub unrendered: bool,

    /// Emit JSON instead of a rendered table
    #[arg(long, conflicts_with = "unrendered")]
    pub json: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Module name used to tell internal imports apart (defaults to the go.mod module)
    #[arg(long)]
    pub module: Option<String>,

    /// Also skip files ignored by .gitignore
    #[arg(long)]
    pub gitignore: bool,

    /// Number of worker threads (defaults to available parallelism)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Markdown,
    Json,
}

impl Config {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.unrendered {
            OutputFormat::Markdown
        } else {
            OutputFormat::Table
        }
    }

    /// Validated count range from `--gte`/`--lte`.
    pub fn count_range(&self) -> Result<CountRange> {
        CountRange::new(self.gte, self.lte).context("args failed validation")
    }

    /// Compiled `--exclude` pattern, if any.
    pub fn exclude_pattern(&self) -> Result<Option<Regex>> {
        let Some(pattern) = &self.exclude else {
            return Ok(None);
        };
        debug!("Compiling exclude pattern: {}", pattern);
        let re = Regex::new(pattern)
            .map_err(|source| Error::InvalidExclude { pattern: pattern.clone(), source })
            .context("args failed validation")?;
        Ok(Some(re))
    }
}

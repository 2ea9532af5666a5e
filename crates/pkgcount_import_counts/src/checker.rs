use anyhow::{Context, Result};
use log::{debug, info, warn};

use pkgcount_core::{CancellationToken, CountOptions, PackageReport, count_packages, find_module_name};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub report: PackageReport,
    pub module_name: String,
    pub files_analyzed: usize,
}

/// Validates `cfg`, resolves the module name and counts package imports.
///
/// Arguments are validated before any file-system work starts.
pub fn run_package_count(cfg: &Config, token: &CancellationToken) -> Result<CheckResult> {
    info!("Starting package count");

    let range = cfg.count_range()?;
    let exclude = cfg.exclude_pattern()?;
    debug!("Count range: [{}, {}], exclude: {:?}", range.gte(), range.lte(), cfg.exclude);

    let module_name = match &cfg.module {
        Some(name) => {
            debug!("Using provided module name: {}", name);
            name.clone()
        }
        None => find_module_name(&cfg.dir).context("failed to get module name")?,
    };
    info!("Using module name: {}", module_name);

    let opts = CountOptions {
        root: cfg.dir.clone(),
        module_name: module_name.clone(),
        exclude,
        range,
        respect_gitignore: cfg.gitignore,
    };
    let result = count_packages(&opts, token).context("failed to count packages")?;

    info!("Package count complete. Analyzed {} files", result.files_scanned);
    if result.report.is_empty() {
        warn!("No packages matched the count range [{}, {}]", range.gte(), range.lte());
    }
    Ok(CheckResult { report: result.report, module_name, files_analyzed: result.files_scanned })
}

use log::{debug, info, trace, warn};
use regex::Regex;
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    cancel::CancellationToken,
    error::{Error, Result},
    group::{GroupError, ResultGroup},
    scanner::ImportScanner,
    tally::Tally,
    types::{CountRange, CountResult, Origin, PackageCount, PackageReport},
    walker::{WalkerConfig, source_files},
};

#[derive(Debug, Clone)]
pub struct CountOptions {
    pub root: PathBuf,
    pub module_name: String,
    pub exclude: Option<Regex>,
    pub range: CountRange,
    pub respect_gitignore: bool,
}

/// Shared accumulator for one run.
#[derive(Debug, Default)]
struct Tallies {
    internal: Tally,
    external: Tally,
    files: AtomicUsize,
}

/// Counts internal and external package imports under `opts.root`.
///
/// Any file that cannot be read fails the whole run; no partial report is
/// returned.
pub fn count_packages(opts: &CountOptions, parent: &CancellationToken) -> Result<CountResult> {
    info!("Counting package imports under {}", opts.root.display());
    let scanner = Arc::new(ImportScanner::new()?);
    let module_name: Arc<str> = Arc::from(opts.module_name.as_str());

    let (mut group, token) = ResultGroup::<Tallies, Error>::new(parent, Tallies::default());

    let walker_cfg = WalkerConfig {
        root: opts.root.clone(),
        exclude: opts.exclude.clone(),
        respect_gitignore: opts.respect_gitignore,
    };

    for res in source_files(&walker_cfg) {
        if token.is_cancelled() {
            debug!("Cancelled, stopping walk after {} files", group.scheduled());
            break;
        }
        let path = match res {
            Ok(path) => path,
            Err(e) => {
                warn!("Walk failed, cancelling outstanding work: {}", e);
                group.cancel();
                // Drain before reporting so no worker outlives the run
                let _ = group.wait();
                return Err(e);
            }
        };

        trace!("Scheduling: {}", path.display());
        let scanner = Arc::clone(&scanner);
        let module_name = Arc::clone(&module_name);
        group.go(move |tallies: &Tallies, _token| {
            let imports = scanner.extract_imports(&path)?;
            for pkg in &imports {
                match Origin::of(pkg, &module_name) {
                    Origin::Internal => tallies.internal.increment(pkg),
                    Origin::External => tallies.external.increment(pkg),
                }
            }
            tallies.files.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });
    }
    debug!("Scheduled {} files", group.scheduled());

    let tallies = group.wait().map_err(|e| match e {
        GroupError::Failed(e) => Error::Aggregation(Box::new(e)),
        GroupError::Cancelled => Error::Cancelled,
        GroupError::Detached => Error::Internal("tallies still shared after join".to_string()),
    })?;
    // An interrupt before any file was scheduled leaves nothing to join
    if parent.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let files_scanned = tallies.files.load(Ordering::Relaxed);
    debug!(
        "Tallied {} internal and {} external packages ({} occurrences) from {} files",
        tallies.internal.len(),
        tallies.external.len(),
        tallies.internal.total() + tallies.external.total(),
        files_scanned
    );

    let report = PackageReport {
        internal: select(tallies.internal.snapshot(), opts.range),
        external: select(tallies.external.snapshot(), opts.range),
    };
    info!(
        "Reporting {} internal and {} external packages",
        report.internal.len(),
        report.external.len()
    );

    Ok(CountResult { report, files_scanned })
}

/// Keeps the counts inside `range`, most imported first.
fn select(counts: HashMap<String, u64>, range: CountRange) -> Vec<PackageCount> {
    let mut selected: Vec<PackageCount> = counts
        .into_iter()
        .filter(|(_, count)| range.contains(*count))
        .map(|(package, count)| PackageCount { package, count })
        .collect();
    selected.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.package.cmp(&b.package)));
    selected
}

use ignore::WalkBuilder;
use log::{debug, trace};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::{
    constants::{SKIP_DIRS, SOURCE_EXTENSION},
    error::Result,
};

#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub root: PathBuf,
    /// Matched against the full path; matching files are skipped
    pub exclude: Option<Regex>,
    /// Also honor `.gitignore` and `.ignore` files
    pub respect_gitignore: bool,
}

/// Lazily yields the Go source files under `cfg.root`.
///
/// Directories in [`SKIP_DIRS`] are pruned without being entered. An
/// unreadable directory surfaces as an `Err` item.
pub fn source_files(cfg: &WalkerConfig) -> impl Iterator<Item = Result<PathBuf>> + use<> {
    debug!("Walking directory tree from root: {}", cfg.root.display());
    let walker = WalkBuilder::new(&cfg.root)
        .standard_filters(false)
        .git_ignore(cfg.respect_gitignore)
        .ignore(cfg.respect_gitignore)
        .require_git(false)
        .filter_entry(|dent| {
            let is_dir = dent.file_type().is_some_and(|ft| ft.is_dir());
            let skip = is_dir
                && dent.file_name().to_str().is_some_and(|name| SKIP_DIRS.contains(&name));
            if skip {
                trace!("Pruning directory: {}", dent.path().display());
            }
            !skip
        })
        .build();

    let exclude = cfg.exclude.clone();
    walker.filter_map(move |res| {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => return Some(Err(e.into())),
        };
        if dent.file_type().is_none_or(|ft| ft.is_dir()) {
            return None;
        }
        let p = dent.path();
        if !has_source_extension(p) {
            return None;
        }
        if let Some(re) = &exclude
            && re.is_match(&p.to_string_lossy())
        {
            trace!("Excluded by pattern: {}", p.display());
            return None;
        }
        Some(Ok(dent.into_path()))
    })
}

fn has_source_extension(p: &Path) -> bool {
    p.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

use serde::Serialize;

use crate::error::{Error, Result};

/// A package import path and how many times it was imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageCount {
    pub package: String,
    pub count: u64,
}

/// Filtered and sorted package counts, split by origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    pub internal: Vec<PackageCount>,
    pub external: Vec<PackageCount>,
}

impl PackageReport {
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CountResult {
    pub report: PackageReport,
    pub files_scanned: usize,
}

/// Whether an import belongs to the scanned module or comes from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Internal,
    External,
}

impl Origin {
    /// Classifies by substring containment, so `example.com/foo-extra`
    /// counts as internal to module `example.com/foo`.
    pub fn of(package: &str, module_name: &str) -> Self {
        if package.contains(module_name) { Origin::Internal } else { Origin::External }
    }
}

/// Inclusive `[gte, lte]` bound on occurrence counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    gte: u64,
    lte: u64,
}

impl CountRange {
    /// Validates raw user input. `lte = None` leaves the range open above.
    pub fn new(gte: i64, lte: Option<i64>) -> Result<Self> {
        if gte < 0 {
            return Err(Error::InvalidRange(format!(
                "gte must be greater than or equal to 0, got {gte}"
            )));
        }
        let upper = match lte {
            Some(l) if l < 0 => {
                return Err(Error::InvalidRange(format!(
                    "lte must be greater than or equal to 0, got {l}"
                )));
            }
            Some(l) if l < gte => {
                return Err(Error::InvalidRange(format!(
                    "lte ({l}) must be greater than or equal to gte ({gte})"
                )));
            }
            Some(l) => l as u64,
            None => u64::MAX,
        };
        Ok(CountRange { gte: gte as u64, lte: upper })
    }

    pub fn unbounded() -> Self {
        CountRange { gte: 0, lte: u64::MAX }
    }

    pub fn contains(&self, count: u64) -> bool {
        count >= self.gte && count <= self.lte
    }

    pub fn gte(&self) -> u64 {
        self.gte
    }

    pub fn lte(&self) -> u64 {
        self.lte
    }
}

impl Default for CountRange {
    fn default() -> Self {
        CountRange::unbounded()
    }
}

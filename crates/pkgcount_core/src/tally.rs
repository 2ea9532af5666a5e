use dashmap::DashMap;
use log::trace;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

/// Concurrent occurrence counter keyed by import path.
///
/// Increments of an existing key only take a shard read guard and bump the
/// key's atomic; the shard write guard is taken for first insertion alone.
#[derive(Debug, Default)]
pub struct Tally {
    counts: DashMap<String, AtomicU64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, package: &str) {
        if let Some(counter) = self.counts.get(package) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        trace!("First occurrence of package: '{}'", package);
        self.counts.entry(package.to_string()).or_default().fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    ///
    /// Only meaningful once writers have been joined; counts taken while
    /// increments are in flight may be behind.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    /// Number of distinct packages seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all occurrences.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|entry| entry.value().load(Ordering::Relaxed)).sum()
    }
}

//! Per-run memo of resolved supervisors.
//!
//! One cache belongs to one run over one snapshot. Entries are written once
//! and never invalidated. Runs over different snapshots each own their own
//! cache, so nothing is shared between them.
//!
//! # Concurrency
//!
//! Each key maps to a `OnceLock` cell. The first caller for a key computes
//! the value; concurrent callers for the same key block on the cell and
//! receive the finished value. Different keys proceed in parallel.
//!
//! The shard lock is released before computing, so a computation may
//! resolve other keys. Resolution only ever moves to higher levels, which
//! rules out waiting on a cell that is waiting on us.

use dashmap::DashMap;
use orgchain_hierarchy::UnitKey;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

type Cell = Arc<OnceLock<Option<String>>>;

/// Memo table keyed by `(level, unit id)`.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    cells: DashMap<UnitKey, Cell>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it with `resolve` if
    /// nobody has yet.
    pub fn get_or_resolve(
        &self,
        key: &UnitKey,
        resolve: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        let cell = self.cell(key);

        let mut computed = false;
        let value = cell
            .get_or_init(|| {
                computed = true;
                resolve()
            })
            .clone();

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// The resolved value for `key`, if resolution has completed.
    ///
    /// The outer `Option` is "resolved yet?", the inner one the value.
    pub fn get(&self, key: &UnitKey) -> Option<Option<String>> {
        self.cells.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn cell(&self, key: &UnitKey) -> Cell {
        if let Some(cell) = self.cells.get(key) {
            return Arc::clone(cell.value());
        }
        Arc::clone(self.cells.entry(key.clone()).or_default().value())
    }
}

/// Cache counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups served from a finished entry
    pub hits: usize,
    /// Lookups that computed the entry
    pub misses: usize,
}

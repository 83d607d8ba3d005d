//! State owned by one resolution run.

use crate::cache::{CacheStats, ResolutionCache};
use crate::trace::{Trace, TraceEvent, TraceLog};
use orgchain_hierarchy::{HierarchyIndex, UnitKey};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One pass over one snapshot: the index being read, the cache being
/// filled, and optional diagnostics.
///
/// A run is never reused for a different snapshot. Start a new one.
#[derive(Debug)]
pub struct ResolutionRun<'a> {
    index: &'a HierarchyIndex,
    cache: ResolutionCache,
    trace: Option<TraceLog>,
    max_depth: AtomicUsize,
}

impl<'a> ResolutionRun<'a> {
    pub fn new(index: &'a HierarchyIndex) -> Self {
        Self {
            index,
            cache: ResolutionCache::new(),
            trace: None,
            max_depth: AtomicUsize::new(0),
        }
    }

    /// Record a diagnostic trace for every computed unit.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(TraceLog::new());
        self
    }

    pub fn index(&self) -> &'a HierarchyIndex {
        self.index
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Serve `key` from the cache, computing it on first use.
    pub fn cached(
        &self,
        key: &UnitKey,
        compute: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        self.cache.get_or_resolve(key, compute)
    }

    /// Note that a computation is running `depth` frames deep.
    pub fn enter(&self, depth: usize) {
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    /// Deepest computation seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth.load(Ordering::Relaxed)
    }

    /// Record a trace event. `event` is only built when tracing is on.
    pub fn record(&self, key: &UnitKey, event: impl FnOnce() -> TraceEvent) {
        if let Some(trace) = &self.trace {
            trace.record(key, event());
        }
    }

    pub fn trace(&self) -> Option<Trace> {
        self.trace.as_ref().map(TraceLog::snapshot)
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            cache: self.cache.stats(),
            resolved_units: self.cache.len(),
            max_depth: self.max_depth(),
        }
    }
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub cache: CacheStats,
    pub resolved_units: usize,
    pub max_depth: usize,
}

//! Resolution runs: one strategy, one snapshot, one cache.

use crate::assembly::{Resolution, RunReport};
use crate::config::RunConfig;
use crate::run::{ResolutionRun, RunStats};
use crate::strategy::{walk_all, Mode, ResolutionStrategy, Strategy};
use crate::trace::Trace;
use orgchain_hierarchy::{HierarchyIndex, Level, UnitKey};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Resolves units of one snapshot with one strategy.
///
/// Every resolver owns a fresh cache, so resolvers over different snapshots
/// (or different modes over the same snapshot) never see each other's
/// results.
#[derive(Debug)]
pub struct Resolver<'a> {
    run: ResolutionRun<'a>,
    strategy: Strategy,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a HierarchyIndex, mode: Mode) -> Self {
        Self {
            run: ResolutionRun::new(index),
            strategy: mode.strategy(),
        }
    }

    /// Record a diagnostic trace while resolving.
    pub fn with_trace(mut self) -> Self {
        self.run = self.run.with_trace();
        self
    }

    pub fn mode(&self) -> Mode {
        self.strategy.mode()
    }

    pub fn run(&self) -> &ResolutionRun<'a> {
        &self.run
    }

    /// Supervisor of `(level, id)`. Cached after the first call.
    pub fn resolve(&self, level: Level, id: &str) -> Option<String> {
        self.resolve_key(&UnitKey::new(level, id))
    }

    pub fn resolve_key(&self, key: &UnitKey) -> Option<String> {
        self.strategy.resolve(&self.run, key)
    }

    /// Resolve every unit in the snapshot, one after another.
    pub fn resolve_all(self) -> Resolution {
        let entries: Vec<_> = self
            .run
            .index()
            .units()
            .map(|key| {
                let supervisor = self.resolve_key(&key);
                (key, supervisor)
            })
            .collect();
        self.finish(entries)
    }

    /// Resolve every unit on the rayon pool, sharing this resolver's cache.
    pub fn resolve_all_parallel(self) -> Resolution {
        let keys: Vec<UnitKey> = self.run.index().units().collect();
        let entries: Vec<_> = keys
            .into_par_iter()
            .map(|key| {
                let supervisor = self.resolve_key(&key);
                (key, supervisor)
            })
            .collect();
        self.finish(entries)
    }

    pub fn stats(&self) -> RunStats {
        self.run.stats()
    }

    pub fn trace(&self) -> Option<Trace> {
        self.run.trace()
    }

    fn finish(self, entries: Vec<(UnitKey, Option<String>)>) -> Resolution {
        Resolution::assemble(
            self.mode(),
            self.run.index().snapshot(),
            entries,
            self.stats(),
            self.trace(),
        )
    }
}

/// Run every mode `config` selects over `index` and compare the results
/// when more than one ran.
pub fn execute(index: &HierarchyIndex, config: &RunConfig) -> RunReport {
    let snapshot = index.snapshot();
    info!(
        snapshot = %snapshot.short(),
        employees = index.len(),
        parallel = config.parallel,
        "Starting resolution"
    );

    let resolutions: Vec<Resolution> = config
        .modes()
        .into_iter()
        .map(|mode| {
            let started = Instant::now();
            let mut resolver = Resolver::new(index, mode);
            if config.trace {
                resolver = resolver.with_trace();
            }
            let mut resolution = if config.parallel {
                resolver.resolve_all_parallel()
            } else {
                resolver.resolve_all()
            };
            if config.employees {
                resolution.paths = Some(resolution.path_report(index));
            }
            info!(
                mode = %mode,
                units = resolution.len(),
                hits = resolution.stats.cache.hits,
                misses = resolution.stats.cache.misses,
                max_depth = resolution.stats.max_depth,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Resolution finished"
            );
            resolution
        })
        .collect();

    let consistency = match resolutions.as_slice() {
        [left, right] => {
            let report = left.compare(right);
            if !report.is_consistent() {
                warn!(
                    agreed = report.agreed,
                    diverged = report.divergences.len(),
                    "{} and {} disagree",
                    report.left,
                    report.right
                );
                for d in &report.divergences {
                    debug!(unit = %d.unit, left = ?d.left, right = ?d.right, "divergence");
                }
            }
            Some(report)
        }
        _ => None,
    };

    let employees = config.employees.then(|| {
        let chains = walk_all(index);
        debug!(chains = chains.len(), "Walked employee chains");
        chains
    });

    RunReport {
        snapshot,
        resolutions,
        consistency,
        employees,
    }
}

//! Orgchain Supervisor Resolution
//!
//! Attributes one supervisor to every unit at every level of an
//! organization, given only a flat list of employees and their direct
//! managers.
//!
//! # Modes
//!
//! - [`Mode::Promotion`]: majority vote inside the unit, then defer to the
//!   voted supervisor's own unit one level up. Placeholder levels are
//!   skipped. At most one frame per level.
//! - [`Mode::ChainWalk`]: every member walks their own manager chain to the
//!   first manager outside their unit; the unit takes the majority answer.
//!   Cycles fall back to self.
//!
//! Both produce the same shape, `(level, unit id) -> supervisor`, and can run
//! side by side over one snapshot for comparison.
//!
//! # Runs
//!
//! A [`ResolutionRun`] binds one snapshot to one cache. Runs never share
//! state, so concurrent runs over different snapshots cannot see each
//! other's results. Within a run each unit is computed once, including when
//! units are resolved in parallel.
//!
//! ```no_run
//! use orgchain_resolve::{execute, JsonFileSource, RunConfig, load_snapshot};
//!
//! let index = load_snapshot(&JsonFileSource::new("employees.json"))?;
//! let report = execute(&index, &RunConfig::from_env()?);
//! for resolution in &report.resolutions {
//!     println!("{}: {} units", resolution.mode, resolution.len());
//! }
//! # Ok::<(), orgchain_resolve::Error>(())
//! ```

mod assembly;
mod cache;
mod config;
mod error;
mod resolver;
mod run;
mod sink;
mod source;
mod strategy;
mod trace;

pub use assembly::{
    ConsistencyReport, Divergence, LevelAssignments, PathReport, Resolution, RunReport,
};
pub use cache::{CacheStats, ResolutionCache};
pub use config::{ModeSelection, RunConfig};
pub use error::{Error, Result};
pub use resolver::{execute, Resolver};
pub use run::{ResolutionRun, RunStats};
pub use sink::{JsonSink, MemorySink, ResultSink};
pub use source::{load_snapshot, parse_records, validate, JsonFileSource, MemorySource, RecordSource};
pub use strategy::{
    walk_all, walk_chain, ChainWalk, EmployeeChain, LevelPromotion, Mode, ResolutionStrategy,
    Strategy, WalkOutcome,
};
pub use trace::{Trace, TraceEvent, TraceLog};

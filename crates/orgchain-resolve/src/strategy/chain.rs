//! Chain walking: ask each member's personal manager chain.
//!
//! For one employee, the supervisor at a level is the first manager up
//! their chain whose id at that level differs from the employee's own.
//! All four levels are answered by a single walk.
//!
//! Every level starts out as the employee themselves. A walk only replaces
//! that when it finds a manager outside the employee's unit. It stops when:
//!
//! - every level has been answered,
//! - the chain runs out (no manager, or a manager nobody knows), or
//! - an identity repeats, meaning the references form a cycle.
//!
//! A visited set bounds every walk by the number of employees.
//!
//! A unit's supervisor is the majority answer among members whose walk
//! found someone, first member order on ties. Members who fell back to
//! themselves do not vote. When nobody's walk found anyone, the first
//! member's self fallback stands for the unit.

use super::{Mode, ResolutionStrategy};
use crate::run::ResolutionRun;
use crate::trace::TraceEvent;
use orgchain_consensus::Tally;
use orgchain_hierarchy::{Employee, HierarchyIndex, Level, LevelMap, UnitKey};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// How a walk ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalkOutcome {
    /// Every level found a manager outside the employee's unit
    Complete,
    /// The last manager reached has no manager of their own
    TopReached,
    /// A manager reference names nobody in the snapshot
    Dangling { manager: String },
    /// The chain returned to an identity already visited
    Cycle { at: String },
}

/// Result of walking one employee's manager chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeChain {
    pub user_id: String,
    /// Supervisor per level; the employee's own id where none was found
    pub supervisors: LevelMap<String>,
    /// Managers visited, nearest first
    pub chain: Vec<String>,
    pub outcome: WalkOutcome,
}

impl EmployeeChain {
    /// Whether `level` fell back to the employee themselves.
    pub fn is_self(&self, level: Level) -> bool {
        self.supervisors[level] == self.user_id
    }
}

/// Walk `employee`'s manager chain through `index`.
pub fn walk_chain(index: &HierarchyIndex, employee: &Employee) -> EmployeeChain {
    let own = employee.user_id.as_str();
    let mut supervisors = LevelMap::from_fn(|_| own.to_string());
    let mut found = LevelMap::from_fn(|_| false);
    let mut visited = HashSet::from([own]);
    let mut chain = Vec::new();

    let mut next = employee.supervisor();
    let outcome = loop {
        let Some(id) = next else {
            break WalkOutcome::TopReached;
        };
        let Some(manager) = index.by_identity(id) else {
            break WalkOutcome::Dangling {
                manager: id.to_string(),
            };
        };
        if !visited.insert(id) {
            break WalkOutcome::Cycle { at: id.to_string() };
        }
        chain.push(id.to_string());

        for level in Level::ALL {
            if !found[level] && manager.unit_id(level) != employee.unit_id(level) {
                supervisors[level] = id.to_string();
                found[level] = true;
            }
        }
        if found.iter().all(|(_, done)| *done) {
            break WalkOutcome::Complete;
        }
        next = manager.supervisor();
    };

    if let WalkOutcome::Cycle { at } = &outcome {
        debug!(user = own, at = %at, "manager cycle, unresolved levels fall back to self");
    }

    EmployeeChain {
        user_id: own.to_string(),
        supervisors,
        chain,
        outcome,
    }
}

/// Walk every employee's chain: the four-level supervisor report per
/// employee, in ingestion order.
pub fn walk_all(index: &HierarchyIndex) -> Vec<EmployeeChain> {
    index
        .employees()
        .par_iter()
        .map(|employee| walk_chain(index, employee))
        .collect()
}

/// Direct-manager chain walking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainWalk;

impl ResolutionStrategy for ChainWalk {
    fn mode(&self) -> Mode {
        Mode::ChainWalk
    }

    fn resolve(&self, run: &ResolutionRun<'_>, key: &UnitKey) -> Option<String> {
        run.cached(key, || self.compute(run, key))
    }
}

impl ChainWalk {
    fn compute(&self, run: &ResolutionRun<'_>, key: &UnitKey) -> Option<String> {
        run.enter(1);
        let index = run.index();
        let members = index.members(key);
        if members.is_empty() {
            trace!(unit = %key, "no members");
            run.record(key, || TraceEvent::NoMembers);
            return None;
        }

        let walks: Vec<EmployeeChain> = members.iter().map(|m| walk_chain(index, m)).collect();
        if run.is_tracing() {
            for walk in &walks {
                run.record(key, || TraceEvent::Walked {
                    user_id: walk.user_id.clone(),
                    chain: walk.chain.clone(),
                    outcome: walk.outcome.clone(),
                });
            }
        }

        // Members who fell back to themselves abstain.
        let tally: Tally = walks
            .iter()
            .filter(|w| !w.is_self(key.level))
            .map(|w| w.supervisors[key.level].as_str())
            .collect();
        match tally.winner() {
            Some(winner) => Some(winner.candidate.to_string()),
            None => {
                debug!(unit = %key, "no member's chain leaves the unit, first member stands");
                walks.first().map(|w| w.user_id.clone())
            }
        }
    }
}

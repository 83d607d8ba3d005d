//! Level promotion: majority vote, then defer upward.
//!
//! # Algorithm
//!
//! ```text
//! resolve(level, id):
//!   cached?                      -> cached value
//!   no members                   -> none
//!   level collapsed for unit     -> resolve(level+1, same id)
//!   nobody cites a manager       -> none
//!   head = voted supervisor, moved up their own chain while still
//!          inside this unit
//!   head unknown                 -> head as-is
//!   head distinct at level       -> resolve(level+1, head's level+1 id)
//!   otherwise                    -> head
//! ```
//!
//! Every recursive step moves strictly up one level, so a resolution is at
//! most [`Level::COUNT`] frames deep and cannot cycle.

use super::{Mode, ResolutionStrategy};
use crate::run::ResolutionRun;
use crate::trace::TraceEvent;
use orgchain_consensus::majority_supervisor;
use orgchain_hierarchy::{classify, HierarchyIndex, Level, LevelPresence, UnitKey};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Majority vote with level promotion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPromotion;

impl ResolutionStrategy for LevelPromotion {
    fn mode(&self) -> Mode {
        Mode::Promotion
    }

    fn resolve(&self, run: &ResolutionRun<'_>, key: &UnitKey) -> Option<String> {
        self.resolve_at(run, key, 1)
    }
}

impl LevelPromotion {
    fn resolve_at(&self, run: &ResolutionRun<'_>, key: &UnitKey, depth: usize) -> Option<String> {
        run.cached(key, || self.compute(run, key, depth))
    }

    fn compute(&self, run: &ResolutionRun<'_>, key: &UnitKey, depth: usize) -> Option<String> {
        debug_assert!(depth <= Level::COUNT, "promotion deeper than the level count");
        run.enter(depth);

        let index = run.index();
        let members = index.members(key);
        if members.is_empty() {
            trace!(unit = %key, "no members");
            run.record(key, || TraceEvent::NoMembers);
            return None;
        }

        if let (LevelPresence::Collapsed, Some(parent)) =
            (classify(key.level, &members), key.level.parent())
        {
            // Collapsed means every member's parent id equals this unit's id.
            let target = UnitKey::new(parent, key.id.as_str());
            debug!(unit = %key, parent = %target, "level collapsed into parent");
            run.record(key, || TraceEvent::Collapsed {
                parent: target.clone(),
            });
            return self.resolve_at(run, &target, depth + 1);
        }

        let Some(vote) = majority_supervisor(members.iter()) else {
            trace!(unit = %key, "no member cites a manager");
            run.record(key, || TraceEvent::NoSupervisor);
            return None;
        };
        run.record(key, || TraceEvent::Voted {
            supervisor: vote.candidate.to_string(),
            votes: vote.votes,
            members: members.len(),
        });

        let head = first_outside(index, key, vote.candidate);
        if head != vote.candidate {
            debug!(unit = %key, from = vote.candidate, to = head, "supervisor is a member, escalated");
            run.record(key, || TraceEvent::Escalated {
                from: vote.candidate.to_string(),
                to: head.to_string(),
            });
        }

        let Some(record) = index.by_identity(head) else {
            debug!(unit = %key, supervisor = head, "dangling supervisor reference");
            run.record(key, || TraceEvent::Dangling {
                supervisor: head.to_string(),
            });
            return Some(head.to_string());
        };

        match key.level.parent() {
            Some(parent) if !record.collapses_at(key.level) => {
                let target = record.unit(parent);
                trace!(unit = %key, to = %target, "promoting to supervisor's parent unit");
                run.record(key, || TraceEvent::Promoted { to: target.clone() });
                self.resolve_at(run, &target, depth + 1)
            }
            _ => Some(head.to_string()),
        }
    }
}

/// Follow `voted`'s own manager chain while it stays inside `key`'s unit.
///
/// Returns the first identity that is not a member of the unit, the top of
/// the chain when it never leaves, or `voted` itself when the chain loops
/// back inside the unit.
fn first_outside<'i>(index: &'i HierarchyIndex, key: &UnitKey, voted: &'i str) -> &'i str {
    let mut current = voted;
    let mut visited = HashSet::from([voted]);
    loop {
        let Some(record) = index.by_identity(current) else {
            return current;
        };
        if record.unit_id(key.level) != key.id {
            return current;
        }
        let Some(next) = record.supervisor() else {
            return current;
        };
        if !visited.insert(next) {
            debug!(unit = %key, at = next, "manager cycle inside unit");
            return voted;
        }
        current = next;
    }
}

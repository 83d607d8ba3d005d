//! Diagnostic trace of what each unit's resolution consulted.
//!
//! Tracing is opt-in per run. When enabled, every computed unit records the
//! steps it took: the vote, skipped levels, escalations, and for chain
//! walking the full manager chain of every member.

use crate::strategy::WalkOutcome;
use dashmap::DashMap;
use orgchain_hierarchy::UnitKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// One step taken while resolving a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Nobody belongs to the unit
    NoMembers,
    /// The level is a placeholder; resolution moved to the parent unit
    Collapsed { parent: UnitKey },
    /// No member cites a manager
    NoSupervisor,
    /// Majority vote result
    Voted {
        supervisor: String,
        votes: usize,
        members: usize,
    },
    /// The voted supervisor belongs to the unit; moved up their chain
    Escalated { from: String, to: String },
    /// The supervisor is not a known employee
    Dangling { supervisor: String },
    /// The supervisor's own unit one level up was resolved instead
    Promoted { to: UnitKey },
    /// One member's manager chain
    Walked {
        user_id: String,
        chain: Vec<String>,
        outcome: WalkOutcome,
    },
}

/// Events recorded during a run, per unit.
#[derive(Debug, Default)]
pub struct TraceLog {
    events: DashMap<UnitKey, Vec<TraceEvent>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: &UnitKey, event: TraceEvent) {
        match self.events.get_mut(key) {
            Some(mut events) => events.push(event),
            None => self.events.entry(key.clone()).or_default().push(event),
        }
    }

    /// Events recorded for `key`, in order.
    pub fn events(&self, key: &UnitKey) -> Vec<TraceEvent> {
        self.events
            .get(key)
            .map(|events| events.value().clone())
            .unwrap_or_default()
    }

    /// Snapshot of the whole log, keyed by `level:id`.
    pub fn snapshot(&self) -> Trace {
        Trace(
            self.events
                .iter()
                .map(|entry| (entry.key().to_string(), entry.value().clone()))
                .collect(),
        )
    }
}

/// A finished trace, ordered by unit for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace(pub BTreeMap<String, Vec<TraceEvent>>);

impl Trace {
    pub fn get(&self, key: &UnitKey) -> Option<&[TraceEvent]> {
        self.0.get(&key.to_string()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

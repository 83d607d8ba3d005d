//! Resolution strategies.
//!
//! Two ways of attributing a supervisor to a unit, both producing
//! `unit -> supervisor`:
//!
//! - [`LevelPromotion`]: vote inside the unit, then defer to the
//!   supervisor's own unit one level up.
//! - [`ChainWalk`]: walk every member's personal manager chain to the first
//!   manager outside their unit, then vote over the members' answers.
//!
//! They encode different assumptions about how an organization records
//! authority, and can be run side by side over the same snapshot.

mod chain;
mod promotion;

pub use chain::{walk_all, walk_chain, ChainWalk, EmployeeChain, WalkOutcome};
pub use promotion::LevelPromotion;

use crate::run::ResolutionRun;
use orgchain_hierarchy::UnitKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Majority vote with level promotion
    Promotion,
    /// Direct-manager chain walking
    ChainWalk,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Promotion, Mode::ChainWalk];

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Promotion => "promotion",
            Mode::ChainWalk => "chain_walk",
        }
    }

    /// The strategy implementing this mode.
    pub fn strategy(self) -> Strategy {
        match self {
            Mode::Promotion => Strategy::Promotion(LevelPromotion),
            Mode::ChainWalk => Strategy::ChainWalk(ChainWalk),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "promotion" | "vote" | "a" => Ok(Mode::Promotion),
            "chain" | "chain_walk" | "chain-walk" | "b" => Ok(Mode::ChainWalk),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// A way of resolving one unit's supervisor within a run.
///
/// Implementations go through the run's cache, so asking twice for the
/// same unit computes once.
pub trait ResolutionStrategy: Send + Sync {
    fn mode(&self) -> Mode;

    /// Supervisor of `key`, or `None` when none can be determined.
    fn resolve(&self, run: &ResolutionRun<'_>, key: &UnitKey) -> Option<String>;
}

/// Closed set of strategies, selected by [`Mode`].
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    Promotion(LevelPromotion),
    ChainWalk(ChainWalk),
}

impl ResolutionStrategy for Strategy {
    fn mode(&self) -> Mode {
        match self {
            Strategy::Promotion(s) => s.mode(),
            Strategy::ChainWalk(s) => s.mode(),
        }
    }

    fn resolve(&self, run: &ResolutionRun<'_>, key: &UnitKey) -> Option<String> {
        match self {
            Strategy::Promotion(s) => s.resolve(run, key),
            Strategy::ChainWalk(s) => s.resolve(run, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!("promotion".parse::<Mode>(), Ok(Mode::Promotion));
        assert_eq!("Chain".parse::<Mode>(), Ok(Mode::ChainWalk));
        assert_eq!("chain-walk".parse::<Mode>(), Ok(Mode::ChainWalk));
        assert!("sideways".parse::<Mode>().is_err());
    }

    #[test]
    fn strategy_reports_its_mode() {
        for mode in Mode::ALL {
            assert_eq!(mode.strategy().mode(), mode);
        }
    }
}

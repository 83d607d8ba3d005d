//! Run configuration.
//!
//! Read from `ORGCHAIN_*` environment variables with defaults for anything
//! unset. Unlike unset values, malformed values are an error.

use crate::error::{Error, Result};
use crate::strategy::Mode;
use std::str::FromStr;
use std::time::Duration;

/// Which strategies a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    Single(Mode),
    /// Both strategies over the same snapshot, compared afterwards
    Both,
}

impl ModeSelection {
    pub fn modes(self) -> Vec<Mode> {
        match self {
            ModeSelection::Single(mode) => vec![mode],
            ModeSelection::Both => Mode::ALL.to_vec(),
        }
    }
}

impl FromStr for ModeSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "all" => Ok(ModeSelection::Both),
            other => other.parse().map(ModeSelection::Single),
        }
    }
}

/// Configuration for a resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Strategies to run
    pub modes: ModeSelection,

    /// Resolve units on the rayon pool
    pub parallel: bool,

    /// Record a per-unit diagnostic trace
    pub trace: bool,

    /// Report per-employee chains and per-path supervisors
    pub employees: bool,

    /// Wall-clock budget for the whole run, enforced by the caller
    pub budget: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            modes: ModeSelection::Both,
            parallel: false,
            trace: false,
            employees: false,
            budget: None,
        }
    }
}

impl RunConfig {
    /// Create config from environment variables with defaults.
    ///
    /// - `ORGCHAIN_MODE`: `promotion`, `chain` or `both`
    /// - `ORGCHAIN_PARALLEL`: boolean
    /// - `ORGCHAIN_TRACE`: boolean
    /// - `ORGCHAIN_EMPLOYEES`: boolean
    /// - `ORGCHAIN_BUDGET_MS`: milliseconds, `0` for none
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("ORGCHAIN_MODE") {
            config.modes = value.parse().map_err(|_| Error::InvalidConfig {
                key: "ORGCHAIN_MODE",
                value,
            })?;
        }
        if let Some(value) = lookup("ORGCHAIN_PARALLEL") {
            config.parallel = parse_flag("ORGCHAIN_PARALLEL", value)?;
        }
        if let Some(value) = lookup("ORGCHAIN_TRACE") {
            config.trace = parse_flag("ORGCHAIN_TRACE", value)?;
        }
        if let Some(value) = lookup("ORGCHAIN_EMPLOYEES") {
            config.employees = parse_flag("ORGCHAIN_EMPLOYEES", value)?;
        }
        if let Some(value) = lookup("ORGCHAIN_BUDGET_MS") {
            let millis: u64 = value.trim().parse().map_err(|_| Error::InvalidConfig {
                key: "ORGCHAIN_BUDGET_MS",
                value: value.clone(),
            })?;
            config.budget = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn with_modes(mut self, modes: ModeSelection) -> Self {
        self.modes = modes;
        self
    }

    pub fn modes(&self) -> Vec<Mode> {
        self.modes.modes()
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::InvalidConfig { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = RunConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.modes(), [Mode::Promotion, Mode::ChainWalk]);
    }

    #[test]
    fn reads_every_key() {
        let config = RunConfig::from_lookup(lookup(&[
            ("ORGCHAIN_MODE", "chain"),
            ("ORGCHAIN_PARALLEL", "true"),
            ("ORGCHAIN_TRACE", "1"),
            ("ORGCHAIN_EMPLOYEES", "yes"),
            ("ORGCHAIN_BUDGET_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.modes, ModeSelection::Single(Mode::ChainWalk));
        assert!(config.parallel);
        assert!(config.trace);
        assert!(config.employees);
        assert_eq!(config.budget, Some(Duration::from_millis(250)));
    }

    #[test]
    fn employee_report_is_off_unless_asked() {
        assert!(!RunConfig::default().employees);
        let config = RunConfig::from_lookup(lookup(&[("ORGCHAIN_EMPLOYEES", "off")])).unwrap();
        assert!(!config.employees);
        let err = RunConfig::from_lookup(lookup(&[("ORGCHAIN_EMPLOYEES", "all")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "ORGCHAIN_EMPLOYEES", .. }));
    }

    #[test]
    fn zero_budget_means_none() {
        let config = RunConfig::from_lookup(lookup(&[("ORGCHAIN_BUDGET_MS", "0")])).unwrap();
        assert_eq!(config.budget, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = RunConfig::from_lookup(lookup(&[("ORGCHAIN_MODE", "sideways")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "ORGCHAIN_MODE", .. }));

        let err = RunConfig::from_lookup(lookup(&[("ORGCHAIN_TRACE", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "ORGCHAIN_TRACE", .. }));

        let err = RunConfig::from_lookup(lookup(&[("ORGCHAIN_BUDGET_MS", "-5")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "ORGCHAIN_BUDGET_MS", .. }));
    }

    #[test]
    fn mode_selection_parsing() {
        assert_eq!("BOTH".parse::<ModeSelection>(), Ok(ModeSelection::Both));
        assert_eq!("a".parse::<ModeSelection>(), Ok(ModeSelection::Single(Mode::Promotion)));
        assert!("x".parse::<ModeSelection>().is_err());
    }
}

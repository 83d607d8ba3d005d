//! Employee records and unit keys.

use crate::level::{Level, LevelMap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One employee as ingested from the record source.
///
/// Field names on the wire follow the source collection (`userId`,
/// `sectId`, ...). Missing strings default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identity
    pub user_id: String,

    /// Direct manager's identity (empty when none)
    #[serde(default)]
    pub supervisor: String,

    /// Section membership
    #[serde(default)]
    pub sect_id: String,

    /// Department membership
    #[serde(default)]
    pub dept_id: String,

    /// Division membership
    #[serde(default)]
    pub division_id: String,

    /// Function membership
    #[serde(default)]
    pub function_id: String,
}

impl Employee {
    /// Create an employee with no manager and every level set to `unit`.
    pub fn new(user_id: impl Into<String>, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self {
            user_id: user_id.into(),
            supervisor: String::new(),
            sect_id: unit.clone(),
            dept_id: unit.clone(),
            division_id: unit.clone(),
            function_id: unit,
        }
    }

    /// Set the direct manager.
    pub fn reporting_to(mut self, supervisor: impl Into<String>) -> Self {
        self.supervisor = supervisor.into();
        self
    }

    /// Set the four membership ids, section first.
    pub fn in_units(
        mut self,
        sect: impl Into<String>,
        dept: impl Into<String>,
        division: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        self.sect_id = sect.into();
        self.dept_id = dept.into();
        self.division_id = division.into();
        self.function_id = function.into();
        self
    }

    /// Membership id at `level`.
    pub fn unit_id(&self, level: Level) -> &str {
        match level {
            Level::Section => &self.sect_id,
            Level::Department => &self.dept_id,
            Level::Division => &self.division_id,
            Level::Function => &self.function_id,
        }
    }

    /// All four membership ids.
    pub fn unit_path(&self) -> LevelMap<&str> {
        LevelMap::from_fn(|level| self.unit_id(level))
    }

    /// The unit this employee belongs to at `level`.
    pub fn unit(&self, level: Level) -> UnitKey {
        UnitKey::new(level, self.unit_id(level))
    }

    /// Direct manager, if one is recorded.
    pub fn supervisor(&self) -> Option<&str> {
        if self.supervisor.is_empty() {
            None
        } else {
            Some(&self.supervisor)
        }
    }

    /// Whether `level` folds into its parent for this employee
    /// (same id at `level` and at the next level up).
    ///
    /// The top level never folds.
    pub fn collapses_at(&self, level: Level) -> bool {
        match level.parent() {
            Some(parent) => self.unit_id(level) == self.unit_id(parent),
            None => false,
        }
    }
}

/// Identifies a unit: a level plus the membership id shared by its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    pub level: Level,
    pub id: String,
}

impl UnitKey {
    pub fn new(level: Level, id: impl Into<String>) -> Self {
        Self {
            level,
            id: id.into(),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.id)
    }
}

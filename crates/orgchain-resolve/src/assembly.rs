//! Result assembly: resolved supervisors partitioned by level.

use crate::run::RunStats;
use crate::strategy::{EmployeeChain, Mode};
use crate::trace::Trace;
use orgchain_hierarchy::{Employee, HierarchyIndex, Level, LevelMap, SnapshotId, UnitKey};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Supervisor per unit id at one level. `None` serializes as `null`.
pub type LevelAssignments = BTreeMap<String, Option<String>>;

/// Outcome of one strategy over one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub mode: Mode,
    pub snapshot: SnapshotId,
    #[serde(flatten)]
    pub units: LevelMap<LevelAssignments>,
    pub stats: RunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Trace>,
    /// Supervisors per distinct unit path, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathReport>>,
}

impl Resolution {
    pub fn assemble(
        mode: Mode,
        snapshot: SnapshotId,
        entries: impl IntoIterator<Item = (UnitKey, Option<String>)>,
        stats: RunStats,
        trace: Option<Trace>,
    ) -> Self {
        let mut units: LevelMap<LevelAssignments> = LevelMap::default();
        for (key, supervisor) in entries {
            units[key.level].insert(key.id, supervisor);
        }
        Self {
            mode,
            snapshot,
            units,
            stats,
            trace,
            paths: None,
        }
    }

    /// Resolved supervisor of `(level, id)`.
    ///
    /// `None` both for units that resolved empty and for units never seen;
    /// use [`Resolution::contains`] to tell them apart.
    pub fn supervisor(&self, level: Level, id: &str) -> Option<&str> {
        self.units[level].get(id).and_then(|s| s.as_deref())
    }

    pub fn contains(&self, level: Level, id: &str) -> bool {
        self.units[level].contains_key(id)
    }

    pub fn units(&self, level: Level) -> &LevelAssignments {
        &self.units[level]
    }

    /// Total resolved units across all levels.
    pub fn len(&self) -> usize {
        self.units.iter().map(|(_, units)| units.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Supervisors along a unit path, one per level.
    pub fn for_path<'s>(&'s self, path: &LevelMap<&str>) -> LevelMap<Option<&'s str>> {
        LevelMap::from_fn(|level| self.supervisor(level, path[level]))
    }

    /// Supervisors of the four units `employee` belongs to.
    pub fn for_employee(&self, employee: &Employee) -> LevelMap<Option<&str>> {
        self.for_path(&employee.unit_path())
    }

    /// One entry per distinct unit path in `index`, first-seen order.
    pub fn path_report(&self, index: &HierarchyIndex) -> Vec<PathReport> {
        let mut seen = HashSet::new();
        index
            .employees()
            .iter()
            .map(Employee::unit_path)
            .filter(|path| seen.insert(path.clone()))
            .map(|path| PathReport {
                supervisors: self
                    .for_path(&path)
                    .map(|_, s| s.map(str::to_string)),
                path: path.map(|_, id| id.to_string()),
            })
            .collect()
    }

    /// Unit-by-unit comparison against another resolution of the same
    /// snapshot.
    pub fn compare(&self, other: &Resolution) -> ConsistencyReport {
        let mut agreed = 0;
        let mut divergences = Vec::new();
        for level in Level::ALL {
            let ours = &self.units[level];
            let theirs = &other.units[level];
            let ids: BTreeMap<&str, ()> = ours
                .keys()
                .chain(theirs.keys())
                .map(|id| (id.as_str(), ()))
                .collect();
            for id in ids.into_keys() {
                let left = ours.get(id).cloned().flatten();
                let right = theirs.get(id).cloned().flatten();
                if left == right {
                    agreed += 1;
                } else {
                    divergences.push(Divergence {
                        unit: UnitKey::new(level, id),
                        left,
                        right,
                    });
                }
            }
        }
        ConsistencyReport {
            left: self.mode,
            right: other.mode,
            agreed,
            divergences,
        }
    }
}

/// Supervisors for one unit path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub path: LevelMap<String>,
    pub supervisors: LevelMap<Option<String>>,
}

/// Agreement between two strategies over the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub left: Mode,
    pub right: Mode,
    pub agreed: usize,
    pub divergences: Vec<Divergence>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.divergences.is_empty()
    }
}

/// A unit the two strategies attribute differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    pub unit: UnitKey,
    pub left: Option<String>,
    pub right: Option<String>,
}

/// Everything a run produced, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub snapshot: SnapshotId,
    pub resolutions: Vec<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<ConsistencyReport>,
    /// Each employee's walked manager chain, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<EmployeeChain>>,
}

impl RunReport {
    /// The resolution produced by `mode`, if it ran.
    pub fn resolution(&self, mode: Mode) -> Option<&Resolution> {
        self.resolutions.iter().find(|r| r.mode == mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SnapshotId {
        SnapshotId([7; 32])
    }

    fn resolution(mode: Mode, entries: &[(Level, &str, Option<&str>)]) -> Resolution {
        Resolution::assemble(
            mode,
            snapshot(),
            entries
                .iter()
                .map(|(level, id, sup)| (UnitKey::new(*level, *id), sup.map(str::to_string))),
            RunStats::default(),
            None,
        )
    }

    #[test]
    fn partitions_by_level() {
        let r = resolution(
            Mode::Promotion,
            &[
                (Level::Section, "SA", Some("UB")),
                (Level::Department, "DA", Some("UD")),
                (Level::Section, "ZZ", None),
            ],
        );

        assert_eq!(r.supervisor(Level::Section, "SA"), Some("UB"));
        assert_eq!(r.supervisor(Level::Department, "DA"), Some("UD"));
        assert_eq!(r.supervisor(Level::Department, "SA"), None);
        assert!(r.contains(Level::Section, "ZZ"));
        assert!(!r.contains(Level::Division, "ZZ"));
        assert_eq!(r.units(Level::Section).len(), 2);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn serializes_levels_at_top_level_with_nulls() {
        let r = resolution(
            Mode::ChainWalk,
            &[
                (Level::Section, "SA", Some("UB")),
                (Level::Function, "FA", None),
            ],
        );
        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["mode"], "chain_walk");
        assert_eq!(json["snapshot"], "07".repeat(32));
        assert_eq!(json["section"]["SA"], "UB");
        assert!(json["function"]["FA"].is_null());
        assert!(json["department"].as_object().unwrap().is_empty());
        assert!(json.get("trace").is_none());
        assert!(json.get("paths").is_none());
    }

    #[test]
    fn employee_lookup_follows_unit_path() {
        let r = resolution(
            Mode::Promotion,
            &[
                (Level::Section, "SA", Some("UB")),
                (Level::Department, "DA", Some("UD")),
                (Level::Division, "DDA", None),
                (Level::Function, "FA", Some("UG")),
            ],
        );
        let e = Employee::new("UA", "").in_units("SA", "DA", "DDA", "FA");
        let found = r.for_employee(&e);

        assert_eq!(found[Level::Section], Some("UB"));
        assert_eq!(found[Level::Department], Some("UD"));
        assert_eq!(found[Level::Division], None);
        assert_eq!(found[Level::Function], Some("UG"));
    }

    #[test]
    fn path_report_lists_each_path_once() {
        let index = HierarchyIndex::new(vec![
            Employee::new("UA", "").in_units("SA", "DA", "DDA", "FA"),
            Employee::new("UC", "").in_units("SA", "DA", "DDA", "FA"),
            Employee::new("UB", "").in_units("DA", "DA", "DDA", "FA"),
        ]);
        let r = resolution(Mode::Promotion, &[(Level::Section, "SA", Some("UB"))]);
        let report = r.path_report(&index);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].path[Level::Section], "SA");
        assert_eq!(report[0].supervisors[Level::Section].as_deref(), Some("UB"));
        assert_eq!(report[1].path[Level::Section], "DA");
        assert_eq!(report[1].supervisors[Level::Section], None);
    }

    #[test]
    fn compare_reports_divergent_units() {
        let a = resolution(
            Mode::Promotion,
            &[
                (Level::Section, "SA", Some("UB")),
                (Level::Division, "DDA", Some("UG")),
            ],
        );
        let b = resolution(
            Mode::ChainWalk,
            &[
                (Level::Section, "SA", Some("UB")),
                (Level::Division, "DDA", Some("UF")),
            ],
        );

        let report = a.compare(&b);
        assert_eq!(report.agreed, 1);
        assert!(!report.is_consistent());
        assert_eq!(
            report.divergences,
            [Divergence {
                unit: UnitKey::new(Level::Division, "DDA"),
                left: Some("UG".into()),
                right: Some("UF".into()),
            }]
        );
        assert!(a.compare(&a).is_consistent());
    }
}

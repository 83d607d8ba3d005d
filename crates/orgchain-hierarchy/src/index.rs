//! Hash-indexed view over one snapshot of employee records.
//!
//! Units are never stored explicitly. The index keeps, per level, the
//! positions of each unit's members in ingestion order, which is what makes
//! vote tie-breaks deterministic.

use crate::employee::{Employee, UnitKey};
use crate::level::{Level, LevelMap};
use std::collections::HashMap;
use std::fmt;

/// Digest identifying a snapshot of employee records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub [u8; 32]);

impl SnapshotId {
    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl serde::Serialize for SnapshotId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

#[derive(Debug, Default)]
struct LevelIndex {
    /// unit id -> member positions, ingestion order
    members: HashMap<String, Vec<usize>>,
    /// unit ids in first-seen order
    order: Vec<String>,
}

/// Lookup structures over an immutable employee collection.
#[derive(Debug)]
pub struct HierarchyIndex {
    employees: Vec<Employee>,
    by_identity: HashMap<String, usize>,
    levels: LevelMap<LevelIndex>,
    snapshot: SnapshotId,
}

impl HierarchyIndex {
    /// Build the index in one pass.
    ///
    /// A repeated `userId` keeps its first record for identity lookup.
    /// Record sources are expected to reject duplicates before this point.
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut by_identity = HashMap::with_capacity(employees.len());
        let mut levels: LevelMap<LevelIndex> = LevelMap::default();
        let mut hasher = blake3::Hasher::new();

        for (pos, employee) in employees.iter().enumerate() {
            by_identity.entry(employee.user_id.clone()).or_insert(pos);

            for level in Level::ALL {
                let index = &mut levels[level];
                let id = employee.unit_id(level);
                match index.members.get_mut(id) {
                    Some(positions) => positions.push(pos),
                    None => {
                        index.members.insert(id.to_string(), vec![pos]);
                        index.order.push(id.to_string());
                    }
                }
            }

            hash_record(&mut hasher, employee);
        }

        Self {
            employees,
            by_identity,
            levels,
            snapshot: SnapshotId(*hasher.finalize().as_bytes()),
        }
    }

    /// Members of unit `(level, id)`, in ingestion order.
    pub fn members_of(&self, level: Level, id: &str) -> Members<'_> {
        let positions = self.levels[level]
            .members
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Members {
            employees: &self.employees,
            positions,
        }
    }

    /// Members of the unit named by `key`.
    pub fn members(&self, key: &UnitKey) -> Members<'_> {
        self.members_of(key.level, &key.id)
    }

    /// Direct lookup by identity.
    pub fn by_identity(&self, user_id: &str) -> Option<&Employee> {
        self.by_identity.get(user_id).map(|&pos| &self.employees[pos])
    }

    /// Distinct unit ids at `level`, in first-seen order.
    pub fn unit_ids(&self, level: Level) -> impl Iterator<Item = &str> {
        self.levels[level].order.iter().map(String::as_str)
    }

    /// Every distinct unit, most specific level first.
    pub fn units(&self) -> impl Iterator<Item = UnitKey> + '_ {
        Level::ALL
            .into_iter()
            .flat_map(move |level| self.unit_ids(level).map(move |id| UnitKey::new(level, id)))
    }

    /// Number of distinct units at `level`.
    pub fn unit_count(&self, level: Level) -> usize {
        self.levels[level].order.len()
    }

    /// All records, ingestion order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Fingerprint of the ingested records.
    pub fn snapshot(&self) -> SnapshotId {
        self.snapshot
    }
}

fn hash_record(hasher: &mut blake3::Hasher, employee: &Employee) {
    for field in [
        &employee.user_id,
        &employee.supervisor,
        &employee.sect_id,
        &employee.dept_id,
        &employee.division_id,
        &employee.function_id,
    ] {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
}

/// An ordered view of one unit's members.
#[derive(Debug, Clone, Copy)]
pub struct Members<'a> {
    employees: &'a [Employee],
    positions: &'a [usize],
}

impl<'a> Members<'a> {
    /// A member set with nobody in it.
    pub fn empty() -> Self {
        Self {
            employees: &[],
            positions: &[],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// First member in ingestion order.
    pub fn first(&self) -> Option<&'a Employee> {
        self.positions.first().map(|&pos| &self.employees[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Employee> + 'a {
        let (employees, positions) = (self.employees, self.positions);
        positions.iter().map(move |&pos| &employees[pos])
    }

    /// Whether `user_id` is one of the members.
    pub fn contains(&self, user_id: &str) -> bool {
        self.iter().any(|e| e.user_id == user_id)
    }
}

//! Record sources: where employee collections come from.
//!
//! Structural problems with the collection (missing or duplicate
//! identities) are rejected here, before any resolution starts.

use crate::error::{Error, Result};
use orgchain_hierarchy::{Employee, HierarchyIndex};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the full employee collection for one snapshot.
pub trait RecordSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<Employee>>;
}

/// Records already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Employee>,
}

impl MemorySource {
    pub fn new(records: Vec<Employee>) -> Self {
        Self { records }
    }
}

impl RecordSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    fn load(&self) -> Result<Vec<Employee>> {
        validate(&self.records)?;
        Ok(self.records.clone())
    }
}

/// A JSON array of employee objects on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Employee>> {
        let bytes = std::fs::read(&self.path)?;
        parse_records(&bytes)
    }
}

/// Parse and validate a JSON employee array.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Employee>> {
    let records: Vec<Employee> = serde_json::from_slice(bytes)?;
    validate(&records)?;
    Ok(records)
}

/// Reject empty or repeated identities.
pub fn validate(records: &[Employee]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if record.user_id.is_empty() {
            return Err(Error::MissingUserId { position });
        }
        if !seen.insert(record.user_id.as_str()) {
            return Err(Error::DuplicateUserId(record.user_id.clone()));
        }
    }
    Ok(())
}

/// Load `source` and index it.
pub fn load_snapshot(source: &dyn RecordSource) -> Result<HierarchyIndex> {
    let records = source.load()?;
    debug!(source = %source.describe(), records = records.len(), "Loaded records");
    Ok(HierarchyIndex::new(records))
}

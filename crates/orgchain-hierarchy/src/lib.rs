//! Orgchain Hierarchy
//!
//! The data model for supervisor resolution: employees, the four nested
//! organizational levels, and the index that derives units from a flat
//! record collection.
//!
//! # Units
//!
//! A unit is `(level, id)`. Its members are every employee whose membership
//! id at that level equals `id`. Units are derived on demand and never
//! stored, so records do not need to agree with each other about parentage.
//!
//! # Levels
//!
//! ```text
//! function      (top, always genuine)
//!   division
//!     department
//!       section (most specific)
//! ```
//!
//! A level may be a placeholder for a given unit (see [`presence`]), in
//! which case resolution skips to the level above.

mod employee;
mod index;
mod level;
pub mod presence;

pub use employee::{Employee, UnitKey};
pub use index::{HierarchyIndex, Members, SnapshotId};
pub use level::{Level, LevelMap};
pub use presence::{classify, LevelPresence};

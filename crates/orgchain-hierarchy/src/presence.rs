//! Level existence: is a unit a real grouping or a placeholder?
//!
//! Organizations routinely skip levels. Someone attached directly to a
//! department carries the department id in their section field as well.
//! A unit whose members all do this is not a distinct grouping at that
//! level and folds into its parent.
//!
//! # Rule
//!
//! A level is genuine for a unit when at least one member's id at that
//! level differs from the same member's id one level up. The top level has
//! no parent and is always genuine.

use crate::index::Members;
use crate::level::Level;

/// Whether a unit forms its own grouping at a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPresence {
    /// Some member has a distinct id at this level
    Genuine,
    /// Every member carries their parent-level id here
    Collapsed,
}

impl LevelPresence {
    pub fn is_genuine(self) -> bool {
        matches!(self, LevelPresence::Genuine)
    }
}

/// Classify `level` for a unit with the given members.
///
/// An empty member set is reported as collapsed at every level except the
/// top; callers resolve empty units before classifying.
pub fn classify(level: Level, members: &Members<'_>) -> LevelPresence {
    if level.is_top() || members.iter().any(|m| !m.collapses_at(level)) {
        LevelPresence::Genuine
    } else {
        LevelPresence::Collapsed
    }
}

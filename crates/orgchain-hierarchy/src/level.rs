//! Organizational levels and level-keyed storage.
//!
//! Levels are totally ordered from most specific to most general:
//!
//! ```text
//! Section < Department < Division < Function
//! ```
//!
//! Resolution only ever moves upward through this order, so the level a
//! computation is working on also bounds how much work is left.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Section,
    Department,
    Division,
    Function,
}

impl Level {
    /// Number of levels.
    pub const COUNT: usize = 4;

    /// All levels, most specific first.
    pub const ALL: [Level; Level::COUNT] = [
        Level::Section,
        Level::Department,
        Level::Division,
        Level::Function,
    ];

    /// Position in the ordering (section = 0).
    pub const fn rank(self) -> usize {
        match self {
            Level::Section => 0,
            Level::Department => 1,
            Level::Division => 2,
            Level::Function => 3,
        }
    }

    /// The next level up, or `None` at the top.
    pub const fn parent(self) -> Option<Level> {
        match self {
            Level::Section => Some(Level::Department),
            Level::Department => Some(Level::Division),
            Level::Division => Some(Level::Function),
            Level::Function => None,
        }
    }

    /// Whether this is the top level.
    pub const fn is_top(self) -> bool {
        self.parent().is_none()
    }

    /// Stable lowercase name, used as the output key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Section => "section",
            Level::Department => "department",
            Level::Division => "division",
            Level::Function => "function",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per level, indexed by [`Level`].
///
/// Serializes as a map keyed by level name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LevelMap<T>([T; Level::COUNT]);

impl<T> LevelMap<T> {
    /// Build a map by calling `f` once per level, most specific first.
    pub fn from_fn(mut f: impl FnMut(Level) -> T) -> Self {
        Self(Level::ALL.map(&mut f))
    }

    /// Iterate `(level, value)` pairs, most specific first.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &T)> {
        Level::ALL.into_iter().zip(self.0.iter())
    }

    /// Transform every value.
    pub fn map<U>(self, mut f: impl FnMut(Level, T) -> U) -> LevelMap<U> {
        let mut rank = 0;
        LevelMap(self.0.map(|v| {
            let level = Level::ALL[rank];
            rank += 1;
            f(level, v)
        }))
    }
}

impl<T> Index<Level> for LevelMap<T> {
    type Output = T;

    fn index(&self, level: Level) -> &T {
        &self.0[level.rank()]
    }
}

impl<T> IndexMut<Level> for LevelMap<T> {
    fn index_mut(&mut self, level: Level) -> &mut T {
        &mut self.0[level.rank()]
    }
}

impl<T: Serialize> Serialize for LevelMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Level::COUNT))?;
        for (level, value) in self.iter() {
            map.serialize_entry(level.as_str(), value)?;
        }
        map.end()
    }
}

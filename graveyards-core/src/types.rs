//! Core type definitions for graveyards.
//!
//! Positions, corners, graveyards and grave sites. All types are plain
//! values; ownership of the authoritative grave-site lists lives in
//! [`crate::cache::GraveyardCache`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A position in a named world.
///
/// Equality is exact, component by component. Grave sites are stored on
/// whole block coordinates, so positions handed back by the grave plugin
/// compare equal to the cached site they were created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// World identifier.
    pub world: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Block X coordinate (floor).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn block_x(&self) -> i64 {
        self.x.floor() as i64
    }

    /// Block Y coordinate (floor).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn block_y(&self) -> i64 {
        self.y.floor() as i64
    }

    /// Block Z coordinate (floor).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn block_z(&self) -> i64 {
        self.z.floor() as i64
    }

    /// The same position snapped to the block it lies in.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_block(&self) -> Self {
        Self::new(
            self.world.clone(),
            self.block_x() as f64,
            self.block_y() as f64,
            self.block_z() as f64,
        )
    }

    /// A copy shifted vertically by `dy`.
    #[must_use]
    pub fn offset_y(&self, dy: f64) -> Self {
        Self::new(self.world.clone(), self.x, self.y + dy, self.z)
    }

    /// Euclidean distance, or `None` when the positions are in different worlds.
    #[must_use]
    pub fn distance(&self, other: &Self) -> Option<f64> {
        if self.world != other.world {
            return None;
        }
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        Some((dx * dx + dy * dy + dz * dz).sqrt())
    }

    /// Whether `other` is in the same world and within `radius` of `self`.
    #[must_use]
    pub fn within(&self, other: &Self, radius: f64) -> bool {
        self.distance(other).is_some_and(|d| d <= radius)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.1}, {:.1}, {:.1})",
            self.world, self.x, self.y, self.z
        )
    }
}

/// A block-aligned graveyard corner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corner {
    /// World identifier.
    pub world: String,
    /// Block X.
    pub x: i64,
    /// Block Y.
    pub y: i64,
    /// Block Z.
    pub z: i64,
}

impl From<&Position> for Corner {
    fn from(pos: &Position) -> Self {
        Self {
            world: pos.world.clone(),
            x: pos.block_x(),
            y: pos.block_y(),
            z: pos.block_z(),
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Graveyards
// ---------------------------------------------------------------------------

/// A named graveyard with two advisory corners.
///
/// The corners are recorded for administrators; matching a death to a
/// graveyard is done by distance to its grave sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graveyard {
    name: String,
    corner1: Corner,
    corner2: Corner,
}

impl Graveyard {
    /// Create a graveyard definition.
    #[must_use]
    pub fn new(name: impl Into<String>, corner1: Corner, corner2: Corner) -> Self {
        Self {
            name: name.into(),
            corner1,
            corner2,
        }
    }

    /// The graveyard's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First corner.
    #[must_use]
    pub fn corner1(&self) -> &Corner {
        &self.corner1
    }

    /// Second corner.
    #[must_use]
    pub fn corner2(&self) -> &Corner {
        &self.corner2
    }
}

/// A single slot in a graveyard where a grave may be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraveSite {
    /// Where the grave goes.
    pub position: Position,
    /// Whether an unlooted grave currently sits here.
    pub occupied: bool,
}

impl GraveSite {
    /// A new, unoccupied site.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            occupied: false,
        }
    }
}

/// Validate a graveyard name.
///
/// Names double as document file stems, so they must be non-empty and
/// free of path separators and control characters.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Enumeration types for the Orchard Co-op environment.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The behavioral mode of an agent.
///
/// Exactly one role is active at a time. The role decides what the
/// interaction action (code 9) does; it never changes how the agent moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Broadcasts the action payload byte on the shared channel.
    Scout,
    /// Picks the forageable resource on its cell.
    Forager,
    /// Tends the sapling on its cell at a stamina cost.
    Gardener,
}

impl Role {
    /// All roles in code order (Scout = 0, Forager = 1, Gardener = 2).
    pub const ALL: [Self; 3] = [Self::Scout, Self::Forager, Self::Gardener];

    /// Role every agent holds after a reset.
    pub const INITIAL: Self = Self::Forager;

    /// Zero-based role index.
    pub const fn index(self) -> u8 {
        match self {
            Self::Scout => 0,
            Self::Forager => 1,
            Self::Gardener => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// A single-cell move on the grid.
///
/// North decreases the row, east increases the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Row - 1.
    North,
    /// Row + 1.
    South,
    /// Column + 1.
    East,
    /// Column - 1.
    West,
}

impl Direction {
    /// The `(d_row, d_col)` displacement of this move.
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

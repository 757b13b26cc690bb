//! Action types submitted by policies each tick.
//!
//! On the wire an action is a pair `(code, payload)`: a code in `[0, 9]`
//! and one payload byte. [`Action`] carries that raw pair; [`ActionKind`] is
//! the decoded form the engine dispatches on.
//!
//! | code | meaning                       |
//! |------|-------------------------------|
//! | 0-3  | move north, south, east, west |
//! | 4    | stay                          |
//! | 5    | reserved (no-op)              |
//! | 6-8  | switch to scout, forager, gardener |
//! | 9    | role interaction              |

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Direction, Role};

/// Number of distinct action codes (`0..=9`).
pub const ACTION_CODE_COUNT: u16 = 10;

/// Number of distinct payload values (`0..=255`).
pub const PAYLOAD_VALUE_COUNT: u16 = 256;

/// Highest valid action code.
pub const MAX_ACTION_CODE: u8 = 9;

/// Code for the stay action.
pub const STAY_CODE: u8 = 4;

/// Code for the role interaction.
pub const INTERACT_CODE: u8 = 9;

/// One agent's action for one tick, as emitted by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Action {
    /// Move-or-role code, valid range `[0, 9]`.
    pub code: u8,
    /// Payload byte; only read by a scout's interaction.
    pub payload: u8,
}

impl Action {
    /// Build an action from its raw pair.
    pub const fn new(code: u8, payload: u8) -> Self {
        Self { code, payload }
    }

    /// The stay action (code 4).
    pub const fn stay() -> Self {
        Self::new(STAY_CODE, 0)
    }

    /// A move in `direction`.
    pub const fn step(direction: Direction) -> Self {
        let code = match direction {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        };
        Self::new(code, 0)
    }

    /// A switch to `role`.
    pub const fn switch_role(role: Role) -> Self {
        Self::new(role.index().saturating_add(6), 0)
    }

    /// The role interaction (code 9) carrying `payload`.
    pub const fn interact(payload: u8) -> Self {
        Self::new(INTERACT_CODE, payload)
    }

    /// Decode the code, or `None` if it is outside `[0, 9]`.
    pub const fn kind(self) -> Option<ActionKind> {
        ActionKind::decode(self.code)
    }
}

/// Decoded meaning of an action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Move one cell (codes 0-3).
    Move(Direction),
    /// Stay in place (code 4).
    Stay,
    /// Reserved code 5; accepted and ignored.
    Reserved,
    /// Switch role without moving (codes 6-8).
    SwitchRole(Role),
    /// Role-specific interaction at the current cell (code 9).
    Interact,
}

impl ActionKind {
    /// Decode a raw action code.
    pub const fn decode(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Move(Direction::North)),
            1 => Some(Self::Move(Direction::South)),
            2 => Some(Self::Move(Direction::East)),
            3 => Some(Self::Move(Direction::West)),
            4 => Some(Self::Stay),
            5 => Some(Self::Reserved),
            6 => Some(Self::SwitchRole(Role::Scout)),
            7 => Some(Self::SwitchRole(Role::Forager)),
            8 => Some(Self::SwitchRole(Role::Gardener)),
            9 => Some(Self::Interact),
            _ => None,
        }
    }
}

/// Description of the per-agent action space: a multi-discrete
/// `[code_values, payload_values]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionSpace {
    /// Number of action codes.
    pub code_values: u16,
    /// Number of payload values.
    pub payload_values: u16,
}

impl ActionSpace {
    /// The action space every agent shares.
    pub const STANDARD: Self = Self {
        code_values: ACTION_CODE_COUNT,
        payload_values: PAYLOAD_VALUE_COUNT,
    };

    /// Sizes of each discrete dimension, `[10, 256]`.
    pub const fn nvec(self) -> [u16; 2] {
        [self.code_values, self.payload_values]
    }
}

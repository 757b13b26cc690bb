//! Read-only world snapshot for external renderers and debuggers.
//!
//! A snapshot is a detached copy of everything a grid renderer needs. It is
//! produced on demand by the engine and never feeds back into it.

use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use crate::enums::Role;
use crate::grid::GridCoord;
use crate::ids::AgentId;

/// A cell holding a sapling and its growth stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SaplingCell {
    /// Where the sapling stands.
    pub coord: GridCoord,
    /// Growth stage, always > 0 in a snapshot.
    pub stage: u8,
}

/// Position and status of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
    /// Current cell.
    pub position: GridCoord,
    /// Active role.
    pub role: Role,
    /// Current stamina, `0..=100`.
    pub stamina: u8,
}

/// Full world state at a tick boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Side length of the square grid.
    pub grid_size: u32,
    /// Tick counter at the time of the snapshot.
    pub tick: u64,
    /// Cells currently holding a forageable resource, row-major order.
    pub forageable: Vec<GridCoord>,
    /// Cells holding a sapling, row-major order.
    pub saplings: Vec<SaplingCell>,
    /// Cells carrying the hazard marker, row-major order.
    pub hazards: Vec<GridCoord>,
    /// Every agent keyed by id.
    pub agents: BTreeMap<AgentId, AgentSnapshot>,
    /// Current contents of the shared channel.
    pub channel: Vec<u8>,
}

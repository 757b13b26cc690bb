//! Type-safe agent identifier.
//!
//! Agents are numbered `0..n` at environment construction and keep their
//! number for the lifetime of the engine. The numeric order is the stable
//! iteration order used by every tick phase, so ties (two foragers on one
//! cell, collision pairing) are always resolved the same way.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for an agent in the environment.
///
/// Displays as `agent_<index>`, matching the naming external drivers
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentId(pub u32);

impl AgentId {
    /// Create an identifier from its zero-based index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the zero-based index.
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent_{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl From<AgentId> for u32 {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

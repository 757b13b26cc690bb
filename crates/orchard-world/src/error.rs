//! Error types for the `orchard-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use orchard_types::{AgentId, GridCoord};

/// Errors that can occur while building or querying world state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The grid has no cells.
    #[error("grid size must be at least 1")]
    EmptyGrid,

    /// The grid is too large to index with a flat array.
    #[error("grid size {size} exceeds the maximum of {max}")]
    GridTooLarge {
        /// The requested side length.
        size: u32,
        /// Largest supported side length.
        max: u32,
    },

    /// The world was asked to hold no agents.
    #[error("at least one agent is required")]
    NoAgents,

    /// An agent was not found in the world.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// A coordinate could not be mapped to a layer cell.
    #[error("cell {coord} is outside a grid of size {size}")]
    CellOutOfBounds {
        /// The offending coordinate.
        coord: GridCoord,
        /// The grid side length.
        size: u32,
    },
}

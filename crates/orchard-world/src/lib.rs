//! Grid, resources, respawn timers, and agents for the Orchard Co-op
//! environment.
//!
//! This crate models the physical world on a square toroidal grid: dense
//! per-cell resource layers, the countdown schedule that regrows foraged
//! cells, per-agent state, and the shared broadcast channel. It contains no
//! tick orchestration; `orchard-core` drives these primitives.
//!
//! # Modules
//!
//! - [`agent`] -- Per-agent position, role, and stamina.
//! - [`channel`] -- Last-writer-wins broadcast buffer.
//! - [`error`] -- Error types for world operations.
//! - [`layer`] -- Flat `row * size + col` cell layers.
//! - [`respawn`] -- Countdown timers for foraged cells.
//! - [`state`] -- The aggregate [`WorldState`] and its seeded initialization.

pub mod agent;
pub mod channel;
pub mod error;
pub mod layer;
pub mod respawn;
pub mod state;

// Re-export primary types at crate root.
pub use agent::{AgentState, MAX_STAMINA, MOVE_STAMINA_COST, TEND_STAMINA_COST};
pub use channel::{Channel, DEFAULT_CHANNEL_BYTES};
pub use error::WorldError;
pub use layer::{MAX_GRID_SIZE, ResourceLayer};
pub use respawn::RespawnSchedule;
pub use state::{WorldLayout, WorldState};

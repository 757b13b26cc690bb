//! Shared type definitions for the Orchard Co-op environment.
//!
//! This crate holds the plain data that crosses the engine boundary:
//! identifiers, roles, actions, observation tensors, and the debug
//! snapshot. Renderer-facing types derive `ts-rs` so their `TypeScript`
//! bindings can be generated for an external viewer.
//!
//! # Modules
//!
//! - [`ids`] -- Stable numeric agent identifiers
//! - [`grid`] -- Wrapping toroidal grid coordinates
//! - [`enums`] -- Roles and movement directions
//! - [`actions`] -- Raw `(code, payload)` actions and their decoded form
//! - [`observation`] -- The `5 x 5 x 5` egocentric observation tensor
//! - [`snapshot`] -- Read-only world snapshot for renderers

pub mod actions;
pub mod enums;
pub mod grid;
pub mod ids;
pub mod observation;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use actions::{
    ACTION_CODE_COUNT, Action, ActionKind, ActionSpace, INTERACT_CODE, MAX_ACTION_CODE,
    PAYLOAD_VALUE_COUNT, STAY_CODE,
};
pub use enums::{Direction, Role};
pub use grid::GridCoord;
pub use ids::AgentId;
pub use observation::{
    CHANNELS, OBSERVATION_LEN, OBSERVATION_SHAPE, Observation, ObservationChannel, VIEW_RADIUS,
    WINDOW,
};
pub use snapshot::{AgentSnapshot, SaplingCell, WorldSnapshot};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for renderer-facing types.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        let _ = crate::ids::AgentId::export_all();
        let _ = crate::grid::GridCoord::export_all();
        let _ = crate::enums::Role::export_all();
        let _ = crate::enums::Direction::export_all();
        let _ = crate::actions::Action::export_all();
        let _ = crate::actions::ActionKind::export_all();
        let _ = crate::actions::ActionSpace::export_all();
        let _ = crate::observation::ObservationChannel::export_all();
        let _ = crate::observation::Observation::export_all();
        let _ = crate::snapshot::SaplingCell::export_all();
        let _ = crate::snapshot::AgentSnapshot::export_all();
        let _ = crate::snapshot::WorldSnapshot::export_all();
    }
}

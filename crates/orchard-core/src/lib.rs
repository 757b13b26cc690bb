//! Episode engine for the Orchard Co-op environment.
//!
//! This crate turns the world model from `orchard-world` into a
//! multi-agent rollout environment: configuration, the episode clock, the
//! per-tick transition, observations, rewards, and the [`OrchardEnv`]
//! facade that ties them together.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and truncation rule.
//! - [`config`] -- Configuration loading from `orchard-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`OrchardEnv`]: reset, step, observe, snapshot.
//! - [`error`] -- [`EngineError`].
//! - [`observe`] -- The 5x5x5 egocentric observation.
//! - [`policy`] -- [`Policy`] trait with [`StayPolicy`] and [`RandomPolicy`].
//! - [`reward`] -- Forage reward, periodic bonus, collision penalties.
//! - [`transition`] -- The phased tick transition.
//!
//! [`OrchardEnv`]: engine::OrchardEnv
//! [`EngineError`]: error::EngineError
//! [`Policy`]: policy::Policy
//! [`StayPolicy`]: policy::StayPolicy
//! [`RandomPolicy`]: policy::RandomPolicy

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod observe;
pub mod policy;
pub mod reward;
pub mod transition;

pub use config::{CollisionPairing, ConfigError, EngineConfig};
pub use engine::{AgentInfo, OrchardEnv, StepOutcome};
pub use error::EngineError;
pub use policy::{Policy, PolicyError, RandomPolicy, StayPolicy};

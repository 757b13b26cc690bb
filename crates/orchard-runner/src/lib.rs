//! Rollout and evaluation driver for the Orchard Co-op environment.
//!
//! The driver is a thin collaborator around [`orchard_core::OrchardEnv`]:
//! it feeds observations to a [`Policy`](orchard_core::Policy), steps the
//! engine until truncation, and aggregates returns.
//!
//! # Modules
//!
//! - [`config`] -- [`RunnerConfig`] loaded from environment variables.
//! - [`error`] -- [`RunnerError`].
//! - [`rollout`] -- [`Runner`] for single episodes and [`evaluate`] for
//!   concurrent multi-episode evaluation.

pub mod config;
pub mod error;
pub mod rollout;

pub use config::{PolicyKind, RunnerConfig};
pub use error::RunnerError;
pub use rollout::{EpisodeReport, EvaluationSummary, Runner, evaluate};

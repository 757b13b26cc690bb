//! Error types for the rollout driver.
//!
//! Uses `thiserror` for typed errors that surface through the whole driver:
//! environment configuration, engine calls, policy failures, and worker
//! tasks.

use orchard_core::{EngineError, PolicyError};

/// Errors that can occur while running or evaluating episodes.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// The engine rejected a call.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The policy failed to produce actions.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// An episode worker panicked or was cancelled.
    #[error("episode worker failed: {0}")]
    Worker(String),
}

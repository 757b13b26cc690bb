//! Error type for the engine facade.
//!
//! Every variant is produced before any state is touched, so a call that
//! returns an error leaves the engine exactly as it was.

use orchard_types::AgentId;
use orchard_world::WorldError;

use crate::clock::ClockError;
use crate::config::ConfigError;

/// Errors returned by [`OrchardEnv`](crate::engine::OrchardEnv).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration failed to load or validate.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The world could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The tick counter cannot advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An action code outside `[0, 9]`.
    #[error("agent {agent} submitted invalid action code {code}")]
    InvalidAction {
        /// The submitting agent.
        agent: AgentId,
        /// The rejected code.
        code: u8,
    },

    /// An action keyed by an agent that is not in the episode.
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    /// The episode was already truncated; call `reset` first.
    #[error("episode finished at tick {tick}; reset before stepping")]
    EpisodeFinished {
        /// Tick at which the episode ended.
        tick: u64,
    },
}

//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `orchard-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader, and [`EngineConfig::validate`], which rejects
//! parameter combinations that would make the world degenerate.

use std::path::Path;

use orchard_world::{DEFAULT_CHANNEL_BYTES, MAX_GRID_SIZE};
use serde::Deserialize;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its usable range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `orchard-config.yaml`. Every field has a
/// default matching the reference environment (25x25 grid, 5 agents,
/// 30-tick respawn, 1000-tick episodes).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Grid and population settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Resource regrowth settings.
    #[serde(default)]
    pub respawn: RespawnConfig,

    /// Reward shaping.
    #[serde(default)]
    pub reward: RewardConfig,

    /// Episode length.
    #[serde(default)]
    pub episode: EpisodeConfig,

    /// Shared channel settings.
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The result is not validated; [`OrchardEnv::new`] validates before
    /// building anything.
    ///
    /// [`OrchardEnv::new`]: crate::engine::OrchardEnv::new
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check that every parameter is in its usable range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.grid_size == 0 {
            return Err(invalid("world.grid_size must be at least 1"));
        }
        if self.world.grid_size > MAX_GRID_SIZE {
            return Err(invalid(format!(
                "world.grid_size must be at most {MAX_GRID_SIZE}"
            )));
        }
        if self.world.agents == 0 {
            return Err(invalid("world.agents must be at least 1"));
        }
        if self.respawn.delay == 0 {
            return Err(invalid("respawn.delay must be at least 1"));
        }
        if self.reward.bonus_interval == 0 {
            return Err(invalid("reward.bonus_interval must be at least 1"));
        }
        if !self.reward.forage_reward.is_finite()
            || !self.reward.bonus_per_resource.is_finite()
            || !self.reward.collision_penalty.is_finite()
        {
            return Err(invalid("reward values must be finite"));
        }
        if self.episode.max_steps == 0 {
            return Err(invalid("episode.max_steps must be at least 1"));
        }
        if self.channel.bytes == 0 {
            return Err(invalid("channel.bytes must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Grid and population settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square toroidal grid.
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,

    /// Number of agents.
    #[serde(default = "default_agents")]
    pub agents: u32,

    /// Seed used at construction and by `reset(None)` before any explicit seed.
    #[serde(default)]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            agents: default_agents(),
            seed: 0,
        }
    }
}

/// Resource regrowth settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RespawnConfig {
    /// Ticks between foraging a cell and its resource reappearing.
    #[serde(default = "default_respawn_delay")]
    pub delay: u32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            delay: default_respawn_delay(),
        }
    }
}

/// How agents sharing a cell are paired for the collision penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPairing {
    /// The first agent seen on a cell pairs with the second; later arrivals
    /// on that cell are not penalized.
    #[default]
    FirstPair,
    /// Each agent seen on an occupied cell pairs with the previous agent
    /// seen there, so middle members of a group are penalized twice.
    Chained,
    /// Every agent on a shared cell is penalized once.
    AllMembers,
}

/// Reward shaping parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RewardConfig {
    /// Reward for a successful forage.
    #[serde(default = "default_forage_reward")]
    pub forage_reward: f64,

    /// The shared bonus is paid on ticks divisible by this interval.
    #[serde(default = "default_bonus_interval")]
    pub bonus_interval: u64,

    /// Bonus per forageable cell on the grid, paid to every agent.
    #[serde(default = "default_bonus_per_resource")]
    pub bonus_per_resource: f64,

    /// Reward added to each member of a colliding pair.
    #[serde(default = "default_collision_penalty")]
    pub collision_penalty: f64,

    /// Pairing scheme for collisions.
    #[serde(default)]
    pub collision_pairing: CollisionPairing,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            forage_reward: default_forage_reward(),
            bonus_interval: default_bonus_interval(),
            bonus_per_resource: default_bonus_per_resource(),
            collision_penalty: default_collision_penalty(),
            collision_pairing: CollisionPairing::default(),
        }
    }
}

/// Episode length settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeConfig {
    /// Every agent is truncated once the tick counter reaches this value.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

/// Shared channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelConfig {
    /// Channel width in bytes.
    #[serde(default = "default_channel_bytes")]
    pub bytes: usize,

    /// Zero the channel on every reset. Off by default: the channel belongs
    /// to the engine instance and survives resets.
    #[serde(default)]
    pub clear_on_reset: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            bytes: default_channel_bytes(),
            clear_on_reset: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_grid_size() -> u32 {
    25
}

const fn default_agents() -> u32 {
    5
}

const fn default_respawn_delay() -> u32 {
    30
}

const fn default_forage_reward() -> f64 {
    1.0
}

const fn default_bonus_interval() -> u64 {
    50
}

const fn default_bonus_per_resource() -> f64 {
    0.3
}

const fn default_collision_penalty() -> f64 {
    -1.0
}

const fn default_max_steps() -> u64 {
    1000
}

const fn default_channel_bytes() -> usize {
    DEFAULT_CHANNEL_BYTES
}

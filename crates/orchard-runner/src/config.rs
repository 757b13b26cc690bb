//! Configuration for the rollout driver.
//!
//! The driver is configured from environment variables. The engine itself
//! is configured from a YAML file whose path is one of those variables; if
//! no path is given, engine defaults apply.

use std::path::PathBuf;
use std::str::FromStr;

use orchard_core::{EngineConfig, Policy, RandomPolicy, StayPolicy};

use crate::error::RunnerError;

/// Default number of evaluation episodes.
pub const DEFAULT_EPISODES: u32 = 5;

/// Default number of episodes evaluated at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Complete driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Path to the engine YAML file, if any.
    pub engine_config: Option<PathBuf>,
    /// Number of episodes to evaluate.
    pub episodes: u32,
    /// Which stock policy drives the agents.
    pub policy: PolicyKind,
    /// Maximum episodes in flight at once.
    pub concurrency: usize,
}

/// Stock policies selectable from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyKind {
    /// Uniform random actions.
    #[default]
    Random,
    /// Every agent stays put.
    Stay,
}

impl PolicyKind {
    /// Build a fresh policy instance; `seed` only matters for random.
    pub fn build(self, seed: u64) -> Box<dyn Policy + Send> {
        match self {
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Stay => Box::new(StayPolicy::new()),
        }
    }

    /// Name used in logs and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Stay => "stay",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "stay" => Ok(Self::Stay),
            other => Err(RunnerError::Config(format!("unknown policy: {other}"))),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `ORCHARD_CONFIG` -- path to the engine YAML file (default: built-in defaults)
    /// - `ORCHARD_EPISODES` -- number of episodes to evaluate (default 5)
    /// - `ORCHARD_POLICY` -- `random` or `stay` (default `random`)
    /// - `ORCHARD_CONCURRENCY` -- episodes evaluated at once (default 4)
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RunnerError> {
        let engine_config = lookup("ORCHARD_CONFIG")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let episodes: u32 = lookup("ORCHARD_EPISODES")
            .unwrap_or_else(|| DEFAULT_EPISODES.to_string())
            .trim()
            .parse()
            .map_err(|e| RunnerError::Config(format!("invalid ORCHARD_EPISODES: {e}")))?;
        if episodes == 0 {
            return Err(RunnerError::Config(
                "ORCHARD_EPISODES must be at least 1".to_owned(),
            ));
        }

        let policy = match lookup("ORCHARD_POLICY") {
            Some(name) => name.parse()?,
            None => PolicyKind::default(),
        };

        let concurrency: usize = lookup("ORCHARD_CONCURRENCY")
            .unwrap_or_else(|| DEFAULT_CONCURRENCY.to_string())
            .trim()
            .parse()
            .map_err(|e| RunnerError::Config(format!("invalid ORCHARD_CONCURRENCY: {e}")))?;

        Ok(Self {
            engine_config,
            episodes,
            policy,
            concurrency: concurrency.max(1),
        })
    }

    /// Load the engine configuration this driver points at.
    pub fn load_engine_config(&self) -> Result<EngineConfig, RunnerError> {
        let config = match &self.engine_config {
            Some(path) => EngineConfig::from_file(path)
                .map_err(|e| RunnerError::Config(format!("{}: {e}", path.display())))?,
            None => EngineConfig::default(),
        };
        config
            .validate()
            .map_err(|e| RunnerError::Config(e.to_string()))?;
        Ok(config)
    }
}

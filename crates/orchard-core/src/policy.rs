//! The policy contract and two stock policies.
//!
//! Once per tick the runner hands every agent's observation to a
//! [`Policy`] and feeds the returned action map straight into
//! [`OrchardEnv::step`](crate::engine::OrchardEnv::step). The trait hides
//! how actions are chosen: a learned model, a scripted baseline, or a test
//! stub.

use std::collections::BTreeMap;

use orchard_types::{Action, ActionSpace, AgentId, Observation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Errors a policy can report.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The policy failed to produce actions.
    #[error("policy error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

/// A source of per-agent actions.
pub trait Policy {
    /// Choose one action per observed agent.
    ///
    /// Agents left out of the returned map sit the tick out.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if no actions can be produced at all.
    fn act(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Result<BTreeMap<AgentId, Action>, PolicyError>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn act(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Result<BTreeMap<AgentId, Action>, PolicyError> {
        (**self).act(observations)
    }
}

/// Every agent stays put every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct StayPolicy;

impl StayPolicy {
    /// Create a new stay policy.
    pub const fn new() -> Self {
        Self
    }
}

impl Policy for StayPolicy {
    fn act(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Result<BTreeMap<AgentId, Action>, PolicyError> {
        Ok(observations.keys().map(|&id| (id, Action::stay())).collect())
    }
}

/// Uniform samples from the action space, independent of observations.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha12Rng,
    space: ActionSpace,
}

impl RandomPolicy {
    /// A random policy with its own seeded random source.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
            space: ActionSpace::STANDARD,
        }
    }

    fn sample(&mut self) -> Action {
        let [codes, payloads] = self.space.nvec();
        let code = self.rng.random_range(0..codes);
        let payload = self.rng.random_range(0..payloads);
        Action::new(
            u8::try_from(code).unwrap_or(u8::MAX),
            u8::try_from(payload).unwrap_or(u8::MAX),
        )
    }
}

impl Policy for RandomPolicy {
    fn act(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Result<BTreeMap<AgentId, Action>, PolicyError> {
        Ok(observations.keys().map(|&id| (id, self.sample())).collect())
    }
}

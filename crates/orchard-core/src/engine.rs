//! The engine facade: one cooperative foraging episode at a time.
//!
//! [`OrchardEnv`] owns the world, the shared channel, the episode clock, and
//! a seeded random source. It exposes the rollout contract used by policies
//! and the runner: [`reset`](OrchardEnv::reset), [`step`](OrchardEnv::step),
//! per-agent observations, and a detached [`WorldSnapshot`] for renderers.
//!
//! A step runs in this order:
//!
//! 1. validate the action map (unknown agents, codes outside `[0, 9]`, a
//!    finished episode); nothing is mutated if validation fails,
//! 2. advance the tick counter,
//! 3. apply the transition phases,
//! 4. compute rewards,
//! 5. render observations and derive truncation.

use std::collections::{BTreeMap, BTreeSet};

use orchard_types::{
    Action, ActionSpace, AgentId, Observation, OBSERVATION_SHAPE, Role, WorldSnapshot,
};
use orchard_world::{Channel, WorldLayout, WorldState};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use tracing::{debug, info};

use crate::clock::EpisodeClock;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::observe;
use crate::reward;
use crate::transition::{self, ResolvedAction, TickContext, TransitionReport};

/// Auxiliary per-agent information for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentInfo {
    /// The agent ran out of stamina and was moved to a random cell.
    pub relocated: bool,
    /// The agent foraged a resource this tick.
    pub consumed: bool,
    /// The agent took a collision penalty.
    pub collided: bool,
    /// Stamina after the tick.
    pub stamina: u8,
    /// Role after the tick.
    pub role: Role,
}

/// Everything returned from one [`OrchardEnv::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Tick that was just executed.
    pub tick: u64,
    /// Post-tick observation per agent.
    pub observations: BTreeMap<AgentId, Observation>,
    /// Reward per agent.
    pub rewards: BTreeMap<AgentId, f64>,
    /// Always `false`; the environment has no terminal states.
    pub terminated: BTreeMap<AgentId, bool>,
    /// `true` for every agent once the tick reaches the step limit.
    pub truncated: BTreeMap<AgentId, bool>,
    /// Auxiliary information per agent.
    pub info: BTreeMap<AgentId, AgentInfo>,
    /// Channel contents after the tick.
    pub channel: Vec<u8>,
}

impl StepOutcome {
    /// Whether the episode ended with this step.
    pub fn is_done(&self) -> bool {
        self.truncated.values().chain(self.terminated.values()).any(|&done| done)
    }

    /// Sum of rewards across agents.
    pub fn total_reward(&self) -> f64 {
        self.rewards.values().sum()
    }
}

/// A multi-agent cooperative foraging environment.
#[derive(Debug, Clone)]
pub struct OrchardEnv {
    /// Validated configuration.
    config: EngineConfig,
    /// Owned random source for layout and relocation.
    rng: ChaCha12Rng,
    /// Grid layers and agents for the current episode.
    world: WorldState,
    /// Shared broadcast buffer.
    channel: Channel,
    /// Tick counter and truncation rule.
    clock: EpisodeClock,
    /// Rewards from the most recent step.
    last_rewards: BTreeMap<AgentId, f64>,
}

impl OrchardEnv {
    /// Build an environment and start its first episode.
    ///
    /// The random source is seeded from `config.world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration does not
    /// validate.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.world.seed);
        let world = WorldState::initialize(layout(&config), &mut rng)?;
        let last_rewards = zero_rewards(&world);
        info!(
            grid_size = config.world.grid_size,
            agents = config.world.agents,
            seed = config.world.seed,
            max_steps = config.episode.max_steps,
            "Orchard environment created"
        );
        Ok(Self {
            channel: Channel::new(config.channel.bytes),
            clock: EpisodeClock::new(config.episode.max_steps),
            config,
            rng,
            world,
            last_rewards,
        })
    }

    /// Start a new episode and return every agent's initial observation.
    ///
    /// With `Some(seed)` the random source is reseeded first, so the same
    /// seed always produces the same layout. With `None` the current random
    /// stream continues. The channel keeps its contents unless
    /// `channel.clear_on_reset` is set.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<BTreeMap<AgentId, Observation>, EngineError> {
        let mut rng = match seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => self.rng.clone(),
        };
        let world = WorldState::initialize(layout(&self.config), &mut rng)?;

        self.rng = rng;
        self.last_rewards = zero_rewards(&world);
        self.world = world;
        self.clock.reset();
        if self.config.channel.clear_on_reset {
            self.channel.clear();
        }
        info!(
            seed,
            forageable = self.world.forageable_count(),
            "Episode reset"
        );
        Ok(observe::observe_all(&self.world))
    }

    /// Advance the episode by one tick.
    ///
    /// Agents missing from `actions` sit the tick out.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EpisodeFinished`] if the episode is already
    /// truncated, [`EngineError::UnknownAgent`] for an id outside the
    /// episode, and [`EngineError::InvalidAction`] for a code above 9. In
    /// each of these cases the engine is left unchanged.
    /// [`EngineError::World`] means a grid layer rejected a coordinate
    /// mid-tick; the episode should be reset after it.
    pub fn step(&mut self, actions: &BTreeMap<AgentId, Action>) -> Result<StepOutcome, EngineError> {
        if self.clock.is_truncated() {
            return Err(EngineError::EpisodeFinished {
                tick: self.clock.tick(),
            });
        }
        let resolved = self.resolve(actions)?;
        let tick = self.clock.advance()?;

        let report = {
            let mut ctx = TickContext {
                world: &mut self.world,
                channel: &mut self.channel,
                rng: &mut self.rng,
                respawn_delay: self.config.respawn.delay,
            };
            transition::apply_tick(&mut ctx, &resolved)?
        };

        let outcome = reward::compute_rewards(&self.world, tick, &self.config.reward);
        let truncated = self.clock.is_truncated();
        let info = self.agent_info(&report, &outcome.collided);

        debug!(
            tick,
            total_reward = outcome.rewards.values().sum::<f64>(),
            collided = outcome.collided.len(),
            forageable = self.world.forageable_count(),
            "Tick complete"
        );
        if truncated {
            info!(tick, "Episode truncated");
        }

        self.last_rewards.clone_from(&outcome.rewards);
        let ids = self.world.agent_ids();
        Ok(StepOutcome {
            tick,
            observations: observe::observe_all(&self.world),
            rewards: outcome.rewards,
            terminated: ids.iter().map(|&id| (id, false)).collect(),
            truncated: ids.iter().map(|&id| (id, truncated)).collect(),
            info,
            channel: self.channel.read(),
        })
    }

    /// Observation for one agent at the current tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAgent`] for an id outside the episode.
    pub fn observe(&self, agent: AgentId) -> Result<Observation, EngineError> {
        observe::observe(&self.world, agent).ok_or(EngineError::UnknownAgent(agent))
    }

    /// Rewards from the most recent step (all zero right after reset).
    pub const fn rewards(&self) -> &BTreeMap<AgentId, f64> {
        &self.last_rewards
    }

    /// Detached copy of the full world state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            grid_size: self.world.size(),
            tick: self.clock.tick(),
            forageable: self.world.forageable_cells(),
            saplings: self.world.sapling_cells(),
            hazards: self.world.hazard_cells(),
            agents: self.world.agents().map(|a| (a.id, a.snapshot())).collect(),
            channel: self.channel.read(),
        }
    }

    /// Agent ids in processing order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.world.agent_ids()
    }

    /// Shape of every observation, `[5, 5, 5]`.
    #[allow(clippy::unused_self)]
    pub const fn observation_shape(&self) -> [usize; 3] {
        OBSERVATION_SHAPE
    }

    /// The multi-discrete action space shared by every agent.
    #[allow(clippy::unused_self)]
    pub const fn action_space(&self) -> ActionSpace {
        ActionSpace::STANDARD
    }

    /// Current channel contents.
    pub fn channel(&self) -> &[u8] {
        self.channel.as_bytes()
    }

    /// Ticks executed in the current episode.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Whether the current episode has reached its step limit.
    pub const fn is_truncated(&self) -> bool {
        self.clock.is_truncated()
    }

    /// The validated configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only access to the world.
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// Mutable access to the world, for setting up scenarios.
    pub const fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// Validate and decode the action map without touching state.
    fn resolve(
        &self,
        actions: &BTreeMap<AgentId, Action>,
    ) -> Result<BTreeMap<AgentId, ResolvedAction>, EngineError> {
        actions
            .iter()
            .map(|(&agent, action)| {
                if self.world.agent(agent).is_none() {
                    return Err(EngineError::UnknownAgent(agent));
                }
                let kind = action.kind().ok_or(EngineError::InvalidAction {
                    agent,
                    code: action.code,
                })?;
                Ok((
                    agent,
                    ResolvedAction {
                        kind,
                        payload: action.payload,
                    },
                ))
            })
            .collect()
    }

    fn agent_info(
        &self,
        report: &TransitionReport,
        collided: &BTreeSet<AgentId>,
    ) -> BTreeMap<AgentId, AgentInfo> {
        self.world
            .agents()
            .map(|agent| {
                (
                    agent.id,
                    AgentInfo {
                        relocated: report.relocated.contains(&agent.id),
                        consumed: agent.consumed_this_tick,
                        collided: collided.contains(&agent.id),
                        stamina: agent.stamina,
                        role: agent.role,
                    },
                )
            })
            .collect()
    }
}

const fn layout(config: &EngineConfig) -> WorldLayout {
    WorldLayout {
        grid_size: config.world.grid_size,
        agent_count: config.world.agents,
    }
}

fn zero_rewards(world: &WorldState) -> BTreeMap<AgentId, f64> {
    world.agents().map(|a| (a.id, 0.0)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small_env() -> OrchardEnv {
        let mut config = EngineConfig::default();
        config.world.grid_size = 10;
        config.world.agents = 3;
        config.episode.max_steps = 5;
        OrchardEnv::new(config).unwrap()
    }

    fn stay_all(env: &OrchardEnv) -> BTreeMap<AgentId, Action> {
        env.agent_ids().into_iter().map(|id| (id, Action::stay())).collect()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.world.agents = 0;
        assert!(matches!(
            OrchardEnv::new(config),
            Err(EngineError::Config { .. })
        ));
    }

    #[test]
    fn reset_returns_one_observation_per_agent() {
        let mut env = small_env();
        let obs = env.reset(Some(1)).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(env.tick(), 0);
        assert!(env.rewards().values().all(|r| r.abs() < f64::EPSILON));
    }

    #[test]
    fn same_seed_same_world() {
        let mut env = small_env();
        env.reset(Some(42)).unwrap();
        let first = env.snapshot();
        env.reset(Some(42)).unwrap();
        assert_eq!(env.snapshot(), first);
    }

    #[test]
    fn reset_without_seed_continues_the_stream() {
        let mut env = small_env();
        env.reset(Some(42)).unwrap();
        let first = env.snapshot();
        env.reset(None).unwrap();
        assert_ne!(env.snapshot(), first);
    }

    #[test]
    fn step_advances_tick_and_truncates() {
        let mut env = small_env();
        for expected in 1..=5 {
            let actions = stay_all(&env);
            let out = env.step(&actions).unwrap();
            assert_eq!(out.tick, expected);
            assert!(out.terminated.values().all(|&t| !t));
            assert_eq!(out.truncated.values().all(|&t| t), expected == 5);
        }
        assert!(env.is_truncated());
    }

    #[test]
    fn step_after_truncation_is_rejected() {
        let mut env = small_env();
        for _ in 0..5 {
            let actions = stay_all(&env);
            env.step(&actions).unwrap();
        }
        let actions = stay_all(&env);
        assert!(matches!(
            env.step(&actions),
            Err(EngineError::EpisodeFinished { tick: 5 })
        ));
        env.reset(None).unwrap();
        assert!(env.step(&actions).is_ok());
    }

    #[test]
    fn invalid_code_leaves_state_untouched() {
        let mut env = small_env();
        let before = env.snapshot();
        let mut actions = stay_all(&env);
        actions.insert(AgentId::new(1), Action::new(10, 0));
        assert!(matches!(
            env.step(&actions),
            Err(EngineError::InvalidAction { code: 10, .. })
        ));
        assert_eq!(env.snapshot(), before);
        assert_eq!(env.tick(), 0);
    }

    #[test]
    fn unknown_agent_leaves_state_untouched() {
        let mut env = small_env();
        let before = env.snapshot();
        let mut actions = stay_all(&env);
        actions.insert(AgentId::new(7), Action::stay());
        assert!(matches!(
            env.step(&actions),
            Err(EngineError::UnknownAgent(id)) if id == AgentId::new(7)
        ));
        assert_eq!(env.snapshot(), before);
    }

    #[test]
    fn observe_unknown_agent_fails() {
        let env = small_env();
        assert!(env.observe(AgentId::new(0)).is_ok());
        assert!(matches!(
            env.observe(AgentId::new(3)),
            Err(EngineError::UnknownAgent(_))
        ));
    }

    #[test]
    fn contract_shapes() {
        let env = small_env();
        assert_eq!(env.observation_shape(), [5, 5, 5]);
        assert_eq!(env.action_space().nvec(), [10, 256]);
        assert_eq!(env.channel(), &[0, 0, 0, 0]);
    }

    #[test]
    fn info_reports_role_and_stamina() {
        let mut env = small_env();
        let mut actions = stay_all(&env);
        actions.insert(AgentId::new(0), Action::switch_role(Role::Gardener));
        let out = env.step(&actions).unwrap();
        let info = out.info.get(&AgentId::new(0)).unwrap();
        assert_eq!(info.role, Role::Gardener);
        assert_eq!(info.stamina, 99);
        assert!(!info.relocated);
    }
}

//! Episode rollouts and multi-episode evaluation.
//!
//! [`Runner`] plays one environment with one policy until every agent is
//! truncated. [`evaluate`] plays several independent episodes, each on its
//! own engine and policy instance seeded with the episode index, and
//! summarizes the per-episode mean agent return.
//!
//! The engine is synchronous. Evaluation moves each episode onto tokio's
//! blocking pool and caps how many run at once with a semaphore.

use std::collections::BTreeMap;
use std::sync::Arc;

use orchard_core::{EngineConfig, OrchardEnv, Policy};
use orchard_types::AgentId;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::PolicyKind;
use crate::error::RunnerError;

/// Totals collected over one episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeReport {
    /// Seed passed to `reset`, if any.
    pub seed: Option<u64>,
    /// Ticks played.
    pub ticks: u64,
    /// Sum of rewards per agent.
    pub returns: BTreeMap<AgentId, f64>,
    /// Successful forages across all agents.
    pub forages: u64,
    /// Collision penalties across all agents.
    pub collisions: u64,
    /// Forced relocations across all agents.
    pub relocations: u64,
}

impl EpisodeReport {
    /// Mean return over agents (0 for an empty report).
    pub fn mean_return(&self) -> f64 {
        mean(&self.returns.values().copied().collect::<Vec<_>>())
    }
}

/// Mean and spread of per-episode mean returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    /// Episodes evaluated.
    pub episodes: u32,
    /// Mean of the per-episode mean agent return.
    pub mean_reward: f64,
    /// Population standard deviation of the per-episode mean agent return.
    pub std_reward: f64,
    /// Per-episode mean agent return, in episode order.
    pub scores: Vec<f64>,
}

impl EvaluationSummary {
    /// Summarize per-episode scores.
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let mean_reward = mean(&scores);
        let variance = mean(
            &scores
                .iter()
                .map(|score| (score - mean_reward).powi(2))
                .collect::<Vec<_>>(),
        );
        Self {
            episodes: u32::try_from(scores.len()).unwrap_or(u32::MAX),
            mean_reward,
            std_reward: variance.sqrt(),
            scores,
        }
    }
}

/// Drives one environment with one policy.
#[derive(Debug)]
pub struct Runner<P> {
    env: OrchardEnv,
    policy: P,
}

impl<P: Policy> Runner<P> {
    /// Pair an environment with a policy.
    pub const fn new(env: OrchardEnv, policy: P) -> Self {
        Self { env, policy }
    }

    /// The environment, as left by the last episode.
    pub const fn env(&self) -> &OrchardEnv {
        &self.env
    }

    /// Play one episode from `reset(seed)` until truncation.
    pub fn run_episode(&mut self, seed: Option<u64>) -> Result<EpisodeReport, RunnerError> {
        let mut observations = self.env.reset(seed)?;
        let mut report = EpisodeReport {
            seed,
            ticks: 0,
            returns: self.env.agent_ids().into_iter().map(|id| (id, 0.0)).collect(),
            forages: 0,
            collisions: 0,
            relocations: 0,
        };

        loop {
            let actions = self.policy.act(&observations)?;
            let outcome = self.env.step(&actions)?;

            for (id, reward) in &outcome.rewards {
                *report.returns.entry(*id).or_insert(0.0) += reward;
            }
            for info in outcome.info.values() {
                report.forages = report.forages.saturating_add(u64::from(info.consumed));
                report.collisions = report.collisions.saturating_add(u64::from(info.collided));
                report.relocations = report.relocations.saturating_add(u64::from(info.relocated));
            }
            report.ticks = outcome.tick;

            let done = outcome.is_done();
            observations = outcome.observations;
            if done {
                break;
            }
        }

        info!(
            seed,
            ticks = report.ticks,
            mean_return = report.mean_return(),
            forages = report.forages,
            collisions = report.collisions,
            "Episode complete"
        );
        Ok(report)
    }
}

/// Play `episodes` independent episodes and summarize them.
///
/// Episode `i` builds a fresh engine from `config`, a fresh `policy` seeded
/// with `i`, and resets with seed `i`, so results do not depend on
/// `concurrency` or on scheduling order.
pub async fn evaluate(
    config: &EngineConfig,
    policy: PolicyKind,
    episodes: u32,
    concurrency: usize,
) -> Result<EvaluationSummary, RunnerError> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for episode in 0..episodes {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| RunnerError::Worker(e.to_string()))?;
        let config = config.clone();
        tasks.spawn_blocking(move || -> Result<(u32, EpisodeReport), RunnerError> {
            let _permit = permit;
            let seed = u64::from(episode);
            let env = OrchardEnv::new(config)?;
            let mut runner = Runner::new(env, policy.build(seed));
            runner.run_episode(Some(seed)).map(|report| (episode, report))
        });
        debug!(episode, policy = policy.name(), "Episode scheduled");
    }

    let mut reports = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (episode, report) = joined.map_err(|e| RunnerError::Worker(e.to_string()))??;
        reports.insert(episode, report);
    }

    let scores = reports.values().map(EpisodeReport::mean_return).collect();
    let summary = EvaluationSummary::from_scores(scores);
    info!(
        episodes = summary.episodes,
        mean_reward = summary.mean_reward,
        std_reward = summary.std_reward,
        policy = policy.name(),
        "Evaluation complete"
    );
    Ok(summary)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = u32::try_from(values.len()).map_or(f64::from(u32::MAX), f64::from);
    values.iter().sum::<f64>() / count
}

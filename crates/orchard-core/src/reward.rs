//! Per-tick reward computation.
//!
//! Rewards are computed after the transition has mutated the world, from
//! three independent terms summed per agent:
//!
//! - the forage reward for agents whose `consumed_this_tick` flag is set,
//! - a shared bonus on ticks that are a multiple of the bonus interval,
//!   proportional to the number of forageable cells on the whole grid,
//! - the collision penalty for agents sharing a cell, paired according to
//!   [`CollisionPairing`].

use std::collections::{BTreeMap, BTreeSet};

use orchard_types::{AgentId, GridCoord};
use orchard_world::WorldState;
use tracing::trace;

use crate::clock::EpisodeClock;
use crate::config::{CollisionPairing, RewardConfig};

/// Rewards for one tick plus the agents that took a collision penalty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardOutcome {
    /// Reward per agent; every agent in the world has an entry.
    pub rewards: BTreeMap<AgentId, f64>,
    /// Agents penalized for sharing a cell.
    pub collided: BTreeSet<AgentId>,
}

/// Compute rewards for the tick that just ran.
pub fn compute_rewards(world: &WorldState, tick: u64, config: &RewardConfig) -> RewardOutcome {
    let mut rewards: BTreeMap<AgentId, f64> = world.agents().map(|a| (a.id, 0.0)).collect();

    for agent in world.agents().filter(|a| a.consumed_this_tick) {
        add(&mut rewards, agent.id, config.forage_reward);
    }

    if EpisodeClock::is_multiple(tick, config.bonus_interval) {
        let bonus = config.bonus_per_resource * count_as_f64(world.forageable_count());
        for value in rewards.values_mut() {
            *value += bonus;
        }
        trace!(tick, bonus, "Periodic resource bonus");
    }

    let positions: Vec<(AgentId, GridCoord)> =
        world.agents().map(|a| (a.id, a.position)).collect();
    let penalties = collision_counts(&positions, config.collision_pairing);
    for (&agent, &count) in &penalties {
        add(&mut rewards, agent, config.collision_penalty * f64::from(count));
    }
    let collided: BTreeSet<AgentId> = penalties.into_keys().collect();

    RewardOutcome { rewards, collided }
}

/// How many collision penalties each agent takes this tick.
///
/// `positions` must be in agent-id order. Agents with no penalty are absent
/// from the result.
pub fn collision_counts(
    positions: &[(AgentId, GridCoord)],
    pairing: CollisionPairing,
) -> BTreeMap<AgentId, u32> {
    let mut counts: BTreeMap<AgentId, u32> = BTreeMap::new();
    let mut charge = |agent: AgentId| {
        let count = counts.entry(agent).or_insert(0);
        *count = count.saturating_add(1);
    };

    match pairing {
        CollisionPairing::FirstPair => {
            let mut first_seen: BTreeMap<GridCoord, AgentId> = BTreeMap::new();
            let mut paired: BTreeSet<GridCoord> = BTreeSet::new();
            for &(agent, cell) in positions {
                match first_seen.get(&cell) {
                    Some(&first) => {
                        if paired.insert(cell) {
                            charge(first);
                            charge(agent);
                        }
                    }
                    None => {
                        first_seen.insert(cell, agent);
                    }
                }
            }
        }
        CollisionPairing::Chained => {
            let mut last_seen: BTreeMap<GridCoord, AgentId> = BTreeMap::new();
            for &(agent, cell) in positions {
                if let Some(previous) = last_seen.insert(cell, agent) {
                    charge(previous);
                    charge(agent);
                }
            }
        }
        CollisionPairing::AllMembers => {
            let mut groups: BTreeMap<GridCoord, Vec<AgentId>> = BTreeMap::new();
            for &(agent, cell) in positions {
                groups.entry(cell).or_default().push(agent);
            }
            for agent in groups.into_values().filter(|g| g.len() > 1).flatten() {
                charge(agent);
            }
        }
    }
    counts
}

fn add(rewards: &mut BTreeMap<AgentId, f64>, agent: AgentId, amount: f64) {
    if let Some(value) = rewards.get_mut(&agent) {
        *value += amount;
    }
}

fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use orchard_world::WorldLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;

    fn at(size: u32, cells: &[(u32, (u32, u32))]) -> Vec<(AgentId, GridCoord)> {
        cells
            .iter()
            .map(|&(id, (r, c))| (AgentId::new(id), GridCoord::new(r, c, size)))
            .collect()
    }

    fn world(agents: u32) -> WorldState {
        let mut rng = ChaCha12Rng::seed_from_u64(9);
        let mut world = WorldState::initialize(
            WorldLayout {
                grid_size: 10,
                agent_count: agents,
            },
            &mut rng,
        )
        .unwrap();
        world.clear_forageable().unwrap();
        for (i, id) in (0_i64..).zip(world.agent_ids()) {
            let cell = world.coord(i, i);
            world.place_agent(id, cell).unwrap();
        }
        world
    }

    fn penalties(pairing: CollisionPairing, cells: &[(u32, (u32, u32))]) -> Vec<(u32, u32)> {
        collision_counts(&at(10, cells), pairing)
            .into_iter()
            .map(|(id, n)| (id.index(), n))
            .collect()
    }

    #[test]
    fn no_shared_cells_no_penalty() {
        for pairing in [
            CollisionPairing::FirstPair,
            CollisionPairing::Chained,
            CollisionPairing::AllMembers,
        ] {
            assert!(penalties(pairing, &[(0, (0, 0)), (1, (0, 1))]).is_empty());
        }
    }

    #[test]
    fn two_agents_pair_under_every_scheme() {
        for pairing in [
            CollisionPairing::FirstPair,
            CollisionPairing::Chained,
            CollisionPairing::AllMembers,
        ] {
            assert_eq!(
                penalties(pairing, &[(0, (3, 3)), (1, (3, 3))]),
                vec![(0, 1), (1, 1)]
            );
        }
    }

    #[test]
    fn three_agents_first_pair_only() {
        let cells = [(0, (3, 3)), (1, (3, 3)), (2, (3, 3))];
        assert_eq!(
            penalties(CollisionPairing::FirstPair, &cells),
            vec![(0, 1), (1, 1)]
        );
    }

    #[test]
    fn three_agents_chained_charges_middle_twice() {
        let cells = [(0, (3, 3)), (1, (3, 3)), (2, (3, 3))];
        assert_eq!(
            penalties(CollisionPairing::Chained, &cells),
            vec![(0, 1), (1, 2), (2, 1)]
        );
    }

    #[test]
    fn three_agents_all_members_once_each() {
        let cells = [(0, (3, 3)), (1, (3, 3)), (2, (3, 3))];
        assert_eq!(
            penalties(CollisionPairing::AllMembers, &cells),
            vec![(0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn separate_groups_are_independent() {
        let cells = [(0, (1, 1)), (1, (2, 2)), (2, (1, 1)), (3, (2, 2))];
        assert_eq!(
            penalties(CollisionPairing::FirstPair, &cells),
            vec![(0, 1), (1, 1), (2, 1), (3, 1)]
        );
    }

    #[test]
    fn forage_reward_goes_to_consumers() {
        let mut w = world(2);
        w.agent_mut(AgentId::new(1)).unwrap().consumed_this_tick = true;
        let out = compute_rewards(&w, 1, &RewardConfig::default());
        assert_eq!(out.rewards.get(&AgentId::new(0)), Some(&0.0));
        assert_eq!(out.rewards.get(&AgentId::new(1)), Some(&1.0));
        assert!(out.collided.is_empty());
    }

    #[test]
    fn bonus_only_on_interval_ticks() {
        let mut w = world(2);
        for c in 0..4 {
            let cell = w.coord(9, c);
            w.set_forageable(cell, true).unwrap();
        }
        let config = RewardConfig::default();
        let off = compute_rewards(&w, 49, &config);
        assert_eq!(off.rewards.get(&AgentId::new(0)), Some(&0.0));

        let on = compute_rewards(&w, 50, &config);
        let expected = 0.3 * 4.0;
        for id in [AgentId::new(0), AgentId::new(1)] {
            let value = *on.rewards.get(&id).unwrap();
            assert!((value - expected).abs() < 1e-9, "{id}: {value}");
        }
    }

    #[test]
    fn collision_penalty_is_added() {
        let mut w = world(2);
        let shared = w.coord(5, 5);
        w.place_agent(AgentId::new(0), shared).unwrap();
        w.place_agent(AgentId::new(1), shared).unwrap();
        w.agent_mut(AgentId::new(0)).unwrap().consumed_this_tick = true;
        let out = compute_rewards(&w, 1, &RewardConfig::default());
        assert_eq!(out.rewards.get(&AgentId::new(0)), Some(&0.0));
        assert_eq!(out.rewards.get(&AgentId::new(1)), Some(&-1.0));
        assert_eq!(out.collided.len(), 2);
    }
}

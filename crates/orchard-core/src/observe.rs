//! Egocentric observation rendering.
//!
//! Each agent sees a `5 x 5` window centred on its own cell, wrapping across
//! grid edges. On grids smaller than the window the same cell shows up more
//! than once.

use std::collections::{BTreeMap, BTreeSet};

use orchard_types::{AgentId, GridCoord, Observation, ObservationChannel, VIEW_RADIUS};
use orchard_world::{AgentState, WorldState};

/// Render the observation for one agent.
///
/// Returns `None` if `agent` is not in the world.
pub fn observe(world: &WorldState, agent: AgentId) -> Option<Observation> {
    let occupied = occupied_cells(world);
    world.agent(agent).map(|state| render(world, state, &occupied))
}

/// Render observations for every agent, keyed by id.
pub fn observe_all(world: &WorldState) -> BTreeMap<AgentId, Observation> {
    let occupied = occupied_cells(world);
    world
        .agents()
        .map(|state| (state.id, render(world, state, &occupied)))
        .collect()
}

fn occupied_cells(world: &WorldState) -> BTreeSet<GridCoord> {
    world.agents().map(|a| a.position).collect()
}

fn render(world: &WorldState, agent: &AgentState, occupied: &BTreeSet<GridCoord>) -> Observation {
    let size = world.size();
    let stamina = agent.stamina_fraction();
    let mut observation = Observation::zeros();

    for (row, d_row) in (-VIEW_RADIUS..=VIEW_RADIUS).enumerate() {
        for (col, d_col) in (-VIEW_RADIUS..=VIEW_RADIUS).enumerate() {
            let cell = agent.position.offset(d_row, d_col, size);
            let values = [
                (ObservationChannel::Forageable, flag(world.is_forageable(cell))),
                (ObservationChannel::Sapling, f32::from(world.sapling_stage(cell))),
                (ObservationChannel::Hazard, flag(world.is_hazard(cell))),
                (ObservationChannel::Occupied, flag(occupied.contains(&cell))),
                (ObservationChannel::Stamina, stamina),
            ];
            for (channel, value) in values {
                observation.set(row, col, channel, value);
            }
        }
    }
    observation
}

const fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use orchard_types::OBSERVATION_LEN;
    use orchard_world::WorldLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;

    const CENTER: usize = 2;

    fn world(grid_size: u32, agents: u32) -> WorldState {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let mut world = WorldState::initialize(
            WorldLayout {
                grid_size,
                agent_count: agents,
            },
            &mut rng,
        )
        .unwrap();
        world.clear_forageable().unwrap();
        for coord in world.sapling_cells() {
            world.set_sapling(coord.coord, 0).unwrap();
        }
        for id in world.agent_ids() {
            let origin = world.coord(0, 0);
            world.place_agent(id, origin).unwrap();
        }
        world
    }

    #[test]
    fn shape_and_length_are_fixed() {
        let w = world(10, 1);
        let obs = observe(&w, AgentId::new(0)).unwrap();
        assert_eq!(obs.shape(), [5, 5, 5]);
        assert_eq!(obs.as_slice().len(), OBSERVATION_LEN);
    }

    #[test]
    fn unknown_agent_has_no_observation() {
        let w = world(10, 1);
        assert!(observe(&w, AgentId::new(9)).is_none());
    }

    #[test]
    fn own_cell_is_occupied() {
        let w = world(10, 1);
        let obs = observe(&w, AgentId::new(0)).unwrap();
        assert_eq!(obs.get(CENTER, CENTER, ObservationChannel::Occupied), Some(1.0));
        assert_eq!(obs.get(0, 0, ObservationChannel::Occupied), Some(0.0));
    }

    #[test]
    fn window_wraps_across_edges() {
        let mut w = world(10, 1);
        // One row above (0, 0) is row 9; one column left is column 9.
        let cell = w.coord(9, 9);
        w.set_forageable(cell, true).unwrap();
        let obs = observe(&w, AgentId::new(0)).unwrap();
        assert_eq!(obs.get(1, 1, ObservationChannel::Forageable), Some(1.0));
        let total: f32 = (0..5)
            .flat_map(|r| (0..5).map(move |c| (r, c)))
            .filter_map(|(r, c)| obs.get(r, c, ObservationChannel::Forageable))
            .sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn row_offset_is_the_outer_axis() {
        let mut w = world(10, 1);
        // Two rows south, same column.
        let cell = w.coord(2, 0);
        w.set_forageable(cell, true).unwrap();
        let obs = observe(&w, AgentId::new(0)).unwrap();
        assert_eq!(obs.get(4, CENTER, ObservationChannel::Forageable), Some(1.0));
        assert_eq!(obs.get(CENTER, 4, ObservationChannel::Forageable), Some(0.0));
    }

    #[test]
    fn sapling_channel_carries_raw_stage() {
        let mut w = world(10, 1);
        let cell = w.coord(0, 1);
        w.set_sapling(cell, 2).unwrap();
        let obs = observe(&w, AgentId::new(0)).unwrap();
        assert_eq!(obs.get(CENTER, 3, ObservationChannel::Sapling), Some(2.0));
    }

    #[test]
    fn stamina_channel_is_constant() {
        let mut w = world(10, 1);
        w.agent_mut(AgentId::new(0)).unwrap().stamina = 40;
        let obs = observe(&w, AgentId::new(0)).unwrap();
        for r in 0..5 {
            for c in 0..5 {
                assert_eq!(obs.get(r, c, ObservationChannel::Stamina), Some(0.4));
            }
        }
    }

    #[test]
    fn tiny_grid_repeats_cells() {
        let mut w = world(1, 1);
        let cell = w.coord(0, 0);
        w.set_forageable(cell, true).unwrap();
        let obs = observe(&w, AgentId::new(0)).unwrap();
        for r in 0..5 {
            for c in 0..5 {
                assert_eq!(obs.get(r, c, ObservationChannel::Forageable), Some(1.0));
                assert_eq!(obs.get(r, c, ObservationChannel::Occupied), Some(1.0));
            }
        }
    }

    #[test]
    fn observe_all_covers_every_agent() {
        let w = world(10, 3);
        let all = observe_all(&w);
        assert_eq!(all.len(), 3);
        assert_eq!(all.get(&AgentId::new(1)), observe(&w, AgentId::new(1)).as_ref());
    }
}

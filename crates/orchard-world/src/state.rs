//! The aggregate world: grid layers, respawn timers, and agents.
//!
//! [`WorldState`] is an owned value with no ambient globals. It is created by
//! [`WorldState::initialize`] from a caller-supplied random source and is
//! replaced wholesale on every episode reset.
//!
//! # Initial layout
//!
//! Sampling order is fixed so a given seed always yields the same world:
//!
//! 1. `size / 2` cells marked forageable
//! 2. `size / 3` sapling cells, then one growth stage in `{1, 2}` per cell
//! 3. `size / 4` hazard cells
//! 4. one starting cell per agent, in id order
//!
//! Samples may land on the same cell; later writes simply overwrite earlier
//! ones. Agents may start on the same cell.

use std::collections::BTreeMap;

use orchard_types::{AgentId, GridCoord, SaplingCell};
use rand::Rng;
use tracing::debug;

use crate::agent::{AgentState, TEND_STAMINA_COST};
use crate::error::WorldError;
use crate::layer::ResourceLayer;
use crate::respawn::RespawnSchedule;

/// Dimensions of a world to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldLayout {
    /// Side length of the square grid.
    pub grid_size: u32,
    /// Number of agents to place.
    pub agent_count: u32,
}

/// Everything that lives on the grid during one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    /// Side length of the square grid.
    size: u32,
    /// Forageable resource presence.
    forageable: ResourceLayer<bool>,
    /// Sapling growth stage (0 = none).
    sapling: ResourceLayer<u8>,
    /// Static hazard marker, read-only during play.
    hazard: ResourceLayer<bool>,
    /// Cells cleared by foraging, waiting to regrow.
    respawn: RespawnSchedule,
    /// Agents keyed by id; iteration order is the stable processing order.
    agents: BTreeMap<AgentId, AgentState>,
}

impl WorldState {
    /// Build a fresh world with a random layout drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] or [`WorldError::GridTooLarge`] for
    /// an unusable grid size, and [`WorldError::NoAgents`] for zero agents.
    pub fn initialize(layout: WorldLayout, rng: &mut impl Rng) -> Result<Self, WorldError> {
        if layout.agent_count == 0 {
            return Err(WorldError::NoAgents);
        }
        let size = layout.grid_size;
        let mut forageable = ResourceLayer::new(size)?;
        let mut sapling = ResourceLayer::new(size)?;
        let mut hazard = ResourceLayer::new(size)?;

        for _ in 0..size / 2 {
            forageable.set(random_coord(rng, size), true)?;
        }

        let sapling_cells: Vec<GridCoord> = (0..size / 3).map(|_| random_coord(rng, size)).collect();
        for coord in sapling_cells {
            let stage: u8 = rng.random_range(1..=2);
            sapling.set(coord, stage)?;
        }

        for _ in 0..size / 4 {
            hazard.set(random_coord(rng, size), true)?;
        }

        let agents = (0..layout.agent_count)
            .map(|index| {
                let id = AgentId::new(index);
                (id, AgentState::spawn(id, random_coord(rng, size)))
            })
            .collect();

        let world = Self {
            size,
            forageable,
            sapling,
            hazard,
            respawn: RespawnSchedule::new(),
            agents,
        };
        debug!(
            grid_size = size,
            agents = layout.agent_count,
            forageable = world.forageable_count(),
            saplings = world.sapling.count_non_default(),
            hazards = world.hazard.count_non_default(),
            "World initialized"
        );
        Ok(world)
    }

    /// Side length of the grid.
    pub const fn size(&self) -> u32 {
        self.size
    }

    // -------------------------------------------------------------------
    // Layers
    // -------------------------------------------------------------------

    /// Whether `coord` holds a forageable resource.
    pub fn is_forageable(&self, coord: GridCoord) -> bool {
        self.forageable.get(coord)
    }

    /// Sapling growth stage at `coord` (0 = none).
    pub fn sapling_stage(&self, coord: GridCoord) -> u8 {
        self.sapling.get(coord)
    }

    /// Whether `coord` carries the hazard marker.
    pub fn is_hazard(&self, coord: GridCoord) -> bool {
        self.hazard.get(coord)
    }

    /// Number of forageable cells on the whole grid.
    pub fn forageable_count(&self) -> usize {
        self.forageable.count_non_default()
    }

    /// Forageable cells in row-major order.
    pub fn forageable_cells(&self) -> Vec<GridCoord> {
        self.forageable
            .non_default_cells()
            .into_iter()
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Sapling cells with their stage, row-major.
    pub fn sapling_cells(&self) -> Vec<SaplingCell> {
        self.sapling
            .non_default_cells()
            .into_iter()
            .map(|(coord, stage)| SaplingCell { coord, stage })
            .collect()
    }

    /// Hazard cells in row-major order.
    pub fn hazard_cells(&self) -> Vec<GridCoord> {
        self.hazard
            .non_default_cells()
            .into_iter()
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Overwrite forageable presence at `coord` (scenario setup).
    ///
    /// Clearing a cell this way does not schedule a respawn; only
    /// [`forage`](Self::forage) does. Restoring a cell drops any pending
    /// respawn for it, so a scheduled cell is never also forageable.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOutOfBounds`] for a foreign coordinate.
    pub fn set_forageable(&mut self, coord: GridCoord, present: bool) -> Result<(), WorldError> {
        self.forageable.set(coord, present)?;
        if present && self.respawn.cancel(coord) {
            debug!(%coord, "Pending respawn dropped by manual restore");
        }
        Ok(())
    }

    /// Overwrite the sapling stage at `coord` (scenario setup).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOutOfBounds`] for a foreign coordinate.
    pub fn set_sapling(&mut self, coord: GridCoord, stage: u8) -> Result<(), WorldError> {
        self.sapling.set(coord, stage)
    }

    /// Remove every forageable resource and pending respawn (scenario setup).
    pub fn clear_forageable(&mut self) -> Result<(), WorldError> {
        self.forageable = ResourceLayer::new(self.size)?;
        self.respawn = RespawnSchedule::new();
        Ok(())
    }

    // -------------------------------------------------------------------
    // Mechanics
    // -------------------------------------------------------------------

    /// Pick the resource at `coord` if present and schedule its respawn.
    ///
    /// Returns `true` if something was picked.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOutOfBounds`] for a foreign coordinate.
    pub fn forage(&mut self, coord: GridCoord, respawn_delay: u32) -> Result<bool, WorldError> {
        if !self.forageable.get(coord) {
            return Ok(false);
        }
        self.forageable.set(coord, false)?;
        self.respawn.schedule(coord, respawn_delay);
        Ok(true)
    }

    /// Tend the sapling under `agent`, lowering its stage by one and costing
    /// the agent [`TEND_STAMINA_COST`] stamina.
    ///
    /// Returns `true` if a sapling was tended.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] for an unknown agent.
    pub fn tend(&mut self, agent: AgentId) -> Result<bool, WorldError> {
        let state = self
            .agents
            .get_mut(&agent)
            .ok_or(WorldError::AgentNotFound(agent))?;
        let coord = state.position;
        let stage = self.sapling.get(coord);
        if stage == 0 {
            return Ok(false);
        }
        self.sapling.set(coord, stage.saturating_sub(1))?;
        state.spend_stamina(TEND_STAMINA_COST);
        Ok(true)
    }

    /// Advance every respawn countdown, regrowing expired cells.
    ///
    /// Returns the cells that regrew this tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOutOfBounds`] if a scheduled cell does not
    /// belong to this grid.
    pub fn advance_respawns(&mut self) -> Result<Vec<GridCoord>, WorldError> {
        let expired = self.respawn.advance();
        for coord in &expired {
            self.forageable.set(*coord, true)?;
        }
        Ok(expired)
    }

    /// The pending respawn timers.
    pub const fn respawn_schedule(&self) -> &RespawnSchedule {
        &self.respawn
    }

    /// Draw a uniformly random cell.
    pub fn random_coord(&self, rng: &mut impl Rng) -> GridCoord {
        random_coord(rng, self.size)
    }

    /// Build a wrapped coordinate on this grid.
    pub fn coord(&self, row: i64, col: i64) -> GridCoord {
        GridCoord::wrapped(row, col, self.size)
    }

    // -------------------------------------------------------------------
    // Agents
    // -------------------------------------------------------------------

    /// Agent ids in processing order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Look up one agent.
    pub fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.get(&id)
    }

    /// Look up one agent mutably.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(&id)
    }

    /// Iterate agents in id order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.values()
    }

    /// Iterate agents mutably in id order.
    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut AgentState> {
        self.agents.values_mut()
    }

    /// Place an agent on `coord` (scenario setup).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] for an unknown agent.
    pub fn place_agent(&mut self, id: AgentId, coord: GridCoord) -> Result<(), WorldError> {
        let size = self.size;
        let agent = self.agents.get_mut(&id).ok_or(WorldError::AgentNotFound(id))?;
        agent.position = GridCoord::new(coord.row(), coord.col(), size);
        Ok(())
    }
}

/// Draw a uniformly random cell on a grid of `size`.
fn random_coord(rng: &mut impl Rng, size: u32) -> GridCoord {
    let row = rng.random_range(0..size.max(1));
    let col = rng.random_range(0..size.max(1));
    GridCoord::new(row, col, size)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;
    use crate::agent::MAX_STAMINA;

    fn layout(grid_size: u32, agent_count: u32) -> WorldLayout {
        WorldLayout {
            grid_size,
            agent_count,
        }
    }

    fn world(seed: u64) -> WorldState {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        WorldState::initialize(layout(10, 3), &mut rng).unwrap()
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(world(7), world(7));
    }

    #[test]
    fn layout_counts_are_bounded_by_sample_counts() {
        let w = world(1);
        assert!(w.forageable_count() >= 1 && w.forageable_count() <= 5);
        assert!(w.sapling_cells().len() <= 3);
        assert!(w.hazard_cells().len() <= 2);
        assert!(w.sapling_cells().iter().all(|c| (1..=2).contains(&c.stage)));
        assert!(w.respawn_schedule().is_empty());
    }

    #[test]
    fn agents_start_as_full_stamina_foragers() {
        let w = world(3);
        assert_eq!(w.agent_ids(), vec![AgentId::new(0), AgentId::new(1), AgentId::new(2)]);
        assert!(w.agents().all(|a| a.stamina == MAX_STAMINA));
        assert!(w.agents().all(|a| a.position.row() < 10 && a.position.col() < 10));
    }

    #[test]
    fn zero_agents_is_rejected() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let result = WorldState::initialize(layout(10, 0), &mut rng);
        assert!(matches!(result, Err(WorldError::NoAgents)));
    }

    #[test]
    fn zero_grid_is_rejected() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let result = WorldState::initialize(layout(0, 2), &mut rng);
        assert!(matches!(result, Err(WorldError::EmptyGrid)));
    }

    #[test]
    fn tiny_grid_has_no_resources_but_is_valid() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let w = WorldState::initialize(layout(1, 2), &mut rng).unwrap();
        assert_eq!(w.forageable_count(), 0);
        assert!(w.agents().all(|a| a.position == GridCoord::new(0, 0, 1)));
    }

    #[test]
    fn forage_clears_and_schedules() {
        let mut w = world(2);
        let cell = w.coord(4, 4);
        w.set_forageable(cell, true).unwrap();
        assert!(w.forage(cell, 3).unwrap());
        assert!(!w.is_forageable(cell));
        assert_eq!(w.respawn_schedule().remaining(cell), Some(3));
        assert!(!w.forage(cell, 3).unwrap(), "second pick finds nothing");
    }

    #[test]
    fn respawn_regrows_after_delay() {
        let mut w = world(2);
        w.clear_forageable().unwrap();
        let cell = w.coord(0, 0);
        w.set_forageable(cell, true).unwrap();
        w.forage(cell, 2).unwrap();
        assert!(w.advance_respawns().unwrap().is_empty());
        assert!(!w.is_forageable(cell));
        assert_eq!(w.advance_respawns().unwrap(), vec![cell]);
        assert!(w.is_forageable(cell));
        assert!(!w.respawn_schedule().contains(cell));
    }

    #[test]
    fn tend_lowers_stage_and_costs_stamina() {
        let mut w = world(4);
        let id = AgentId::new(0);
        let cell = w.coord(6, 6);
        w.place_agent(id, cell).unwrap();
        w.set_sapling(cell, 2).unwrap();
        assert!(w.tend(id).unwrap());
        assert_eq!(w.sapling_stage(cell), 1);
        assert_eq!(w.agent(id).unwrap().stamina, MAX_STAMINA - TEND_STAMINA_COST);
        assert!(w.tend(id).unwrap());
        assert!(!w.tend(id).unwrap(), "nothing left to tend");
        assert_eq!(w.sapling_stage(cell), 0);
    }

    #[test]
    fn tend_unknown_agent_fails() {
        let mut w = world(4);
        assert!(matches!(
            w.tend(AgentId::new(99)),
            Err(WorldError::AgentNotFound(_))
        ));
    }

    #[test]
    fn manual_restore_drops_pending_respawn() {
        let mut w = world(5);
        w.clear_forageable().unwrap();
        let cell = w.coord(-1, -1);
        assert_eq!(cell, GridCoord::new(9, 9, 10));
        w.set_forageable(cell, true).unwrap();
        w.forage(cell, 3).unwrap();
        assert!(w.respawn_schedule().contains(cell));

        w.set_forageable(cell, true).unwrap();
        assert!(!w.respawn_schedule().contains(cell));
        assert!(w.forage(cell, 3).unwrap());
        assert_eq!(w.respawn_schedule().remaining(cell), Some(3));
    }

    #[test]
    fn foreign_coordinate_forages_nothing() {
        let mut w = world(5);
        let foreign = GridCoord::new(12, 12, 20);
        assert!(!w.forage(foreign, 3).unwrap());
        assert!(w.respawn_schedule().is_empty());
    }
}

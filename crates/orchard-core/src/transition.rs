//! The per-tick transition: movement, role interactions, respawn.
//!
//! A tick is applied as a sequence of phases. Each phase visits every agent
//! in id order before the next phase starts, so no agent sees another
//! agent's movement until the whole movement phase has run:
//!
//! 1. **Reset** -- clear every agent's `consumed_this_tick` flag.
//! 2. **Movement** -- apply moves and role switches, spend one stamina;
//!    exhausted agents are relocated to a random cell at full stamina.
//! 3. **Interaction** -- agents that chose code 9 act according to their
//!    current role (broadcast, forage, tend). A gardener that tends itself
//!    down to zero stamina is relocated on the spot.
//! 4. **Respawn** -- advance regrowth timers; expired cells regrow.
//!
//! Actions reach this module already validated. The only failures left are
//! world layer errors, which mean a coordinate escaped its grid.
//! Agents without an action this tick sit out every phase and spend no
//! stamina.

use std::collections::{BTreeMap, BTreeSet};

use orchard_types::{ActionKind, AgentId, GridCoord, Role};
use orchard_world::{Channel, MOVE_STAMINA_COST, WorldError, WorldState};
use rand::Rng;
use tracing::{debug, trace};

/// A validated action ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAction {
    /// Decoded action code.
    pub kind: ActionKind,
    /// Payload byte, used by a scout's broadcast.
    pub payload: u8,
}

/// What happened during one transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionReport {
    /// Agents relocated after running out of stamina.
    pub relocated: BTreeSet<AgentId>,
    /// Agents that picked a forageable resource.
    pub foraged: BTreeSet<AgentId>,
    /// Agents that tended a sapling.
    pub tended: BTreeSet<AgentId>,
    /// Scout broadcasts in the order they were written; the last one is
    /// what the channel holds.
    pub broadcasts: Vec<(AgentId, u8)>,
    /// Cells that regrew at the end of the tick.
    pub regrown: Vec<GridCoord>,
}

/// Everything a transition mutates.
pub struct TickContext<'a, R: Rng> {
    /// Grid layers, respawn timers, and agents.
    pub world: &'a mut WorldState,
    /// Shared broadcast channel.
    pub channel: &'a mut Channel,
    /// Engine random source, used for forced relocation.
    pub rng: &'a mut R,
    /// Delay applied to newly foraged cells.
    pub respawn_delay: u32,
}

/// Apply one tick of actions.
///
/// # Errors
///
/// Propagates [`WorldError`] from the grid layers.
pub fn apply_tick<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    actions: &BTreeMap<AgentId, ResolvedAction>,
) -> Result<TransitionReport, WorldError> {
    let mut report = TransitionReport::default();

    phase_reset(ctx.world);
    phase_movement(ctx, actions, &mut report);
    phase_interaction(ctx, actions, &mut report)?;
    report.regrown = ctx.world.advance_respawns()?;

    debug!(
        relocated = report.relocated.len(),
        foraged = report.foraged.len(),
        tended = report.tended.len(),
        broadcasts = report.broadcasts.len(),
        regrown = report.regrown.len(),
        "Transition applied"
    );
    Ok(report)
}

/// Phase 1: clear per-tick flags.
fn phase_reset(world: &mut WorldState) {
    for agent in world.agents_mut() {
        agent.consumed_this_tick = false;
    }
}

/// Phase 2: moves, role switches, stamina, forced relocation.
fn phase_movement<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    actions: &BTreeMap<AgentId, ResolvedAction>,
    report: &mut TransitionReport,
) {
    let size = ctx.world.size();
    for (&agent_id, action) in actions {
        let Some(agent) = ctx.world.agent_mut(agent_id) else {
            continue;
        };

        match action.kind {
            ActionKind::Move(direction) => {
                let (d_row, d_col) = direction.delta();
                agent.position = agent.position.offset(d_row, d_col, size);
            }
            ActionKind::SwitchRole(role) => agent.role = role,
            ActionKind::Stay | ActionKind::Reserved | ActionKind::Interact => {}
        }

        if agent.spend_stamina(MOVE_STAMINA_COST) {
            relocate(ctx, agent_id, report);
        }
    }
}

/// Send an exhausted agent to a random cell at full stamina.
fn relocate<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    agent_id: AgentId,
    report: &mut TransitionReport,
) {
    let to = ctx.world.random_coord(&mut *ctx.rng);
    let Some(agent) = ctx.world.agent_mut(agent_id) else {
        return;
    };
    let from = agent.position;
    agent.respawn_at(to);
    debug!(%agent_id, %from, %to, "Agent exhausted, relocated");
    report.relocated.insert(agent_id);
}

/// Phase 3: role-specific interactions for agents that chose code 9.
fn phase_interaction<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    actions: &BTreeMap<AgentId, ResolvedAction>,
    report: &mut TransitionReport,
) -> Result<(), WorldError> {
    for (&agent_id, action) in actions {
        if action.kind != ActionKind::Interact {
            continue;
        }
        let Some(agent) = ctx.world.agent(agent_id) else {
            continue;
        };
        let (role, position) = (agent.role, agent.position);

        match role {
            Role::Scout => {
                ctx.channel.write(&[action.payload]);
                report.broadcasts.push((agent_id, action.payload));
                trace!(%agent_id, payload = action.payload, "Scout broadcast");
            }
            Role::Forager => {
                if ctx.world.forage(position, ctx.respawn_delay)? {
                    if let Some(agent) = ctx.world.agent_mut(agent_id) {
                        agent.consumed_this_tick = true;
                    }
                    report.foraged.insert(agent_id);
                    trace!(%agent_id, %position, "Forager picked resource");
                }
            }
            Role::Gardener => {
                if ctx.world.tend(agent_id)? {
                    report.tended.insert(agent_id);
                    trace!(%agent_id, %position, "Gardener tended sapling");
                    if ctx.world.agent(agent_id).is_some_and(|a| a.stamina == 0) {
                        relocate(ctx, agent_id, report);
                    }
                }
            }
        }
    }
    Ok(())
}

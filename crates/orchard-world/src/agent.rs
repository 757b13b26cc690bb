//! Per-agent mutable state.

use orchard_types::{AgentId, AgentSnapshot, GridCoord, Role};

/// Full stamina; also the value an agent is reset to after exhaustion.
pub const MAX_STAMINA: u8 = 100;

/// Stamina spent by every acting agent during the movement phase.
pub const MOVE_STAMINA_COST: u8 = 1;

/// Extra stamina a gardener spends to tend a sapling.
pub const TEND_STAMINA_COST: u8 = 5;

/// State of one agent within an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    /// Stable identifier.
    pub id: AgentId,
    /// Current cell.
    pub position: GridCoord,
    /// Active role.
    pub role: Role,
    /// Stamina in `0..=MAX_STAMINA`.
    pub stamina: u8,
    /// Set by a successful forage, cleared at the start of every tick.
    pub consumed_this_tick: bool,
}

impl AgentState {
    /// A fresh agent at `position` with full stamina and the initial role.
    pub const fn spawn(id: AgentId, position: GridCoord) -> Self {
        Self {
            id,
            position,
            role: Role::INITIAL,
            stamina: MAX_STAMINA,
            consumed_this_tick: false,
        }
    }

    /// Spend `amount` stamina, flooring at zero. Returns `true` if the agent
    /// is now exhausted.
    pub const fn spend_stamina(&mut self, amount: u8) -> bool {
        self.stamina = self.stamina.saturating_sub(amount);
        self.stamina == 0
    }

    /// Move to `position` and restore full stamina.
    pub const fn respawn_at(&mut self, position: GridCoord) {
        self.position = position;
        self.stamina = MAX_STAMINA;
    }

    /// Stamina as a fraction of [`MAX_STAMINA`].
    pub fn stamina_fraction(&self) -> f32 {
        f32::from(self.stamina) / f32::from(MAX_STAMINA)
    }

    /// Renderer-facing view of this agent.
    pub const fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            role: self.role,
            stamina: self.stamina,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> AgentState {
        AgentState::spawn(AgentId::new(0), GridCoord::new(1, 1, 5))
    }

    #[test]
    fn spawns_as_forager_with_full_stamina() {
        let a = agent();
        assert_eq!(a.role, Role::Forager);
        assert_eq!(a.stamina, MAX_STAMINA);
        assert!(!a.consumed_this_tick);
    }

    #[test]
    fn stamina_floors_at_zero() {
        let mut a = agent();
        a.stamina = 3;
        assert!(a.spend_stamina(TEND_STAMINA_COST));
        assert_eq!(a.stamina, 0);
    }

    #[test]
    fn respawn_restores_stamina() {
        let mut a = agent();
        a.stamina = 0;
        a.respawn_at(GridCoord::new(4, 0, 5));
        assert_eq!(a.stamina, MAX_STAMINA);
        assert_eq!(a.position, GridCoord::new(4, 0, 5));
    }

    #[test]
    fn fraction_is_normalized() {
        let mut a = agent();
        a.stamina = 25;
        assert!((a.stamina_fraction() - 0.25).abs() < f32::EPSILON);
    }
}

//! Countdown timers for foraged cells.
//!
//! When a forager clears a cell, the cell is entered here with the configured
//! delay. Each tick [`RespawnSchedule::advance`] decrements every countdown
//! and hands back the cells whose countdown reached zero; the caller sets
//! those cells back to forageable in the same tick. A cell is scheduled if
//! and only if it was cleared by foraging and has not yet regrown.

use std::collections::BTreeMap;

use orchard_types::GridCoord;

/// Pending respawns keyed by cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RespawnSchedule {
    /// Remaining ticks per cell, always >= 1 between ticks.
    pending: BTreeMap<GridCoord, u32>,
}

impl RespawnSchedule {
    /// Create an empty schedule.
    pub const fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Schedule `coord` to respawn after `delay` ticks, replacing any
    /// existing countdown for that cell.
    ///
    /// A zero delay is treated as one tick so the entry stays positive.
    pub fn schedule(&mut self, coord: GridCoord, delay: u32) {
        self.pending.insert(coord, delay.max(1));
    }

    /// Decrement every countdown and remove the ones that reached zero.
    ///
    /// Returns the expired cells in coordinate order.
    pub fn advance(&mut self) -> Vec<GridCoord> {
        let mut expired = Vec::new();
        for (coord, remaining) in &mut self.pending {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                expired.push(*coord);
            }
        }
        for coord in &expired {
            self.pending.remove(coord);
        }
        expired
    }

    /// Drop any pending countdown for `coord`. Returns whether one existed.
    pub fn cancel(&mut self, coord: GridCoord) -> bool {
        self.pending.remove(&coord).is_some()
    }

    /// Remaining ticks for `coord`, if scheduled.
    pub fn remaining(&self, coord: GridCoord) -> Option<u32> {
        self.pending.get(&coord).copied()
    }

    /// Whether `coord` is waiting to respawn.
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.pending.contains_key(&coord)
    }

    /// Number of pending cells.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: u32, col: u32) -> GridCoord {
        GridCoord::new(row, col, 10)
    }

    #[test]
    fn entry_expires_after_exactly_delay_advances() {
        let mut schedule = RespawnSchedule::new();
        schedule.schedule(cell(1, 1), 3);
        assert!(schedule.advance().is_empty());
        assert!(schedule.advance().is_empty());
        assert_eq!(schedule.advance(), vec![cell(1, 1)]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn rescheduling_overwrites_countdown() {
        let mut schedule = RespawnSchedule::new();
        schedule.schedule(cell(0, 0), 5);
        schedule.advance();
        schedule.schedule(cell(0, 0), 5);
        assert_eq!(schedule.remaining(cell(0, 0)), Some(5));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn zero_delay_still_waits_one_tick() {
        let mut schedule = RespawnSchedule::new();
        schedule.schedule(cell(2, 2), 0);
        assert!(schedule.contains(cell(2, 2)));
        assert_eq!(schedule.advance(), vec![cell(2, 2)]);
    }

    #[test]
    fn independent_entries_expire_independently() {
        let mut schedule = RespawnSchedule::new();
        schedule.schedule(cell(0, 1), 1);
        schedule.schedule(cell(0, 2), 2);
        assert_eq!(schedule.advance(), vec![cell(0, 1)]);
        assert_eq!(schedule.remaining(cell(0, 2)), Some(1));
        assert_eq!(schedule.advance(), vec![cell(0, 2)]);
    }

    #[test]
    fn cancelled_entry_never_expires() {
        let mut schedule = RespawnSchedule::new();
        schedule.schedule(cell(3, 3), 2);
        assert!(schedule.cancel(cell(3, 3)));
        assert!(!schedule.cancel(cell(3, 3)));
        assert!(schedule.advance().is_empty());
        assert!(schedule.advance().is_empty());
    }
}

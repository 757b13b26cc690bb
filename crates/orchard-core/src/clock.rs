//! Episode clock: the tick counter and the truncation rule.
//!
//! The tick number is the single source of truth for episode time. It
//! starts at 0 on reset and is incremented at the start of every step, so
//! the first step runs as tick 1. Truncation is derived from the counter,
//! never stored.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter for one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeClock {
    /// Current tick (0 right after reset).
    tick: u64,
    /// Truncation threshold.
    max_steps: u64,
}

impl EpisodeClock {
    /// A clock at tick 0 that truncates at `max_steps`.
    pub const fn new(max_steps: u64) -> Self {
        Self { tick: 0, max_steps }
    }

    /// Tick the next [`advance`](Self::advance) would produce.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] at `u64::MAX`.
    pub const fn peek_next(&self) -> Result<u64, ClockError> {
        match self.tick.checked_add(1) {
            Some(next) => Ok(next),
            None => Err(ClockError::TickOverflow),
        }
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.peek_next()?;
        Ok(self.tick)
    }

    /// Return to tick 0.
    pub const fn reset(&mut self) {
        self.tick = 0;
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Truncation threshold.
    pub const fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Whether the episode has reached its step limit.
    pub const fn is_truncated(&self) -> bool {
        self.tick >= self.max_steps
    }

    /// Whether `tick` falls on a multiple of `interval`.
    ///
    /// A zero interval never fires.
    pub const fn is_multiple(tick: u64, interval: u64) -> bool {
        match tick.checked_rem(interval) {
            Some(rem) => rem == 0,
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_tick_zero() {
        let clock = EpisodeClock::new(10);
        assert_eq!(clock.tick(), 0);
        assert!(!clock.is_truncated());
    }

    #[test]
    fn clock_advances() {
        let mut clock = EpisodeClock::new(10);
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn truncates_at_max_steps() {
        let mut clock = EpisodeClock::new(3);
        clock.advance().unwrap();
        clock.advance().unwrap();
        assert!(!clock.is_truncated());
        clock.advance().unwrap();
        assert!(clock.is_truncated());
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut clock = EpisodeClock::new(3);
        clock.advance().unwrap();
        clock.reset();
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = EpisodeClock {
            tick: u64::MAX,
            max_steps: u64::MAX,
        };
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn multiples_fire_on_interval() {
        assert!(EpisodeClock::is_multiple(50, 50));
        assert!(EpisodeClock::is_multiple(100, 50));
        assert!(!EpisodeClock::is_multiple(49, 50));
        assert!(EpisodeClock::is_multiple(0, 50));
        assert!(!EpisodeClock::is_multiple(50, 0));
    }
}

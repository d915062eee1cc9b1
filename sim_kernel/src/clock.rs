//! # Simulation Clock
//!
//! Monotonic tick counter used as the global time reference.
//!
//! The clock only moves when the simulator tells it to. It carries no
//! observers and emits nothing; per-tick diagnostics belong to
//! [`crate::observer::TickObserver`].

use core_types::Tick;

/// Deterministic simulation clock
///
/// # Examples
///
/// ```
/// use sim_kernel::clock::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.current(), 0);
///
/// clock.advance();
/// clock.advance();
/// assert_eq!(clock.current(), 2);
///
/// clock.reset();
/// assert_eq!(clock.current(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimClock {
    /// Current tick count
    ticks: Tick,
}

impl SimClock {
    /// Creates a new clock starting at tick 0
    pub fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Returns the current tick without advancing time
    pub fn current(&self) -> Tick {
        self.ticks
    }

    /// Advances the clock by exactly one tick
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Returns the clock to tick 0
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

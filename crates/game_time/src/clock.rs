//! Monotonic clocks
//!
//! The loop never reads `Instant` directly; it asks a [`Clock`] so tests can
//! feed it controlled elapsed times.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since the clock's origin. Never decreases.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Default)]
struct ManualState {
    current: Duration,
    script: VecDeque<Duration>,
    slept: Duration,
    readings: u64,
}

/// Deterministic clock for tests
///
/// Time only moves when told to: by [`advance`](Self::advance), by `sleep`,
/// or by a scripted step. Scripted steps are applied one per reading, after the
/// reading is taken, so a script `[a, b]` makes the second reading `a` later
/// than the first and the third `b` later than the second.
///
/// Clones share the same timeline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ManualState>>,
}

impl ManualClock {
    /// Create a clock stopped at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock that advances by each of `steps` in turn
    pub fn scripted<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        let clock = Self::new();
        clock.push_steps(steps);
        clock
    }

    /// Append steps to the script
    pub fn push_steps<I>(&self, steps: I)
    where
        I: IntoIterator<Item = Duration>,
    {
        self.state.borrow_mut().script.extend(steps);
    }

    /// Move time forward immediately
    pub fn advance(&self, by: Duration) {
        self.state.borrow_mut().current += by;
    }

    /// Total time spent in `sleep`
    pub fn slept(&self) -> Duration {
        self.state.borrow().slept
    }

    /// Number of times `now` has been called
    pub fn readings(&self) -> u64 {
        self.state.borrow().readings
    }

    /// Scripted steps not yet applied
    pub fn remaining_steps(&self) -> usize {
        self.state.borrow().script.len()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let mut state = self.state.borrow_mut();
        let reading = state.current;
        state.readings += 1;
        if let Some(step) = state.script.pop_front() {
            state.current += step;
        }
        reading
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.current += duration;
        state.slept += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_system_clock_sleep() {
        let clock = SystemClock::new();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.now() >= Duration::from_millis(5));
    }

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_script_applies_after_reading() {
        let clock = ManualClock::scripted([Duration::from_millis(500), Duration::from_millis(10)]);
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(500));
        assert_eq!(clock.now(), Duration::from_millis(510));
        assert_eq!(clock.now(), Duration::from_millis(510));
        assert_eq!(clock.readings(), 4);
        assert_eq!(clock.remaining_steps(), 0);
    }

    #[test]
    fn test_manual_clock_sleep_advances() {
        let clock = ManualClock::new();
        clock.sleep(Duration::from_millis(16));
        clock.advance(Duration::from_millis(4));
        assert_eq!(clock.now(), Duration::from_millis(20));
        assert_eq!(clock.slept(), Duration::from_millis(16));
    }

    #[test]
    fn test_manual_clock_clones_share_timeline() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }
}

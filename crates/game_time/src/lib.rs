//! Time utilities for the game loop
//!
//! This crate provides:
//! - [`Clock`] - monotonic time source the loop measures against
//! - [`SystemClock`] - wall-clock implementation backed by `Instant`
//! - [`ManualClock`] - scripted clock for deterministic tests
//! - [`FixedStep`] - accumulator that turns elapsed time into whole ticks

mod clock;
mod fixed_step;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fixed_step::{FixedStep, StepBudget};

/// Nanoseconds in one second
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Length of one tick at `rate_hz`, truncated to whole nanoseconds.
///
/// Returns `None` for a rate of zero or a rate so high the tick rounds to zero.
pub fn tick_duration(rate_hz: u32) -> Option<std::time::Duration> {
    if rate_hz == 0 {
        return None;
    }
    let nanos = NANOS_PER_SECOND / u64::from(rate_hz);
    (nanos > 0).then(|| std::time::Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tick_duration_60hz() {
        assert_eq!(tick_duration(60), Some(Duration::from_nanos(16_666_666)));
    }

    #[test]
    fn test_tick_duration_zero_rate() {
        assert_eq!(tick_duration(0), None);
    }

    #[test]
    fn test_tick_duration_max_rate() {
        assert_eq!(tick_duration(1_000_000_000), Some(Duration::from_nanos(1)));
        assert_eq!(tick_duration(u32::MAX), None);
    }
}

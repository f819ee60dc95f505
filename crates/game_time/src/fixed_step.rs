//! Fixed-step accumulator
//!
//! Elapsed frame time goes in, a whole number of simulation ticks comes out.
//! The number of ticks handed out per call is capped so a long stall cannot
//! trigger a spiral of death.

use std::time::Duration;

/// Ticks granted by one call to [`FixedStep::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepBudget {
    /// Number of fixed ticks to simulate now
    pub ticks: u32,
    /// Whole ticks' worth of time thrown away because of the cap
    pub dropped: Duration,
}

impl StepBudget {
    /// Whether the cap cut this budget short
    pub fn was_capped(&self) -> bool {
        !self.dropped.is_zero()
    }
}

/// Accumulates elapsed time and converts it into fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    tick: Duration,
    max_ticks: u32,
    accumulator: Duration,
}

impl FixedStep {
    /// Create an accumulator for ticks of length `tick`, granting at most
    /// `max_ticks` per call.
    ///
    /// # Panics
    /// Panics if `tick` is zero or `max_ticks` is zero. Callers validate
    /// configuration before constructing one.
    pub fn new(tick: Duration, max_ticks: u32) -> Self {
        assert!(!tick.is_zero(), "tick duration must be non-zero");
        assert!(max_ticks > 0, "max_ticks must be at least 1");
        Self {
            tick,
            max_ticks,
            accumulator: Duration::ZERO,
        }
    }

    /// Length of one tick
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Maximum ticks granted per call
    pub fn max_ticks(&self) -> u32 {
        self.max_ticks
    }

    /// Unspent time carried into the next call
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Discard all accumulated time
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    /// Add `elapsed` and take out as many whole ticks as the cap allows.
    ///
    /// The tick count is `min(floor(accumulated / tick), max_ticks)`. The
    /// sub-tick remainder always stays in the accumulator; whole ticks beyond
    /// the cap are dropped and reported in [`StepBudget::dropped`].
    pub fn advance(&mut self, elapsed: Duration) -> StepBudget {
        self.accumulator = self.accumulator.saturating_add(elapsed);

        let tick_nanos = self.tick.as_nanos();
        let acc_nanos = self.accumulator.as_nanos();
        let available = acc_nanos / tick_nanos;
        let remainder = acc_nanos % tick_nanos;

        let ticks = available.min(u128::from(self.max_ticks));
        let dropped_ticks = available - ticks;

        // remainder < tick, which fits in a Duration
        self.accumulator = duration_from_nanos(remainder);

        let dropped = duration_from_nanos(dropped_ticks * tick_nanos);
        if !dropped.is_zero() {
            log::trace!(
                "fixed step capped at {} ticks, dropping {} ticks ({:?})",
                self.max_ticks,
                dropped_ticks,
                dropped
            );
        }

        StepBudget {
            ticks: ticks as u32,
            dropped,
        }
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = (nanos / NANOS_PER_SEC).min(u128::from(u64::MAX)) as u64;
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

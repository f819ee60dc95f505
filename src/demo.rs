//! Placeholder host for the game loop
//!
//! Holds no game content: it tracks simulated time and frame counts so the
//! loop has something to drive until real systems exist.

use std::time::Duration;

use game_loop::{BoxError, Game};

/// Counts ticks and frames, logging once per simulated second
#[derive(Debug, Clone)]
pub struct Heartbeat {
    tick: Duration,
    ticks_per_second: u64,
    ticks: u64,
    frames: u64,
}

impl Heartbeat {
    /// Create a heartbeat for ticks of length `tick`
    pub fn new(tick: Duration) -> Self {
        let ticks_per_second = if tick.is_zero() {
            1
        } else {
            (Duration::from_secs(1).as_nanos() / tick.as_nanos()).max(1) as u64
        };
        Self {
            tick,
            ticks_per_second,
            ticks: 0,
            frames: 0,
        }
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulation time covered by the ticks so far
    pub fn simulated_time(&self) -> Duration {
        let nanos = self.tick.as_nanos() * u128::from(self.ticks);
        let per_second = Duration::from_secs(1).as_nanos();
        Duration::new(
            u64::try_from(nanos / per_second).unwrap_or(u64::MAX),
            (nanos % per_second) as u32,
        )
    }
}

impl Game for Heartbeat {
    fn update(&mut self) -> Result<(), BoxError> {
        self.ticks += 1;
        if self.ticks % self.ticks_per_second == 0 {
            log::trace!(
                "Simulated {:.1}s over {} frames",
                self.simulated_time().as_secs_f64(),
                self.frames
            );
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), BoxError> {
        self.frames += 1;
        Ok(())
    }
}

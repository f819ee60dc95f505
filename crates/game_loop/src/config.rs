//! Loop configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::LoopError;

/// Timing parameters for [`FixedTimestepLoop`](crate::FixedTimestepLoop)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Most `update` calls one iteration may make while catching up
    pub max_ticks_per_iteration: u32,
    /// Upper bound on iterations per second; `None` leaves pacing to the display
    pub max_frame_rate: Option<u32>,
    /// How often to log fps/ups at debug level, in milliseconds (0 disables)
    pub stats_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_ticks_per_iteration: 5,
            max_frame_rate: None,
            stats_interval_ms: 1000,
        }
    }
}

impl LoopConfig {
    /// Builder: set the tick rate
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz;
        self
    }

    /// Builder: set the per-iteration catch-up cap
    pub fn with_max_ticks(mut self, max: u32) -> Self {
        self.max_ticks_per_iteration = max;
        self
    }

    /// Builder: limit iterations per second
    pub fn with_max_frame_rate(mut self, fps: Option<u32>) -> Self {
        self.max_frame_rate = fps;
        self
    }

    /// Builder: set the statistics interval
    pub fn with_stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Length of one simulation tick
    pub fn tick_duration(&self) -> Result<Duration, LoopError> {
        game_time::tick_duration(self.tick_rate_hz).ok_or_else(|| {
            LoopError::InvalidConfig(format!(
                "tick_rate_hz must be between 1 and 1000000000, got {}",
                self.tick_rate_hz
            ))
        })
    }

    /// Minimum iteration length implied by `max_frame_rate`
    pub fn frame_budget(&self) -> Option<Duration> {
        self.max_frame_rate.and_then(game_time::tick_duration)
    }

    /// Statistics interval, if enabled
    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_ms > 0).then(|| Duration::from_millis(self.stats_interval_ms))
    }

    /// Check every field is usable
    pub fn validate(&self) -> Result<(), LoopError> {
        self.tick_duration()?;

        if self.max_ticks_per_iteration == 0 {
            return Err(LoopError::InvalidConfig(
                "max_ticks_per_iteration must be at least 1".to_string(),
            ));
        }

        if let Some(fps) = self.max_frame_rate {
            if game_time::tick_duration(fps).is_none() {
                return Err(LoopError::InvalidConfig(format!(
                    "max_frame_rate must be between 1 and 1000000000, got {}",
                    fps
                )));
            }
        }

        Ok(())
    }
}

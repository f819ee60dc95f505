//! Frame statistics

use std::time::Duration;

/// Counts renders and updates over a rolling window and reports rates
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: Duration,
    window_start: Duration,
    frames: u32,
    updates: u32,
}

impl FrameStats {
    /// Report every `interval`, starting at `now`
    pub fn new(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            window_start: now,
            frames: 0,
            updates: 0,
        }
    }

    /// Record one iteration. Returns `(fps, ups)` when the interval has elapsed.
    pub fn record(&mut self, now: Duration, updates: u32) -> Option<(f64, f64)> {
        self.frames += 1;
        self.updates += updates;

        let span = now.saturating_sub(self.window_start);
        if span < self.interval || span.is_zero() {
            return None;
        }

        let secs = span.as_secs_f64();
        let rates = (f64::from(self.frames) / secs, f64::from(self.updates) / secs);

        self.window_start = now;
        self.frames = 0;
        self.updates = 0;

        Some(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_report_before_interval() {
        let mut stats = FrameStats::new(Duration::from_secs(1), Duration::ZERO);
        assert!(stats.record(Duration::from_millis(500), 2).is_none());
    }

    #[test]
    fn test_report_after_interval() {
        let mut stats = FrameStats::new(Duration::from_secs(1), Duration::ZERO);
        for i in 1..=59 {
            assert!(stats.record(Duration::from_millis(i * 16), 1).is_none());
        }
        let (fps, ups) = stats.record(Duration::from_secs(1), 1).unwrap();
        assert!((fps - 60.0).abs() < 1e-9);
        assert!((ups - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_resets_after_report() {
        let mut stats = FrameStats::new(Duration::from_secs(1), Duration::ZERO);
        assert!(stats.record(Duration::from_secs(1), 3).is_some());
        assert!(stats.record(Duration::from_millis(1500), 3).is_none());
        let (fps, ups) = stats.record(Duration::from_secs(2), 0).unwrap();
        assert!((fps - 2.0).abs() < 1e-9);
        assert!((ups - 3.0).abs() < 1e-9);
    }
}

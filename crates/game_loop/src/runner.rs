//! The fixed-timestep run loop
//!
//! Each iteration:
//! 1. Honour a pending stop request
//! 2. Measure elapsed time and feed it to the accumulator
//! 3. Run `update` once per whole tick, up to the catch-up cap
//! 4. Run `render` exactly once
//! 5. Present the frame
//! 6. Poll the surface for a close request
//! 7. Sleep out the rest of the frame budget, if one is configured, or until
//!    the next tick when the surface skipped presenting

use std::time::Duration;

use game_time::{Clock, FixedStep, SystemClock};

use crate::{
    ExitSignal, FrameStats, FrameSurface, Game, LoopConfig, LoopError, Presentation, StopHandle,
};

/// Lifecycle phase of a [`FixedTimestepLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Not running; `run` may be called
    Stopped,
    /// Iterating
    Running,
    /// Leaving the loop and releasing the surface
    Stopping,
}

/// Why a run ended normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The surface reported a close request
    CloseRequested,
    /// [`StopHandle::stop`] or [`FixedTimestepLoop::stop`] was called
    StopRequested,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    /// Iterations that rendered and presented a frame
    pub iterations: u64,
    /// Total `update` calls
    pub updates: u64,
    /// Total `render` calls
    pub renders: u64,
    /// Simulation time discarded by the catch-up cap
    pub dropped_time: Duration,
    /// Unspent time left in the accumulator at exit
    pub remainder: Duration,
    /// What ended the run
    pub exit: ExitReason,
}

/// Per-run timing state, created when a run starts and dropped when it ends
#[derive(Debug, Clone)]
pub(crate) struct LoopState {
    last_time: Duration,
    step: FixedStep,
}

impl LoopState {
    fn new(start: Duration, step: FixedStep) -> Self {
        Self {
            last_time: start,
            step,
        }
    }

    /// Record a new clock reading, returning the time since the last one
    fn measure(&mut self, now: Duration) -> Duration {
        let elapsed = now.saturating_sub(self.last_time);
        self.last_time = now;
        elapsed
    }

    /// Time after the last reading at which the accumulator holds a whole tick
    fn until_next_tick(&self) -> Duration {
        self.step.tick().saturating_sub(self.step.accumulated())
    }
}

/// Drives a [`Game`] against a [`FrameSurface`] at a fixed tick rate
///
/// The loop runs on the calling thread and owns the surface for the duration
/// of [`run`](Self::run); the surface is destroyed before `run` returns, on
/// every path.
pub struct FixedTimestepLoop<C: Clock = SystemClock> {
    config: LoopConfig,
    tick: Duration,
    clock: C,
    phase: LoopPhase,
    stop: ExitSignal,
}

impl FixedTimestepLoop<SystemClock> {
    /// Create a loop measured against wall-clock time
    pub fn new(config: LoopConfig) -> Result<Self, LoopError> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> FixedTimestepLoop<C> {
    /// Create a loop measured against `clock`
    pub fn with_clock(config: LoopConfig, clock: C) -> Result<Self, LoopError> {
        config.validate()?;
        let tick = config.tick_duration()?;

        Ok(Self {
            config,
            tick,
            clock,
            phase: LoopPhase::Stopped,
            stop: ExitSignal::new(),
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Configuration this loop was built with
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Length of one simulation tick
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Handle for stopping the loop from anywhere, including other threads
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(self.stop.clone())
    }

    /// Request a stop at the next iteration boundary
    ///
    /// A request made before [`run`](Self::run) makes the next run exit before
    /// its first iteration.
    pub fn stop(&self) {
        self.stop.request();
    }

    /// Run until the surface asks to close, a stop is requested, or a
    /// callback fails.
    ///
    /// The surface is destroyed exactly once before returning. A failure during
    /// release after a fatal error is reported alongside it as
    /// [`LoopError::Teardown`].
    pub fn run<S, G>(&mut self, mut surface: S, game: &mut G) -> Result<LoopReport, LoopError>
    where
        S: FrameSurface,
        G: Game + ?Sized,
    {
        self.phase = LoopPhase::Running;
        log::info!(
            "Loop running at {} Hz (max {} ticks per iteration)",
            self.config.tick_rate_hz,
            self.config.max_ticks_per_iteration
        );

        let outcome = self.iterate(&mut surface, game);

        self.phase = LoopPhase::Stopping;
        let release = surface.destroy();
        self.phase = LoopPhase::Stopped;
        self.stop.clear();

        match (outcome, release) {
            (Ok(report), Ok(())) => {
                log::info!(
                    "Loop stopped ({:?}) after {} iterations, {} updates",
                    report.exit,
                    report.iterations,
                    report.updates
                );
                Ok(report)
            }
            (Ok(_), Err(release)) => {
                log::error!("Failed to release surface: {}", release);
                Err(LoopError::Release(Box::new(release)))
            }
            (Err(err), Ok(())) => {
                log::error!("Loop stopped on error: {}", err);
                Err(err)
            }
            (Err(err), Err(release)) => {
                log::error!("Loop stopped on error: {}", err);
                log::error!("Failed to release surface: {}", release);
                Err(err.with_release_failure(Box::new(release)))
            }
        }
    }

    fn iterate<S, G>(&mut self, surface: &mut S, game: &mut G) -> Result<LoopReport, LoopError>
    where
        S: FrameSurface,
        G: Game + ?Sized,
    {
        let start = self.clock.now();
        let mut state = LoopState::new(
            start,
            FixedStep::new(self.tick, self.config.max_ticks_per_iteration),
        );
        let mut stats = self
            .config
            .stats_interval()
            .map(|interval| FrameStats::new(interval, start));
        let frame_budget = self.config.frame_budget();

        let mut iterations = 0u64;
        let mut updates = 0u64;
        let mut renders = 0u64;
        let mut dropped_time = Duration::ZERO;

        let exit = loop {
            if self.stop.is_requested() {
                break ExitReason::StopRequested;
            }

            let now = self.clock.now();
            let elapsed = state.measure(now);
            let budget = state.step.advance(elapsed);
            dropped_time += budget.dropped;

            for _ in 0..budget.ticks {
                game.update()
                    .map_err(|source| LoopError::Tick { tick: updates, source })?;
                updates += 1;
            }

            game.render()
                .map_err(|source| LoopError::Render { frame: renders, source })?;
            renders += 1;

            let presentation = surface
                .present_frame()
                .map_err(|e| LoopError::Present(Box::new(e)))?;
            iterations += 1;

            if let Some((fps, ups)) = stats.as_mut().and_then(|s| s.record(now, budget.ticks)) {
                log::debug!("{:.1} fps, {:.1} ups", fps, ups);
            }

            if surface.poll_close_requested() {
                break ExitReason::CloseRequested;
            }

            // Skipped frames never waited on the display: hold them to the tick rate
            let target = match (frame_budget, presentation) {
                (Some(frame), _) => Some(frame),
                (None, Presentation::Skipped) => Some(state.until_next_tick()),
                (None, Presentation::Shown) => None,
            };
            if let Some(target) = target {
                let spent = self.clock.now().saturating_sub(now);
                if spent < target {
                    self.clock.sleep(target - spent);
                }
            }
        };

        self.phase = LoopPhase::Stopping;

        Ok(LoopReport {
            iterations,
            updates,
            renders,
            dropped_time,
            remainder: state.step.accumulated(),
            exit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_time::ManualClock;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, thiserror::Error)]
    #[error("surface error")]
    struct NoError;

    /// Closes after presenting `frames` frames
    struct CountdownSurface {
        frames: u32,
        destroyed: Rc<Cell<u32>>,
    }

    impl FrameSurface for CountdownSurface {
        type Error = NoError;

        fn poll_close_requested(&mut self) -> bool {
            self.frames == 0
        }

        fn present_frame(&mut self) -> Result<Presentation, NoError> {
            self.frames = self.frames.saturating_sub(1);
            Ok(Presentation::Shown)
        }

        fn destroy(self) -> Result<(), NoError> {
            self.destroyed.set(self.destroyed.get() + 1);
            Ok(())
        }
    }

    fn surface(frames: u32) -> (CountdownSurface, Rc<Cell<u32>>) {
        let destroyed = Rc::new(Cell::new(0));
        (
            CountdownSurface {
                frames,
                destroyed: destroyed.clone(),
            },
            destroyed,
        )
    }

    fn idle() -> impl Game {
        crate::callbacks(|| Ok(()), || Ok(()))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = FixedTimestepLoop::new(LoopConfig::default().with_tick_rate(0));
        assert!(matches!(result, Err(LoopError::InvalidConfig(_))));
    }

    #[test]
    fn test_initial_phase_is_stopped() {
        let game_loop = FixedTimestepLoop::with_clock(LoopConfig::default(), ManualClock::new()).unwrap();
        assert_eq!(game_loop.phase(), LoopPhase::Stopped);
        assert_eq!(game_loop.tick_duration(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_run_returns_to_stopped() {
        let mut game_loop =
            FixedTimestepLoop::with_clock(LoopConfig::default(), ManualClock::new()).unwrap();
        let (s, destroyed) = surface(3);
        let report = game_loop.run(s, &mut idle()).unwrap();
        assert_eq!(report.iterations, 3);
        assert_eq!(report.exit, ExitReason::CloseRequested);
        assert_eq!(game_loop.phase(), LoopPhase::Stopped);
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_stop_before_run_skips_iterations() {
        let mut game_loop =
            FixedTimestepLoop::with_clock(LoopConfig::default(), ManualClock::new()).unwrap();
        game_loop.stop();
        let (s, destroyed) = surface(10);
        let report = game_loop.run(s, &mut idle()).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(report.renders, 0);
        assert_eq!(report.exit, ExitReason::StopRequested);
        assert_eq!(destroyed.get(), 1);
        // The request is consumed by the run
        assert!(!game_loop.stop_handle().is_stop_requested());
    }

    #[test]
    fn test_loop_state_measure() {
        let mut state = LoopState::new(
            Duration::from_millis(100),
            FixedStep::new(Duration::from_millis(10), 5),
        );
        assert_eq!(state.measure(Duration::from_millis(130)), Duration::from_millis(30));
        assert_eq!(state.last_time, Duration::from_millis(130));
        // A clock reading that goes backwards measures as zero
        assert_eq!(state.measure(Duration::from_millis(120)), Duration::ZERO);
    }

    #[test]
    fn test_loop_state_until_next_tick() {
        let mut state = LoopState::new(
            Duration::ZERO,
            FixedStep::new(Duration::from_millis(10), 5),
        );
        assert_eq!(state.until_next_tick(), Duration::from_millis(10));
        state.step.advance(Duration::from_millis(23));
        assert_eq!(state.until_next_tick(), Duration::from_millis(7));
    }
}

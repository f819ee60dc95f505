//! Fixed-timestep game loop
//!
//! Drives a host simulation at a constant logical rate while rendering once per
//! iteration, independent of how fast frames can be presented.
//!
//! ## Key Components
//!
//! - [`FixedTimestepLoop`] - the run lifecycle (Stopped → Running → Stopping → Stopped)
//! - [`LoopConfig`] - tick rate, catch-up cap, frame pacing
//! - [`FrameSurface`] - the narrow capability set the loop needs from a display
//! - [`Game`] - host-provided `update`/`render` callbacks
//! - [`StopHandle`] / [`ExitSignal`] - cooperative, thread-safe stop requests

mod config;
mod error;
mod game;
mod runner;
mod signal;
mod stats;
mod surface;

pub use config::LoopConfig;
pub use error::{BoxError, LoopError};
pub use game::{callbacks, Callbacks, Game};
pub use runner::{ExitReason, FixedTimestepLoop, LoopPhase, LoopReport};
pub use signal::{ExitSignal, StopHandle};
pub use stats::FrameStats;
pub use surface::{FrameSurface, Presentation};

// Re-export the clocks so hosts need only one dependency
pub use game_time::{Clock, ManualClock, SystemClock};

//! Game - fixed-timestep window runtime
//!
//! Opens a fixed-size window and drives a host simulation at a constant tick
//! rate through [`game_loop::FixedTimestepLoop`].

pub mod config;
pub mod demo;
pub mod logging;
pub mod systems;

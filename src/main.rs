//! Game - fixed-timestep window runtime
//!
//! Opens the game window and runs the update/render loop until the window is
//! closed. Exits with 0 on a normal close and 1 on any fatal error.

use std::process::ExitCode;

use anyhow::{Context, Result};
use game::{config::AppConfig, demo::Heartbeat, logging, systems::WindowSurface};
use game_loop::{FixedTimestepLoop, LoopReport};

fn main() -> ExitCode {
    // Load configuration before logging so the configured level applies
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    logging::init(&config.debug);
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting {}", config.window.title);

    match run(config) {
        Ok(report) => {
            log::info!(
                "Exited after {} frames and {} ticks",
                report.renders,
                report.updates
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: AppConfig) -> Result<LoopReport> {
    let mut game_loop =
        FixedTimestepLoop::new(config.timing).context("invalid timing configuration")?;

    let surface = WindowSurface::create(config.window, &config.rendering)
        .context("failed to create window")?;

    let mut game = Heartbeat::new(game_loop.tick_duration());
    let report = game_loop.run(surface, &mut game)?;

    Ok(report)
}

//! Window management system
//!
//! Owns the native window, its winit event loop, and the GPU surface. The
//! event loop is pumped from the game loop's thread instead of taking over
//! `main`, so the game loop stays in control of timing.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    error::{EventLoopError, OsError},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

use game_loop::{ExitSignal, FrameSurface, Presentation};

use super::render::{self, RenderContext, RenderError};
use crate::config::{RenderingConfig, WindowConfig};

/// How many times `create` pumps the event loop waiting for the window
const STARTUP_PUMP_LIMIT: u32 = 100;
/// Wait per startup pump
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Window surface errors
#[derive(Debug, Error)]
pub enum WindowError {
    /// Width or height is zero
    #[error("invalid window size {width}x{height}: both dimensions must be positive")]
    InvalidDimensions { width: u32, height: u32 },
    /// The host has no usable display
    #[error("display unavailable")]
    DisplayUnavailable(#[source] EventLoopError),
    /// The platform refused to create the window
    #[error("window creation failed")]
    CreationFailed(#[source] OsError),
    /// The event loop shut down before a window was created
    #[error("event loop exited with code {0} before the window was created")]
    CreationAborted(i32),
    /// The event loop never delivered the window
    #[error("display did not create the window in time")]
    CreationTimedOut,
    /// GPU setup or presentation failed
    #[error("graphics failure")]
    Graphics(#[from] RenderError),
    /// Releasing native resources failed
    #[error("failed to release window resources: {0}")]
    Release(String),
}

impl WindowError {
    /// Whether the window was never shown: bad config or no display
    pub fn is_display_unavailable(&self) -> bool {
        matches!(
            self,
            WindowError::InvalidDimensions { .. }
                | WindowError::DisplayUnavailable(_)
                | WindowError::CreationFailed(_)
                | WindowError::CreationAborted(_)
                | WindowError::CreationTimedOut
        )
    }
}

/// Reject configurations no window can satisfy
fn validate(config: &WindowConfig) -> Result<(), WindowError> {
    if config.width == 0 || config.height == 0 {
        return Err(WindowError::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }
    Ok(())
}

/// Top-left position that centres `window` within a monitor
fn centered_position(
    monitor_origin: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let dx = monitor_size.width.saturating_sub(window.width) / 2;
    let dy = monitor_size.height.saturating_sub(window.height) / 2;
    PhysicalPosition::new(
        monitor_origin.x.saturating_add(dx as i32),
        monitor_origin.y.saturating_add(dy as i32),
    )
}

fn center_on_monitor(window: &Window) {
    let Some(monitor) = window.current_monitor().or_else(|| window.primary_monitor()) else {
        log::debug!("No monitor reported, leaving window placement to the platform");
        return;
    };
    let position = centered_position(monitor.position(), monitor.size(), window.outer_size());
    window.set_outer_position(position);
}

/// Receives winit callbacks while the event loop is pumped
struct SurfaceEvents {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    create_error: Option<OsError>,
    pending_resize: Option<PhysicalSize<u32>>,
    close: ExitSignal,
    released: bool,
}

impl SurfaceEvents {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            create_error: None,
            pending_resize: None,
            close: ExitSignal::new(),
            released: false,
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>, OsError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable)
            .with_visible(false);

        let window = event_loop.create_window(attrs)?;

        if self.config.centered {
            center_on_monitor(&window);
        }
        window.set_visible(true);

        Ok(Arc::new(window))
    }
}

impl ApplicationHandler for SurfaceEvents {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.released || self.window.is_some() || self.create_error.is_some() {
            return;
        }

        match self.create_window(event_loop) {
            Ok(window) => self.window = Some(window),
            Err(e) => self.create_error = Some(e),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if !self.close.is_requested() {
                    log::info!("Window close requested");
                }
                self.close.request();
            }
            WindowEvent::Destroyed => self.close.request(),
            WindowEvent::Resized(size) => self.pending_resize = Some(size),
            _ => {}
        }
    }
}

/// The application window and its presentation surface
///
/// Exposes only what the game loop needs through [`FrameSurface`]. Not `Send`:
/// it must be driven from the thread that created it.
pub struct WindowSurface {
    event_loop: EventLoop<()>,
    events: SurfaceEvents,
    render: Option<RenderContext>,
    clear_color: wgpu::Color,
}

impl WindowSurface {
    /// Create and show the window described by `config`
    ///
    /// The config is validated before any native resource is touched.
    pub fn create(config: WindowConfig, rendering: &RenderingConfig) -> Result<Self, WindowError> {
        validate(&config)?;

        let mut event_loop = EventLoop::new().map_err(WindowError::DisplayUnavailable)?;
        let mut events = SurfaceEvents::new(config);

        for _ in 0..STARTUP_PUMP_LIMIT {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut events)
            {
                return Err(WindowError::CreationAborted(code));
            }
            if let Some(err) = events.create_error.take() {
                return Err(WindowError::CreationFailed(err));
            }
            if events.window.is_some() {
                break;
            }
        }

        let window = events.window.clone().ok_or(WindowError::CreationTimedOut)?;
        let render = pollster::block_on(RenderContext::new(window, events.config.vsync))?;

        log::info!(
            "Created {}x{} window '{}'",
            events.config.width,
            events.config.height,
            events.config.title
        );

        Ok(Self {
            event_loop,
            events,
            render: Some(render),
            clear_color: render::clear_color(rendering.background_color),
        })
    }

    /// Drop GPU objects, then the window, then let the platform process it.
    /// Runs once; later calls do nothing.
    fn release(&mut self) -> Result<(), WindowError> {
        if self.events.released {
            return Ok(());
        }
        self.events.released = true;

        let drained = self.render.take().map_or(true, RenderContext::shutdown);

        if let Some(window) = self.events.window.take() {
            window.set_visible(false);
        }
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.events)
        {
            log::debug!("Event loop exited with code {} during release", code);
        }

        log::info!("Window surface released");

        if drained {
            Ok(())
        } else {
            Err(WindowError::Release(
                "GPU queue still had work after waiting".to_string(),
            ))
        }
    }
}

impl FrameSurface for WindowSurface {
    type Error = WindowError;

    fn poll_close_requested(&mut self) -> bool {
        if !self.events.close.is_requested() {
            if let PumpStatus::Exit(code) = self
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut self.events)
            {
                log::info!("Event loop exited with code {}", code);
                self.events.close.request();
            }
        }
        self.events.close.is_requested()
    }

    fn present_frame(&mut self) -> Result<Presentation, WindowError> {
        let (Some(render), Some(window)) = (self.render.as_mut(), self.events.window.as_ref())
        else {
            return Ok(Presentation::Skipped);
        };

        if let Some(size) = self.events.pending_resize.take() {
            render.resize(size);
        }

        Ok(render.present(window, self.clear_color)?)
    }

    fn destroy(mut self) -> Result<(), WindowError> {
        self.release()
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_rejected_before_display() {
        let config = WindowConfig {
            width: 0,
            ..WindowConfig::default()
        };
        let err = WindowSurface::create(config, &RenderingConfig::default())
            .err()
            .expect("zero width must fail");
        assert!(matches!(err, WindowError::InvalidDimensions { width: 0, height: 600 }));
        assert!(err.is_display_unavailable());
    }

    #[test]
    fn test_zero_height_rejected() {
        let config = WindowConfig {
            height: 0,
            ..WindowConfig::default()
        };
        assert!(validate(&config).is_err());
        assert!(validate(&WindowConfig::default()).is_ok());
    }

    #[test]
    fn test_centered_position() {
        let pos = centered_position(
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(1920, 1080),
            PhysicalSize::new(800, 600),
        );
        assert_eq!(pos, PhysicalPosition::new(560, 240));
    }

    #[test]
    fn test_centered_position_secondary_monitor() {
        let pos = centered_position(
            PhysicalPosition::new(1920, -200),
            PhysicalSize::new(1280, 1024),
            PhysicalSize::new(800, 600),
        );
        assert_eq!(pos, PhysicalPosition::new(2160, 12));
    }

    #[test]
    fn test_centered_position_window_larger_than_monitor() {
        let pos = centered_position(
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(640, 480),
            PhysicalSize::new(800, 600),
        );
        assert_eq!(pos, PhysicalPosition::new(0, 0));
    }

    #[test]
    fn test_graphics_errors_are_not_display_errors() {
        let err = WindowError::from(RenderError::OutOfMemory);
        assert!(!err.is_display_unavailable());
        assert_eq!(err.to_string(), "graphics failure");
    }
}

//! GPU presentation context
//!
//! Owns the wgpu device, queue, and window surface, and presents cleared
//! frames. Drawing beyond the clear belongs to the host.

use std::sync::Arc;
use game_loop::Presentation;
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Render error types
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface could not be created for the window
    #[error("failed to create GPU surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    /// No adapter can present to the surface
    #[error("no GPU adapter can present to this window")]
    NoAdapter,
    /// The adapter refused to create a device
    #[error("failed to create GPU device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format
    #[error("surface supports no texture formats")]
    UnsupportedSurface,
    /// GPU out of memory
    #[error("GPU out of memory")]
    OutOfMemory,
}

/// wgpu objects bound to one window
pub struct RenderContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl RenderContext {
    /// Create a context presenting to `window`
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The surface keeps its own handle to the window
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Game Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new window size
    ///
    /// A zero-sized window (minimised) keeps the old configuration.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if is_zero_sized(new_size) {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Clear the next swap-chain image to `clear` and present it
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped, as
    /// is every frame while the window is zero-sized. Only running out of
    /// memory is an error.
    pub fn present(
        &mut self,
        window: &Window,
        clear: wgpu::Color,
    ) -> Result<Presentation, RenderError> {
        if is_zero_sized(self.size) {
            return Ok(Presentation::Skipped);
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(Presentation::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return Ok(Presentation::Skipped);
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        window.pre_present_notify();
        output.present();

        Ok(Presentation::Shown)
    }

    /// Wait for submitted work and drop the GPU objects.
    ///
    /// Returns false if the queue still had work after the wait.
    pub fn shutdown(self) -> bool {
        self.device.poll(wgpu::Maintain::Wait).is_queue_empty()
    }
}

/// Minimised windows report a zero dimension and cannot be presented to
fn is_zero_sized(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Convert an `[r, g, b, a]` config color to a wgpu clear color
pub fn clear_color(rgba: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0] as f64,
        g: rgba[1] as f64,
        b: rgba[2] as f64,
        a: rgba[3] as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(RenderError::OutOfMemory.to_string(), "GPU out of memory");
        assert_eq!(
            RenderError::NoAdapter.to_string(),
            "no GPU adapter can present to this window"
        );
    }

    #[test]
    fn test_present_mode_follows_vsync() {
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn test_minimised_window_is_zero_sized() {
        assert!(is_zero_sized(PhysicalSize::new(0, 0)));
        assert!(is_zero_sized(PhysicalSize::new(800, 0)));
        assert!(!is_zero_sized(PhysicalSize::new(800, 600)));
    }

    #[test]
    fn test_clear_color_conversion() {
        let color = clear_color([0.25, 0.5, 0.75, 1.0]);
        assert_eq!(color.r, 0.25);
        assert_eq!(color.g, 0.5);
        assert_eq!(color.b, 0.75);
        assert_eq!(color.a, 1.0);
    }
}

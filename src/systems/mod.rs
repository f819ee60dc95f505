//! Application systems
//!
//! The window surface the game loop presents to, and the GPU context behind it.

mod render;
mod window;

pub use render::{RenderContext, RenderError};
pub use window::{WindowError, WindowSurface};

//! The rendering pipeline: depth buffer, rasterizers, shader interface and
//! the driver tying them together.

pub mod context;
pub mod depth;
pub mod framebuffer;
pub mod line;
pub mod rasterizer;
pub mod renderer;
pub mod shader;

pub use context::RenderContext;
pub use depth::DepthBuffer;
pub use rasterizer::{draw_triangle, fill_triangle_scanline};
pub use renderer::Renderer;
pub use shader::{FragCoord, Shader};

/// The legacy scanline filler under its historical path.
pub mod scanline {
    pub use super::rasterizer::fill_triangle_scanline;
}

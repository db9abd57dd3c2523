//! Triangle rasterization algorithms.
//!
//! Available algorithms:
//! - [`draw_triangle`]: bounding box iteration with barycentric tests; drives
//!   the shader pipeline
//! - [`fill_triangle_scanline`]: flat-colored row filling of 2D triangles

mod scanline;
mod triangle;

pub use scanline::fill_triangle_scanline;
pub use triangle::{barycentric, draw_triangle};

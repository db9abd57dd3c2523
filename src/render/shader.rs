//! Programmable stages of the pipeline.
//!
//! This module provides a trait-based abstraction for per-vertex and
//! per-pixel computations, similar to how GPUs separate the fixed-function
//! rasterizer from programmable vertex and fragment shaders.
//!
//! # Architecture
//!
//! The rasterizer handles:
//! - Viewport transform and perspective divide
//! - Bounding box computation
//! - Barycentric coordinate calculation and perspective correction
//! - Depth testing and writing
//!
//! The shader handles:
//! - Transforming vertices to clip space
//! - Storing per-vertex varyings
//! - Attribute interpolation (normals, UVs, etc.)
//! - Texture sampling and lighting
//!
//! # Varyings
//!
//! `vertex` is called for corners 0, 1 and 2 of a face, in that order, right
//! before the face is rasterized. Shaders keep per-corner data in column `nth`
//! of a matrix so that `fragment` can interpolate it with one product:
//!
//! ```ignore
//! let uv: Vec2 = self.varying_uv * bar;
//! ```

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::render::context::RenderContext;

/// Position of a fragment: integer pixel plus interpolated depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragCoord {
    pub x: i32,
    pub y: i32,
    /// Interpolated clip-space z, the value stored in the depth buffer.
    pub depth: f32,
}

/// Vertex and fragment stages of one lighting model.
pub trait Shader {
    /// Reads corner `nth` of face `face`, stores its varyings, and returns its
    /// clip-space position.
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4;

    /// Color of a covered, depth-passing pixel.
    ///
    /// # Arguments
    /// * `frag` - Pixel coordinates and depth
    /// * `bar` - Perspective-corrected barycentric weights, summing to 1
    ///
    /// Returning `None` discards the fragment: neither color nor depth is
    /// written.
    fn fragment(&mut self, frag: FragCoord, bar: Vec3) -> Option<Color>;
}

impl<S: Shader + ?Sized> Shader for &mut S {
    #[inline]
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        (**self).vertex(ctx, face, nth)
    }

    #[inline]
    fn fragment(&mut self, frag: FragCoord, bar: Vec3) -> Option<Color> {
        (**self).fragment(frag, bar)
    }
}

impl<S: Shader + ?Sized> Shader for Box<S> {
    #[inline]
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        (**self).vertex(ctx, face, nth)
    }

    #[inline]
    fn fragment(&mut self, frag: FragCoord, bar: Vec3) -> Option<Color> {
        (**self).fragment(frag, bar)
    }
}

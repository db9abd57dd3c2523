//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a view over a color canvas and its depth buffer with
//! bounds-checked access. The depth buffer enables proper hidden surface
//! removal via the z-buffer algorithm.

use super::depth::DepthBuffer;
use crate::canvas::Canvas;
use crate::colors::Color;

/// A view into color and depth buffers.
///
/// This is a borrowed view, not an owning type - it's meant to be created
/// temporarily when you need to pass both buffers together.
///
/// # Depth Buffer
///
/// Larger values are closer to the camera. A fragment only passes the depth
/// test when it is strictly closer than what is stored.
pub struct FrameBuffer<'a> {
    color: &'a mut Canvas,
    depth: &'a mut DepthBuffer,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view over a canvas and a depth buffer.
    ///
    /// # Panics
    /// Panics in debug builds if the two buffers differ in size.
    pub fn new(color: &'a mut Canvas, depth: &'a mut DepthBuffer) -> Self {
        debug_assert_eq!(
            (color.width(), color.height()),
            (depth.width(), depth.height()),
            "Depth buffer size doesn't match canvas"
        );
        Self { color, depth }
    }

    pub fn width(&self) -> u32 {
        self.color.width().min(self.depth.width())
    }

    pub fn height(&self) -> u32 {
        self.color.height().min(self.depth.height())
    }

    /// Whether a fragment at `depth` would be visible at (x, y).
    ///
    /// Out-of-bounds coordinates never pass.
    #[inline]
    pub fn depth_test(&self, x: i32, y: i32, depth: f32) -> bool {
        self.depth.get(x, y).is_some_and(|stored| stored < depth)
    }

    /// Store a fragment's color and depth without testing.
    #[inline]
    pub fn write(&mut self, x: i32, y: i32, depth: f32, color: Color) {
        self.depth.set(x, y, depth);
        self.color.set(x, y, color);
    }
}

//! Z-buffer for hidden surface removal.
//!
//! Stores the interpolated clip-space z of the closest fragment seen so far.
//! Bigger is closer; an untouched cell holds [`DepthBuffer::EMPTY`], which
//! compares as further than any real depth.

use crate::canvas::{Canvas, Format};
use crate::colors::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub const EMPTY: f32 = f32::NEG_INFINITY;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![Self::EMPTY; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resets every cell to [`DepthBuffer::EMPTY`].
    pub fn clear(&mut self) {
        self.data.fill(Self::EMPTY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Depth at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = depth;
        }
    }

    /// Whether any fragment has been stored at (x, y).
    #[inline]
    pub fn is_written(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|d| d != Self::EMPTY)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Grayscale picture of the buffer: the written range is stretched over
    /// `[0, 255]`, empty cells are black.
    pub fn to_canvas(&self) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height, Format::Grayscale);
        let (lo, hi) = self
            .data
            .iter()
            .filter(|d| **d != Self::EMPTY)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| {
                (lo.min(d), hi.max(d))
            });
        let range = if hi > lo { hi - lo } else { 1.0 };

        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if let Some(d) = self.get(x, y).filter(|d| *d != Self::EMPTY) {
                    canvas.set(x, y, Color::from_intensity((d - lo) / range));
                }
            }
        }
        canvas
    }
}

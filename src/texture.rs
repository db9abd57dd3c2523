use std::path::Path;

use crate::canvas::Canvas;
use crate::colors::Color;
use crate::error::Result;
use crate::math::vec2::Uv;

/// Represents a 2D texture for texture mapping.
#[derive(Debug, Clone)]
pub struct Texture {
    canvas: Canvas,
}

impl Texture {
    /// Load a texture from an image file (TGA, PNG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_canvas(Canvas::open(path)?))
    }

    pub fn from_canvas(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - UV coordinates are in [0,1] range
    /// - (0,0) = bottom-left in OBJ convention, but textures are stored top-left origin
    /// - We flip V to correct for this: v_corrected = 1.0 - v
    ///
    /// # Clamping
    /// UVs outside [0,1] clamp to the edge texel.
    #[inline]
    pub fn sample(&self, uv: Uv) -> Color {
        let (x, y) = texel(uv, self.canvas.width(), self.canvas.height());
        self.canvas.get(x as i32, y as i32).unwrap_or_default()
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

/// Texel that `uv` falls on in a `width` x `height` image with top-left origin.
///
/// Anything that writes into a texture by UV must use this mapping so that
/// [`Texture::sample`] reads the same texel back.
#[inline]
pub fn texel(uv: Uv, width: u32, height: u32) -> (u32, u32) {
    // NaN clamps to NaN, which `as u32` turns into 0.
    let u = uv.u.clamp(0.0, 1.0);
    let v = 1.0 - uv.v.clamp(0.0, 1.0);

    let x = ((u * width as f32) as u32).min(width.saturating_sub(1));
    let y = ((v * height as f32) as u32).min(height.saturating_sub(1));
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Format;
    use crate::colors::{BLUE, GREEN, RED, WHITE};

    /// 2x2 texture: top row red/green, bottom row blue/white.
    fn quad() -> Texture {
        let mut canvas = Canvas::new(2, 2, Format::Rgb);
        canvas.set(0, 0, RED);
        canvas.set(1, 0, GREEN);
        canvas.set(0, 1, BLUE);
        canvas.set(1, 1, WHITE);
        Texture::from_canvas(canvas)
    }

    #[test]
    fn v_is_flipped() {
        let tex = quad();
        // OBJ (0, 0) is the bottom-left corner of the image.
        assert_eq!(tex.sample(Uv::new(0.1, 0.1)), BLUE);
        assert_eq!(tex.sample(Uv::new(0.9, 0.9)), GREEN);
    }

    #[test]
    fn out_of_range_uvs_clamp_to_edge() {
        let tex = quad();
        assert_eq!(tex.sample(Uv::new(-3.0, 0.1)), BLUE);
        assert_eq!(tex.sample(Uv::new(7.0, 0.1)), WHITE);
        assert_eq!(tex.sample(Uv::new(0.1, 2.0)), RED);
        assert_eq!(tex.sample(Uv::new(1.0, 1.0)), GREEN);
    }

    #[test]
    fn texel_mapping_matches_sampling() {
        let tex = quad();
        let uv = Uv::new(0.75, 0.25);
        let (x, y) = texel(uv, 2, 2);
        assert_eq!(tex.canvas().get(x as i32, y as i32), Some(tex.sample(uv)));
    }
}

//! 8-bit RGBA color and the arithmetic shaders need on it.

/// An 8-bit-per-channel color.
///
/// Grayscale canvases store only `r`; see [`Color::gray`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque gray with all three channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Gray from an intensity in `[0, 1]`; values outside are clamped.
    pub fn from_intensity(intensity: f32) -> Self {
        Self::gray(to_channel(intensity * 255.0))
    }

    /// Multiplies the RGB channels by `factor`, clamping to `[0, 255]`.
    /// Alpha is unchanged.
    pub fn scale(self, factor: f32) -> Self {
        self.map_rgb(|c| c as f32 * factor)
    }

    /// Applies `f` to each RGB channel and clamps the result back to a byte.
    pub fn map_rgb(self, f: impl Fn(u8) -> f32) -> Self {
        Self::new(
            to_channel(f(self.r)),
            to_channel(f(self.g)),
            to_channel(f(self.b)),
            self.a,
        )
    }
}

/// Truncates to a byte after clamping; NaN becomes 0.
#[inline]
fn to_channel(v: f32) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_clamps_and_keeps_alpha() {
        let c = Color::new(100, 200, 0, 7).scale(1.5);
        assert_eq!(c, Color::new(150, 255, 0, 7));
        assert_eq!(WHITE.scale(-1.0), Color::rgb(0, 0, 0));
    }

    #[test]
    fn intensity_maps_to_gray() {
        assert_eq!(Color::from_intensity(1.0), WHITE);
        assert_eq!(Color::from_intensity(0.5), Color::gray(127));
        assert_eq!(Color::from_intensity(f32::NAN), BLACK);
    }
}

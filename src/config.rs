use crate::camera::Camera;
use crate::canvas::Format;
use crate::math::vec3::Vec3;

/// Settings for one render: output size, camera, light and projection.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    /// Direction toward the light. Normalized by [`RenderConfig::light_dir`].
    pub light: Vec3,
    /// Perspective projection from the camera distance; orthographic when false.
    pub perspective: bool,
    /// Pixel layout of the color target.
    pub format: Format,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            camera: Camera::default(),
            light: Vec3::new(1.0, 1.0, 1.0),
            perspective: true,
            format: Format::Rgb,
        }
    }
}

impl RenderConfig {
    pub fn light_dir(&self) -> Vec3 {
        self.light.normalize()
    }
}

/// Parameters of the screen-space ambient occlusion post-pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsaoConfig {
    /// Number of directions marched around each pixel.
    pub directions: usize,
    /// How far each march goes, in pixels.
    pub radius: f32,
    /// Contrast exponent applied to the averaged openness.
    pub exponent: f32,
}

impl Default for SsaoConfig {
    fn default() -> Self {
        Self {
            directions: 8,
            radius: 1000.0,
            exponent: 100.0,
        }
    }
}

/// Parameters of texture-space ambient occlusion baking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakeConfig {
    /// Random hemisphere directions to render from.
    pub samples: usize,
    /// Size of the square depth map rendered per sample.
    pub resolution: u32,
    /// Size of the square occlusion texture produced.
    pub texture_size: u32,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            resolution: 1024,
            texture_size: 1024,
        }
    }
}

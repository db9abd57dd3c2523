//! Shaders of the texture-space ambient occlusion bake.
//!
//! See [`ao::bake_texture_space`](crate::ao::bake_texture_space) for how the
//! passes are chained.

use crate::canvas::Canvas;
use crate::colors::Color;
use crate::math::matrix::Matrix;
use crate::math::vec2::Uv;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Model;
use crate::render::{DepthBuffer, FragCoord, RenderContext, Shader};
use crate::texture::{self, Texture};

/// How close a fragment's depth must be to the depth map to count as seen.
const VISIBLE_EPSILON: f32 = 1e-2;

/// Depth-only pass. The color is a gray ramp over clip depth in `[-1, 1]`
/// and only serves for inspection.
pub struct ZShader<'a> {
    model: &'a Model,
}

impl<'a> ZShader<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }
}

impl Shader for ZShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        ctx.to_clip(self.model.vertex(face, nth))
    }

    fn fragment(&mut self, frag: FragCoord, _bar: Vec3) -> Option<Color> {
        Some(Color::from_intensity((frag.depth + 1.0) / 2.0))
    }
}

/// Marks, in `occlusion`, the texel of every fragment that the depth map
/// shows as visible.
///
/// Every fragment is discarded, so the pass never writes its own color or
/// depth buffer and hidden fragments are still tested.
pub struct OcclusionShader<'a> {
    model: &'a Model,
    depth_map: &'a DepthBuffer,
    occlusion: &'a mut Canvas,
    varying_uv: Matrix<2, 3>,
}

impl<'a> OcclusionShader<'a> {
    /// `depth_map` must come from a [`ZShader`] pass with the same context.
    pub fn new(model: &'a Model, depth_map: &'a DepthBuffer, occlusion: &'a mut Canvas) -> Self {
        Self {
            model,
            depth_map,
            occlusion,
            varying_uv: Matrix::zeros(),
        }
    }
}

impl Shader for OcclusionShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.varying_uv.set_col(nth, self.model.uv(face, nth).into());
        ctx.to_clip(self.model.vertex(face, nth))
    }

    fn fragment(&mut self, frag: FragCoord, bar: Vec3) -> Option<Color> {
        let visible = self
            .depth_map
            .get(frag.x, frag.y)
            .is_some_and(|d| (d - frag.depth).abs() < VISIBLE_EPSILON);
        if visible {
            let uv = Uv::from(self.varying_uv * bar);
            let (x, y) = texture::texel(uv, self.occlusion.width(), self.occlusion.height());
            self.occlusion.set(x as i32, y as i32, Color::gray(255));
        }
        None
    }
}

/// Gray from a baked occlusion texture.
pub struct BakedAoShader<'a> {
    model: &'a Model,
    ao: &'a Texture,
    varying_uv: Matrix<2, 3>,
}

impl<'a> BakedAoShader<'a> {
    pub fn new(model: &'a Model, ao: &'a Texture) -> Self {
        Self {
            model,
            ao,
            varying_uv: Matrix::zeros(),
        }
    }
}

impl Shader for BakedAoShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.varying_uv.set_col(nth, self.model.uv(face, nth).into());
        ctx.to_clip(self.model.vertex(face, nth))
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        let uv = Uv::from(self.varying_uv * bar);
        Some(Color::gray(self.ao.sample(uv).r))
    }
}

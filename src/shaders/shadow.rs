//! Two-pass shadow mapping.
//!
//! The first pass renders the model from the light with [`DepthShader`]; the
//! depth buffer it leaves behind is the shadow map. The second pass renders
//! from the camera with [`ShadowShader`], which looks every fragment up in
//! the shadow map to decide whether something sits between it and the light.

use super::{specular, Uniforms};
use crate::colors::Color;
use crate::error::Result;
use crate::math::matrix::{Mat3, Matrix};
use crate::math::vec2::Uv;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Model;
use crate::render::{DepthBuffer, FragCoord, RenderContext, Shader};
use crate::transform::DEPTH;

/// Gray proportional to screen depth: white at the near end of the depth
/// range, black at the far end.
pub struct DepthShader<'a> {
    model: &'a Model,
    varying_depth: Vec3,
}

impl<'a> DepthShader<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            varying_depth: Vec3::ZERO,
        }
    }
}

impl Shader for DepthShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        let clip = ctx.to_clip(self.model.vertex(face, nth));
        let screen = *ctx.viewport() * clip;
        self.varying_depth[nth] = screen.z / screen.w;
        clip
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        Some(Color::from_intensity(self.varying_depth.dot(bar) / DEPTH))
    }
}

/// Phong shading darkened where the shadow map says the light is blocked.
///
/// Normals come from the object-space normal map when the model has one and
/// from the vertices otherwise.
pub struct ShadowShader<'a> {
    model: &'a Model,
    uniforms: Uniforms,
    shadow_map: &'a DepthBuffer,
    light_ctx: RenderContext,
    bias: f32,
    varying_uv: Matrix<2, 3>,
    varying_nrm: Mat3,
    /// Model-space corners, one per column.
    varying_pos: Mat3,
}

impl<'a> ShadowShader<'a> {
    /// Depth slack, in clip units, before a point counts as occluded. Keeps
    /// surfaces from shadowing themselves.
    pub const DEFAULT_BIAS: f32 = 0.05;

    /// Brightness kept in full shadow.
    pub const AMBIENT: f32 = 0.3;

    /// * `ctx` - the camera pass being drawn
    /// * `light_ctx` - the pass that produced `shadow_map`
    /// * `light` - direction toward the light, model space
    pub fn new(
        model: &'a Model,
        ctx: &RenderContext,
        light_ctx: RenderContext,
        shadow_map: &'a DepthBuffer,
        light: Vec3,
    ) -> Result<Self> {
        Ok(Self {
            model,
            uniforms: Uniforms::new(ctx, light)?,
            shadow_map,
            light_ctx,
            bias: Self::DEFAULT_BIAS,
            varying_uv: Matrix::zeros(),
            varying_nrm: Mat3::zeros(),
            varying_pos: Mat3::zeros(),
        })
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Whether the model-space point `p` is the closest thing the light sees
    /// along its ray. Points outside the shadow map are lit.
    pub fn is_lit(&self, p: Vec3) -> bool {
        let clip = self.light_ctx.to_clip(p);
        let screen = *self.light_ctx.viewport() * clip;
        if screen.w == 0.0 {
            return true;
        }
        let x = (screen.x / screen.w).round() as i32;
        let y = (screen.y / screen.w).round() as i32;
        match self.shadow_map.get(x, y) {
            Some(stored) => stored <= clip.z + self.bias,
            None => true,
        }
    }

    fn normal(&self, uv: Uv, bar: Vec3) -> Vec3 {
        if self.model.maps().normal.is_some() {
            self.uniforms
                .normal(self.model.normal_from_map(uv))
                .normalize()
        } else {
            (self.varying_nrm * bar).normalize()
        }
    }
}

impl Shader for ShadowShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        let p = self.model.vertex(face, nth);
        self.varying_pos.set_col(nth, p.into());
        self.varying_uv.set_col(nth, self.model.uv(face, nth).into());
        let n = self.uniforms.normal(self.model.normal(face, nth));
        self.varying_nrm.set_col(nth, n.into());
        ctx.to_clip(p)
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        let shadow = if self.is_lit(self.varying_pos * bar) {
            1.0
        } else {
            Self::AMBIENT
        };

        let uv = Uv::from(self.varying_uv * bar);
        let n = self.normal(uv, bar);
        let (diff, spec) = self.uniforms.terms(self.model, uv, n);
        let c = self.model.diffuse(uv);
        Some(c.map_rgb(|ch| 5.0 + ch as f32 * shadow * (1.2 * diff + 0.6 * spec)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::model::Maps;
    use crate::shaders::fixtures::{facing_triangle, frag, front_ctx, solid};
    use approx::assert_relative_eq;

    #[test]
    fn depth_shader_grays_by_screen_depth() {
        let model = facing_triangle();
        let ctx = front_ctx(64, 64);
        let mut shader = DepthShader::new(&model);
        for nth in 0..3 {
            shader.vertex(&ctx, 0, nth);
        }
        // z = 0 lands in the middle of the depth range.
        assert_relative_eq!(shader.varying_depth.x, DEPTH / 2.0);
        assert_eq!(shader.fragment(frag(), Vec3::ONE / 3.0), Some(Color::gray(127)));
    }

    /// A shadow map seen from +Z whose every texel holds `depth`.
    fn uniform_map(depth: f32) -> DepthBuffer {
        let mut map = DepthBuffer::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                map.set(x, y, depth);
            }
        }
        map
    }

    #[test]
    fn occluded_when_map_holds_something_closer() {
        let model = facing_triangle();
        let ctx = front_ctx(64, 64);
        let map = uniform_map(0.5);
        let shader = ShadowShader::new(&model, &ctx, ctx, &map, Vec3::FORWARD).unwrap();

        assert!(!shader.is_lit(Vec3::new(0.1, 0.1, 0.0)));
        // Within the bias of the stored depth.
        assert!(shader.is_lit(Vec3::new(0.1, 0.1, 0.46)));
        assert!(shader.is_lit(Vec3::new(0.1, 0.1, 0.5)));
    }

    #[test]
    fn unwritten_and_outside_texels_are_lit() {
        let model = facing_triangle();
        let ctx = front_ctx(64, 64);
        let map = DepthBuffer::new(64, 64);
        let shader = ShadowShader::new(&model, &ctx, ctx, &map, Vec3::FORWARD).unwrap();
        assert!(shader.is_lit(Vec3::ZERO));

        let full = uniform_map(10.0);
        let shader = ShadowShader::new(&model, &ctx, ctx, &full, Vec3::FORWARD).unwrap();
        // Projects far to the right of the 64 pixel map.
        assert!(shader.is_lit(Vec3::new(5.0, 0.0, 0.0)));
        assert!(!shader.is_lit(Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn shadowed_fragment_is_darker() {
        let mut model = facing_triangle();
        model.set_maps(Maps {
            diffuse: Some(solid(Color::gray(100))),
            ..Maps::default()
        });
        let ctx = front_ctx(64, 64);
        let light_ctx = RenderContext::look_from(
            &Camera::facing_origin(Vec3::new(0.0, 0.0, 2.0)),
            64,
            64,
            false,
        );
        let light = Vec3::new(0.2, 0.2, 1.0);

        let open = DepthBuffer::new(64, 64);
        let blocked = uniform_map(1.0);
        let bar = Vec3::ONE / 3.0;

        let mut lit = ShadowShader::new(&model, &ctx, light_ctx, &open, light).unwrap();
        let mut dark = ShadowShader::new(&model, &ctx, light_ctx, &blocked, light).unwrap();
        for nth in 0..3 {
            lit.vertex(&ctx, 0, nth);
            dark.vertex(&ctx, 0, nth);
        }
        let lit = lit.fragment(frag(), bar).unwrap();
        let dark = dark.fragment(frag(), bar).unwrap();
        assert!(dark.r < lit.r, "{dark:?} vs {lit:?}");
        assert_eq!(dark.r, dark.g);
    }
}

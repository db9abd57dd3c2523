//! Per-fragment lighting with diffuse and specular maps.
//!
//! All three shaders light in clip space: the light direction is carried by
//! `M = projection * model_view` and normals by `(M^-1)^T`. They only differ
//! in where the fragment normal comes from.

use super::Uniforms;
use crate::colors::Color;
use crate::error::Result;
use crate::math::matrix::{Mat3, Matrix};
use crate::math::vec2::Uv;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Model;
use crate::render::{FragCoord, RenderContext, Shader};

/// Phong shading with normals interpolated from the vertices.
///
/// Built for one [`RenderContext`]; pass the same context to the draw call.
pub struct PhongShader<'a> {
    model: &'a Model,
    uniforms: Uniforms,
    varying_uv: Matrix<2, 3>,
    varying_nrm: Mat3,
}

impl<'a> PhongShader<'a> {
    pub fn new(model: &'a Model, ctx: &RenderContext, light: Vec3) -> Result<Self> {
        Ok(Self {
            model,
            uniforms: Uniforms::new(ctx, light)?,
            varying_uv: Matrix::zeros(),
            varying_nrm: Mat3::zeros(),
        })
    }
}

impl Shader for PhongShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.varying_uv.set_col(nth, self.model.uv(face, nth).into());
        let n = self.uniforms.normal(self.model.normal(face, nth));
        self.varying_nrm.set_col(nth, n.into());
        ctx.to_clip(self.model.vertex(face, nth))
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        let uv = Uv::from(self.varying_uv * bar);
        let n = (self.varying_nrm * bar).normalize();
        Some(self.uniforms.shade(self.model, uv, n))
    }
}

/// Phong shading with normals read from an object-space normal map.
pub struct NormalMapShader<'a> {
    model: &'a Model,
    uniforms: Uniforms,
    varying_uv: Matrix<2, 3>,
}

impl<'a> NormalMapShader<'a> {
    pub fn new(model: &'a Model, ctx: &RenderContext, light: Vec3) -> Result<Self> {
        Ok(Self {
            model,
            uniforms: Uniforms::new(ctx, light)?,
            varying_uv: Matrix::zeros(),
        })
    }
}

impl Shader for NormalMapShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.varying_uv.set_col(nth, self.model.uv(face, nth).into());
        ctx.to_clip(self.model.vertex(face, nth))
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        let uv = Uv::from(self.varying_uv * bar);
        let n = self.uniforms.normal(self.model.normal_from_map(uv)).normalize();
        Some(self.uniforms.shade(self.model, uv, n))
    }
}

/// Phong shading with a tangent-space normal map.
///
/// The map's normals are expressed relative to the surface, so every fragment
/// builds the Darboux basis (tangent, bitangent, interpolated normal) of its
/// triangle and carries the sampled normal through it.
pub struct TangentSpaceShader<'a> {
    model: &'a Model,
    uniforms: Uniforms,
    varying_uv: Matrix<2, 3>,
    varying_nrm: Mat3,
    /// Triangle corners after the perspective divide, one per column.
    ndc_tri: Mat3,
}

impl<'a> TangentSpaceShader<'a> {
    pub fn new(model: &'a Model, ctx: &RenderContext, light: Vec3) -> Result<Self> {
        Ok(Self {
            model,
            uniforms: Uniforms::new(ctx, light)?,
            varying_uv: Matrix::zeros(),
            varying_nrm: Mat3::zeros(),
            ndc_tri: Mat3::zeros(),
        })
    }

    /// Tangent, bitangent and normal as the columns of a matrix.
    ///
    /// `None` when the triangle or its UVs are degenerate and no tangent
    /// frame exists.
    fn darboux_basis(&self, bn: Vec3) -> Option<Mat3> {
        let p0 = Vec3::from(self.ndc_tri.col(0));
        let p1 = Vec3::from(self.ndc_tri.col(1));
        let p2 = Vec3::from(self.ndc_tri.col(2));

        let mut a = Mat3::zeros();
        a.set_row(0, (p1 - p0).into());
        a.set_row(1, (p2 - p0).into());
        a.set_row(2, bn.into());
        let ai = a.inverse().ok()?;

        let [u0, u1, u2] = self.varying_uv.row(0);
        let [v0, v1, v2] = self.varying_uv.row(1);
        let i = ai * Vec3::new(u1 - u0, u2 - u0, 0.0);
        let j = ai * Vec3::new(v1 - v0, v2 - v0, 0.0);
        if !(i.magnitude() > f32::EPSILON && j.magnitude() > f32::EPSILON) {
            return None;
        }

        let mut b = Mat3::zeros();
        b.set_col(0, i.normalize().into());
        b.set_col(1, j.normalize().into());
        b.set_col(2, bn.into());
        Some(b)
    }
}

impl Shader for TangentSpaceShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.varying_uv.set_col(nth, self.model.uv(face, nth).into());
        let n = self.uniforms.normal(self.model.normal(face, nth));
        self.varying_nrm.set_col(nth, n.into());

        let clip = ctx.to_clip(self.model.vertex(face, nth));
        self.ndc_tri.set_col(nth, clip.to_vec3_perspective().into());
        clip
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        let uv = Uv::from(self.varying_uv * bar);
        let bn = (self.varying_nrm * bar).normalize();
        let n = match self.darboux_basis(bn) {
            Some(basis) => (basis * self.model.tangent_normal(uv)).normalize(),
            None => bn,
        };
        Some(self.uniforms.shade(self.model, uv, n))
    }
}

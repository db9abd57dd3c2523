//! Lighting models.
//!
//! Each type implements [`Shader`](crate::render::Shader) and is picked when a
//! pass is set up:
//!
//! | Shader                | Lighting                                               |
//! |-----------------------|--------------------------------------------------------|
//! | [`FlatShader`]        | one diffuse intensity per face                         |
//! | [`GouraudShader`]     | per-vertex diffuse intensity, interpolated             |
//! | [`ToonShader`]        | Gouraud intensity quantised into bands                 |
//! | [`PhongShader`]       | interpolated normals, diffuse and specular maps        |
//! | [`NormalMapShader`]   | object-space normal map                                |
//! | [`TangentSpaceShader`]| tangent-space normal map through the Darboux basis     |
//! | [`DepthShader`]       | gray by screen depth, used for shadow maps             |
//! | [`ShadowShader`]      | Phong darkened where a shadow map occludes the point   |
//! | [`ZShader`]           | depth-only pass for ambient occlusion                  |
//! | [`OcclusionShader`]   | marks the texels visible from the current direction    |
//! | [`BakedAoShader`]     | looks up a baked occlusion texture                     |
//!
//! Light directions point from the surface toward the light and are given in
//! model space.

mod basic;
mod occlusion;
mod phong;
mod shadow;

pub use basic::{FlatShader, GouraudShader, ToonShader};
pub use occlusion::{BakedAoShader, OcclusionShader, ZShader};
pub use phong::{NormalMapShader, PhongShader, TangentSpaceShader};
pub use shadow::{DepthShader, ShadowShader};

use crate::colors::Color;
use crate::error::Result;
use crate::math::matrix::Mat4;
use crate::math::vec2::Uv;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Model;
use crate::render::RenderContext;

/// Lighting uniforms derived from a pass's matrices.
///
/// Lighting happens in clip space: the light direction is carried by
/// `M = projection * model_view` and normals by `(M^-1)^T`.
#[derive(Debug, Clone, Copy)]
struct Uniforms {
    /// Carries normals into clip space.
    mit: Mat4,
    /// Light direction in clip space, unit length.
    light: Vec3,
}

impl Uniforms {
    fn new(ctx: &RenderContext, light: Vec3) -> Result<Self> {
        Ok(Self {
            mit: ctx.normal_matrix()?,
            light: transform_direction(ctx.clip_matrix(), light).normalize(),
        })
    }

    fn normal(&self, n: Vec3) -> Vec3 {
        transform_direction(&self.mit, n)
    }

    /// Diffuse and specular terms for the unit normal `n`.
    fn terms(&self, model: &Model, uv: Uv, n: Vec3) -> (f32, f32) {
        let diff = n.dot(self.light).max(0.0);
        (diff, specular(n, self.light, model.specular(uv)))
    }

    /// Textured ambient + diffuse + specular color.
    fn shade(&self, model: &Model, uv: Uv, n: Vec3) -> Color {
        let (diff, spec) = self.terms(model, uv, n);
        phong_mix(model.diffuse(uv), diff, spec)
    }
}

/// Direction `v` carried by `m`, translation ignored.
#[inline]
fn transform_direction(m: &Mat4, v: Vec3) -> Vec3 {
    (*m * Vec4::direction(v)).xyz()
}

/// `l` mirrored about the unit normal `n`.
#[inline]
fn reflect(n: Vec3, l: Vec3) -> Vec3 {
    (n * (n.dot(l) * 2.0) - l).normalize()
}

/// Specular term: how closely the reflected light lines up with the view axis.
#[inline]
fn specular(n: Vec3, l: Vec3, exponent: f32) -> f32 {
    reflect(n, l).z.max(0.0).powf(exponent)
}

/// `5 + c * (diffuse + 0.6 * spec)` per channel, the ambient + diffuse +
/// specular mix of the textured shaders.
#[inline]
fn phong_mix(c: Color, diffuse: f32, spec: f32) -> Color {
    c.map_rgb(|ch| 5.0 + ch as f32 * (diffuse + 0.6 * spec))
}

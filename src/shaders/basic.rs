//! Diffuse-only lighting: flat, Gouraud and toon.

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Model;
use crate::render::{FragCoord, RenderContext, Shader};

/// One intensity per face, from the face normal.
///
/// The normal is the cross product of the face's edges, so this needs no
/// normals in the model.
pub struct FlatShader<'a> {
    model: &'a Model,
    light: Vec3,
    corners: [Vec3; 3],
    intensity: f32,
}

impl<'a> FlatShader<'a> {
    pub fn new(model: &'a Model, light: Vec3) -> Self {
        Self {
            model,
            light: light.normalize(),
            corners: [Vec3::ZERO; 3],
            intensity: 0.0,
        }
    }
}

impl Shader for FlatShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        let p = self.model.vertex(face, nth);
        self.corners[nth] = p;
        if nth == 2 {
            let [a, b, c] = self.corners;
            let n = (b - a).cross(c - a).normalize();
            self.intensity = n.dot(self.light).max(0.0);
        }
        ctx.to_clip(p)
    }

    fn fragment(&mut self, _frag: FragCoord, _bar: Vec3) -> Option<Color> {
        Some(Color::from_intensity(self.intensity))
    }
}

/// Diffuse intensity computed at the vertices and interpolated.
pub struct GouraudShader<'a> {
    model: &'a Model,
    light: Vec3,
    varying_intensity: Vec3,
}

impl<'a> GouraudShader<'a> {
    pub fn new(model: &'a Model, light: Vec3) -> Self {
        Self {
            model,
            light: light.normalize(),
            varying_intensity: Vec3::ZERO,
        }
    }

    fn store_intensity(&mut self, face: usize, nth: usize) {
        self.varying_intensity[nth] = self.model.normal(face, nth).dot(self.light).max(0.0);
    }

    fn intensity(&self, bar: Vec3) -> f32 {
        self.varying_intensity.dot(bar)
    }
}

impl Shader for GouraudShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.store_intensity(face, nth);
        ctx.to_clip(self.model.vertex(face, nth))
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        Some(Color::from_intensity(self.intensity(bar)))
    }
}

/// Gouraud intensity snapped to a handful of bands and tinted.
pub struct ToonShader<'a> {
    gouraud: GouraudShader<'a>,
    tint: Color,
}

impl<'a> ToonShader<'a> {
    pub const DEFAULT_TINT: Color = Color::rgb(255, 155, 0);

    pub fn new(model: &'a Model, light: Vec3) -> Self {
        Self {
            gouraud: GouraudShader::new(model, light),
            tint: Self::DEFAULT_TINT,
        }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Snaps a diffuse intensity to the nearest band at or below it.
pub fn toon_band(intensity: f32) -> f32 {
    match intensity {
        i if i > 0.85 => 1.0,
        i if i > 0.60 => 0.8,
        i if i > 0.45 => 0.6,
        i if i > 0.30 => 0.45,
        i if i > 0.15 => 0.30,
        _ => 0.0,
    }
}

impl Shader for ToonShader<'_> {
    fn vertex(&mut self, ctx: &RenderContext, face: usize, nth: usize) -> Vec4 {
        self.gouraud.vertex(ctx, face, nth)
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        let band = toon_band(self.gouraud.intensity(bar));
        Some(self.tint.scale(band))
    }
}

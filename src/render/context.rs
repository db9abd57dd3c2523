//! Per-pass transform state.

use crate::camera::Camera;
use crate::error::Result;
use crate::math::matrix::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::projection::Projection;
use crate::transform;

/// The model-view, projection and viewport matrices of one render pass.
///
/// Built once when the pass is set up and passed by reference to every
/// [`Shader::vertex`](crate::render::shader::Shader::vertex) call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    model_view: Mat4,
    projection: Mat4,
    viewport: Mat4,
    clip: Mat4,
}

impl RenderContext {
    pub fn new(camera: &Camera, projection: Projection, viewport: Mat4) -> Self {
        Self::from_matrices(camera.view_matrix(), projection.matrix(), viewport)
    }

    pub fn from_matrices(model_view: Mat4, projection: Mat4, viewport: Mat4) -> Self {
        Self {
            model_view,
            projection,
            viewport,
            clip: projection * model_view,
        }
    }

    /// The usual setup: the model fills the middle three quarters of a
    /// `width` x `height` target, seen through `camera` with either its
    /// distance-based perspective or an orthographic projection.
    pub fn look_from(camera: &Camera, width: u32, height: u32, perspective: bool) -> Self {
        let projection = if perspective {
            camera.perspective()
        } else {
            Projection::orthographic()
        };
        Self::new(camera, projection, standard_viewport(width, height))
    }

    /// Places the model in the scene: `model_view` becomes
    /// `model_view * model`.
    pub fn with_model(self, model: Mat4) -> Self {
        Self::from_matrices(self.model_view * model, self.projection, self.viewport)
    }

    pub fn model_view(&self) -> &Mat4 {
        &self.model_view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn viewport(&self) -> &Mat4 {
        &self.viewport
    }

    /// `projection * model_view`, model space to clip space.
    pub fn clip_matrix(&self) -> &Mat4 {
        &self.clip
    }

    /// `viewport * projection * model_view`, model space to screen space.
    pub fn screen_matrix(&self) -> Mat4 {
        self.viewport * self.clip
    }

    /// Clip-space position of a model-space point.
    #[inline]
    pub fn to_clip(&self, point: Vec3) -> Vec4 {
        self.clip * Vec4::point(point)
    }

    /// Matrix that carries model-space normals into clip space.
    pub fn normal_matrix(&self) -> Result<Mat4> {
        self.clip.invert_transpose()
    }
}

/// Viewport covering the middle three quarters of a `width` x `height` target.
pub fn standard_viewport(width: u32, height: u32) -> Mat4 {
    let (w, h) = (width as i32, height as i32);
    transform::viewport(w / 8, h / 8, w * 3 / 4, h * 3 / 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_lands_in_the_middle_of_the_target() {
        let ctx = RenderContext::look_from(&Camera::default(), 800, 600, true);
        let p = ctx.screen_matrix() * Vec4::point(Vec3::ZERO);
        assert_relative_eq!(p.x / p.w, 400.0, epsilon = 1e-3);
        assert_relative_eq!(p.y / p.w, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn orthographic_keeps_w_at_one() {
        let ctx = RenderContext::look_from(&Camera::default(), 800, 800, false);
        let clip = ctx.to_clip(Vec3::new(0.3, -0.2, 0.7));
        assert_relative_eq!(clip.w, 1.0);
    }

    #[test]
    fn clip_matrix_is_projection_after_model_view() {
        let ctx = RenderContext::look_from(&Camera::default(), 800, 800, true);
        assert_eq!(*ctx.clip_matrix(), *ctx.projection() * *ctx.model_view());
    }

    #[test]
    fn with_model_applies_model_first() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::UP);
        let ctx = RenderContext::look_from(&camera, 100, 100, false)
            .with_model(Mat4::translation(0.5, 0.0, 0.0));
        let clip = ctx.to_clip(Vec3::ZERO);
        assert_relative_eq!(clip.x, 0.5, epsilon = 1e-6);
    }
}

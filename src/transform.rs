//! The three matrices of the pipeline: model-view, projection and viewport.
//!
//! A point in model space reaches the screen as
//!
//! ```text
//! screen = viewport * projection * model_view * point
//! ```
//!
//! Shaders return `projection * model_view * point` (clip space); the
//! rasterizer applies the viewport and the perspective divide itself.

use crate::math::matrix::Mat4;
use crate::math::vec3::Vec3;

/// Upper end of the depth range produced by [`viewport`].
pub const DEPTH: f32 = 255.0;

/// View matrix for a camera at `eye` looking at `center`.
///
/// The basis rows are right, up and backward:
/// `z = normalize(eye - center)`, `x = normalize(up × z)`, `y = normalize(z × x)`.
/// `center` maps to the origin.
///
/// An `up` parallel to the view direction has no defined basis and yields NaN
/// entries.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let z = (eye - center).normalize();
    let x = up.cross(z).normalize();
    let y = z.cross(x).normalize();

    Mat4::new([
        [x.x, x.y, x.z, -x.dot(center)],
        [y.x, y.y, y.z, -y.dot(center)],
        [z.x, z.y, z.z, -z.dot(center)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Central projection with `w' = 1 + coefficient * z`.
///
/// `coefficient` is usually `-1 / distance` from the camera to the scene
/// center; `0` gives an orthographic projection.
pub fn perspective(coefficient: f32) -> Mat4 {
    let mut m = Mat4::identity();
    m.set(3, 2, coefficient);
    m
}

/// Maps the cube `[-1, 1]^3` onto `[x, x + w] × [y, y + h] × [0, DEPTH]`.
pub fn viewport(x: i32, y: i32, w: i32, h: i32) -> Mat4 {
    let (x, y, w, h) = (x as f32, y as f32, w as f32, h as f32);
    Mat4::new([
        [w / 2.0, 0.0, 0.0, x + w / 2.0],
        [0.0, h / 2.0, 0.0, y + h / 2.0],
        [0.0, 0.0, DEPTH / 2.0, DEPTH / 2.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

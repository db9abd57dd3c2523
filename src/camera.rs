//! Look-at camera
//!
//! # Coordinate System
//!
//! Uses a **right-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer (the camera looks down -Z)
//!
//! The camera is described by where it sits (`eye`), what it looks at
//! (`center`) and which way is up. The view matrix is rebuilt from these on
//! demand.

use crate::math::matrix::Mat4;
use crate::math::vec3::Vec3;
use crate::projection::Projection;
use crate::transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    /// The classic three-quarter view of a unit-sized model.
    fn default() -> Self {
        Self::new(Vec3::new(1.0, 1.0, 3.0), Vec3::ZERO, Vec3::UP)
    }
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    /// A camera sitting along `direction` from the origin, looking at it.
    ///
    /// Used to render from a light's point of view.
    pub fn from_direction(direction: Vec3, up: Vec3) -> Self {
        Self::new(direction, Vec3::ZERO, up)
    }

    /// Like [`from_direction`](Self::from_direction) with an up vector chosen
    /// to stay clear of `direction`.
    pub fn facing_origin(direction: Vec3) -> Self {
        let dir = direction.normalize();
        let up = if dir.dot(Vec3::UP).abs() > 0.99 {
            Vec3::FORWARD
        } else {
            Vec3::UP
        };
        Self::from_direction(direction, up)
    }

    /// Computes the view matrix for the rendering pipeline.
    pub fn view_matrix(&self) -> Mat4 {
        transform::look_at(self.eye, self.center, self.up)
    }

    /// Distance from the eye to the point looked at.
    pub fn distance(&self) -> f32 {
        (self.eye - self.center).magnitude()
    }

    /// The perspective matching this camera's distance to its center.
    pub fn perspective(&self) -> Projection {
        Projection::from_distance(self.distance())
    }

    /// Unit vector from the center toward the eye.
    pub fn backward(&self) -> Vec3 {
        (self.eye - self.center).normalize()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_is_three_quarter_view() {
        let camera = Camera::default();
        assert_relative_eq!(camera.distance(), 11.0_f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(
            camera.perspective().coefficient(),
            -1.0 / 11.0_f32.sqrt(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn view_matrix_is_valid() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UP);
        let view = camera.view_matrix();

        // Center maps to the origin, the eye 5 units behind it on +Z.
        let origin = view * Vec3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(origin.z, 0.0, epsilon = 1e-4);
        let eye = view * camera.eye;
        assert_relative_eq!(eye.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn backward_points_at_eye() {
        let camera = Camera::from_direction(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(camera.backward(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(camera.center, Vec3::ZERO);
    }

    #[test]
    fn facing_origin_avoids_parallel_up() {
        let overhead = Camera::facing_origin(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(overhead.up, Vec3::FORWARD);
        let view = overhead.view_matrix();
        assert!(view.row(0).iter().all(|v| v.is_finite()));

        let side = Camera::facing_origin(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(side.up, Vec3::UP);
    }
}

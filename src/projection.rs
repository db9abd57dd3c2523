//! Projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for the projection
//! of a pass. The pipeline uses the one-parameter central projection of
//! [`transform::perspective`](crate::transform::perspective): a point at
//! view-space depth `z` ends up with `w = 1 + coefficient * z`.

use crate::math::matrix::Mat4;
use crate::transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Entry `[3][2]` of the projection matrix.
    coefficient: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::orthographic()
    }
}

impl Projection {
    pub fn new(coefficient: f32) -> Self {
        Self { coefficient }
    }

    /// Parallel projection, `w` stays 1.
    pub fn orthographic() -> Self {
        Self::new(0.0)
    }

    /// Perspective for a camera `distance` units away from the scene center.
    ///
    /// A non-positive or non-finite distance falls back to orthographic.
    pub fn from_distance(distance: f32) -> Self {
        if distance.is_finite() && distance > 0.0 {
            Self::new(-1.0 / distance)
        } else {
            Self::orthographic()
        }
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    pub fn is_orthographic(&self) -> bool {
        self.coefficient == 0.0
    }

    /// Generates the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        transform::perspective(self.coefficient)
    }
}

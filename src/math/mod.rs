pub mod matrix;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use matrix::{Mat3, Mat4, Matrix};
pub use vec2::{Uv, Vec2, Vec2i};
pub use vec3::{Vec3, Vec3i};
pub use vec4::Vec4;

//! A small software rasterizer.
//!
//! This crate renders OBJ models on the CPU through a GL-like pipeline:
//! a vertex stage and a fragment stage supplied by a [`Shader`], a
//! barycentric triangle rasterizer with perspective-correct interpolation,
//! and a depth buffer where bigger values are closer. On top of it sit
//! shadow mapping and two flavors of ambient occlusion.
//!
//! # Quick Start
//!
//! ```ignore
//! use tinygl::prelude::*;
//!
//! let model = Model::from_obj("obj/african_head.obj")?;
//! let config = RenderConfig::default();
//! let ctx = RenderContext::look_from(&config.camera, 800, 800, true);
//!
//! let mut renderer = Renderer::new(800, 800, Format::Rgb);
//! let mut shader = GouraudShader::new(&model, config.light_dir());
//! renderer.render(&model, &ctx, &mut shader);
//!
//! let mut image = renderer.into_canvas();
//! image.flip_vertically();
//! image.write("output.tga")?;
//! ```
//!
//! [`Shader`]: render::Shader

pub mod ao;
pub mod camera;
pub mod canvas;
pub mod colors;
pub mod config;
pub mod error;
pub mod math;
pub mod model;
pub mod projection;
pub mod render;
pub mod shaders;
pub mod texture;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use canvas::{Canvas, Format};
pub use error::{Error, Result};
pub use model::Model;
pub use render::{RenderContext, Renderer};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use tinygl::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::config::{BakeConfig, RenderConfig, SsaoConfig};
    pub use crate::model::Model;
    pub use crate::projection::Projection;

    // Images
    pub use crate::canvas::{Canvas, Format};
    pub use crate::colors::Color;
    pub use crate::texture::Texture;

    // Math
    pub use crate::math::{Mat3, Mat4, Matrix, Uv, Vec2, Vec2i, Vec3, Vec3i, Vec4};

    // Rendering
    pub use crate::render::{DepthBuffer, FragCoord, RenderContext, Renderer, Shader};
    pub use crate::shaders::*;

    pub use crate::error::{Error, Result};
}

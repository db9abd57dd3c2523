//! Render driver.
//!
//! Provides the [`Renderer`] struct which owns the color canvas and depth
//! buffer of a pass and runs the vertex -> rasterize loop over a model.

use log::debug;

use super::context::RenderContext;
use super::depth::DepthBuffer;
use super::line::line;
use super::rasterizer::{draw_triangle, fill_triangle_scanline};
use super::shader::Shader;
use crate::canvas::{Canvas, Format};
use crate::colors::Color;
use crate::error::{Error, Result};
use crate::math::vec2::{Vec2, Vec2i};
use crate::math::vec4::Vec4;
use crate::model::Model;

pub struct Renderer {
    canvas: Canvas,
    depth: DepthBuffer,
}

impl Renderer {
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            canvas: Canvas::new(width, height, format),
            depth: DepthBuffer::new(width, height),
        }
    }

    /// Reassembles a renderer from buffers taken out with
    /// [`into_parts`](Self::into_parts), or built separately.
    ///
    /// The depth buffer must match the canvas size; it is kept as is, so a
    /// later [`draw_model`](Self::draw_model) continues the earlier pass.
    pub fn from_parts(canvas: Canvas, depth: DepthBuffer) -> Result<Self> {
        let expected = (canvas.width(), canvas.height());
        let actual = (depth.width(), depth.height());
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        Ok(Self { canvas, depth })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    pub fn into_parts(self) -> (Canvas, DepthBuffer) {
        (self.canvas, self.depth)
    }

    /// Fill the canvas with `color`; the depth buffer is left alone.
    pub fn clear(&mut self, color: Color) {
        self.canvas.fill(color);
    }

    #[inline]
    /// Prepare the depth buffer for a new pass.
    /// Sets all depths to [`DepthBuffer::EMPTY`].
    pub fn begin_pass(&mut self) {
        self.depth.clear();
    }

    /// Runs `shader` over every face of `model`.
    ///
    /// For each face the shader's `vertex` stage is called for corners 0, 1
    /// and 2, then the triangle is rasterized. The depth buffer is not reset;
    /// call [`begin_pass`](Self::begin_pass) first, or use
    /// [`render`](Self::render).
    ///
    /// Returns the number of pixels written.
    pub fn draw_model<S: Shader + ?Sized>(
        &mut self,
        model: &Model,
        ctx: &RenderContext,
        shader: &mut S,
    ) -> usize {
        let mut written = 0;
        for face in 0..model.face_count() {
            let clip = [0, 1, 2].map(|nth| shader.vertex(ctx, face, nth));
            written += draw_triangle(
                &clip,
                ctx.viewport(),
                shader,
                &mut self.canvas,
                &mut self.depth,
            );
        }
        debug!(
            "pass over {} faces wrote {} pixels",
            model.face_count(),
            written
        );
        written
    }

    /// A full pass: reset the depth buffer, then draw the model.
    pub fn render<S: Shader + ?Sized>(
        &mut self,
        model: &Model,
        ctx: &RenderContext,
        shader: &mut S,
    ) -> usize {
        self.begin_pass();
        self.draw_model(model, ctx, shader)
    }

    /// Draws the three edges of every face, ignoring depth.
    pub fn draw_wireframe(&mut self, model: &Model, ctx: &RenderContext, color: Color) {
        let screen = ctx.screen_matrix();
        for face in 0..model.face_count() {
            let pts = [0, 1, 2].map(|nth| to_pixel(screen * Vec4::point(model.vertex(face, nth))));
            let [Some(a), Some(b), Some(c)] = pts else {
                continue;
            };
            self.draw_line(a, b, color);
            self.draw_line(b, c, color);
            self.draw_line(c, a, color);
        }
    }

    pub fn draw_line(&mut self, p0: Vec2i, p1: Vec2i, color: Color) {
        line(p0, p1, &mut self.canvas, color);
    }

    /// Flat-colored 2D triangle, no depth test.
    pub fn fill_triangle(&mut self, t0: Vec2i, t1: Vec2i, t2: Vec2i, color: Color) {
        fill_triangle_scanline(t0, t1, t2, &mut self.canvas, color);
    }
}

/// Pixel a screen-space point lands on, rounded to the nearest one, `None`
/// when it has no finite projection. Far-off points saturate at the `i32`
/// range.
fn to_pixel(p: Vec4) -> Option<Vec2i> {
    if p.w == 0.0 {
        return None;
    }
    let p: Vec2 = p.xy() / p.w;
    (p.x.is_finite() && p.y.is_finite())
        .then(|| Vec2i::new(p.x.round() as i32, p.y.round() as i32))
}

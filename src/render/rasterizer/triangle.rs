//! Barycentric triangle rasterization with perspective-correct interpolation.
//!
//! # Algorithm Overview
//!
//! 1. Transform the clip-space corners by the viewport and divide by `w`
//! 2. Compute a bounding box around the projected triangle, clamped to the target
//! 3. For each pixel in the box, compute its barycentric coordinates in screen space
//! 4. Skip pixels with a negative weight (outside the triangle)
//! 5. Correct the weights for perspective and interpolate depth
//! 6. Depth test, then ask the shader for a color
//!
//! # Barycentric Coordinates
//!
//! For a triangle ABC and a point P, the weights `(1 - u - v, u, v)` satisfy
//! `P = A + u·AB + v·AC`. Splitting that into x and y gives two equations
//! whose solution is the cross product
//!
//! ```text
//! (u', v', w') = (AC.x, AB.x, PA.x) × (AC.y, AB.y, PA.y)
//! u = v' / w',  v = u' / w'
//! ```
//!
//! `w'` is twice the signed area of the triangle. When it is tiny the
//! triangle is degenerate and the sentinel `(-1, 1, 1)` is returned, which
//! the inside test rejects.
//!
//! # Perspective Correction
//!
//! Screen-space weights are not linear in the triangle's own plane once a
//! perspective divide happened. Dividing each weight by its corner's `w` and
//! renormalizing gives the weights in clip space:
//!
//! ```text
//! bc_clip_i = (bc_screen_i / w_i) / Σ_j (bc_screen_j / w_j)
//! ```
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use crate::canvas::Canvas;
use crate::math::matrix::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::render::depth::DepthBuffer;
use crate::render::framebuffer::FrameBuffer;
use crate::render::shader::{FragCoord, Shader};

/// Below this magnitude of twice the signed area a triangle counts as degenerate.
const DEGENERATE_AREA: f32 = 1e-2;

/// Barycentric coordinates of `p` with respect to triangle `abc`.
///
/// Returns `(-1, 1, 1)` for degenerate triangles.
#[inline]
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Vec3 {
    let sx = Vec3::new(c.x - a.x, b.x - a.x, a.x - p.x);
    let sy = Vec3::new(c.y - a.y, b.y - a.y, a.y - p.y);
    let u = sx.cross(sy);
    if u.z.abs() > DEGENERATE_AREA {
        Vec3::new(1.0 - (u.x + u.y) / u.z, u.y / u.z, u.x / u.z)
    } else {
        Vec3::new(-1.0, 1.0, 1.0)
    }
}

/// Rasterize one triangle given in clip space.
///
/// Every covered pixel whose interpolated depth is strictly closer than the
/// stored one is handed to `shader.fragment`; unless the shader discards it,
/// its color goes to `canvas` and its depth to `depth`.
///
/// A corner with `w == 0`, or one that projects to a non-finite point, makes
/// the whole triangle a no-op.
///
/// Returns the number of pixels written.
///
/// # Panics
/// Panics in debug builds if `canvas` and `depth` differ in size.
pub fn draw_triangle<S: Shader + ?Sized>(
    clip: &[Vec4; 3],
    viewport: &Mat4,
    shader: &mut S,
    canvas: &mut Canvas,
    depth: &mut DepthBuffer,
) -> usize {
    let mut target = FrameBuffer::new(canvas, depth);
    if target.width() == 0 || target.height() == 0 {
        return 0;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Step 1: Viewport transform and perspective divide
    // ─────────────────────────────────────────────────────────────────────
    let screen = clip.map(|c| *viewport * c);
    let mut pts = [Vec2::ZERO; 3];
    for (pt, s) in pts.iter_mut().zip(&screen) {
        if s.w == 0.0 {
            return 0;
        }
        *pt = s.xy() / s.w;
        if !pt.x.is_finite() || !pt.y.is_finite() {
            return 0;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Step 2: Bounding box, clamped to the target
    // ─────────────────────────────────────────────────────────────────────
    let clamp_x = (target.width() - 1) as f32;
    let clamp_y = (target.height() - 1) as f32;
    let min_x = pts[0].x.min(pts[1].x).min(pts[2].x).max(0.0).floor() as i32;
    let min_y = pts[0].y.min(pts[1].y).min(pts[2].y).max(0.0).floor() as i32;
    let max_x = pts[0].x.max(pts[1].x).max(pts[2].x).min(clamp_x).floor() as i32;
    let max_y = pts[0].y.max(pts[1].y).max(pts[2].y).min(clamp_y).floor() as i32;

    let clip_z = Vec3::new(clip[0].z, clip[1].z, clip[2].z);
    let mut written = 0;

    // ─────────────────────────────────────────────────────────────────────
    // Step 3: Iterate over all pixels in bounding box
    // ─────────────────────────────────────────────────────────────────────
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            let p = Vec2::new(x as f32, y as f32);
            let bc_screen = barycentric(pts[0], pts[1], pts[2], p);
            if bc_screen.x < 0.0 || bc_screen.y < 0.0 || bc_screen.z < 0.0 {
                continue;
            }

            let bc_clip = Vec3::new(
                bc_screen.x / screen[0].w,
                bc_screen.y / screen[1].w,
                bc_screen.z / screen[2].w,
            );
            let bc_clip = bc_clip / (bc_clip.x + bc_clip.y + bc_clip.z);

            let frag_depth = clip_z.dot(bc_clip);
            if !target.depth_test(x, y, frag_depth) {
                continue;
            }

            let frag = FragCoord {
                x,
                y,
                depth: frag_depth,
            };
            if let Some(color) = shader.fragment(frag, bc_clip) {
                target.write(x, y, frag_depth, color);
                written += 1;
            }
        }
    }

    written
}

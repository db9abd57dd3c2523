//! Scanline-based triangle filling.
//!
//! The classic pre-barycentric approach, kept for flat-colored 2D triangles
//! and as a reference for the barycentric rasterizer.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y coordinate (bottom to top)
//! 2. **Split** the triangle at the middle vertex into a lower and an upper part
//! 3. **Fill** each row between the long edge `t0-t2` and the short edge of the
//!    current part
//!
//! ```text
//!            t2
//!            /|
//!           / |   upper part: rows between t1 and t2
//!        t1 /__|
//!           \  |   lower part: rows between t0 and t1
//!            \ |
//!             \|
//!             t0
//! ```
//!
//! # References
//!
//! - Foley, van Dam et al., "Computer Graphics: Principles and Practice"
//! - Abrash, Michael, "Graphics Programming Black Book"

use crate::canvas::Canvas;
use crate::colors::Color;
use crate::math::vec2::{Vec2, Vec2i};

/// Sorts three vertices by Y coordinate (ascending).
///
/// Three comparisons suffice for 3 elements.
/// After sorting: `v0.y <= v1.y <= v2.y`
fn sort_vertices(v0: &mut Vec2i, v1: &mut Vec2i, v2: &mut Vec2i) {
    if v1.y < v0.y {
        std::mem::swap(v0, v1);
    }
    if v2.y < v1.y {
        std::mem::swap(v1, v2);
    }
    if v1.y < v0.y {
        std::mem::swap(v0, v1);
    }
}

/// Fills triangle `t0 t1 t2` with a flat color, row by row.
///
/// Rows from the lowest vertex up to, but not including, the highest one are
/// filled. A triangle whose three vertices share one row is a no-op.
pub fn fill_triangle_scanline(
    mut t0: Vec2i,
    mut t1: Vec2i,
    mut t2: Vec2i,
    canvas: &mut Canvas,
    color: Color,
) {
    if t0.y == t1.y && t0.y == t2.y {
        return;
    }
    sort_vertices(&mut t0, &mut t1, &mut t2);

    let total_height = t2.y - t0.y;
    let (f0, f1, f2) = (Vec2::from(t0), Vec2::from(t1), Vec2::from(t2));

    for i in 0..total_height {
        let upper = i > t1.y - t0.y || t1.y == t0.y;
        let segment_height = if upper { t2.y - t1.y } else { t1.y - t0.y };

        let alpha = i as f32 / total_height as f32;
        let beta = (i - if upper { t1.y - t0.y } else { 0 }) as f32 / segment_height as f32;

        // A on the long edge, B on the short edge of the current part.
        let a = f0 + (f2 - f0) * alpha;
        let b = if upper {
            f1 + (f2 - f1) * beta
        } else {
            f0 + (f1 - f0) * beta
        };

        let (mut ax, mut bx) = (a.x as i32, b.x as i32);
        if ax > bx {
            std::mem::swap(&mut ax, &mut bx);
        }
        for x in ax..=bx {
            canvas.set(x, t0.y + i, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Format;
    use crate::colors::{self, WHITE};

    fn count_lit(canvas: &Canvas) -> usize {
        let mut n = 0;
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                if canvas.get(x, y) != Some(colors::BLACK) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn flat_triangle_writes_nothing() {
        let mut canvas = Canvas::new(16, 16, Format::Rgb);
        fill_triangle_scanline(
            Vec2i::new(1, 5),
            Vec2i::new(8, 5),
            Vec2i::new(14, 5),
            &mut canvas,
            WHITE,
        );
        assert_eq!(count_lit(&canvas), 0);
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let (a, b, c) = (Vec2i::new(2, 1), Vec2i::new(13, 6), Vec2i::new(5, 14));
        let mut first = Canvas::new(16, 16, Format::Rgb);
        let mut second = Canvas::new(16, 16, Format::Rgb);
        fill_triangle_scanline(a, b, c, &mut first, WHITE);
        fill_triangle_scanline(c, a, b, &mut second, WHITE);
        assert_eq!(first, second);
        assert!(count_lit(&first) > 0);
    }

    #[test]
    fn rows_span_lowest_to_below_highest() {
        let mut canvas = Canvas::new(16, 16, Format::Rgb);
        fill_triangle_scanline(
            Vec2i::new(0, 0),
            Vec2i::new(10, 0),
            Vec2i::new(0, 10),
            &mut canvas,
            WHITE,
        );
        assert_eq!(canvas.get(0, 0), Some(WHITE));
        assert_eq!(canvas.get(10, 0), Some(WHITE));
        assert_eq!(canvas.get(0, 9), Some(WHITE));
        assert_eq!(canvas.get(0, 10), Some(colors::BLACK));
        assert_eq!(canvas.get(9, 5), Some(colors::BLACK));
    }
}

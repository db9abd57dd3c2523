//! Bresenham line rasterization.
//!
//! Bresenham's algorithm determines which pixels to illuminate using only
//! integer arithmetic. It tracks an "error" term that represents the distance
//! between the ideal line and the current pixel.
//!
//! The key insight: for each step along the major axis (the axis with greater
//! distance), we decide whether to also step along the minor axis based on
//! accumulated error. Steep lines are handled by swapping x and y so the loop
//! always walks x, and lines pointing left by swapping the endpoints.

use crate::canvas::Canvas;
use crate::colors::Color;
use crate::math::vec2::Vec2i;

/// The pixels of the segment `p0`-`p1`, endpoints included.
///
/// Visits exactly `max(|dx|, |dy|) + 1` pixels, walking from the endpoint
/// with the smaller major-axis coordinate. The walk runs in 64-bit integers,
/// so any pair of `i32` endpoints is valid.
#[derive(Debug, Clone)]
pub struct LinePixels {
    x: i64,
    x_end: i64,
    y: i64,
    y_step: i64,
    dx: i64,
    derror2: i64,
    error2: i64,
    steep: bool,
}

impl LinePixels {
    pub fn new(p0: Vec2i, p1: Vec2i) -> Self {
        let (mut x0, mut y0) = (i64::from(p0.x), i64::from(p0.y));
        let (mut x1, mut y1) = (i64::from(p1.x), i64::from(p1.y));

        // Transpose steep lines so the major axis is x.
        let steep = (x0 - x1).abs() < (y0 - y1).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        // Always walk left to right.
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        Self {
            x: x0,
            x_end: x1,
            y: y0,
            y_step: if y1 > y0 { 1 } else { -1 },
            dx,
            derror2: dy.abs() * 2,
            error2: 0,
            steep,
        }
    }

    /// Keeps only the pixels whose major-axis coordinate falls inside a
    /// `width` x `height` target. The pixels that remain are exactly the ones
    /// the full walk would produce there.
    pub fn clip_to(mut self, width: u32, height: u32) -> Self {
        let extent = i64::from(if self.steep { height } else { width });
        self.x_end = self.x_end.min(extent - 1);
        if self.x < 0 && self.x <= self.x_end {
            self.advance(-self.x);
        }
        self
    }

    /// Moves `steps` pixels along the major axis without visiting them.
    fn advance(&mut self, steps: i64) {
        if self.dx == 0 {
            self.x += steps;
            return;
        }
        // The minor axis moves once each time the accumulated error exceeds
        // dx. `error2` stays in (-dx, dx], so the numerator is non-negative.
        let total = i128::from(self.error2) + i128::from(steps) * i128::from(self.derror2);
        let period = 2 * i128::from(self.dx);
        let moves = (total + i128::from(self.dx) - 1) / period;
        // `y` stays between the endpoints and `error2` within (-dx, dx], so
        // both fit back into i64.
        self.error2 = (total - moves * period) as i64;
        self.y += self.y_step * moves as i64;
        self.x += steps;
    }
}

impl Iterator for LinePixels {
    type Item = Vec2i;

    fn next(&mut self) -> Option<Vec2i> {
        if self.x > self.x_end {
            return None;
        }

        // Every coordinate visited lies between two i32 endpoints.
        let (x, y) = (self.x as i32, self.y as i32);
        let pixel = if self.steep {
            Vec2i::new(y, x)
        } else {
            Vec2i::new(x, y)
        };

        // Doubled error avoids the 0.5 threshold of the float version.
        self.error2 += self.derror2;
        if self.error2 > self.dx {
            self.y += self.y_step;
            self.error2 -= self.dx * 2;
        }
        self.x += 1;

        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.x_end - self.x + 1).max(0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for LinePixels {}

/// Draws the segment `p0`-`p1` onto `canvas`. Pixels outside the canvas are
/// dropped; the walk itself only covers the canvas span of the major axis.
pub fn line(p0: Vec2i, p1: Vec2i, canvas: &mut Canvas, color: Color) {
    for p in LinePixels::new(p0, p1).clip_to(canvas.width(), canvas.height()) {
        canvas.set(p.x, p.y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Format;
    use crate::colors;

    fn pixels(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
        LinePixels::new(Vec2i::new(x0, y0), Vec2i::new(x1, y1))
            .map(|p| (p.x, p.y))
            .collect()
    }

    #[test]
    fn visits_major_delta_plus_one() {
        assert_eq!(pixels(0, 0, 10, 3).len(), 11);
        assert_eq!(pixels(2, 1, 5, 20).len(), 20);
        assert_eq!(pixels(-4, 7, -4, 7).len(), 1);
        assert_eq!(LinePixels::new(Vec2i::new(0, 0), Vec2i::new(-6, 2)).len(), 7);
    }

    #[test]
    fn endpoints_are_included() {
        let segments = [
            (0, 0, 10, 3),
            (13, 20, 80, 40),
            (80, 40, 13, 20),
            (3, 9, 1, -7),
        ];
        for (x0, y0, x1, y1) in segments {
            let px = pixels(x0, y0, x1, y1);
            assert!(px.contains(&(x0, y0)), "start of {x0},{y0} -> {x1},{y1}");
            assert!(px.contains(&(x1, y1)), "end of {x0},{y0} -> {x1},{y1}");
        }
    }

    #[test]
    fn steep_line_steps_once_per_row() {
        let px = pixels(0, 0, 2, 6);
        let mut ys: Vec<i32> = px.iter().map(|p| p.1).collect();
        ys.dedup();
        assert_eq!(ys, (0..=6).collect::<Vec<_>>());
    }

    #[test]
    fn diagonal_is_exact() {
        assert_eq!(pixels(0, 0, 3, 3), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn reversed_direction_covers_same_pixels() {
        let mut forward = pixels(13, 20, 80, 40);
        let mut backward = pixels(80, 40, 13, 20);
        forward.sort();
        backward.sort();
        assert_eq!(forward, backward);
    }

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let wide = LinePixels::new(Vec2i::new(-2_000_000_000, 0), Vec2i::new(2_000_000_000, 0));
        assert_eq!(wide.len(), 4_000_000_001);

        let mut long = LinePixels::new(Vec2i::new(0, 0), Vec2i::new(2_000_000_000, 1_500_000_000));
        assert_eq!(long.len(), 2_000_000_001);
        assert_eq!(long.next(), Some(Vec2i::new(0, 0)));

        let full = LinePixels::new(Vec2i::new(i32::MIN, i32::MAX), Vec2i::new(i32::MAX, i32::MIN));
        assert_eq!(full.len(), u32::MAX as usize + 1);
    }

    #[test]
    fn clipping_keeps_the_unclipped_pixels() {
        let segments = [
            (-40, -7, 60, 25),
            (60, 25, -40, -7),
            (-3, -50, 9, 70),
            (5, 5, 12, 9),
            (-9, 3, -2, 3),
            (3, -20, 3, 40),
            (-30, 40, 50, -30),
        ];
        let (w, h) = (16, 12);
        for (x0, y0, x1, y1) in segments {
            let full = LinePixels::new(Vec2i::new(x0, y0), Vec2i::new(x1, y1));
            let steep = (x0 - x1).abs() < (y0 - y1).abs();
            let expected: Vec<Vec2i> = full
                .filter(|p| {
                    let major = if steep { p.y } else { p.x };
                    let extent = if steep { h } else { w };
                    (0..extent).contains(&major)
                })
                .collect();
            let clipped: Vec<Vec2i> = LinePixels::new(Vec2i::new(x0, y0), Vec2i::new(x1, y1))
                .clip_to(w as u32, h as u32)
                .collect();
            assert_eq!(clipped, expected, "{x0},{y0} -> {x1},{y1}");
        }
    }

    #[test]
    fn huge_line_onto_small_canvas() {
        let mut canvas = Canvas::new(8, 8, Format::Rgb);
        line(
            Vec2i::new(i32::MIN, 3),
            Vec2i::new(i32::MAX, 3),
            &mut canvas,
            colors::RED,
        );
        for x in 0..8 {
            assert_eq!(canvas.get(x, 3), Some(colors::RED));
        }
        assert_eq!(canvas.get(0, 4), Some(colors::BLACK));
    }

    #[test]
    fn offscreen_pixels_are_dropped() {
        let mut canvas = Canvas::new(4, 4, Format::Rgb);
        line(Vec2i::new(-5, 1), Vec2i::new(10, 1), &mut canvas, colors::RED);
        for x in 0..4 {
            assert_eq!(canvas.get(x, 1), Some(colors::RED));
        }
        assert_eq!(canvas.get(0, 0), Some(colors::BLACK));
    }
}

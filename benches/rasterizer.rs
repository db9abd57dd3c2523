use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tinygl::canvas::{Canvas, Format};
use tinygl::colors::{self, Color};
use tinygl::math::{Mat4, Vec2i, Vec3, Vec4};
use tinygl::render::line::{line, LinePixels};
use tinygl::render::{draw_triangle, fill_triangle_scanline, DepthBuffer, FragCoord, RenderContext, Shader};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

/// Interpolates one color per corner; no vertex stage.
struct Gradient;

impl Shader for Gradient {
    fn vertex(&mut self, _ctx: &RenderContext, _face: usize, _nth: usize) -> Vec4 {
        Vec4::ZERO
    }

    fn fragment(&mut self, _frag: FragCoord, bar: Vec3) -> Option<Color> {
        Some(Color::rgb(
            (bar.x * 255.0) as u8,
            (bar.y * 255.0) as u8,
            (bar.z * 255.0) as u8,
        ))
    }
}

fn clip(points: [(f32, f32); 3]) -> [Vec4; 3] {
    points.map(|(x, y)| Vec4::new(x, y, 0.0, 1.0))
}

fn small_triangle() -> [Vec4; 3] {
    clip([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)])
}

fn medium_triangle() -> [Vec4; 3] {
    clip([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)])
}

fn large_triangle() -> [Vec4; 3] {
    clip([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)])
}

fn to_pixels(tri: &[Vec4; 3]) -> [Vec2i; 3] {
    tri.map(|v| Vec2i::new(v.x as i32, v.y as i32))
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let viewport = Mat4::identity();

    for (name, triangle) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("scanline", name), &triangle, |b, tri| {
            let mut canvas = Canvas::new(BUFFER_WIDTH, BUFFER_HEIGHT, Format::Rgb);
            let [t0, t1, t2] = to_pixels(tri);
            b.iter(|| {
                fill_triangle_scanline(black_box(t0), t1, t2, &mut canvas, colors::RED);
            });
        });

        group.bench_with_input(BenchmarkId::new("barycentric", name), &triangle, |b, tri| {
            let mut canvas = Canvas::new(BUFFER_WIDTH, BUFFER_HEIGHT, Format::Rgb);
            let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                depth.clear();
                draw_triangle(black_box(tri), &viewport, &mut Gradient, &mut canvas, &mut depth)
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");
    let viewport = Mat4::identity();

    // Generate a grid of small triangles
    let triangles: Vec<[Vec4; 3]> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                clip([(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)])
            })
        })
        .collect();

    group.bench_function("scanline_400_triangles", |b| {
        let mut canvas = Canvas::new(BUFFER_WIDTH, BUFFER_HEIGHT, Format::Rgb);
        b.iter(|| {
            for tri in &triangles {
                let [t0, t1, t2] = to_pixels(tri);
                fill_triangle_scanline(black_box(t0), t1, t2, &mut canvas, colors::RED);
            }
        });
    });

    group.bench_function("barycentric_400_triangles", |b| {
        let mut canvas = Canvas::new(BUFFER_WIDTH, BUFFER_HEIGHT, Format::Rgb);
        let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            depth.clear();
            for tri in &triangles {
                draw_triangle(black_box(tri), &viewport, &mut Gradient, &mut canvas, &mut depth);
            }
        });
    });

    group.finish();
}

fn benchmark_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("lines");
    let origin = Vec2i::new(400, 300);

    group.bench_function("fan_360", |b| {
        let mut canvas = Canvas::new(BUFFER_WIDTH, BUFFER_HEIGHT, Format::Rgb);
        b.iter(|| {
            for deg in 0..360 {
                let a = (deg as f32).to_radians();
                let end = Vec2i::new(
                    400 + (a.cos() * 290.0) as i32,
                    300 + (a.sin() * 290.0) as i32,
                );
                line(black_box(origin), end, &mut canvas, colors::WHITE);
            }
        });
    });

    group.bench_function("iterate_steep", |b| {
        b.iter(|| {
            LinePixels::new(black_box(Vec2i::new(10, 0)), Vec2i::new(200, 590)).count()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_triangle,
    benchmark_many_triangles,
    benchmark_lines
);
criterion_main!(benches);

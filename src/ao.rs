//! Ambient occlusion.
//!
//! Two approaches:
//! - [`screen_space`]: a post-pass over a finished depth buffer. Each pixel
//!   looks along a few directions for the steepest rise in the depth field;
//!   the steeper the horizon, the less ambient light reaches it.
//! - [`bake_texture_space`]: renders the model from many random directions
//!   and records, per texel, how often it was visible. The result is a
//!   texture that [`BakedAoShader`](crate::shaders::BakedAoShader) reads.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use log::{debug, info};
use rand::Rng;

use crate::camera::Camera;
use crate::canvas::{Canvas, Format};
use crate::colors::Color;
use crate::config::{BakeConfig, SsaoConfig};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::model::Model;
use crate::render::{DepthBuffer, RenderContext, Renderer};
use crate::shaders::{OcclusionShader, ZShader};

/// Screen-space ambient occlusion of a depth buffer, as a grayscale canvas
/// of the same size. Pixels that were never drawn stay black.
pub fn screen_space(depth: &DepthBuffer, config: &SsaoConfig) -> Canvas {
    let (width, height) = (depth.width(), depth.height());
    let mut out = Canvas::new(width, height, Format::Grayscale);
    if config.directions == 0 {
        return out;
    }

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if !depth.is_written(x, y) {
                continue;
            }
            let p = Vec2::new(x as f32, y as f32);
            // Openness per direction: 1 for a flat horizon, 0 for a vertical wall.
            let open: f32 = (0..config.directions)
                .map(|k| {
                    let a = k as f32 * TAU / config.directions as f32;
                    let dir = Vec2::new(a.cos(), a.sin());
                    1.0 - max_elevation_angle(depth, p, dir, config.radius) / FRAC_PI_2
                })
                .sum();
            let total = (open / config.directions as f32).powf(config.exponent);
            out.set(x, y, Color::from_intensity(total));
        }
    }
    out
}

/// Steepest angle, in radians, at which the depth field rises when walking
/// from `p` along `dir`. Never negative.
fn max_elevation_angle(depth: &DepthBuffer, p: Vec2, dir: Vec2, radius: f32) -> f32 {
    let Some(origin) = depth.get(p.x as i32, p.y as i32) else {
        return 0.0;
    };
    let (width, height) = (depth.width() as f32, depth.height() as f32);

    let mut max_angle = 0.0_f32;
    let mut t = 0.0;
    while t < radius {
        let cur = p + dir * t;
        t += 1.0;
        if cur.x < 0.0 || cur.y < 0.0 || cur.x >= width || cur.y >= height {
            break;
        }
        let distance = (p - cur).magnitude();
        if distance < 1.0 {
            continue;
        }
        let Some(there) = depth.get(cur.x as i32, cur.y as i32) else {
            break;
        };
        let elevation = there - origin;
        max_angle = max_angle.max((elevation / distance).atan());
    }
    max_angle
}

/// Random unit vector on the upper (`y >= 0`) hemisphere.
pub fn random_hemisphere_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let theta = 2.0 * PI * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        (phi.sin() * theta.sin()).abs(),
        phi.cos(),
    )
}

/// Bakes ambient occlusion into a grayscale texture laid out by the model's
/// UVs.
///
/// For each sample the model is seen orthographically from a random
/// direction of the upper hemisphere: a [`ZShader`] pass fills a depth map,
/// then an [`OcclusionShader`] pass marks the texels of every fragment that
/// reaches it. The texture holds the running mean of those visibility maps;
/// texels no fragment ever reaches stay black.
pub fn bake_texture_space<R: Rng + ?Sized>(
    model: &Model,
    config: &BakeConfig,
    rng: &mut R,
) -> Canvas {
    let size = config.texture_size;
    let res = config.resolution;
    let mut total = Canvas::new(size, size, Format::Grayscale);
    let mut occl = Canvas::new(size, size, Format::Grayscale);
    let mut depth_pass = Renderer::new(res, res, Format::Grayscale);
    let mut visibility_pass = Renderer::new(res, res, Format::Grayscale);

    for iter in 1..=config.samples {
        let eye = random_hemisphere_direction(rng);
        let ctx = RenderContext::look_from(&Camera::facing_origin(eye), res, res, false);

        depth_pass.render(model, &ctx, &mut ZShader::new(model));

        occl.clear();
        let mut shader = OcclusionShader::new(model, depth_pass.depth(), &mut occl);
        visibility_pass.render(model, &ctx, &mut shader);

        accumulate(&mut total, &occl, iter);
        debug!("ao sample {}/{} from {:?}", iter, config.samples, eye);
    }

    info!(
        "baked ambient occlusion: {} samples into {}x{}",
        config.samples, size, size
    );
    total
}

/// Folds the `iter`-th (1-based) sample into the running mean `total`.
fn accumulate(total: &mut Canvas, sample: &Canvas, iter: usize) {
    let n = iter as f32;
    for y in 0..total.height() as i32 {
        for x in 0..total.width() as i32 {
            let (Some(t), Some(s)) = (total.get(x, y), sample.get(x, y)) else {
                continue;
            };
            let mean = (t.r as f32 * (n - 1.0) + s.r as f32) / n + 0.5;
            total.set(x, y, Color::gray(mean.min(255.0) as u8));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::math::vec2::Uv;
    use crate::model::FaceVertex;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plane(width: u32, height: u32, depth: f32) -> DepthBuffer {
        let mut buffer = DepthBuffer::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                buffer.set(x, y, depth);
            }
        }
        buffer
    }

    #[test]
    fn flat_plane_is_fully_open() {
        let depth = plane(16, 16, 0.5);
        let ao = screen_space(&depth, &SsaoConfig::default());
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(ao.get(x, y), Some(Color::gray(255)), "at {x},{y}");
            }
        }
    }

    #[test]
    fn unwritten_pixels_stay_black() {
        let mut depth = plane(16, 16, 0.5);
        depth.set(4, 9, DepthBuffer::EMPTY);
        let ao = screen_space(&depth, &SsaoConfig::default());
        assert_eq!(ao.get(4, 9), Some(colors::BLACK));
        // A hole below a pixel does not darken it.
        assert_eq!(ao.get(4, 8), Some(Color::gray(255)));
    }

    #[test]
    fn pixels_next_to_a_wall_are_darker() {
        let mut depth = plane(32, 32, 0.0);
        for y in 0..32 {
            for x in 18..32 {
                depth.set(x, y, 5.0);
            }
        }
        let config = SsaoConfig {
            exponent: 1.0,
            ..SsaoConfig::default()
        };
        let ao = screen_space(&depth, &config);
        let near = ao.get(16, 16).unwrap().r;
        let far = ao.get(2, 16).unwrap().r;
        assert!(near < far, "near {near} far {far}");
    }

    #[test]
    fn elevation_angle_of_a_step() {
        let mut depth = plane(8, 1, 0.0);
        depth.set(3, 0, 2.0);
        let angle = max_elevation_angle(&depth, Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), 1000.0);
        // Rise of 2 over a run of 2 pixels.
        assert_relative_eq!(angle, std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
        // Looking away from the step sees nothing.
        let back = max_elevation_angle(&depth, Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), 1000.0);
        assert_eq!(back, 0.0);
    }

    #[test]
    fn hemisphere_directions_are_unit_and_upward() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = random_hemisphere_direction(&mut rng);
            assert_relative_eq!(d.magnitude(), 1.0, epsilon = 1e-5);
            assert!(d.y >= 0.0);
        }
    }

    #[test]
    fn running_mean_rounds() {
        let mut total = Canvas::new(1, 1, Format::Grayscale);
        let mut sample = Canvas::new(1, 1, Format::Grayscale);
        sample.set(0, 0, Color::gray(255));
        accumulate(&mut total, &sample, 1);
        assert_eq!(total.get(0, 0), Some(Color::gray(255)));
        sample.clear();
        accumulate(&mut total, &sample, 2);
        assert_eq!(total.get(0, 0), Some(Color::gray(128)));
    }

    /// Square in the z = 0 plane whose UVs only cover the left half of the
    /// texture.
    fn left_half_quad() -> Model {
        let positions = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        let uvs = vec![
            Uv::new(0.0, 0.0),
            Uv::new(0.45, 0.0),
            Uv::new(0.45, 1.0),
            Uv::new(0.0, 1.0),
        ];
        let corner = |i| FaceVertex::new(i, i, 0);
        let faces = vec![
            [corner(0), corner(1), corner(2)],
            [corner(0), corner(2), corner(3)],
        ];
        Model::new(positions, vec![Vec3::FORWARD], uvs, faces).unwrap()
    }

    #[test]
    fn bake_only_touches_mapped_texels() {
        let model = left_half_quad();
        let config = BakeConfig {
            samples: 6,
            resolution: 64,
            texture_size: 16,
        };
        let ao = bake_texture_space(&model, &config, &mut StdRng::seed_from_u64(3));

        let mut lit = 0;
        for y in 0..16 {
            for x in 0..16 {
                let v = ao.get(x, y).unwrap().r;
                if x >= 8 {
                    assert_eq!(v, 0, "texel {x},{y} lies outside the UV layout");
                } else if v > 0 {
                    lit += 1;
                }
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn bake_is_reproducible_with_a_seed() {
        let model = left_half_quad();
        let config = BakeConfig {
            samples: 4,
            resolution: 32,
            texture_size: 8,
        };
        let a = bake_texture_space(&model, &config, &mut StdRng::seed_from_u64(11));
        let b = bake_texture_space(&model, &config, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}

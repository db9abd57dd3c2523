use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tinygl::ao;
use tinygl::camera::Camera;
use tinygl::canvas::{Canvas, Format};
use tinygl::colors;
use tinygl::config::{BakeConfig, RenderConfig, SsaoConfig};
use tinygl::math::Vec3;
use tinygl::model::Model;
use tinygl::render::{RenderContext, Renderer};
use tinygl::shaders::*;
use tinygl::texture::Texture;

/// Lighting model used for the final image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ShaderKind {
    /// One intensity per face.
    Flat,
    /// Per-vertex intensity, interpolated.
    Gouraud,
    /// Gouraud quantised into bands.
    Toon,
    /// Interpolated normals with diffuse and specular maps.
    Phong,
    /// Object-space normal map.
    NormalMap,
    /// Tangent-space normal map.
    Tangent,
    /// Phong with a shadow map rendered from the light.
    Shadow,
    /// Screen-space ambient occlusion.
    Ssao,
    /// Ambient occlusion baked into a texture, then rendered.
    BakedAo,
    /// Triangle edges only.
    Wireframe,
    /// Gray by depth.
    Depth,
}

impl std::fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShaderKind::Flat => "flat",
            ShaderKind::Gouraud => "gouraud",
            ShaderKind::Toon => "toon",
            ShaderKind::Phong => "phong",
            ShaderKind::NormalMap => "normal-map",
            ShaderKind::Tangent => "tangent",
            ShaderKind::Shadow => "shadow",
            ShaderKind::Ssao => "ssao",
            ShaderKind::BakedAo => "baked-ao",
            ShaderKind::Wireframe => "wireframe",
            ShaderKind::Depth => "depth",
        };

        f.write_str(s)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tinygl", version, about = "Render an OBJ model on the CPU")]
struct Args {
    /// Wavefront OBJ file. Sibling `_diffuse`, `_nm`, `_nm_tangent` and
    /// `_spec` TGA maps are picked up automatically.
    model: PathBuf,

    #[arg(long, value_enum, default_value_t = ShaderKind::Gouraud)]
    shader: ShaderKind,

    /// Output image; the format follows the extension.
    #[arg(long, short, default_value = "output.tga")]
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Camera position as X,Y,Z
    #[arg(long, value_parser = parse_vec3, default_value = "1,1,3")]
    eye: Vec3,

    /// Point the camera looks at, as X,Y,Z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    center: Vec3,

    #[arg(long, value_parser = parse_vec3, default_value = "0,1,0")]
    up: Vec3,

    /// Direction toward the light, as X,Y,Z
    #[arg(long, value_parser = parse_vec3, default_value = "1,1,1")]
    light: Vec3,

    /// Use an orthographic projection instead of the camera's perspective.
    #[arg(long, default_value_t = false)]
    orthographic: bool,

    /// Random directions rendered when baking ambient occlusion.
    #[arg(long, default_value_t = 100)]
    ao_samples: usize,

    /// Seed for the ambient occlusion bake; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            camera: Camera::new(self.eye, self.center, self.up),
            light: self.light,
            perspective: !self.orthographic,
            ..RenderConfig::default()
        }
    }
}

/// Parses `X,Y,Z`.
fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid number in {s:?}: {e}"))?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected X,Y,Z, got {s:?}")),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.render_config();
    if config.width == 0 || config.height == 0 {
        bail!("image size must be non-zero, got {}x{}", config.width, config.height);
    }
    if (config.camera.eye - config.camera.center).magnitude() == 0.0 {
        bail!("--eye and --center must differ");
    }

    let model = Model::from_obj(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;

    let start = Instant::now();
    let mut image = render(&model, &config, &args)?;
    info!(
        "rendered {} with the {} shader in {:.2?}",
        args.model.display(),
        args.shader,
        start.elapsed()
    );

    image.flip_vertically();
    image
        .write(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}

fn render(model: &Model, config: &RenderConfig, args: &Args) -> Result<Canvas> {
    let (width, height) = (config.width, config.height);
    let ctx = RenderContext::look_from(&config.camera, width, height, config.perspective);
    let light = config.light_dir();
    let mut renderer = Renderer::new(width, height, config.format);

    match args.shader {
        ShaderKind::Flat => {
            renderer.render(model, &ctx, &mut FlatShader::new(model, light));
        }
        ShaderKind::Gouraud => {
            renderer.render(model, &ctx, &mut GouraudShader::new(model, light));
        }
        ShaderKind::Toon => {
            renderer.render(model, &ctx, &mut ToonShader::new(model, light));
        }
        ShaderKind::Phong => {
            let mut shader = PhongShader::new(model, &ctx, light)?;
            renderer.render(model, &ctx, &mut shader);
        }
        ShaderKind::NormalMap => {
            let mut shader = NormalMapShader::new(model, &ctx, light)?;
            renderer.render(model, &ctx, &mut shader);
        }
        ShaderKind::Tangent => {
            let mut shader = TangentSpaceShader::new(model, &ctx, light)?;
            renderer.render(model, &ctx, &mut shader);
        }
        ShaderKind::Depth => {
            renderer.render(model, &ctx, &mut DepthShader::new(model));
        }
        ShaderKind::Wireframe => {
            renderer.draw_wireframe(model, &ctx, colors::WHITE);
        }
        ShaderKind::Shadow => {
            let light_ctx =
                RenderContext::look_from(&Camera::facing_origin(light), width, height, false);
            let mut light_pass = Renderer::new(width, height, Format::Rgb);
            light_pass.render(model, &light_ctx, &mut DepthShader::new(model));

            let mut shader =
                ShadowShader::new(model, &ctx, light_ctx, light_pass.depth(), light)?;
            renderer.render(model, &ctx, &mut shader);
        }
        ShaderKind::Ssao => {
            renderer.render(model, &ctx, &mut ZShader::new(model));
            return Ok(ao::screen_space(renderer.depth(), &SsaoConfig::default()));
        }
        ShaderKind::BakedAo => {
            let bake = BakeConfig {
                samples: args.ao_samples,
                ..BakeConfig::default()
            };
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let baked = Texture::from_canvas(ao::bake_texture_space(model, &bake, &mut rng));
            renderer.render(model, &ctx, &mut BakedAoShader::new(model, &baked));
        }
    }

    Ok(renderer.into_canvas())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vectors() {
        assert_eq!(parse_vec3("1,2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(parse_vec3(" 0, 1 ,0").unwrap(), Vec3::UP);
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn defaults_match_the_library_defaults() {
        let args = Args::parse_from(["tinygl", "head.obj"]);
        assert_eq!(args.shader, ShaderKind::Gouraud);
        assert_eq!(args.render_config(), RenderConfig::default());
    }

    #[test]
    fn shader_names_round_trip_through_clap() {
        let args = Args::parse_from(["tinygl", "head.obj", "--shader", "normal-map"]);
        assert_eq!(args.shader, ShaderKind::NormalMap);
        assert_eq!(args.shader.to_string(), "normal-map");
        let args = Args::parse_from(["tinygl", "head.obj", "--shader", "baked-ao", "--seed", "4"]);
        assert_eq!(args.shader, ShaderKind::BakedAo);
        assert_eq!(args.seed, Some(4));
    }
}

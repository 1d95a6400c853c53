//! Command-line front end: pick a demo scene, render it, write a PNG.

mod scenes;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use glint_math::DVec3;
use glint_renderer::{render, view_transform, Camera, RenderOptions, Scheduler};

use scenes::SceneName;

#[derive(Parser, Debug)]
#[command(name = "glint", version, about = "Offline Whitted-style ray tracer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Demo scene to render
    #[arg(long, value_enum, default_value_t = SceneName::Spheres)]
    scene: SceneName,

    /// JSON file with render options; flags below override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// Samples per pixel along each axis
    #[arg(long)]
    supersampling: Option<u32>,

    /// Maximum reflection/refraction depth
    #[arg(long)]
    depth: Option<u32>,

    /// Worker threads (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Thin-lens radius for depth of field
    #[arg(long)]
    lens_radius: Option<f64>,

    /// Focal distance; defaults to the distance to the look-at point
    #[arg(long)]
    focal_distance: Option<f64>,

    /// Render buckets through the pipeline scheduler
    #[arg(long)]
    pipeline: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "glint.png")]
    output: PathBuf,
}

impl Args {
    fn render_options(&self, focus: f64) -> Result<RenderOptions> {
        let mut options = match &self.options {
            Some(path) => RenderOptions::from_json_file(path)
                .with_context(|| format!("loading render options from {}", path.display()))?,
            None => RenderOptions::default(),
        };

        if let Some(n) = self.supersampling {
            options.supersampling = n;
        }
        if let Some(depth) = self.depth {
            options.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            options.workers = threads;
        }
        if let Some(radius) = self.lens_radius {
            options.lens_radius = radius;
        }
        if let Some(distance) = self.focal_distance {
            options.focal_distance = distance;
        }
        if options.lens_radius > 0.0 && options.focal_distance <= 0.0 {
            options.focal_distance = focus;
        }
        if self.pipeline {
            options.scheduler = Scheduler::Pipeline;
        }

        Ok(options)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let start = Instant::now();
    let scene = scenes::build(args.scene);
    log::info!("Scene ready in {:.2?}", start.elapsed());

    let camera = Camera::new(args.width, args.height, scene.field_of_view)
        .context("creating camera")?
        .with_transform(view_transform(scene.from, scene.to, DVec3::Y));
    let options = args.render_options(scene.from.distance(scene.to))?;

    let canvas = render(&camera, &scene.world, &options).context("rendering")?;
    canvas
        .save_png(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}

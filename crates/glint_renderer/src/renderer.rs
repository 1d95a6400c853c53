//! Render entry point and schedulers.
//!
//! Two schedulers share one contract. `Columns` hands worker `i` the
//! columns `i, i + n, i + 2n, ...`, so costly regions spread evenly over
//! the pool. `Pipeline` feeds spiral-ordered buckets through a bounded
//! channel to long-lived worker threads. Either way every worker owns its
//! tracer and writes only into private buffers that are merged after the
//! join.

use std::path::Path;
use std::thread;
use std::time::Instant;

use crossbeam::channel;
use glint_core::{Color, BLACK};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    generate_buckets, render_bucket, Bucket, BucketResult, Camera, Canvas, RenderError, Raytracer, Result,
    StratifiedSampler, TraceStats, World, DEFAULT_BUCKET_SIZE,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    /// Fixed-stride columns over a rayon pool
    #[default]
    Columns,
    /// Bucket queue over a bounded channel
    Pipeline,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Samples per pixel along each axis; the pixel gets the square of this
    pub supersampling: u32,
    /// Maximum reflection/refraction recursion depth
    pub max_depth: u32,
    /// Worker threads, 0 = one per rayon thread
    pub workers: usize,
    /// Thin-lens radius, 0 disables depth of field
    pub lens_radius: f64,
    /// Distance to the plane in perfect focus
    pub focal_distance: f64,
    /// Area lights always split down to this depth
    pub area_light_min_depth: u32,
    /// Area lights never split past this depth
    pub area_light_max_depth: u32,
    /// Base seed for every worker's random generator
    pub seed: u64,
    pub scheduler: Scheduler,
    /// Tile size for the pipeline scheduler
    pub bucket_size: u32,
    /// Color returned by rays that hit nothing
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            supersampling: 1,
            max_depth: 4,
            workers: 0,
            lens_radius: 0.0,
            focal_distance: 0.0,
            area_light_min_depth: 2,
            area_light_max_depth: 5,
            seed: 1,
            scheduler: Scheduler::Columns,
            bucket_size: DEFAULT_BUCKET_SIZE,
            background: BLACK,
        }
    }
}

impl RenderOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Reject options no render could run with.
    pub fn validate(&self) -> Result<()> {
        if self.supersampling == 0 {
            return Err(RenderError::InvalidOptions("supersampling must be at least 1".into()));
        }
        if self.supersampling.checked_mul(self.supersampling).is_none() {
            return Err(RenderError::InvalidOptions(format!(
                "supersampling {} gives more than {} samples per pixel",
                self.supersampling,
                u32::MAX
            )));
        }
        if !(self.lens_radius >= 0.0) {
            return Err(RenderError::InvalidOptions(format!(
                "lens radius must be non-negative, got {}",
                self.lens_radius
            )));
        }
        if self.lens_radius > 0.0 && !(self.focal_distance > 0.0) {
            return Err(RenderError::InvalidOptions(format!(
                "depth of field needs a positive focal distance, got {}",
                self.focal_distance
            )));
        }
        if self.area_light_min_depth > self.area_light_max_depth {
            return Err(RenderError::InvalidOptions(format!(
                "area light min depth {} exceeds max depth {}",
                self.area_light_min_depth, self.area_light_max_depth
            )));
        }
        if self.scheduler == Scheduler::Pipeline && self.bucket_size == 0 {
            return Err(RenderError::InvalidOptions("bucket size must be at least 1".into()));
        }

        if self.area_light_max_depth > 8 {
            log::warn!(
                "Area light max depth {} can take up to 4^{} shadow rays per hit",
                self.area_light_max_depth,
                self.area_light_max_depth + 1
            );
        }
        Ok(())
    }

    /// Worker count with 0 resolved to the rayon thread count.
    pub fn resolved_workers(&self) -> usize {
        if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers
        }
    }

    fn sampler(&self) -> StratifiedSampler {
        StratifiedSampler::new(self.supersampling, self.supersampling > 1)
    }
}

/// Sum of all samples of pixel `(x, y)`.
pub fn render_pixel(
    tracer: &mut Raytracer<'_>,
    camera: &Camera,
    sampler: &StratifiedSampler,
    options: &RenderOptions,
    x: u32,
    y: u32,
) -> Color {
    let mut sum = BLACK;

    for index in 0..sampler.count() {
        let offset = sampler.sample(index, tracer.rng());
        let (px, py) = (x as f64 + offset.x, y as f64 + offset.y);

        let ray = if options.lens_radius > 0.0 {
            let (u, v) = (tracer.random(), tracer.random());
            camera.ray_for_pixel_dof(px, py, options.lens_radius, options.focal_distance, u, v)
        } else {
            camera.ray_for_pixel(px, py)
        };

        sum += tracer.color_for_ray(&ray, options.max_depth);
    }

    sum
}

/// Render the whole image. Returns averaged linear colors.
pub fn render(camera: &Camera, world: &World, options: &RenderOptions) -> Result<Canvas> {
    options.validate()?;

    let workers = options.resolved_workers();
    if workers == 0 {
        return Err(RenderError::InvalidOptions("no worker threads available".into()));
    }
    let sampler = options.sampler();

    log::info!(
        "Rendering {}x{}, {} samples per pixel, max depth {}, {} workers ({:?})",
        camera.hsize(),
        camera.vsize(),
        sampler.count(),
        options.max_depth,
        workers,
        options.scheduler
    );
    let start = Instant::now();

    let (mut canvas, stats) = match options.scheduler {
        Scheduler::Columns => render_columns(camera, world, options, &sampler, workers)?,
        Scheduler::Pipeline => render_pipeline(camera, world, options, &sampler, workers)?,
    };
    canvas.scale(1.0 / sampler.count() as f64);

    log::info!(
        "Render finished in {:.2?}: {} rays, {} shadow rays",
        start.elapsed(),
        stats.rays,
        stats.shadow_rays
    );

    Ok(canvas)
}

fn render_columns(
    camera: &Camera,
    world: &World,
    options: &RenderOptions,
    sampler: &StratifiedSampler,
    workers: usize,
) -> Result<(Canvas, TraceStats)> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("glint-worker-{}", i))
        .build()?;

    let (width, height) = (camera.hsize(), camera.vsize());

    let strips: Vec<(Vec<(u32, Vec<Color>)>, TraceStats)> = pool.install(|| {
        (0..workers)
            .into_par_iter()
            .map(|worker| {
                let mut tracer = Raytracer::new(world, options, options.seed.wrapping_add(worker as u64));
                let mut columns = Vec::new();

                for x in (worker as u32..width).step_by(workers) {
                    let column: Vec<Color> = (0..height)
                        .map(|y| render_pixel(&mut tracer, camera, sampler, options, x, y))
                        .collect();
                    columns.push((x, column));
                }

                log::debug!("Worker {} finished {} columns", worker, columns.len());
                (columns, tracer.stats())
            })
            .collect()
    });

    let mut canvas = Canvas::new(width, height);
    let mut stats = TraceStats::default();
    for (columns, worker_stats) in strips {
        for (x, column) in columns {
            canvas.add_column(x, &column);
        }
        stats += worker_stats;
    }

    Ok((canvas, stats))
}

fn render_pipeline(
    camera: &Camera,
    world: &World,
    options: &RenderOptions,
    sampler: &StratifiedSampler,
    workers: usize,
) -> Result<(Canvas, TraceStats)> {
    let buckets = generate_buckets(camera.hsize(), camera.vsize(), options.bucket_size);
    let bucket_count = buckets.len();

    thread::scope(|scope| {
        // Created inside the scope so an early return hangs up on the workers
        let (bucket_tx, bucket_rx) = channel::bounded::<Bucket>(workers * 2);
        let (result_tx, result_rx) = channel::unbounded::<(BucketResult, TraceStats)>();

        for worker in 0..workers {
            let bucket_rx = bucket_rx.clone();
            let result_tx = result_tx.clone();

            thread::Builder::new()
                .name(format!("glint-bucket-{}", worker))
                .spawn_scoped(scope, move || {
                    let mut done = 0;
                    for bucket in bucket_rx.iter() {
                        // Seeded per bucket so the image does not depend on
                        // which thread picked the bucket up
                        let seed = options.seed.wrapping_add(bucket.index as u64);
                        let mut tracer = Raytracer::new(world, options, seed);
                        let pixels = render_bucket(&bucket, &mut tracer, camera, sampler, options);

                        if result_tx.send((BucketResult::new(bucket, pixels), tracer.stats())).is_err() {
                            break;
                        }
                        done += 1;
                    }
                    log::debug!("Worker {} finished {} buckets", worker, done);
                })?;
        }
        drop(bucket_rx);
        drop(result_tx);

        for bucket in buckets {
            if bucket_tx.send(bucket).is_err() {
                break;
            }
        }
        drop(bucket_tx);

        let mut canvas = Canvas::new(camera.hsize(), camera.vsize());
        let mut stats = TraceStats::default();
        let mut received = 0;
        for (result, bucket_stats) in result_rx.iter() {
            let b = result.bucket;
            canvas.add_block(b.x, b.y, b.width, &result.pixels);
            stats += bucket_stats;
            received += 1;
        }

        if received != bucket_count {
            log::warn!("Only {} of {} buckets were rendered", received, bucket_count);
        }

        Ok((canvas, stats))
    })
}

//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that workers pull from a queue.
//! Used by the pipeline scheduler; the column scheduler never tiles.

use glint_core::Color;

use crate::{render_pixel, Camera, RenderOptions, Raytracer, StratifiedSampler};

/// Tile of the raster; `(x, y)` is its top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order, also the bucket's RNG stream
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Cover a `width` x `height` raster with tiles of at most `bucket_size`
/// pixels a side, ordered center first. Edge tiles are clipped.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width)
                .step_by(size as usize)
                .map(move |x| Bucket::new(x, y, size.min(width - x), size.min(height - y), 0))
        })
        .collect();

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Order by squared distance between tile center and image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f64 + b.width as f64 / 2.0;
        let by = b.y as f64 + b.height as f64 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order between equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render every pixel of `bucket`, row-major. Each entry is the sum of the
/// pixel's samples, not yet averaged.
pub fn render_bucket(
    bucket: &Bucket,
    tracer: &mut Raytracer<'_>,
    camera: &Camera,
    sampler: &StratifiedSampler,
    options: &RenderOptions,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(tracer, camera, sampler, options, bucket.x + local_x, bucket.y + local_y);
            pixels.push(color);
        }
    }

    pixels
}

/// A finished tile, sent from a pipeline worker to the collector.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel sums in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

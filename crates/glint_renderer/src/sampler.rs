//! Pixel and lens sampling.

use std::f64::consts::FRAC_PI_4;

use glint_math::DVec2;
use rand::Rng;

/// An `n` x `n` grid of samples over the unit square, optionally with one
/// random offset per cell.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedSampler {
    per_axis: u32,
    jittered: bool,
}

impl StratifiedSampler {
    /// `per_axis` of 0 is treated as 1.
    pub fn new(per_axis: u32, jittered: bool) -> Self {
        Self {
            per_axis: per_axis.max(1),
            jittered,
        }
    }

    pub fn per_axis(&self) -> u32 {
        self.per_axis
    }

    /// Total samples per pixel, saturating at `u32::MAX`.
    pub fn count(&self) -> u32 {
        self.per_axis.saturating_mul(self.per_axis)
    }

    /// Offset of sample `index` inside the pixel, in [0, 1) on both axes.
    /// A single-sample sampler always returns the pixel center.
    pub fn sample<R: Rng + ?Sized>(&self, index: u32, rng: &mut R) -> DVec2 {
        if self.per_axis == 1 {
            return DVec2::splat(0.5);
        }

        let cell = 1.0 / self.per_axis as f64;
        let (i, j) = (index % self.per_axis, index / self.per_axis);
        let center = DVec2::new((i as f64 + 0.5) * cell, (j as f64 + 0.5) * cell);

        if !self.jittered {
            return center;
        }

        let jitter = DVec2::new(rng.gen::<f64>(), rng.gen::<f64>()) * cell - DVec2::splat(cell / 2.0);
        center + jitter
    }
}

/// Map the unit square onto the unit disk, keeping strata adjacent
/// (Shirley-Chiu concentric mapping).
pub fn concentric_sample_disk(u: f64, v: f64) -> DVec2 {
    let offset = DVec2::new(2.0 * u - 1.0, 2.0 * v - 1.0);

    if offset.x == 0.0 && offset.y == 0.0 {
        return DVec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, 2.0 * FRAC_PI_4 - FRAC_PI_4 * (offset.x / offset.y))
    };

    DVec2::new(theta.cos(), theta.sin()) * r
}

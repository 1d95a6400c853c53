use crate::{Interval, Ray, DVec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Boxes may be unbounded on some axes (planes, infinite cylinders).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Parametric range `(t0, t1)` in which a ray lies between the planes
/// `min` and `max` of one axis.
///
/// Only an exactly zero direction component is treated as parallel, which
/// keeps this test in agreement with [`Aabb::hit_inv`]. The quotient is then
/// replaced by an infinity carrying the numerator's sign, so a parallel ray
/// outside the slab yields an empty range and one inside it an unbounded
/// range, without ever producing `0 / 0`.
#[inline]
pub fn slab(origin: f64, direction: f64, min: f64, max: f64) -> (f64, f64) {
    slab_with_tolerance(origin, direction, min, max, 0.0)
}

/// [`slab`] with every direction component smaller than `tolerance` in
/// magnitude treated as parallel. Solid primitives use [`crate::EPSILON`] here.
#[inline]
pub fn slab_with_tolerance(origin: f64, direction: f64, min: f64, max: f64, tolerance: f64) -> (f64, f64) {
    let near = min - origin;
    let far = max - origin;

    let (t0, t1) = if direction != 0.0 && direction.abs() >= tolerance {
        (near / direction, far / direction)
    } else {
        let t0 = if near <= 0.0 { f64::NEG_INFINITY } else { f64::INFINITY };
        let t1 = if far >= 0.0 { f64::INFINITY } else { f64::NEG_INFINITY };
        (t0, t1)
    };

    if t0 > t1 {
        (t1, t0)
    } else {
        (t0, t1)
    }
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow the box so it contains `p`.
    pub fn include_point(&self, p: DVec3) -> Self {
        Self {
            x: Interval::new(self.x.min.min(p.x), self.x.max.max(p.x)),
            y: Interval::new(self.y.min.min(p.y), self.y.max.max(p.y)),
            z: Interval::new(self.z.min.min(p.z), self.z.max.max(p.z)),
        }
    }

    pub fn min(&self) -> DVec3 {
        DVec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> DVec3 {
        DVec3::new(self.x.max, self.y.max, self.z.max)
    }

    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test against the raw ray direction.
    ///
    /// Uses a closed comparison (`tmin <= tmax`): grazing rays count as hits,
    /// which is the safe side for culling.
    pub fn hit(&self, r: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }

        let (xt0, xt1) = slab(r.origin.x, r.direction.x, self.x.min, self.x.max);
        let (yt0, yt1) = slab(r.origin.y, r.direction.y, self.y.min, self.y.max);
        let (zt0, zt1) = slab(r.origin.z, r.direction.z, self.z.min, self.z.max);

        let tmin = xt0.max(yt0).max(zt0);
        let tmax = xt1.min(yt1).min(zt1);

        tmin <= tmax
    }

    /// Slab test with a precomputed inverse direction, used by BVH traversal.
    ///
    /// `0 * inf` can yield NaN when the origin lies exactly on a slab plane of
    /// an axis the ray is parallel to; the comparisons below skip NaN operands
    /// instead of letting them poison the running bounds.
    pub fn hit_inv(&self, origin: DVec3, inv_dir: DVec3) -> bool {
        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        for axis in 0..3 {
            let interval = self.axis_interval(axis);
            let (o, inv) = (origin[axis], inv_dir[axis]);

            let (t0, t1) = if inv >= 0.0 {
                ((interval.min - o) * inv, (interval.max - o) * inv)
            } else {
                ((interval.max - o) * inv, (interval.min - o) * inv)
            };

            if t0 > tmin {
                tmin = t0;
            }
            if t1 < tmax {
                tmax = t1;
            }
        }

        tmin <= tmax
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    ///
    /// Unbounded axes report 0, see [`Interval::midpoint`].
    pub fn centroid(&self) -> DVec3 {
        DVec3::new(self.x.midpoint(), self.y.midpoint(), self.z.midpoint())
    }

    pub fn surface_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let (dx, dy, dz) = (self.x.size(), self.y.size(), self.z.size());
        2.0 * (dx * dy + dx * dz + dy * dz)
    }

    /// Position of `p` relative to the box, 0 at the min corner and 1 at the
    /// max corner. Axes with no extent are left unscaled.
    pub fn offset(&self, p: DVec3) -> DVec3 {
        let mut o = p - self.min();
        for axis in 0..3 {
            let interval = self.axis_interval(axis);
            if interval.max > interval.min {
                o[axis] /= interval.size();
            }
        }
        o
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

/// One axis of a bounding box: every value between `min` and `max`,
/// both ends included. Either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Contains nothing; `min > max`.
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Contains every value, used for the unbounded axes of planes and
    /// infinite cylinders or cones.
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extent along the axis. Infinite for unbounded intervals.
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Widen by `delta` in total, half on each side.
    pub fn expand(&self, delta: f64) -> Interval {
        let half = delta * 0.5;
        Interval::new(self.min - half, self.max + half)
    }

    /// Center of the interval, or 0 when either end is unbounded so that
    /// planes still get a finite centroid for BVH binning.
    pub fn midpoint(&self) -> f64 {
        let mid = (self.min + self.max) * 0.5;
        if mid.is_finite() {
            mid
        } else {
            0.0
        }
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

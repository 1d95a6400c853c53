//! Unit-radius cylinder around the object-space y axis.

use glint_math::{Aabb, DVec3, Ray, EPSILON};

/// Cylinder clipped to `min < y < max`, optionally closed by caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub min: f64,
    pub max: f64,
    pub capped: bool,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::infinite()
    }
}

impl Cylinder {
    pub fn new(min: f64, max: f64, capped: bool) -> Self {
        Self { min, max, capped }
    }

    /// Open cylinder extending along the whole y axis.
    pub fn infinite() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY, false)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(
            DVec3::new(-1.0, self.min, -1.0),
            DVec3::new(1.0, self.max, 1.0),
        )
    }

    pub fn local_intersect(&self, ray: &Ray, mut emit: impl FnMut(f64)) {
        let (o, d) = (ray.origin, ray.direction);
        let a = d.x * d.x + d.z * d.z;

        // Rays parallel to the axis can only hit the caps
        if a.abs() > EPSILON {
            let b = 2.0 * (o.x * d.x + o.z * d.z);
            let c = o.x * o.x + o.z * o.z - 1.0;
            let disc = b * b - 4.0 * a * c;

            if disc >= 0.0 {
                let sqrtd = disc.sqrt();
                for t in [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)] {
                    let y = o.y + t * d.y;
                    if self.min < y && y < self.max {
                        emit(t);
                    }
                }
            }
        }

        if self.capped && d.y.abs() > EPSILON {
            for cap in [self.min, self.max] {
                let t = (cap - o.y) / d.y;
                let x = o.x + t * d.x;
                let z = o.z + t * d.z;
                if x * x + z * z <= 1.0 {
                    emit(t);
                }
            }
        }
    }

    pub fn local_normal(&self, point: DVec3) -> DVec3 {
        let dist = point.x * point.x + point.z * point.z;

        if dist < 1.0 {
            if point.y >= self.max - EPSILON {
                return DVec3::Y;
            }
            if point.y <= self.min + EPSILON {
                return -DVec3::Y;
            }
        }

        DVec3::new(point.x, 0.0, point.z)
    }
}

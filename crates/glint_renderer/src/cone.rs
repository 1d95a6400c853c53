//! Double-napped cone `x^2 + z^2 = y^2` around the object-space y axis.

use glint_math::{Aabb, DVec3, Ray, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub min: f64,
    pub max: f64,
    pub capped: bool,
}

impl Default for Cone {
    fn default() -> Self {
        Self::infinite()
    }
}

impl Cone {
    pub fn new(min: f64, max: f64, capped: bool) -> Self {
        Self { min, max, capped }
    }

    pub fn infinite() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY, false)
    }

    pub fn bounds(&self) -> Aabb {
        let r = self.min.abs().max(self.max.abs());
        Aabb::from_points(DVec3::new(-r, self.min, -r), DVec3::new(r, self.max, r))
    }

    pub fn local_intersect(&self, ray: &Ray, mut emit: impl FnMut(f64)) {
        let (o, d) = (ray.origin, ray.direction);
        let a = d.x * d.x - d.y * d.y + d.z * d.z;
        let b = 2.0 * (o.x * d.x - o.y * d.y + o.z * d.z);
        let c = o.x * o.x - o.y * o.y + o.z * o.z;

        let in_range = |t: f64| {
            let y = o.y + t * d.y;
            self.min < y && y < self.max
        };

        if a.abs() > EPSILON {
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let sqrtd = disc.sqrt();
                for t in [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)] {
                    if in_range(t) {
                        emit(t);
                    }
                }
            }
        } else if b.abs() > EPSILON {
            // Parallel to one half of the cone, may still cross the other
            let t = -c / (2.0 * b);
            if in_range(t) {
                emit(t);
            }
        }

        if self.capped && d.y.abs() > EPSILON {
            for cap in [self.min, self.max] {
                let t = (cap - o.y) / d.y;
                let x = o.x + t * d.x;
                let z = o.z + t * d.z;
                if x * x + z * z <= cap * cap {
                    emit(t);
                }
            }
        }
    }

    pub fn local_normal(&self, point: DVec3) -> DVec3 {
        let dist = point.x * point.x + point.z * point.z;

        if dist < self.max * self.max && point.y >= self.max - EPSILON {
            return DVec3::Y;
        }
        if dist < self.min * self.min && point.y <= self.min + EPSILON {
            return -DVec3::Y;
        }

        let mut y = dist.sqrt();
        if point.y > 0.0 {
            y = -y;
        }
        DVec3::new(point.x, y, point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::float_eq;

    fn hits(cone: &Cone, origin: DVec3, direction: DVec3) -> Vec<f64> {
        let mut ts = Vec::new();
        cone.local_intersect(&Ray::new(origin, direction.normalize()), |t| ts.push(t));
        ts
    }

    #[test]
    fn test_ray_strikes_cone() {
        let cone = Cone::infinite();
        let cases = [
            (DVec3::new(0.0, 0.0, -5.0), DVec3::Z, 5.0, 5.0),
            (DVec3::new(0.0, 0.0, -5.0), DVec3::new(1.0, 1.0, 1.0), 8.66025, 8.66025),
            (DVec3::new(1.0, 1.0, -5.0), DVec3::new(-0.5, -1.0, 1.0), 4.55006, 49.44994),
        ];

        for (origin, direction, t0, t1) in cases {
            let ts = hits(&cone, origin, direction);
            assert_eq!(ts.len(), 2);
            assert!(float_eq(ts[0], t0) && float_eq(ts[1], t1), "{:?}", ts);
        }
    }

    #[test]
    fn test_ray_parallel_to_one_half() {
        let cone = Cone::infinite();
        let ts = hits(&cone, DVec3::new(0.0, 0.0, -1.0), DVec3::new(0.0, 1.0, 1.0));

        assert_eq!(ts.len(), 1);
        assert!(float_eq(ts[0], 0.35355));
    }

    #[test]
    fn test_capped_cone() {
        let cone = Cone::new(-0.5, 0.5, true);
        let cases = [
            (DVec3::new(0.0, 0.0, -5.0), DVec3::Y, 0),
            (DVec3::new(0.0, 0.0, -0.25), DVec3::new(0.0, 1.0, 1.0), 2),
            (DVec3::new(0.0, 0.0, -0.25), DVec3::Y, 4),
        ];

        for (origin, direction, count) in cases {
            assert_eq!(hits(&cone, origin, direction).len(), count, "origin {:?}", origin);
        }
    }

    #[test]
    fn test_normals() {
        let cone = Cone::infinite();

        assert_eq!(cone.local_normal(DVec3::ZERO), DVec3::ZERO);
        assert_eq!(
            cone.local_normal(DVec3::new(1.0, 1.0, 1.0)),
            DVec3::new(1.0, -(2.0f64).sqrt(), 1.0)
        );
        assert_eq!(cone.local_normal(DVec3::new(-1.0, -1.0, 0.0)), DVec3::new(-1.0, 1.0, 0.0));
    }
}

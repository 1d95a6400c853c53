//! Infinite xz plane through the object-space origin.

use glint_math::{Aabb, DVec3, Interval, Ray, EPSILON};

pub fn bounds() -> Aabb {
    Aabb::new(Interval::UNIVERSE, Interval::new(0.0, 0.0), Interval::UNIVERSE)
}

/// A ray (nearly) parallel to the plane misses, even when it lies in it.
pub fn local_intersect(ray: &Ray, mut emit: impl FnMut(f64)) {
    if ray.direction.y.abs() < EPSILON {
        return;
    }
    emit(-ray.origin.y / ray.direction.y);
}

#[inline]
pub fn local_normal(_point: DVec3) -> DVec3 {
    DVec3::Y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(ray: Ray) -> Vec<f64> {
        let mut ts = Vec::new();
        local_intersect(&ray, |t| ts.push(t));
        ts
    }

    #[test]
    fn test_parallel_and_coplanar_rays_miss() {
        assert!(hits(Ray::new(DVec3::new(0.0, 10.0, 0.0), DVec3::Z)).is_empty());
        assert!(hits(Ray::new(DVec3::ZERO, DVec3::Z)).is_empty());
    }

    #[test]
    fn test_hit_from_above_and_below() {
        assert_eq!(hits(Ray::new(DVec3::Y, -DVec3::Y)), vec![1.0]);
        assert_eq!(hits(Ray::new(-DVec3::Y, DVec3::Y)), vec![1.0]);
    }

    #[test]
    fn test_normal_is_constant() {
        assert_eq!(local_normal(DVec3::new(10.0, 0.0, -10.0)), DVec3::Y);
    }
}

use crate::{DMat4, DVec3};

/// A ray in 3D space with an origin point and a direction vector.
///
/// Rays are immutable values. Moving a ray into another coordinate space
/// produces a new ray, see [`Ray::transform`]. The direction is not required
/// to be normalized: object-space rays keep the scale of the transform so
/// that `t` values stay comparable across spaces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Map the ray through `m`, the origin as a point and the direction as a
    /// vector.
    #[inline]
    pub fn transform(&self, m: &DMat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }

    /// Component-wise reciprocal of the direction, for repeated slab tests.
    #[inline]
    pub fn inv_direction(&self) -> DVec3 {
        DVec3::ONE / self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(DVec3::new(2.0, 3.0, 4.0), DVec3::X);

        assert_eq!(ray.at(0.0), DVec3::new(2.0, 3.0, 4.0));
        assert_eq!(ray.at(1.0), DVec3::new(3.0, 3.0, 4.0));
        assert_eq!(ray.at(-1.0), DVec3::new(1.0, 3.0, 4.0));
        assert_eq!(ray.at(2.5), DVec3::new(4.5, 3.0, 4.0));
    }

    #[test]
    fn test_ray_translate() {
        let ray = Ray::new(DVec3::new(1.0, 2.0, 3.0), DVec3::Y);
        let moved = ray.transform(&DMat4::from_translation(DVec3::new(3.0, 4.0, 5.0)));

        assert_eq!(moved.origin, DVec3::new(4.0, 6.0, 8.0));
        assert_eq!(moved.direction, DVec3::Y);
    }

    #[test]
    fn test_ray_scale() {
        let ray = Ray::new(DVec3::new(1.0, 2.0, 3.0), DVec3::Y);
        let scaled = ray.transform(&DMat4::from_scale(DVec3::new(2.0, 3.0, 4.0)));

        assert_eq!(scaled.origin, DVec3::new(2.0, 6.0, 12.0));
        assert_eq!(scaled.direction, DVec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(DVec3::ZERO, DVec3::Y);
        let ray2 = ray1; // Copy, not move

        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }

    #[test]
    fn test_inv_direction() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(2.0, -4.0, 0.0));
        let inv = ray.inv_direction();

        assert_eq!(inv.x, 0.5);
        assert_eq!(inv.y, -0.25);
        assert_eq!(inv.z, f64::INFINITY);
    }
}

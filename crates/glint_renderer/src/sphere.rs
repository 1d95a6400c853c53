//! Unit sphere primitive centred at the object-space origin.

use glint_math::{Aabb, DVec3, Ray};

pub fn bounds() -> Aabb {
    Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0))
}

/// Both roots of the ray/sphere quadratic, nearest first. A tangent ray
/// reports the same `t` twice.
pub fn local_intersect(ray: &Ray, mut emit: impl FnMut(f64)) {
    let a = ray.direction.length_squared();
    let b = 2.0 * ray.direction.dot(ray.origin);
    let c = ray.origin.length_squared() - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return;
    }

    let sqrtd = discriminant.sqrt();
    emit((-b - sqrtd) / (2.0 * a));
    emit((-b + sqrtd) / (2.0 * a));
}

#[inline]
pub fn local_normal(point: DVec3) -> DVec3 {
    point
}

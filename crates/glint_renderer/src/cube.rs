//! Axis-aligned cube spanning -1..1 on every object-space axis.

use glint_math::{slab_with_tolerance, Aabb, DVec3, Ray, EPSILON};

pub fn bounds() -> Aabb {
    Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0))
}

/// Entry and exit `t` from the three slabs.
///
/// Stricter than the bounding-box test: direction components below
/// [`EPSILON`] count as parallel, and `tmin < tmax` is strict so a ray that
/// only grazes an edge is not a hit on the solid cube.
pub fn local_intersect(ray: &Ray, mut emit: impl FnMut(f64)) {
    let (xt0, xt1) = slab_with_tolerance(ray.origin.x, ray.direction.x, -1.0, 1.0, EPSILON);
    let (yt0, yt1) = slab_with_tolerance(ray.origin.y, ray.direction.y, -1.0, 1.0, EPSILON);
    let (zt0, zt1) = slab_with_tolerance(ray.origin.z, ray.direction.z, -1.0, 1.0, EPSILON);

    let tmin = xt0.max(yt0).max(zt0);
    let tmax = xt1.min(yt1).min(zt1);

    if tmin < tmax {
        emit(tmin);
        emit(tmax);
    }
}

/// Normal of the face whose axis has the largest coordinate magnitude.
pub fn local_normal(point: DVec3) -> DVec3 {
    let a = point.abs();
    let max = a.max_element();

    if max == a.x {
        DVec3::new(point.x, 0.0, 0.0)
    } else if max == a.y {
        DVec3::new(0.0, point.y, 0.0)
    } else {
        DVec3::new(0.0, 0.0, point.z)
    }
}

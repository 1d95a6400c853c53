//! Glint math - rays, bounding boxes and transforms for the ray tracer.
//!
//! Everything is double precision. Points and vectors share `DVec3`; the
//! homogeneous w component is implied by which `DMat4` method is used
//! (`transform_point3` for w=1, `transform_vector3` for w=0).

// Re-export glam for convenience
pub use glam::{dvec3, DMat4, DQuat, DVec2, DVec3, DVec4};

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::{slab, slab_with_tolerance, Aabb};
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Mat4Ext, Transform};

/// Tolerance used for surface offsets and float comparisons.
pub const EPSILON: f64 = 1e-5;

/// Returns true if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Component-wise [`float_eq`] for vectors.
#[inline]
pub fn vec_eq(a: DVec3, b: DVec3) -> bool {
    float_eq(a.x, b.x) && float_eq(a.y, b.y) && float_eq(a.z, b.z)
}

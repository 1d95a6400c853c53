// Transform utilities for DMat4
//
// `Transform` caches the inverse and inverse-transpose next to the forward
// matrix; every intersection needs the inverse and every normal needs the
// inverse-transpose, so both are derived eagerly whenever the matrix is set.

use glam::{DMat4, DVec3};

use crate::Aabb;

/// A 4x4 affine transform with its cached inverse and inverse-transpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: DMat4,
    inverse: DMat4,
    inverse_transpose: DMat4,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        matrix: DMat4::IDENTITY,
        inverse: DMat4::IDENTITY,
        inverse_transpose: DMat4::IDENTITY,
    };

    pub fn new(matrix: DMat4) -> Self {
        let inverse = matrix.inverse();
        Self {
            matrix,
            inverse,
            inverse_transpose: inverse.transpose(),
        }
    }

    /// Compose a chain of matrices left to right: `chain(&[a, b])` applies
    /// `b` first, then `a`.
    pub fn chain(matrices: &[DMat4]) -> Self {
        let matrix = matrices.iter().fold(DMat4::IDENTITY, |acc, m| acc * *m);
        Self::new(matrix)
    }

    #[inline]
    pub fn matrix(&self) -> &DMat4 {
        &self.matrix
    }

    #[inline]
    pub fn inverse(&self) -> &DMat4 {
        &self.inverse
    }

    #[inline]
    pub fn inverse_transpose(&self) -> &DMat4 {
        &self.inverse_transpose
    }

    /// Map a normal from this transform's object space to its parent space.
    #[inline]
    pub fn normal_to_parent(&self, normal: DVec3) -> DVec3 {
        self.inverse_transpose.transform_vector3(normal).normalize()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Extension trait for DMat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for DMat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        // Arvo's method: each output axis starts at the translation and takes
        // the smaller/larger of every matrix term applied to the old extents.
        // Zero terms are skipped so unbounded boxes never produce inf * 0.
        let (lo, hi) = (aabb.min(), aabb.max());
        let translation = self.w_axis.truncate();
        let mut result_min = translation;
        let mut result_max = translation;

        for row in 0..3 {
            for col in 0..3 {
                let e = self.col(col)[row];
                if e == 0.0 {
                    continue;
                }
                let a = e * lo[col];
                let b = e * hi[col];
                result_min[row] += a.min(b);
                result_max[row] += a.max(b);
            }
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_transform_keeps_inverse_consistent() {
        let t = Transform::new(DMat4::from_scale(DVec3::new(2.0, 4.0, 8.0)));

        let product = *t.matrix() * *t.inverse();
        assert!(product.abs_diff_eq(DMat4::IDENTITY, 1e-12));
        assert!(t
            .inverse_transpose()
            .abs_diff_eq(t.inverse().transpose(), 1e-12));
    }

    #[test]
    fn test_transform_chain_order() {
        // Rotate, then scale, then translate
        let t = Transform::chain(&[
            DMat4::from_translation(DVec3::new(10.0, 5.0, 7.0)),
            DMat4::from_scale(DVec3::splat(5.0)),
            DMat4::from_rotation_x(PI / 2.0),
        ]);

        let p = t.matrix().transform_point3(DVec3::new(1.0, 0.0, 1.0));
        assert!(p.abs_diff_eq(DVec3::new(15.0, 0.0, 7.0), 1e-9));
    }

    #[test]
    fn test_normal_to_parent_scaled() {
        let t = Transform::new(DMat4::from_scale(DVec3::new(1.0, 0.5, 1.0)));
        let s = 2f64.sqrt() / 2.0;

        let n = t.normal_to_parent(DVec3::new(0.0, 2f64.sqrt(), -s));
        assert!(n.abs_diff_eq(DVec3::new(0.0, 0.97014, -0.24254), 1e-5));
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = DMat4::from_translation(DVec3::splat(5.0));
        let aabb = Aabb::from_points(DVec3::ZERO, DVec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min() - DVec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max() - DVec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        let mat = DMat4::from_rotation_y(PI / 4.0);
        let aabb = Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0));
        let transformed = mat.transform_aabb(&aabb);

        let r = 2f64.sqrt();
        assert!((transformed.x.max - r).abs() < 1e-9);
        assert!((transformed.z.min + r).abs() < 1e-9);
        assert!((transformed.y.max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_aabb_unbounded() {
        let plane = Aabb::from_points(
            DVec3::new(f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY),
            DVec3::new(f64::INFINITY, 0.0, f64::INFINITY),
        );
        let moved = DMat4::from_translation(DVec3::new(0.0, 2.0, 0.0)).transform_aabb(&plane);

        assert_eq!(moved.x.min, f64::NEG_INFINITY);
        assert_eq!(moved.z.max, f64::INFINITY);
        assert!(moved.y.contains(2.0));
        assert!(!moved.y.contains(2.1));
    }
}

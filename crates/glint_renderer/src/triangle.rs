//! Triangle primitives.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection. A
//! standalone `Triangle` owns its vertices; a `MeshTriangle` only keeps
//! indices into a `Mesh` held by the world.

use glint_core::Mesh;
use glint_math::{Aabb, DVec3, Ray};

use crate::MeshId;

/// Determinant threshold below which the ray counts as parallel. Kept far
/// below the general epsilon so dense meshes of tiny triangles still hit.
const DET_EPSILON: f64 = 1e-9;

/// Ray parameter plus barycentric coordinates of a triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f64,
    pub u: f64,
    pub v: f64,
}

/// Möller-Trumbore against the triangle `p1`, `p1 + e1`, `p1 + e2`.
pub fn moller_trumbore(ray: &Ray, p1: DVec3, e1: DVec3, e2: DVec3) -> Option<TriangleHit> {
    let dir_cross_e2 = ray.direction.cross(e2);
    let det = e1.dot(dir_cross_e2);

    // Ray is parallel to triangle
    if det.abs() < DET_EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let p1_to_origin = ray.origin - p1;
    let u = f * p1_to_origin.dot(dir_cross_e2);

    // Misses past the p1-p3 edge
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let origin_cross_e1 = p1_to_origin.cross(e1);
    let v = f * ray.direction.dot(origin_cross_e1);

    // Misses past the p1-p2 or p2-p3 edge
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(TriangleHit {
        t: f * e2.dot(origin_cross_e1),
        u,
        v,
    })
}

fn triangle_bounds(p1: DVec3, p2: DVec3, p3: DVec3) -> Aabb {
    Aabb::from_points(p1.min(p2).min(p3), p1.max(p2).max(p3))
}

/// A triangle with its own vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: DVec3,
    pub p2: DVec3,
    pub p3: DVec3,
    e1: DVec3,
    e2: DVec3,
    normal: DVec3,
}

impl Triangle {
    pub fn new(p1: DVec3, p2: DVec3, p3: DVec3) -> Self {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        Self {
            p1,
            p2,
            p3,
            e1,
            e2,
            normal: Mesh::face_normal(p1, p2, p3).normalize_or_zero(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        triangle_bounds(self.p1, self.p2, self.p3)
    }

    pub fn local_intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        moller_trumbore(ray, self.p1, self.e1, self.e2)
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }
}

/// A triangle referencing vertices of a shared mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTriangle {
    pub mesh: MeshId,
    pub indices: [usize; 3],
    e1: DVec3,
    e2: DVec3,
    normal: DVec3,
}

impl MeshTriangle {
    /// Build triangle `index` of `mesh`. Returns `None` for out-of-range
    /// vertex indices.
    pub fn new(mesh_id: MeshId, mesh: &Mesh, index: usize) -> Option<Self> {
        let indices = mesh.triangle(index)?;
        let [p1, p2, p3] = indices.map(|i| mesh.positions[i]);

        Some(Self {
            mesh: mesh_id,
            indices,
            e1: p2 - p1,
            e2: p3 - p1,
            normal: Mesh::face_normal(p1, p2, p3).normalize_or_zero(),
        })
    }

    pub fn bounds(&self, mesh: &Mesh) -> Aabb {
        let [p1, p2, p3] = self.indices.map(|i| mesh.positions[i]);
        triangle_bounds(p1, p2, p3)
    }

    pub fn local_intersect(&self, mesh: &Mesh, ray: &Ray) -> Option<TriangleHit> {
        moller_trumbore(ray, mesh.positions[self.indices[0]], self.e1, self.e2)
    }

    /// Vertex normals interpolated at `(u, v)` when the mesh has them,
    /// otherwise the flat face normal.
    pub fn normal_at(&self, mesh: &Mesh, u: f64, v: f64) -> DVec3 {
        match &mesh.normals {
            Some(normals) => {
                let [n1, n2, n3] = self.indices.map(|i| normals[i]);
                n2 * u + n3 * v + n1 * (1.0 - u - v)
            }
            None => self.normal,
        }
    }
}

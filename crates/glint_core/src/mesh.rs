//! Mesh geometry shared by mesh triangles.
//!
//! A mesh owns the vertex and normal arrays; each triangle shape only keeps
//! the mesh's id and three vertex indices.

use glint_math::{Aabb, DVec3};

/// Indexed triangle list in object space.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<DVec3>,

    /// Vertex normals, indexed like `positions`. When absent, triangles are
    /// shaded flat.
    pub normals: Option<Vec<DVec3>>,

    /// Three entries per triangle, each an index into `positions`
    pub indices: Vec<u32>,

    /// Bounds of every vertex, computed once at construction
    pub bounds: Aabb,
}

impl Mesh {
    /// Missing normals stay missing; see [`Mesh::compute_normals`].
    pub fn new(positions: Vec<DVec3>, indices: Vec<u32>, normals: Option<Vec<DVec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    fn compute_bounds(positions: &[DVec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::empty();
        }

        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);

        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }

    /// Face normal of the triangle `(p0, p1, p2)`.
    ///
    /// Uses `e2 x e1`, so counter-clockwise triangles seen from +Z face -Z.
    pub fn face_normal(p0: DVec3, p1: DVec3, p2: DVec3) -> DVec3 {
        (p2 - p0).cross(p1 - p0)
    }

    /// Smooth normals: each vertex gets the normalized sum of the
    /// (area-weighted) face normals around it. Faces with out-of-range
    /// indices are ignored.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![DVec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];

            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let face_normal =
                Self::face_normal(self.positions[i0], self.positions[i1], self.positions[i2]);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            let len = normal.length();
            if len > 0.0 {
                *normal /= len;
            } else {
                *normal = DVec3::Y;
            }
        }

        self.normals = Some(normals);
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex indices of triangle `i`, or `None` if any index is out of range.
    pub fn triangle(&self, i: usize) -> Option<[usize; 3]> {
        let face = self.indices.get(i * 3..i * 3 + 3)?;
        let tri = [face[0] as usize, face[1] as usize, face[2] as usize];

        if tri.iter().any(|&v| v >= self.positions.len()) {
            log::warn!(
                "Invalid triangle indices: {:?}, vertex count: {}",
                tri,
                self.positions.len()
            );
            return None;
        }

        Some(tri)
    }
}

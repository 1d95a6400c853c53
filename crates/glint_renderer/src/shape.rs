//! Scene nodes.
//!
//! Every shape, group and CSG combination is a `Node` stored in the world's
//! arena and addressed by `NodeId`. Children point back at their parent by
//! id; only the arena owns nodes.

use std::fmt;

use glint_core::{Material, Mesh};
use glint_math::{Aabb, DVec3, Transform};

use crate::{cone::Cone, cube, cylinder::Cylinder, plane, sphere, Bvh, Csg, MeshTriangle, Triangle};

/// Index of a node in the world arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a mesh in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// A collection of child nodes sharing one transform.
#[derive(Debug)]
pub struct Group {
    pub(crate) children: Vec<NodeId>,
    /// Union of the children's bounds, in the group's own space
    pub(crate) bounds: Aabb,
    pub(crate) bvh: Option<Bvh>,
}

impl Group {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            bounds: Aabb::EMPTY,
            bvh: None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum ShapeKind {
    Sphere,
    Plane,
    Cube,
    Cylinder(Cylinder),
    Cone(Cone),
    Triangle(Triangle),
    MeshTriangle(MeshTriangle),
    Group(Group),
    Csg(Csg),
}

impl ShapeKind {
    /// Short lowercase name used for default node names.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Plane => "plane",
            ShapeKind::Cube => "cube",
            ShapeKind::Cylinder(_) => "cylinder",
            ShapeKind::Cone(_) => "cone",
            ShapeKind::Triangle(_) => "triangle",
            ShapeKind::MeshTriangle(_) => "mesh_triangle",
            ShapeKind::Group(_) => "group",
            ShapeKind::Csg(_) => "csg",
        }
    }

    /// True for shapes that produce intersections themselves.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, ShapeKind::Group(_) | ShapeKind::Csg(_))
    }

    /// Object-space bounds of a primitive. Groups report their cached
    /// bounds; CSG bounds depend on other nodes and are computed by the
    /// world.
    pub(crate) fn primitive_bounds(&self, meshes: &[Mesh]) -> Aabb {
        match self {
            ShapeKind::Sphere => sphere::bounds(),
            ShapeKind::Plane => plane::bounds(),
            ShapeKind::Cube => cube::bounds(),
            ShapeKind::Cylinder(c) => c.bounds(),
            ShapeKind::Cone(c) => c.bounds(),
            ShapeKind::Triangle(t) => t.bounds(),
            ShapeKind::MeshTriangle(t) => t.bounds(&meshes[t.mesh.0]),
            ShapeKind::Group(g) => g.bounds,
            ShapeKind::Csg(_) => Aabb::EMPTY,
        }
    }

    /// Object-space normal at `point`. `uv` carries the barycentric
    /// coordinates recorded for triangle hits.
    pub(crate) fn local_normal(&self, point: DVec3, uv: Option<(f64, f64)>, meshes: &[Mesh]) -> DVec3 {
        match self {
            ShapeKind::Sphere => sphere::local_normal(point),
            ShapeKind::Plane => plane::local_normal(point),
            ShapeKind::Cube => cube::local_normal(point),
            ShapeKind::Cylinder(c) => c.local_normal(point),
            ShapeKind::Cone(c) => c.local_normal(point),
            ShapeKind::Triangle(t) => t.normal(),
            ShapeKind::MeshTriangle(t) => {
                let (u, v) = uv.unwrap_or((0.0, 0.0));
                t.normal_at(&meshes[t.mesh.0], u, v)
            }
            // Never the owner of an intersection
            ShapeKind::Group(_) | ShapeKind::Csg(_) => DVec3::Y,
        }
    }
}

/// One node of the scene arena.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub kind: ShapeKind,
    pub(crate) transform: Transform,
    pub material: Material,
    pub(crate) parent: Option<NodeId>,
    /// Whether the shape blocks light in shadow tests
    pub casts_shadow: bool,
}

impl Node {
    pub(crate) fn new(name: String, kind: ShapeKind) -> Self {
        Self {
            name,
            kind,
            transform: Transform::IDENTITY,
            material: Material::default(),
            parent: None,
            casts_shadow: true,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ShapeKind::Group(g) => Some(g),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_defaults() {
        let node = Node::new("ball".into(), ShapeKind::Sphere);

        assert_eq!(node.transform, Transform::IDENTITY);
        assert_eq!(node.material, Material::default());
        assert!(node.casts_shadow);
        assert!(node.parent.is_none());
        assert!(node.as_group().is_none());
    }

    #[test]
    fn test_primitive_bounds() {
        let cyl = ShapeKind::Cylinder(Cylinder::new(-5.0, 3.0, true));
        let b = cyl.primitive_bounds(&[]);

        assert_eq!(b.min(), DVec3::new(-1.0, -5.0, -1.0));
        assert_eq!(b.max(), DVec3::new(1.0, 3.0, 1.0));

        let plane = ShapeKind::Plane.primitive_bounds(&[]);
        assert_eq!(plane.x.min, f64::NEG_INFINITY);
        assert_eq!(plane.z.max, f64::INFINITY);
    }

    #[test]
    fn test_group_and_csg_are_not_primitives() {
        assert!(ShapeKind::Sphere.is_primitive());
        assert!(!ShapeKind::Group(Group::new()).is_primitive());
        assert_eq!(ShapeKind::Group(Group::new()).kind_name(), "group");
    }
}

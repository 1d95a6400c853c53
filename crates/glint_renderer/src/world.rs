//! The scene arena.
//!
//! `World` owns every node, every mesh and the lights. Shapes are created
//! detached, then attached either as top-level objects or as children of a
//! group. Groups cache their bounds as children are added; changing a
//! transform refreshes the cached bounds of every ancestor and drops their
//! BVHs so a stale hierarchy is never traversed.

use glint_core::{Color, Light, Material, Mesh, WHITE};
use glint_math::{Aabb, DMat4, DVec3, Mat4Ext, Ray, Transform};

use crate::{
    cone::Cone, cube, cylinder::Cylinder, plane, sphere, Bvh, Csg, CsgOp, Group, Intersection,
    IntersectionList, MeshId, MeshTriangle, Node, NodeId, ShapeKind, Triangle,
};

#[derive(Debug)]
pub struct World {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    objects: Vec<NodeId>,
    pub lights: Vec<Light>,
    /// Color of the ambient light, scaled per material by its `ambient`
    pub ambient: Color,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            meshes: Vec::new(),
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: WHITE,
        }
    }

    // ----------------------------------------------------------------------
    // Construction
    // ----------------------------------------------------------------------

    /// Create a detached node of the given kind.
    pub fn add(&mut self, kind: ShapeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = format!("{}_{}", kind.kind_name(), id.0);
        self.nodes.push(Node::new(name, kind));
        id
    }

    pub fn sphere(&mut self) -> NodeId {
        self.add(ShapeKind::Sphere)
    }

    pub fn plane(&mut self) -> NodeId {
        self.add(ShapeKind::Plane)
    }

    pub fn cube(&mut self) -> NodeId {
        self.add(ShapeKind::Cube)
    }

    pub fn cylinder(&mut self, min: f64, max: f64, capped: bool) -> NodeId {
        self.add(ShapeKind::Cylinder(Cylinder::new(min, max, capped)))
    }

    pub fn cone(&mut self, min: f64, max: f64, capped: bool) -> NodeId {
        self.add(ShapeKind::Cone(Cone::new(min, max, capped)))
    }

    pub fn triangle(&mut self, p1: DVec3, p2: DVec3, p3: DVec3) -> NodeId {
        self.add(ShapeKind::Triangle(Triangle::new(p1, p2, p3)))
    }

    pub fn group(&mut self) -> NodeId {
        self.add(ShapeKind::Group(Group::new()))
    }

    /// Combine two detached nodes. Both become children of the new node.
    pub fn csg(&mut self, op: CsgOp, left: NodeId, right: NodeId) -> NodeId {
        let id = self.add(ShapeKind::Csg(Csg { op, left, right }));
        self.nodes[left.0].parent = Some(id);
        self.nodes[right.0].parent = Some(id);
        id
    }

    /// Union of any number of nodes as a balanced tree of CSG unions.
    /// A single node is returned unchanged.
    pub fn csg_union_all(&mut self, nodes: &[NodeId]) -> Option<NodeId> {
        let mut level = nodes.to_vec();

        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| match *pair {
                    [a, b] => self.csg(CsgOp::Union, a, b),
                    [a] => a,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
        }

        level.first().copied()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    /// A group holding one mesh triangle per triangle of the mesh.
    /// Triangles with out-of-range indices are skipped.
    pub fn mesh_group(&mut self, mesh: MeshId) -> NodeId {
        let group = self.group();

        let triangles: Vec<MeshTriangle> = {
            let m = &self.meshes[mesh.0];
            (0..m.triangle_count())
                .filter_map(|i| MeshTriangle::new(mesh, m, i))
                .collect()
        };

        for tri in triangles {
            let child = self.add(ShapeKind::MeshTriangle(tri));
            self.add_child(group, child);
        }

        group
    }

    /// Make `id` a top-level object of the scene.
    pub fn add_object(&mut self, id: NodeId) {
        if self.nodes[id.0].parent.is_some() {
            log::warn!("{} already has a parent, adding it as a top-level object anyway", id);
        }
        self.objects.push(id);
    }

    /// Append `child` to `group`, growing the cached bounds of the group and
    /// its ancestors.
    pub fn add_child(&mut self, group: NodeId, child: NodeId) {
        if !matches!(self.nodes[group.0].kind, ShapeKind::Group(_)) {
            log::warn!("{} is not a group, ignoring child {}", group, child);
            return;
        }

        let child_bounds = self.parent_space_bounds(child);
        self.nodes[child.0].parent = Some(group);

        if let ShapeKind::Group(g) = &mut self.nodes[group.0].kind {
            g.children.push(child);
            g.bounds = Aabb::surrounding(&g.bounds, &child_bounds);
            g.bvh = None;
        }

        if let Some(parent) = self.nodes[group.0].parent {
            self.refresh_ancestors(parent);
        }
    }

    pub fn set_transform(&mut self, id: NodeId, matrix: DMat4) {
        self.nodes[id.0].transform = Transform::new(matrix);
        if let Some(parent) = self.nodes[id.0].parent {
            self.refresh_ancestors(parent);
        }
    }

    /// Assign a material. Groups and CSG nodes pass it on to every
    /// descendant.
    pub fn set_material(&mut self, id: NodeId, material: Material) {
        for child in self.child_ids(id) {
            self.set_material(child, material.clone());
        }
        self.nodes[id.0].material = material;
    }

    /// Set whether `id` and its descendants block light.
    pub fn set_casts_shadow(&mut self, id: NodeId, casts_shadow: bool) {
        for child in self.child_ids(id) {
            self.set_casts_shadow(child, casts_shadow);
        }
        self.nodes[id.0].casts_shadow = casts_shadow;
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.nodes[id.0].name = name.into();
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    // ----------------------------------------------------------------------
    // Queries
    // ----------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn objects(&self) -> &[NodeId] {
        &self.objects
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// First top-level object with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.objects
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].name == name)
    }

    fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id.0].kind {
            ShapeKind::Group(g) => g.children.clone(),
            ShapeKind::Csg(c) => vec![c.left, c.right],
            _ => Vec::new(),
        }
    }

    /// Bounds of `id` in its own object space.
    pub fn bounds_of(&self, id: NodeId) -> Aabb {
        match &self.nodes[id.0].kind {
            ShapeKind::Csg(c) => {
                Aabb::surrounding(&self.parent_space_bounds(c.left), &self.parent_space_bounds(c.right))
            }
            kind => kind.primitive_bounds(&self.meshes),
        }
    }

    /// Bounds of `id` in its parent's space.
    pub fn parent_space_bounds(&self, id: NodeId) -> Aabb {
        self.nodes[id.0].transform.matrix().transform_aabb(&self.bounds_of(id))
    }

    /// Recompute cached group bounds from `id` up to the root, dropping
    /// every BVH on the way.
    fn refresh_ancestors(&mut self, id: NodeId) {
        let mut current = Some(id);

        while let Some(id) = current {
            if let ShapeKind::Group(g) = &self.nodes[id.0].kind {
                let bounds = g
                    .children
                    .iter()
                    .fold(Aabb::EMPTY, |acc, c| Aabb::surrounding(&acc, &self.parent_space_bounds(*c)));

                if let ShapeKind::Group(g) = &mut self.nodes[id.0].kind {
                    g.bounds = bounds;
                    g.bvh = None;
                }
            }
            current = self.nodes[id.0].parent;
        }
    }

    /// Map a world-space point into the object space of `id`.
    pub fn world_to_object(&self, id: NodeId, point: DVec3) -> DVec3 {
        let node = &self.nodes[id.0];
        let point = match node.parent {
            Some(parent) => self.world_to_object(parent, point),
            None => point,
        };
        node.transform.inverse().transform_point3(point)
    }

    /// Map an object-space normal of `id` into world space.
    pub fn normal_to_world(&self, id: NodeId, normal: DVec3) -> DVec3 {
        let node = &self.nodes[id.0];
        let normal = node.transform.normal_to_parent(normal);
        match node.parent {
            Some(parent) => self.normal_to_world(parent, normal),
            None => normal,
        }
    }

    /// World-space normal at `point` for the primitive hit by `hit`.
    pub fn normal_at(&self, hit: &Intersection, point: DVec3, xs: &IntersectionList) -> DVec3 {
        let node = &self.nodes[hit.node.0];
        let local_point = self.world_to_object(hit.node, point);
        let uv = xs.data_of(hit).map(|d| (d.u, d.v));
        let local_normal = node.kind.local_normal(local_point, uv, &self.meshes);
        self.normal_to_world(hit.node, local_normal)
    }

    // ----------------------------------------------------------------------
    // Intersection
    // ----------------------------------------------------------------------

    /// Add the intersections of a world-space ray with every top-level
    /// object. The list is left unsorted; its tracked hit is always valid.
    pub fn intersect(&self, ray: &Ray, xs: &mut IntersectionList) {
        for &id in &self.objects {
            self.intersect_node(id, ray, xs);
        }
    }

    /// Sorted intersections of `ray` with the scene, in a fresh list.
    pub fn intersections(&self, ray: &Ray) -> IntersectionList {
        let mut xs = IntersectionList::new();
        self.intersect(ray, &mut xs);
        xs.sort();
        xs
    }

    /// Intersect `ray`, given in the parent space of `id`.
    pub(crate) fn intersect_node(&self, id: NodeId, ray: &Ray, xs: &mut IntersectionList) {
        let node = &self.nodes[id.0];

        if xs.shadows && node.kind.is_primitive() && !node.casts_shadow {
            return;
        }

        let local = ray.transform(node.transform.inverse());

        match &node.kind {
            ShapeKind::Sphere => sphere::local_intersect(&local, |t| xs.add(t, id)),
            ShapeKind::Plane => plane::local_intersect(&local, |t| xs.add(t, id)),
            ShapeKind::Cube => cube::local_intersect(&local, |t| xs.add(t, id)),
            ShapeKind::Cylinder(c) => c.local_intersect(&local, |t| xs.add(t, id)),
            ShapeKind::Cone(c) => c.local_intersect(&local, |t| xs.add(t, id)),
            ShapeKind::Triangle(tri) => {
                if let Some(hit) = tri.local_intersect(&local) {
                    let data = xs.add_with_data(hit.t, id);
                    data.u = hit.u;
                    data.v = hit.v;
                }
            }
            ShapeKind::MeshTriangle(tri) => {
                if let Some(hit) = tri.local_intersect(&self.meshes[tri.mesh.0], &local) {
                    let data = xs.add_with_data(hit.t, id);
                    data.u = hit.u;
                    data.v = hit.v;
                }
            }
            ShapeKind::Group(g) => self.intersect_group(g, &local, xs),
            ShapeKind::Csg(c) => self.intersect_csg(c, &local, xs),
        }
    }

    /// Without a BVH the group's box is tested once before every child.
    fn intersect_group(&self, group: &Group, ray: &Ray, xs: &mut IntersectionList) {
        match &group.bvh {
            Some(bvh) => bvh.traverse(ray, |i| self.intersect_node(group.children[i], ray, xs)),
            None => {
                if !group.bounds.hit(ray) {
                    return;
                }
                for &child in &group.children {
                    self.intersect_node(child, ray, xs);
                }
            }
        }
    }

    // ----------------------------------------------------------------------
    // Acceleration
    // ----------------------------------------------------------------------

    /// Build the BVH of `group`. Does nothing if it already has one or is
    /// not a group.
    pub fn build_bvh(&mut self, group: NodeId) {
        let children = match &self.nodes[group.0].kind {
            ShapeKind::Group(g) if g.bvh.is_some() => {
                log::debug!("BVH of {} already built, skipping", group);
                return;
            }
            ShapeKind::Group(g) => g.children.clone(),
            _ => return,
        };

        let bounds: Vec<Aabb> = children.iter().map(|&c| self.parent_space_bounds(c)).collect();
        let (bvh, order) = Bvh::build(&bounds);

        log::info!(
            "Built BVH for {}: {} objects, {} nodes, {} leaves",
            self.nodes[group.0].name,
            children.len(),
            bvh.node_count(),
            bvh.leaf_count()
        );

        if let ShapeKind::Group(g) = &mut self.nodes[group.0].kind {
            g.children = order.into_iter().map(|i| children[i]).collect();
            g.bvh = Some(bvh);
        }
    }

    /// Build the BVH of every group in the world.
    pub fn build_all_bvhs(&mut self) {
        let groups: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| matches!(self.nodes[id.0].kind, ShapeKind::Group(_)))
            .collect();

        for group in groups {
            self.build_bvh(group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::{float_eq, vec_eq};
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    #[test]
    fn test_add_child_sets_parent_and_bounds() {
        let mut world = World::new();
        let g = world.group();
        let s = world.sphere();
        world.set_transform(s, DMat4::from_translation(DVec3::new(2.0, 5.0, -3.0)));
        world.add_child(g, s);

        assert_eq!(world.node(s).parent(), Some(g));
        let bounds = world.bounds_of(g);
        assert!(vec_eq(bounds.min(), DVec3::new(1.0, 4.0, -4.0)));
        assert!(vec_eq(bounds.max(), DVec3::new(3.0, 6.0, -2.0)));
    }

    #[test]
    fn test_transform_change_refreshes_group_bounds() {
        let mut world = World::new();
        let g = world.group();
        let s = world.sphere();
        world.add_child(g, s);
        world.build_bvh(g);
        assert!(world.node(g).as_group().unwrap().bvh().is_some());

        world.set_transform(s, DMat4::from_translation(DVec3::new(10.0, 0.0, 0.0)));

        let group = world.node(g).as_group().unwrap();
        assert!(group.bvh().is_none());
        assert!(vec_eq(group.bounds().min(), DVec3::new(9.0, -1.0, -1.0)));
    }

    #[test]
    fn test_intersect_transformed_group() {
        let mut world = World::new();
        let g = world.group();
        world.set_transform(g, DMat4::from_scale(DVec3::splat(2.0)));
        let s = world.sphere();
        world.set_transform(s, DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)));
        world.add_child(g, s);
        world.add_object(g);

        let ray = Ray::new(DVec3::new(10.0, 0.0, -10.0), DVec3::Z);
        assert_eq!(world.intersections(&ray).len(), 2);
    }

    #[test]
    fn test_group_pretest_skips_children() {
        let mut world = World::new();
        let g = world.group();
        let s = world.sphere();
        world.add_child(g, s);
        world.add_object(g);

        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Y);
        assert!(world.intersections(&ray).is_empty());
    }

    #[test]
    fn test_normal_on_nested_child() {
        let mut world = World::new();
        let g1 = world.group();
        world.set_transform(g1, DMat4::from_rotation_y(PI / 2.0));
        let g2 = world.group();
        world.set_transform(g2, DMat4::from_scale(DVec3::new(1.0, 2.0, 3.0)));
        world.add_child(g1, g2);
        let s = world.sphere();
        world.set_transform(s, DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)));
        world.add_child(g2, s);

        let p = world.world_to_object(s, DVec3::new(-2.0, 0.0, -10.0));
        assert!(vec_eq(p, DVec3::new(0.0, 0.0, -1.0)));

        let k = 3f64.sqrt() / 3.0;
        let n = world.normal_to_world(s, DVec3::splat(k));
        let expected = DVec3::new(0.2857, 0.4286, -0.8571);
        assert!((n - expected).abs().max_element() < 1e-4);
    }

    #[test]
    fn test_set_material_propagates() {
        let mut world = World::new();
        let g = world.group();
        let a = world.sphere();
        let b = world.cube();
        let c = world.cube();
        let csg = world.csg(CsgOp::Difference, b, c);
        world.add_child(g, a);
        world.add_child(g, csg);

        let red = Material::new(glint_core::rgb(1.0, 0.0, 0.0));
        world.set_material(g, red.clone());

        for id in [a, b, c] {
            assert_eq!(world.node(id).material, red);
        }
    }

    #[test]
    fn test_find_by_name() {
        let mut world = World::new();
        let s = world.sphere();
        world.set_name(s, "ball");
        world.add_object(s);

        assert_eq!(world.find("ball"), Some(s));
        assert_eq!(world.find("missing"), None);
    }

    #[test]
    fn test_csg_union_all_is_balanced() {
        let mut world = World::new();
        let spheres: Vec<NodeId> = (0..5).map(|_| world.sphere()).collect();
        let root = world.csg_union_all(&spheres).unwrap();

        fn depth(world: &World, id: NodeId) -> usize {
            match &world.node(id).kind {
                ShapeKind::Csg(c) => 1 + depth(world, c.left).max(depth(world, c.right)),
                _ => 0,
            }
        }
        assert_eq!(depth(&world, root), 3);
        assert_eq!(world.csg_union_all(&spheres[..1]), Some(spheres[0]));
        assert_eq!(world.csg_union_all(&[]), None);
    }

    #[test]
    fn test_non_shadow_casters_skipped_in_shadow_mode() {
        let mut world = World::new();
        let s = world.sphere();
        world.set_casts_shadow(s, false);
        world.add_object(s);

        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
        let mut xs = IntersectionList::new();
        xs.shadows = true;
        world.intersect(&ray, &mut xs);
        assert!(xs.is_empty());

        xs.shadows = false;
        world.intersect(&ray, &mut xs);
        assert_eq!(xs.len(), 2);
    }

    #[test]
    fn test_build_bvh_is_idempotent() {
        let mut world = World::new();
        let g = world.group();
        for i in 0..20 {
            let s = world.sphere();
            world.set_transform(s, DMat4::from_translation(DVec3::new(i as f64 * 3.0, 0.0, 0.0)));
            world.add_child(g, s);
        }
        world.build_bvh(g);
        let before: Vec<NodeId> = world.node(g).as_group().unwrap().children().to_vec();
        world.build_bvh(g);
        let after: Vec<NodeId> = world.node(g).as_group().unwrap().children().to_vec();

        assert_eq!(before, after);
    }

    #[test]
    fn test_mesh_group_smooth_normal() {
        let mut world = World::new();
        let mesh = Mesh::new(
            vec![
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(-1.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
            ],
            vec![0, 1, 2],
            Some(vec![DVec3::Y, -DVec3::X, DVec3::X]),
        );
        let id = world.add_mesh(mesh);
        let g = world.mesh_group(id);
        world.add_object(g);

        let ray = Ray::new(DVec3::new(-0.2, 0.3, -2.0), DVec3::Z);
        let xs = world.intersections(&ray);
        let hit = xs.hit().unwrap();
        let n = world.normal_at(&hit, ray.at(hit.t), &xs);

        assert!(vec_eq(n, DVec3::new(-0.5547, 0.83205, 0.0)));
    }

    #[test]
    fn test_normal_on_translated_sphere() {
        let mut world = World::new();
        let s = world.sphere();
        world.set_transform(s, DMat4::from_translation(DVec3::new(0.0, 1.0, 0.0)));
        world.add_object(s);

        let ray = Ray::new(DVec3::new(0.0, 1.0 + FRAC_1_SQRT_2, -5.0), DVec3::Z);
        let xs = world.intersections(&ray);
        let hit = xs.hit().unwrap();
        let n = world.normal_at(&hit, ray.at(hit.t), &xs);

        assert!(float_eq(n.y, FRAC_1_SQRT_2));
        assert!(float_eq(n.z, -FRAC_1_SQRT_2));
    }
}

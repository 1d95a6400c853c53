//! Shading context for a single ray hit.

use glint_core::MaterialParams;
use glint_math::{DVec3, Ray, EPSILON};

use crate::{Intersection, IntersectionList, NodeId, World};

/// Everything the shader needs to know about one hit.
#[derive(Debug, Clone, Copy)]
pub struct HitInfo {
    pub intersection: Intersection,
    pub node: NodeId,
    pub t: f64,
    pub point: DVec3,
    /// `point` nudged along the normal, origin of shadow and reflection rays
    pub over_point: DVec3,
    /// `point` nudged against the normal, origin of refraction rays
    pub under_point: DVec3,
    /// Unit vector from the hit back toward the ray origin
    pub eye: DVec3,
    /// Unit normal, flipped to face the eye
    pub normal: DVec3,
    pub reflect: DVec3,
    /// True when the ray hit the surface from inside the shape
    pub inside: bool,
    /// Index of refraction on the incoming side
    pub n1: f64,
    /// Index of refraction on the outgoing side
    pub n2: f64,
    pub params: MaterialParams,
}

impl HitInfo {
    /// Build the shading context for `hit`, one of the entries of `xs`.
    ///
    /// For transparent materials `xs` is sorted and walked up to the hit to
    /// find the refractive indices on both sides. `containers` is scratch
    /// space for that walk.
    pub fn prepare(
        world: &World,
        hit: Intersection,
        ray: &Ray,
        xs: &mut IntersectionList,
        containers: &mut Vec<NodeId>,
    ) -> HitInfo {
        let node = world.node(hit.node);
        let point = ray.at(hit.t);

        let object_point = world.world_to_object(hit.node, point);
        let params = node.material.resolve(object_point);

        let mut normal = world.normal_at(&hit, point, xs);
        if let Some(perturbation) = params.normal_perturbation {
            normal = (normal + perturbation).normalize();
        }

        let direction = ray.direction.normalize();
        let eye = -direction;
        let inside = normal.dot(eye) < 0.0;
        if inside {
            normal = -normal;
        }

        let (n1, n2) = if params.refract_level > 0.0 {
            xs.sort();
            refractive_indices(world, hit, xs, containers)
        } else {
            (1.0, 1.0)
        };

        HitInfo {
            intersection: hit,
            node: hit.node,
            t: hit.t,
            point,
            over_point: point + normal * EPSILON,
            under_point: point - normal * EPSILON,
            eye,
            normal,
            reflect: direction - normal * 2.0 * direction.dot(normal),
            inside,
            n1,
            n2,
            params,
        }
    }
}

/// Walk the sorted list up to `hit`, keeping the stack of shapes the ray is
/// currently inside.
fn refractive_indices(
    world: &World,
    hit: Intersection,
    xs: &IntersectionList,
    containers: &mut Vec<NodeId>,
) -> (f64, f64) {
    let ior_of_top = |containers: &[NodeId]| {
        containers
            .last()
            .map_or(1.0, |&id| world.node(id).material.ior)
    };

    containers.clear();
    let mut n1 = 1.0;

    for i in xs.iter() {
        let is_hit = i.t == hit.t && i.node == hit.node;
        if is_hit {
            n1 = ior_of_top(containers.as_slice());
        }

        match containers.iter().position(|&id| id == i.node) {
            Some(pos) => {
                containers.remove(pos);
            }
            None => containers.push(i.node),
        }

        if is_hit {
            return (n1, ior_of_top(containers.as_slice()));
        }
    }

    // The hit always comes from `xs`; reaching here means it was not found
    (n1, 1.0)
}

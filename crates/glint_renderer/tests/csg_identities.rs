//! Set identities of CSG combinations.

use glint_renderer::{CsgOp, DMat4, DVec3, NodeId, Ray, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sphere_at(world: &mut World, x: f64, radius: f64) -> NodeId {
    let s = world.sphere();
    world.set_transform(
        s,
        DMat4::from_translation(DVec3::new(x, 0.0, 0.0)) * DMat4::from_scale(DVec3::splat(radius)),
    );
    s
}

fn random_rays(seed: u64, count: usize) -> Vec<Ray> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let origin = DVec3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                -10.0,
            );
            let target = DVec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-2.0..2.0), 0.0);
            Ray::new(origin, (target - origin).normalize())
        })
        .collect()
}

fn hits_of(world: &World, node: NodeId, ray: &Ray) -> usize {
    world.intersections(ray).iter().filter(|i| i.node == node).count()
}

#[test]
fn test_union_of_disjoint_spheres_keeps_all_hits() {
    let mut world = World::new();
    let a = sphere_at(&mut world, -3.0, 1.0);
    let b = sphere_at(&mut world, 3.0, 1.0);
    let union = world.csg(CsgOp::Union, a, b);
    world.add_object(union);

    let mut reference = World::new();
    let ra = sphere_at(&mut reference, -3.0, 1.0);
    let rb = sphere_at(&mut reference, 3.0, 1.0);
    reference.add_object(ra);
    reference.add_object(rb);

    for ray in random_rays(1, 500) {
        let expected = hits_of(&reference, ra, &ray) + hits_of(&reference, rb, &ray);
        assert_eq!(world.intersections(&ray).len(), expected);
    }
}

#[test]
fn test_intersection_of_disjoint_spheres_is_empty() {
    let mut world = World::new();
    let a = sphere_at(&mut world, -3.0, 1.0);
    let b = sphere_at(&mut world, 3.0, 1.0);
    let both = world.csg(CsgOp::Intersection, a, b);
    world.add_object(both);

    for ray in random_rays(2, 500) {
        assert!(world.intersections(&ray).is_empty());
    }
}

#[test]
fn test_difference_with_containing_sphere_is_empty() {
    let mut world = World::new();
    let a = sphere_at(&mut world, 0.0, 1.0);
    let b = sphere_at(&mut world, 0.0, 3.0);
    let carved = world.csg(CsgOp::Difference, a, b);
    world.add_object(carved);

    for ray in random_rays(3, 500) {
        assert!(world.intersections(&ray).is_empty());
    }
}

#[test]
fn test_nested_csg_inside_group() {
    let mut world = World::new();
    let group = world.group();
    let a = sphere_at(&mut world, 0.0, 1.0);
    let b = world.cube();
    world.set_transform(b, DMat4::from_translation(DVec3::new(0.0, 0.0, -1.0)));
    let carved = world.csg(CsgOp::Difference, a, b);
    world.add_child(group, carved);
    world.set_transform(group, DMat4::from_translation(DVec3::new(0.0, 0.0, 5.0)));
    world.add_object(group);
    world.build_all_bvhs();

    // The cube removes the front half, leaving the cut face at z = 5
    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
    let xs = world.intersections(&ray);
    let ts: Vec<f64> = xs.iter().map(|i| i.t).collect();

    assert_eq!(ts.len(), 2);
    assert!((ts[0] - 10.0).abs() < 1e-9);
    assert!((ts[1] - 11.0).abs() < 1e-9);
    assert_eq!(xs.hit().map(|h| h.node), Some(b));
}

#[test]
fn test_balanced_union_matches_pairwise_hits() {
    let mut world = World::new();
    let spheres: Vec<NodeId> = (0..7).map(|i| sphere_at(&mut world, i as f64 * 3.0 - 9.0, 1.0)).collect();
    let union = world.csg_union_all(&spheres).unwrap();
    world.add_object(union);

    let ray = Ray::new(DVec3::new(-20.0, 0.0, 0.0), DVec3::X);
    assert_eq!(world.intersections(&ray).len(), 14);
}

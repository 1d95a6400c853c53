//! Shading behavior across world, hit context, raytracer and renderer.

use glint_core::{rgb, WHITE};
use glint_renderer::{
    render, render_pixel, view_transform, Camera, DMat4, DVec3, HitInfo, Light, Material, Ray, Raytracer,
    RenderOptions, Scheduler, StratifiedSampler, World,
};
use std::f64::consts::{FRAC_PI_2, PI};

/// One lit sphere with a smaller one inside it.
fn default_world() -> World {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(-10.0, 10.0, -10.0), WHITE));

    let outer = world.sphere();
    world.set_material(
        outer,
        Material::new(rgb(0.8, 1.0, 0.6)).with_diffuse(0.7).with_specular(0.2),
    );
    world.add_object(outer);

    let inner = world.sphere();
    world.set_transform(inner, DMat4::from_scale(DVec3::splat(0.5)));
    world.add_object(inner);

    world
}

fn reference_camera() -> Camera {
    Camera::new(11, 11, FRAC_PI_2)
        .unwrap()
        .with_transform(view_transform(DVec3::new(0.0, 0.0, -5.0), DVec3::ZERO, DVec3::Y))
}

fn assert_color(actual: DVec3, expected: DVec3, tolerance: f64) {
    assert!(
        (actual - expected).abs().max_element() < tolerance,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[test]
fn test_reference_center_pixel() {
    let _ = env_logger::builder().is_test(true).try_init();
    let world = default_world();
    let camera = reference_camera();
    let expected = rgb(0.38066, 0.47583, 0.2855);

    let options = RenderOptions { workers: 2, ..Default::default() };
    let canvas = render(&camera, &world, &options).unwrap();
    assert_color(canvas.get(5, 5), expected, 1e-4);

    let pipeline = RenderOptions { scheduler: Scheduler::Pipeline, bucket_size: 4, ..options.clone() };
    let canvas = render(&camera, &world, &pipeline).unwrap();
    assert_color(canvas.get(5, 5), expected, 1e-4);

    let mut tracer = Raytracer::new(&world, &options, 1);
    let sampler = StratifiedSampler::new(1, false);
    let color = render_pixel(&mut tracer, &camera, &sampler, &options, 5, 5);
    assert_color(color, expected, 1e-4);
}

#[test]
fn test_refractive_index_stacking() {
    let mut world = World::new();

    let a = world.sphere();
    world.set_transform(a, DMat4::from_scale(DVec3::splat(2.0)));
    world.set_material(a, Material::glass(1.5));
    world.add_object(a);

    let b = world.sphere();
    world.set_transform(b, DMat4::from_translation(DVec3::new(0.0, 0.0, -0.25)));
    world.set_material(b, Material::glass(2.0));
    world.add_object(b);

    let c = world.sphere();
    world.set_transform(c, DMat4::from_translation(DVec3::new(0.0, 0.0, 0.25)));
    world.set_material(c, Material::glass(2.5));
    world.add_object(c);

    let ray = Ray::new(DVec3::new(0.0, 0.0, -4.0), DVec3::Z);
    let mut xs = world.intersections(&ray);
    assert_eq!(xs.len(), 6);

    let expected = [(1.0, 1.5), (1.5, 2.0), (2.0, 2.5), (2.5, 2.5), (2.5, 1.5), (1.5, 1.0)];
    let mut containers = Vec::new();
    for (i, (n1, n2)) in expected.into_iter().enumerate() {
        let hit = xs.get(i);
        let info = HitInfo::prepare(&world, hit, &ray, &mut xs, &mut containers);
        assert_eq!((info.n1, info.n2), (n1, n2), "intersection {}", i);
    }
}

#[test]
fn test_parallel_mirrors_terminate() {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::ZERO, WHITE));
    let mirror = Material::default().with_reflect(1.0, WHITE);

    let lower = world.plane();
    world.set_material(lower, mirror.clone());
    world.set_transform(lower, DMat4::from_translation(DVec3::new(0.0, -1.0, 0.0)));
    world.add_object(lower);

    let upper = world.plane();
    world.set_material(upper, mirror);
    world.set_transform(
        upper,
        DMat4::from_translation(DVec3::new(0.0, 1.0, 0.0)) * DMat4::from_rotation_x(PI),
    );
    world.add_object(upper);

    let options = RenderOptions::default();
    for depth in [0, 1, 5, 30] {
        let mut tracer = Raytracer::new(&world, &options, 1);
        let color = tracer.color_for_ray(&Ray::new(DVec3::ZERO, DVec3::Y), depth);

        assert!(color.is_finite());
        // One primary ray plus one reflection per remaining level
        assert_eq!(tracer.stats().rays, depth as u64 + 1);
    }
}

#[test]
fn test_supersampling_averages_to_single_sample() {
    // Camera inside a huge ambient-only sphere: every ray sees the same color
    let mut world = World::new();
    let dome = world.sphere();
    world.set_transform(dome, DMat4::from_scale(DVec3::splat(100.0)));
    world.set_material(
        dome,
        Material::new(rgb(0.3, 0.5, 0.7)).with_ambient(1.0).with_diffuse(0.0).with_specular(0.0),
    );
    world.add_object(dome);

    let camera = Camera::new(9, 7, FRAC_PI_2).unwrap();
    let single = render(&camera, &world, &RenderOptions { workers: 2, ..Default::default() }).unwrap();

    for supersampling in [2, 3, 5] {
        let options = RenderOptions { workers: 2, supersampling, ..Default::default() };
        let averaged = render(&camera, &world, &options).unwrap();
        for (a, b) in single.pixels().iter().zip(averaged.pixels()) {
            assert_color(*b, *a, 1e-9);
        }
    }
    assert_color(single.get(4, 3), rgb(0.3, 0.5, 0.7), 1e-12);
}

#[test]
fn test_non_shadow_casting_blocker() {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(0.0, 10.0, 0.0), WHITE));

    let floor = world.plane();
    world.set_material(floor, Material::new(WHITE).with_specular(0.0));
    world.add_object(floor);

    let blocker = world.sphere();
    world.set_transform(blocker, DMat4::from_translation(DVec3::new(0.0, 5.0, 0.0)));
    world.add_object(blocker);

    let ray = Ray::new(DVec3::new(0.0, 0.5, -0.5), DVec3::new(0.0, -1.0, 1.0).normalize());
    let options = RenderOptions::default();

    let shadowed = Raytracer::new(&world, &options, 1).color_for_ray(&ray, 0);
    world.set_casts_shadow(blocker, false);
    let lit = Raytracer::new(&world, &options, 1).color_for_ray(&ray, 0);

    assert_color(shadowed, rgb(0.1, 0.1, 0.1), 1e-9);
    assert!(lit.x > 0.9);
}

#[test]
fn test_glass_ball_shows_floor_through_it() {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(-10.0, 10.0, -10.0), WHITE));

    let floor = world.plane();
    world.set_material(floor, Material::new(rgb(1.0, 0.2, 0.2)).with_specular(0.0));
    world.set_transform(floor, DMat4::from_translation(DVec3::new(0.0, -1.0, 0.0)));
    world.add_object(floor);

    let ball = world.sphere();
    world.set_material(ball, Material::glass(1.5));
    world.add_object(ball);

    let camera = Camera::new(16, 16, FRAC_PI_2 / 2.0)
        .unwrap()
        .with_transform(view_transform(DVec3::new(0.0, 1.0, -5.0), DVec3::ZERO, DVec3::Y));
    let canvas = render(&camera, &world, &RenderOptions { workers: 2, max_depth: 5, ..Default::default() }).unwrap();

    assert!(canvas.pixels().iter().all(|p| p.is_finite()));
    // Light refracted through the ball picks up the red floor
    let center = canvas.get(8, 8);
    assert!(center.x > center.y);
}

//! Built-in demo scenes.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, TAU};

use clap::ValueEnum;
use glint_core::{gray, rgb, Light, Material, Mesh, Pattern, WHITE};
use glint_math::{DMat4, DVec3};
use glint_renderer::{CsgOp, NodeId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    /// Rings of spheres in one BVH group
    Spheres,
    /// Nested glass spheres over a checkered floor
    Glass,
    /// Boolean-carved dice
    Csg,
    /// Smooth-shaded procedural mesh
    Mesh,
    /// Soft shadows from an area light and a spot light
    Area,
}

/// A world plus where to look at it from.
pub struct Scene {
    pub world: World,
    pub from: DVec3,
    pub to: DVec3,
    pub field_of_view: f64,
}

pub fn build(name: SceneName) -> Scene {
    let mut scene = match name {
        SceneName::Spheres => spheres(),
        SceneName::Glass => glass(),
        SceneName::Csg => csg(),
        SceneName::Mesh => mesh(),
        SceneName::Area => area(),
    };

    scene.world.build_all_bvhs();
    log::info!(
        "Built scene {:?}: {} nodes, {} lights",
        name,
        scene.world.node_count(),
        scene.world.lights.len()
    );
    scene
}

fn checkered_floor(world: &mut World, y: f64) -> NodeId {
    let floor = world.plane();
    world.set_name(floor, "floor");
    world.set_transform(floor, DMat4::from_translation(DVec3::new(0.0, y, 0.0)));
    world.set_material(
        floor,
        Material::default()
            .with_pattern(Pattern::checker(gray(0.85), gray(0.25)))
            .with_specular(0.0)
            .with_reflect(0.1, WHITE),
    );
    world.add_object(floor);
    floor
}

fn spheres() -> Scene {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(-10.0, 12.0, -10.0), gray(0.9)));
    checkered_floor(&mut world, 0.0);

    let group = world.group();
    world.set_name(group, "rings");
    for ring in 0..6 {
        let radius = 1.5 + ring as f64 * 1.2;
        let count = 8 + ring * 6;
        for i in 0..count {
            let angle = TAU * i as f64 / count as f64 + ring as f64 * 0.3;
            let size = 0.25 + 0.1 * ((i * 7 + ring) % 4) as f64;
            let hue = (angle / TAU + ring as f64 * 0.15).fract();

            let s = world.sphere();
            world.set_transform(
                s,
                DMat4::from_translation(DVec3::new(radius * angle.cos(), size, radius * angle.sin()))
                    * DMat4::from_scale(DVec3::splat(size)),
            );
            let mut material = Material::new(hue_to_rgb(hue)).with_roughness(0.3);
            if i % 5 == 0 {
                material = material.with_reflect(0.6, WHITE).with_specular(1.0);
            }
            world.set_material(s, material);
            world.add_child(group, s);
        }
    }
    world.add_object(group);

    Scene {
        world,
        from: DVec3::new(0.0, 6.0, -12.0),
        to: DVec3::new(0.0, 0.5, 0.0),
        field_of_view: FRAC_PI_3,
    }
}

fn glass() -> Scene {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(-6.0, 10.0, -8.0), WHITE));
    checkered_floor(&mut world, -1.0);

    let outer = world.sphere();
    world.set_material(outer, Material::glass(1.5).with_refract_color(rgb(0.9, 1.0, 0.95)));
    world.add_object(outer);

    // An air bubble inside the ball
    let bubble = world.sphere();
    world.set_transform(bubble, DMat4::from_scale(DVec3::splat(0.5)));
    world.set_material(bubble, Material::glass(1.0000034));
    world.set_casts_shadow(bubble, false);
    world.add_object(bubble);

    let backdrop = world.cube();
    world.set_transform(
        backdrop,
        DMat4::from_translation(DVec3::new(0.0, 1.0, 6.0)) * DMat4::from_scale(DVec3::new(6.0, 2.0, 0.2)),
    );
    world.set_material(
        backdrop,
        Material::default().with_pattern(
            Pattern::stripe(rgb(0.8, 0.2, 0.1), rgb(0.9, 0.9, 0.8))
                .with_transform(DMat4::from_scale(DVec3::splat(0.1))),
        ),
    );
    world.add_object(backdrop);

    Scene {
        world,
        from: DVec3::new(0.0, 1.5, -5.0),
        to: DVec3::ZERO,
        field_of_view: FRAC_PI_3,
    }
}

fn csg() -> Scene {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(-8.0, 10.0, -10.0), WHITE));
    checkered_floor(&mut world, -1.0);

    for (i, x) in [-2.5, 0.0, 2.5].into_iter().enumerate() {
        let body = world.cube();
        let rounding = world.sphere();
        world.set_transform(rounding, DMat4::from_scale(DVec3::splat(1.35)));
        let rounded = world.csg(CsgOp::Intersection, body, rounding);

        // Three bores through the die along each axis
        let bores: Vec<NodeId> = [
            DMat4::IDENTITY,
            DMat4::from_rotation_x(FRAC_PI_2),
            DMat4::from_rotation_z(FRAC_PI_2),
        ]
        .into_iter()
        .map(|rotation| {
            let c = world.cylinder(-2.0, 2.0, true);
            world.set_transform(c, rotation * DMat4::from_scale(DVec3::new(0.5, 1.0, 0.5)));
            c
        })
        .collect();

        let Some(drill) = world.csg_union_all(&bores) else {
            continue;
        };
        let die = world.csg(CsgOp::Difference, rounded, drill);
        world.set_transform(
            die,
            DMat4::from_translation(DVec3::new(x, 0.0, 0.0))
                * DMat4::from_rotation_y(FRAC_PI_6 * (i as f64 + 1.0))
                * DMat4::from_scale(DVec3::splat(0.7)),
        );
        world.set_material(
            die,
            Material::new(hue_to_rgb(i as f64 / 3.0)).with_reflect(0.15, WHITE).with_shininess(100.0),
        );
        world.set_name(die, format!("die_{}", i));
        world.add_object(die);
    }

    Scene {
        world,
        from: DVec3::new(0.0, 3.0, -7.0),
        to: DVec3::ZERO,
        field_of_view: FRAC_PI_3,
    }
}

/// A rippled height field with vertex normals.
fn ripple_mesh(resolution: usize, size: f64) -> Mesh {
    let height = |x: f64, z: f64| {
        let r = (x * x + z * z).sqrt();
        0.25 * (r * 3.0).cos() * (-r * 0.4).exp()
    };

    let mut positions = Vec::with_capacity((resolution + 1) * (resolution + 1));
    for j in 0..=resolution {
        for i in 0..=resolution {
            let x = (i as f64 / resolution as f64 - 0.5) * size;
            let z = (j as f64 / resolution as f64 - 0.5) * size;
            positions.push(DVec3::new(x, height(x, z), z));
        }
    }

    let stride = (resolution + 1) as u32;
    let mut indices = Vec::with_capacity(resolution * resolution * 6);
    for j in 0..resolution as u32 {
        for i in 0..resolution as u32 {
            let a = j * stride + i;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    let mut mesh = Mesh::new(positions, indices, None);
    mesh.compute_normals();
    mesh
}

fn mesh() -> Scene {
    let mut world = World::new();
    world.add_light(Light::point(DVec3::new(-5.0, 8.0, -6.0), WHITE));
    world.add_light(Light::directional(DVec3::new(1.0, -1.0, 0.5), gray(0.3)));

    let mesh = world.add_mesh(ripple_mesh(64, 8.0));
    let surface = world.mesh_group(mesh);
    world.set_name(surface, "ripple");
    world.set_material(
        surface,
        Material::new(rgb(0.2, 0.45, 0.8)).with_specular(0.6).with_shininess(80.0),
    );
    world.add_object(surface);

    let buoy = world.cone(-1.0, 0.0, true);
    world.set_transform(
        buoy,
        DMat4::from_translation(DVec3::new(1.5, 0.8, 1.0)) * DMat4::from_scale(DVec3::new(0.4, 0.8, 0.4)),
    );
    world.set_material(buoy, Material::new(rgb(0.95, 0.4, 0.1)));
    world.add_object(buoy);

    Scene {
        world,
        from: DVec3::new(0.0, 4.0, -7.0),
        to: DVec3::new(0.0, -0.5, 0.0),
        field_of_view: FRAC_PI_3,
    }
}

fn area() -> Scene {
    let mut world = World::new();
    world.ambient = gray(0.5);
    world.add_light(Light::rect_facing(
        DVec3::new(-2.0, 5.0, -2.0),
        DVec3::ZERO,
        2.0,
        2.0,
        gray(0.8),
    ));
    world.add_light(Light::spot(
        DVec3::new(4.0, 6.0, -1.0),
        DVec3::new(1.0, 0.0, 1.0),
        FRAC_PI_6 / 2.0,
        FRAC_PI_4 / 2.0,
        rgb(0.6, 0.5, 0.3),
    ));

    let floor = world.plane();
    world.set_material(floor, Material::new(gray(0.9)).with_specular(0.0).with_roughness(0.5));
    world.add_object(floor);

    let pillar = world.cylinder(0.0, 2.0, true);
    world.set_transform(pillar, DMat4::from_scale(DVec3::new(0.5, 1.0, 0.5)));
    world.set_material(pillar, Material::new(rgb(0.8, 0.75, 0.6)).with_roughness(0.8));
    world.add_object(pillar);

    let ball = world.sphere();
    world.set_transform(
        ball,
        DMat4::from_translation(DVec3::new(1.0, 0.6, 1.2)) * DMat4::from_scale(DVec3::splat(0.6)),
    );
    world.set_material(ball, Material::new(rgb(0.3, 0.6, 0.3)).with_reflect(0.2, WHITE));
    world.add_object(ball);

    Scene {
        world,
        from: DVec3::new(3.0, 4.0, -6.0),
        to: DVec3::new(0.0, 0.5, 0.0),
        field_of_view: FRAC_PI_3,
    }
}

/// Fully saturated color for `hue` in [0, 1).
fn hue_to_rgb(hue: f64) -> DVec3 {
    let channel = |offset: f64| {
        let h = (hue + offset).fract() * 6.0;
        (2.0 - (h - 3.0).abs()).clamp(0.0, 1.0) * 0.8 + 0.1
    };
    rgb(channel(0.0), channel(2.0 / 3.0), channel(1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_builds() {
        for name in SceneName::value_variants() {
            let scene = build(*name);
            assert!(!scene.world.objects().is_empty());
            assert!(!scene.world.lights.is_empty());
        }
    }

    #[test]
    fn test_ripple_mesh_layout() {
        let mesh = ripple_mesh(4, 2.0);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        assert!(mesh.has_normals());
    }

    #[test]
    fn test_csg_scene_names_dice() {
        let scene = build(SceneName::Csg);
        assert!(scene.world.find("die_1").is_some());
    }
}

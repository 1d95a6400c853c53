//! Recursive Whitted-style shading.
//!
//! A `Raytracer` belongs to one worker. It borrows the world read-only and
//! owns its scratch buffers and random generator, so any number of them can
//! run side by side over the same scene.

use glint_core::{Color, BLACK};
use glint_math::{DVec3, Ray};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{HitInfo, Illuminate, IntersectionList, NodeId, RenderOptions, World};

/// Ray counts gathered by one tracer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Camera, reflection and refraction rays
    pub rays: u64,
    pub shadow_rays: u64,
}

impl std::ops::AddAssign for TraceStats {
    fn add_assign(&mut self, other: Self) {
        self.rays += other.rays;
        self.shadow_rays += other.shadow_rays;
    }
}

/// Schlick's approximation of the Fresnel reflectance at a hit.
pub fn schlick(hit: &HitInfo) -> f64 {
    let mut cos = hit.eye.dot(hit.normal);

    if hit.n1 > hit.n2 {
        let n = hit.n1 / hit.n2;
        let sin2_t = n * n * (1.0 - cos * cos);
        if sin2_t > 1.0 {
            // Total internal reflection
            return 1.0;
        }
        cos = (1.0 - sin2_t).sqrt();
    }

    let r0 = ((hit.n1 - hit.n2) / (hit.n1 + hit.n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

pub struct Raytracer<'w> {
    world: &'w World,
    xs: IntersectionList,
    containers: Vec<NodeId>,
    rng: Xoshiro256PlusPlus,
    background: Color,
    area_light_min_depth: u32,
    area_light_max_depth: u32,
    stats: TraceStats,
}

impl<'w> Raytracer<'w> {
    pub fn new(world: &'w World, options: &RenderOptions, seed: u64) -> Self {
        Self {
            world,
            xs: IntersectionList::new(),
            containers: Vec::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            background: options.background,
            area_light_min_depth: options.area_light_min_depth,
            area_light_max_depth: options.area_light_max_depth,
            stats: TraceStats::default(),
        }
    }

    pub fn world(&self) -> &'w World {
        self.world
    }

    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Uniform random number in [0, 1).
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    pub fn rng(&mut self) -> &mut Xoshiro256PlusPlus {
        &mut self.rng
    }

    pub(crate) fn area_light_depths(&self) -> (u32, u32) {
        (self.area_light_min_depth, self.area_light_max_depth)
    }

    /// Color seen along `ray`. `depth` is the number of reflection or
    /// refraction bounces still allowed.
    pub fn color_for_ray(&mut self, ray: &Ray, depth: u32) -> Color {
        self.stats.rays += 1;

        self.xs.reset();
        self.world.intersect(ray, &mut self.xs);

        let Some(hit) = self.xs.hit() else {
            return self.background;
        };

        let info = HitInfo::prepare(self.world, hit, ray, &mut self.xs, &mut self.containers);
        self.shade_hit(&info, depth)
    }

    /// Surface color at a prepared hit: ambient, direct light, then the
    /// secondary rays while `depth` allows.
    pub fn shade_hit(&mut self, hit: &HitInfo, depth: u32) -> Color {
        let world = self.world;
        let params = &hit.params;

        let mut color = params.color * world.ambient * params.ambient;
        for light in &world.lights {
            color += light.illuminate(hit, self);
        }

        if depth == 0 {
            return color;
        }

        let reflective = params.reflect_level > 0.0;
        let transparent = params.refract_level > 0.0;

        if reflective && transparent {
            let reflectance = schlick(hit);
            color += self.reflected_color(hit, depth) * reflectance;
            color += self.refracted_color(hit, depth) * (1.0 - reflectance);
        } else if reflective {
            color += self.reflected_color(hit, depth);
        } else if transparent {
            color += self.refracted_color(hit, depth);
        }

        color
    }

    pub fn reflected_color(&mut self, hit: &HitInfo, depth: u32) -> Color {
        if depth == 0 || hit.params.reflect_level <= 0.0 {
            return BLACK;
        }

        let ray = Ray::new(hit.over_point, hit.reflect);
        self.color_for_ray(&ray, depth - 1) * hit.params.reflect
    }

    pub fn refracted_color(&mut self, hit: &HitInfo, depth: u32) -> Color {
        if depth == 0 || hit.params.refract_level <= 0.0 {
            return BLACK;
        }

        let n_ratio = hit.n1 / hit.n2;
        let cos_i = hit.eye.dot(hit.normal);
        let sin2_t = n_ratio * n_ratio * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            // Total internal reflection
            return BLACK;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = hit.normal * (n_ratio * cos_i - cos_t) - hit.eye * n_ratio;
        let ray = Ray::new(hit.under_point, direction);

        self.color_for_ray(&ray, depth - 1) * hit.params.refract
    }

    /// True if something that casts shadows lies between `point` and
    /// `light_position`.
    pub fn is_shadowed(&mut self, point: DVec3, light_position: DVec3) -> bool {
        let v = light_position - point;
        let distance = v.length();
        let ray = Ray::new(point, v / distance);

        self.shadow_hit(&ray).is_some_and(|t| t < distance)
    }

    /// True if anything that casts shadows lies along `direction` from
    /// `point`, for lights at infinity.
    pub fn is_shadowed_toward(&mut self, point: DVec3, direction: DVec3) -> bool {
        self.shadow_hit(&Ray::new(point, direction)).is_some()
    }

    fn shadow_hit(&mut self, ray: &Ray) -> Option<f64> {
        self.stats.shadow_rays += 1;

        self.xs.reset();
        self.xs.shadows = true;
        self.world.intersect(ray, &mut self.xs);
        self.xs.shadows = false;

        self.xs.hit().map(|h| h.t)
    }
}

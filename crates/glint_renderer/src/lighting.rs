//! Direct illumination.
//!
//! Diffuse uses the Oren-Nayar model, which reduces to Lambert at zero
//! roughness. Highlights use Blinn-Phong. Every light kind goes through the
//! same [`Illuminate`] entry point, which also runs its shadow test.

use glint_core::{Color, Light, MaterialParams, RectLight, BLACK};
use glint_math::DVec3;

use crate::{HitInfo, Raytracer};

/// Oren-Nayar diffuse factor, cosine term included. `normal`, `light` and
/// `eye` are unit vectors; `roughness` is in radians.
pub fn oren_nayar(normal: DVec3, light: DVec3, eye: DVec3, roughness: f64) -> f64 {
    let cos_i = normal.dot(light);
    if cos_i <= 0.0 {
        return 0.0;
    }
    if roughness <= 0.0 {
        return cos_i;
    }

    let sigma2 = roughness * roughness;
    let a = 1.0 - 0.5 * sigma2 / (sigma2 + 0.33);
    let b = 0.45 * sigma2 / (sigma2 + 0.09);

    let cos_r = normal.dot(eye).clamp(-1.0, 1.0);
    let theta_i = cos_i.min(1.0).acos();
    let theta_r = cos_r.acos();
    let alpha = theta_i.max(theta_r);
    let beta = theta_i.min(theta_r);

    // Azimuth difference from the projections onto the tangent plane
    let light_t = light - normal * cos_i;
    let eye_t = eye - normal * cos_r;
    let cos_phi = match (light_t.try_normalize(), eye_t.try_normalize()) {
        (Some(l), Some(e)) => l.dot(e).max(0.0),
        _ => 0.0,
    };

    cos_i * (a + b * cos_phi * alpha.sin() * beta.tan())
}

/// Blinn-Phong specular highlight for a light of `intensity` arriving from
/// `light_dir`.
pub fn blinn_phong(params: &MaterialParams, light_dir: DVec3, intensity: Color, eye: DVec3, normal: DVec3) -> Color {
    if params.specular <= 0.0 {
        return BLACK;
    }

    let half = (light_dir + eye).normalize_or_zero();
    let n_dot_h = normal.dot(half);
    if n_dot_h <= 0.0 {
        return BLACK;
    }

    intensity * params.specular * n_dot_h.powf(params.shininess)
}

/// Smooth falloff of a spot light at `angle` off its axis. Full strength
/// inside `min`, nothing past `max`.
pub fn spot_factor(angle: f64, min: f64, max: f64) -> f64 {
    if angle >= max {
        return 0.0;
    }
    if angle <= min {
        return 1.0;
    }

    let t = (max - angle) / (max - min);
    t * t / (2.0 * (t * t - t) + 1.0)
}

/// Diffuse plus specular from one unshadowed light direction.
fn direct(hit: &HitInfo, light_dir: DVec3, intensity: Color) -> Color {
    let params = &hit.params;
    let diffuse_factor = oren_nayar(hit.normal, light_dir, hit.eye, params.roughness);
    if diffuse_factor <= 0.0 {
        return BLACK;
    }

    let diffuse = params.color * intensity * (params.diffuse * diffuse_factor);
    diffuse + blinn_phong(params, light_dir, intensity, hit.eye, hit.normal)
}

/// Light arriving at a hit, shadows included.
pub trait Illuminate {
    fn illuminate(&self, hit: &HitInfo, tracer: &mut Raytracer<'_>) -> Color;
}

impl Illuminate for Light {
    fn illuminate(&self, hit: &HitInfo, tracer: &mut Raytracer<'_>) -> Color {
        match *self {
            Light::Point { position, intensity } => {
                if tracer.is_shadowed(hit.over_point, position) {
                    return BLACK;
                }
                direct(hit, (position - hit.point).normalize(), intensity)
            }
            Light::Directional { direction, intensity } => {
                if tracer.is_shadowed_toward(hit.over_point, direction) {
                    return BLACK;
                }
                direct(hit, direction, intensity)
            }
            Light::Spot {
                position,
                direction,
                angle_min,
                angle_max,
                intensity,
            } => {
                let light_dir = (position - hit.point).normalize();
                let angle = (-light_dir).dot(direction).clamp(-1.0, 1.0).acos();
                let factor = spot_factor(angle, angle_min, angle_max);

                if factor <= 0.0 || tracer.is_shadowed(hit.over_point, position) {
                    return BLACK;
                }
                direct(hit, light_dir, intensity * factor)
            }
            Light::Rect(ref rect) => AreaSampler { rect, hit }.cell(tracer, 0.0, 0.0, 1.0, 0),
        }
    }
}

/// Adaptive sampling of a rectangular light.
///
/// The light's unit square is split into quadrants down to the tracer's
/// minimum depth. Each cell then takes one jittered sample per quadrant and
/// only splits further, up to the maximum depth, while its samples disagree
/// on visibility.
struct AreaSampler<'a> {
    rect: &'a RectLight,
    hit: &'a HitInfo,
}

impl AreaSampler<'_> {
    const QUADRANTS: [(f64, f64); 4] = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5), (0.5, 0.5)];

    fn cell(&self, tracer: &mut Raytracer<'_>, u0: f64, v0: f64, size: f64, depth: u32) -> Color {
        let half = size / 2.0;
        let (min_depth, max_depth) = tracer.area_light_depths();

        if depth < min_depth {
            return self.subdivide(tracer, u0, v0, half, depth);
        }

        let mut sum = BLACK;
        let mut lit = 0;
        for (du, dv) in Self::QUADRANTS {
            let u = u0 + (du + tracer.random() * 0.5) * size;
            let v = v0 + (dv + tracer.random() * 0.5) * size;
            if let Some(color) = self.sample(tracer, u, v) {
                sum += color;
                lit += 1;
            }
        }

        if lit != 0 && lit != 4 && depth < max_depth {
            return self.subdivide(tracer, u0, v0, half, depth);
        }
        sum / 4.0
    }

    fn subdivide(&self, tracer: &mut Raytracer<'_>, u0: f64, v0: f64, half: f64, depth: u32) -> Color {
        let mut sum = BLACK;
        for (du, dv) in Self::QUADRANTS {
            sum += self.cell(tracer, u0 + du * 2.0 * half, v0 + dv * 2.0 * half, half, depth + 1);
        }
        sum / 4.0
    }

    /// Contribution of the light point at `(u, v)`, `None` when occluded.
    fn sample(&self, tracer: &mut Raytracer<'_>, u: f64, v: f64) -> Option<Color> {
        let position = self.rect.point_at(u, v);
        if tracer.is_shadowed(self.hit.over_point, position) {
            return None;
        }
        Some(direct(self.hit, (position - self.hit.point).normalize(), self.rect.intensity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{rgb, Material, WHITE};
    use glint_math::float_eq;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, FRAC_PI_6};

    fn params() -> MaterialParams {
        Material::default().resolve(DVec3::ZERO)
    }

    #[test]
    fn test_oren_nayar_zero_roughness_is_lambert() {
        let n = DVec3::Y;
        let l = DVec3::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2);
        assert!(float_eq(oren_nayar(n, l, DVec3::Y, 0.0), FRAC_1_SQRT_2));
        assert_eq!(oren_nayar(n, -l, DVec3::Y, 0.0), 0.0);
    }

    #[test]
    fn test_oren_nayar_rough_surface_is_darker_head_on() {
        let n = DVec3::Y;
        let rough = oren_nayar(n, n, n, 0.5);
        assert!(rough < 1.0 && rough > 0.0);
    }

    #[test]
    fn test_oren_nayar_retroreflection() {
        // Rough surfaces scatter more light back toward the light
        let n = DVec3::Y;
        let l = DVec3::new(0.8, 0.6, 0.0);
        let back = oren_nayar(n, l, l, 0.5);
        let across = oren_nayar(n, l, DVec3::new(-0.8, 0.6, 0.0), 0.5);
        assert!(back > across);
    }

    #[test]
    fn test_blinn_phong_peak_and_falloff() {
        let p = params();
        let peak = blinn_phong(&p, DVec3::Y, WHITE, DVec3::Y, DVec3::Y);
        assert!(float_eq(peak.x, 0.9));

        let off = blinn_phong(&p, DVec3::Y, WHITE, DVec3::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2), DVec3::Y);
        assert!(off.x < 1e-3);
    }

    #[test]
    fn test_spot_factor() {
        assert_eq!(spot_factor(0.0, FRAC_PI_6, FRAC_PI_4), 1.0);
        assert_eq!(spot_factor(FRAC_PI_4, FRAC_PI_6, FRAC_PI_4), 0.0);

        let mid = spot_factor((FRAC_PI_6 + FRAC_PI_4) / 2.0, FRAC_PI_6, FRAC_PI_4);
        assert!(float_eq(mid, 0.5));

        let near_edge = spot_factor(FRAC_PI_4 - 0.01, FRAC_PI_6, FRAC_PI_4);
        assert!(near_edge < 0.1);
    }

    #[test]
    fn test_direct_light_behind_surface() {
        let mut world = crate::World::new();
        let s = world.sphere();
        world.set_material(s, Material::new(rgb(1.0, 1.0, 1.0)));
        world.add_object(s);

        let ray = glint_math::Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
        let mut xs = world.intersections(&ray);
        let hit = xs.hit().unwrap();
        let info = HitInfo::prepare(&world, hit, &ray, &mut xs, &mut Vec::new());

        assert_eq!(direct(&info, DVec3::Z, WHITE), BLACK);
        let front = direct(&info, -DVec3::Z, WHITE);
        assert!(float_eq(front.x, 0.9 + 0.9));
    }
}

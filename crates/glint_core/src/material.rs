//! Surface material description.
//!
//! A `Material` is what scene authors configure. At each hit the shader asks
//! for a `MaterialParams`, the material with its pattern already evaluated,
//! so the lighting code only ever reads plain numbers.

use glint_math::DVec3;

use crate::{Color, Pattern, WHITE};

/// A Phong-style material with optional reflection and refraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Surface color source
    pub pattern: Pattern,

    /// Fraction of the world ambient light reflected
    pub ambient: f64,

    /// Diffuse reflection strength
    pub diffuse: f64,

    /// Specular highlight strength
    pub specular: f64,

    /// Specular exponent, higher values give smaller, harder highlights
    pub shininess: f64,

    /// Oren-Nayar roughness (standard deviation of facet slopes, radians).
    /// 0 gives plain Lambertian diffuse.
    pub roughness: f64,

    /// 0 = no mirror reflection, 1 = perfect mirror
    pub reflect_level: f64,
    pub reflect_color: Color,

    /// 0 = opaque, 1 = fully transparent
    pub refract_level: f64,
    pub refract_color: Color,

    /// Index of refraction (1.0 = vacuum, 1.5 = glass, 2.4 = diamond)
    pub ior: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            pattern: Pattern::default(),
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            roughness: 0.0,
            reflect_level: 0.0,
            reflect_color: WHITE,
            refract_level: 0.0,
            refract_color: WHITE,
            ior: 1.0,
        }
    }
}

impl Material {
    /// Create a default material with a solid color.
    pub fn new(color: Color) -> Self {
        Self {
            pattern: Pattern::solid(color),
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_ambient(mut self, v: f64) -> Self {
        self.ambient = v;
        self
    }

    pub fn with_diffuse(mut self, v: f64) -> Self {
        self.diffuse = v;
        self
    }

    pub fn with_specular(mut self, v: f64) -> Self {
        self.specular = v;
        self
    }

    pub fn with_shininess(mut self, v: f64) -> Self {
        self.shininess = v;
        self
    }

    pub fn with_roughness(mut self, v: f64) -> Self {
        self.roughness = v;
        self
    }

    pub fn with_reflect(mut self, level: f64, color: Color) -> Self {
        self.reflect_level = level;
        self.reflect_color = color;
        self
    }

    /// Set transparency and index of refraction in one go.
    pub fn with_refract(mut self, level: f64, ior: f64) -> Self {
        self.refract_level = level;
        self.ior = ior;
        self
    }

    pub fn with_refract_color(mut self, color: Color) -> Self {
        self.refract_color = color;
        self
    }

    /// Convenience for a clear glass material.
    pub fn glass(ior: f64) -> Self {
        Self::new(WHITE)
            .with_diffuse(0.1)
            .with_ambient(0.0)
            .with_reflect(1.0, WHITE)
            .with_refract(1.0, ior)
    }

    pub fn is_reflective(&self) -> bool {
        self.reflect_level > 0.0
    }

    pub fn is_transparent(&self) -> bool {
        self.refract_level > 0.0
    }

    /// Evaluate the pattern at `object_point` and flatten everything the
    /// shader needs.
    pub fn resolve(&self, object_point: DVec3) -> MaterialParams {
        MaterialParams {
            color: self.pattern.color_at(object_point),
            normal_perturbation: None,
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.shininess,
            roughness: self.roughness,
            reflect: self.reflect_color * self.reflect_level,
            refract: self.refract_color * self.refract_level,
            reflect_level: self.reflect_level,
            refract_level: self.refract_level,
            ior: self.ior,
        }
    }
}

/// Material values at a single hit point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    /// Surface color after pattern evaluation
    pub color: Color,
    /// Offset added to the shading normal (bump mapping), if any
    pub normal_perturbation: Option<DVec3>,
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
    pub roughness: f64,
    /// Reflect color already scaled by its level
    pub reflect: Color,
    /// Refract color already scaled by its level
    pub refract: Color,
    pub reflect_level: f64,
    pub refract_level: f64,
    pub ior: f64,
}

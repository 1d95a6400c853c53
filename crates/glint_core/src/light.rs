//! Light source definitions.
//!
//! Only geometry and intensity live here; shadow tests and shading are the
//! renderer's job.

use glint_math::DVec3;

use crate::Color;

/// A rectangular area light spanned by two edges from a corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectLight {
    pub corner: DVec3,
    pub edge_u: DVec3,
    pub edge_v: DVec3,
    pub intensity: Color,
}

impl RectLight {
    /// Point on the light surface; `u` and `v` run from 0 to 1 along the edges.
    #[inline]
    pub fn point_at(&self, u: f64, v: f64) -> DVec3 {
        self.corner + self.edge_u * u + self.edge_v * v
    }

    pub fn center(&self) -> DVec3 {
        self.point_at(0.5, 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Point {
        position: DVec3,
        intensity: Color,
    },
    /// Parallel light. `direction` points from the surface toward the light.
    Directional {
        direction: DVec3,
        intensity: Color,
    },
    /// Cone of light with a smooth falloff between `angle_min` and
    /// `angle_max` (radians, measured from the spot axis).
    Spot {
        position: DVec3,
        direction: DVec3,
        angle_min: f64,
        angle_max: f64,
        intensity: Color,
    },
    Rect(RectLight),
}

impl Light {
    pub fn point(position: DVec3, intensity: Color) -> Self {
        Light::Point {
            position,
            intensity,
        }
    }

    /// `travel` is the direction the light travels in (e.g. straight down
    /// for a sun at the zenith).
    pub fn directional(travel: DVec3, intensity: Color) -> Self {
        Light::Directional {
            direction: -travel.normalize(),
            intensity,
        }
    }

    pub fn spot(
        position: DVec3,
        target: DVec3,
        angle_min: f64,
        angle_max: f64,
        intensity: Color,
    ) -> Self {
        Light::Spot {
            position,
            direction: (target - position).normalize(),
            angle_min,
            angle_max,
            intensity,
        }
    }

    pub fn rect(corner: DVec3, edge_u: DVec3, edge_v: DVec3, intensity: Color) -> Self {
        Light::Rect(RectLight {
            corner,
            edge_u,
            edge_v,
            intensity,
        })
    }

    /// A `width` x `height` rectangle centred on `center` and facing `target`.
    pub fn rect_facing(
        center: DVec3,
        target: DVec3,
        width: f64,
        height: f64,
        intensity: Color,
    ) -> Self {
        let forward = (target - center).normalize();
        let helper = if forward.y.abs() > 0.99 { DVec3::X } else { DVec3::Y };
        let u = forward.cross(helper).normalize();
        let v = u.cross(forward).normalize();

        let edge_u = u * width;
        let edge_v = v * height;
        let corner = center - edge_u * 0.5 - edge_v * 0.5;

        Light::rect(corner, edge_u, edge_v, intensity)
    }

    pub fn intensity(&self) -> Color {
        match self {
            Light::Point { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Spot { intensity, .. } => *intensity,
            Light::Rect(rect) => rect.intensity,
        }
    }
}

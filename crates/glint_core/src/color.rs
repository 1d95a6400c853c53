//! Linear RGB color.

use glint_math::DVec3;

/// Color type alias (linear RGB, typically 0-1 but unbounded while shading)
pub type Color = DVec3;

pub const BLACK: Color = DVec3::ZERO;
pub const WHITE: Color = DVec3::ONE;

#[inline]
pub fn rgb(r: f64, g: f64, b: f64) -> Color {
    DVec3::new(r, g, b)
}

/// Gray level `v` on all three channels.
#[inline]
pub fn gray(v: f64) -> Color {
    DVec3::splat(v)
}

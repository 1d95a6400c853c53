//! Procedural surface patterns.
//!
//! Patterns are evaluated in the hit shape's object space, then mapped
//! through the pattern's own transform.

use glint_math::{DMat4, DVec3, Transform};

use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternKind {
    Solid(Color),
    /// Alternates along x every unit.
    Stripe(Color, Color),
    /// Linear blend along x, repeating every unit.
    Gradient(Color, Color),
    /// Concentric rings around the y axis.
    Ring(Color, Color),
    /// 3D checkerboard.
    Checker(Color, Color),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    transform: Transform,
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            transform: Transform::IDENTITY,
        }
    }

    pub fn solid(color: Color) -> Self {
        Self::new(PatternKind::Solid(color))
    }

    pub fn stripe(a: Color, b: Color) -> Self {
        Self::new(PatternKind::Stripe(a, b))
    }

    pub fn gradient(a: Color, b: Color) -> Self {
        Self::new(PatternKind::Gradient(a, b))
    }

    pub fn ring(a: Color, b: Color) -> Self {
        Self::new(PatternKind::Ring(a, b))
    }

    pub fn checker(a: Color, b: Color) -> Self {
        Self::new(PatternKind::Checker(a, b))
    }

    pub fn with_transform(mut self, matrix: DMat4) -> Self {
        self.transform = Transform::new(matrix);
        self
    }

    pub fn is_solid(&self) -> bool {
        matches!(self.kind, PatternKind::Solid(_))
    }

    /// Color at a point given in the owning shape's object space.
    pub fn color_at(&self, object_point: DVec3) -> Color {
        if let PatternKind::Solid(c) = self.kind {
            return c;
        }

        let p = self.transform.inverse().transform_point3(object_point);

        match self.kind {
            PatternKind::Solid(c) => c,
            PatternKind::Stripe(a, b) => {
                if p.x.floor().rem_euclid(2.0) == 0.0 {
                    a
                } else {
                    b
                }
            }
            PatternKind::Gradient(a, b) => {
                let fraction = p.x - p.x.floor();
                a + (b - a) * fraction
            }
            PatternKind::Ring(a, b) => {
                let r = (p.x * p.x + p.z * p.z).sqrt();
                if r.floor().rem_euclid(2.0) == 0.0 {
                    a
                } else {
                    b
                }
            }
            PatternKind::Checker(a, b) => {
                let sum = p.x.floor() + p.y.floor() + p.z.floor();
                if sum.rem_euclid(2.0) == 0.0 {
                    a
                } else {
                    b
                }
            }
        }
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::solid(DVec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BLACK, WHITE};

    #[test]
    fn test_stripe_alternates_in_x() {
        let p = Pattern::stripe(WHITE, BLACK);

        assert_eq!(p.color_at(DVec3::new(0.0, 0.0, 0.0)), WHITE);
        assert_eq!(p.color_at(DVec3::new(0.9, 0.0, 0.0)), WHITE);
        assert_eq!(p.color_at(DVec3::new(1.0, 0.0, 0.0)), BLACK);
        assert_eq!(p.color_at(DVec3::new(-0.1, 0.0, 0.0)), BLACK);
        assert_eq!(p.color_at(DVec3::new(-1.1, 0.0, 0.0)), WHITE);
        // Constant in y and z
        assert_eq!(p.color_at(DVec3::new(0.0, 2.0, 2.0)), WHITE);
    }

    #[test]
    fn test_gradient_interpolates() {
        let p = Pattern::gradient(WHITE, BLACK);

        assert_eq!(p.color_at(DVec3::ZERO), WHITE);
        assert!(p
            .color_at(DVec3::new(0.25, 0.0, 0.0))
            .abs_diff_eq(DVec3::splat(0.75), 1e-12));
    }

    #[test]
    fn test_ring_extends_in_x_and_z() {
        let p = Pattern::ring(WHITE, BLACK);

        assert_eq!(p.color_at(DVec3::ZERO), WHITE);
        assert_eq!(p.color_at(DVec3::new(1.0, 0.0, 0.0)), BLACK);
        assert_eq!(p.color_at(DVec3::new(0.708, 0.0, 0.708)), BLACK);
    }

    #[test]
    fn test_checker_repeats_in_all_axes() {
        let p = Pattern::checker(WHITE, BLACK);

        assert_eq!(p.color_at(DVec3::new(0.99, 0.0, 0.0)), WHITE);
        assert_eq!(p.color_at(DVec3::new(1.01, 0.0, 0.0)), BLACK);
        assert_eq!(p.color_at(DVec3::new(0.0, 1.01, 0.0)), BLACK);
        assert_eq!(p.color_at(DVec3::new(0.0, 0.0, 1.01)), BLACK);
    }

    #[test]
    fn test_pattern_transform() {
        let p = Pattern::stripe(WHITE, BLACK).with_transform(DMat4::from_scale(DVec3::splat(2.0)));

        assert_eq!(p.color_at(DVec3::new(1.5, 0.0, 0.0)), WHITE);
        assert_eq!(p.color_at(DVec3::new(2.5, 0.0, 0.0)), BLACK);
    }
}

//! Pinhole camera with optional thin-lens depth of field.

use glint_math::{DMat4, DVec3, Ray, Transform};

use crate::{concentric_sample_disk, RenderError, Result};

/// World-to-camera matrix for an eye at `from` looking at `to`.
pub fn view_transform(from: DVec3, to: DVec3, up: DVec3) -> DMat4 {
    DMat4::look_at_rh(from, to, up)
}

/// Maps pixel coordinates to world-space rays.
///
/// The camera sits at the origin of its own space looking down -z, with the
/// image plane at z = -1. `transform` is the world-to-camera matrix, usually
/// built with [`view_transform`].
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    hsize: u32,
    vsize: u32,
    field_of_view: f64,
    transform: Transform,
    half_width: f64,
    half_height: f64,
    pixel_size: f64,
}

impl Camera {
    /// `field_of_view` is the horizontal angle for landscape images and the
    /// vertical one for portrait images, in radians.
    pub fn new(hsize: u32, vsize: u32, field_of_view: f64) -> Result<Self> {
        if hsize == 0 || vsize == 0 || hsize.checked_mul(vsize).is_none() {
            return Err(RenderError::InvalidCamera {
                width: hsize,
                height: vsize,
            });
        }
        if !(field_of_view > 0.0 && field_of_view < std::f64::consts::PI) {
            return Err(RenderError::InvalidFieldOfView(field_of_view));
        }

        let half_view = (field_of_view / 2.0).tan();
        let aspect = hsize as f64 / vsize as f64;
        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Ok(Self {
            hsize,
            vsize,
            field_of_view,
            transform: Transform::IDENTITY,
            half_width,
            half_height,
            pixel_size: half_width * 2.0 / hsize as f64,
        })
    }

    pub fn with_transform(mut self, matrix: DMat4) -> Self {
        self.set_transform(matrix);
        self
    }

    pub fn set_transform(&mut self, matrix: DMat4) {
        self.transform = Transform::new(matrix);
    }

    pub fn hsize(&self) -> u32 {
        self.hsize
    }

    pub fn vsize(&self) -> u32 {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Point on the camera-space image plane for continuous pixel
    /// coordinates. Pixel `(x, y)` spans `[x, x + 1) x [y, y + 1)`.
    fn image_point(&self, x: f64, y: f64) -> DVec3 {
        DVec3::new(
            self.half_width - x * self.pixel_size,
            self.half_height - y * self.pixel_size,
            -1.0,
        )
    }

    /// Ray from the pinhole through `(x, y)`. Add 0.5 to hit a pixel center.
    pub fn ray_for_pixel(&self, x: f64, y: f64) -> Ray {
        let inverse = self.transform.inverse();
        let pixel = inverse.transform_point3(self.image_point(x, y));
        let origin = inverse.transform_point3(DVec3::ZERO);

        Ray::new(origin, (pixel - origin).normalize())
    }

    /// Thin-lens ray through `(x, y)`. `(u, v)` in the unit square picks the
    /// point on the lens; every ray for the same pixel meets at
    /// `focal_distance` along the pinhole ray.
    pub fn ray_for_pixel_dof(
        &self,
        x: f64,
        y: f64,
        lens_radius: f64,
        focal_distance: f64,
        u: f64,
        v: f64,
    ) -> Ray {
        let pinhole = self.image_point(x, y).normalize();
        let focus = pinhole * (focal_distance / -pinhole.z);

        let lens = concentric_sample_disk(u, v) * lens_radius;
        let origin = DVec3::new(lens.x, lens.y, 0.0);

        let inverse = self.transform.inverse();
        let origin_world = inverse.transform_point3(origin);
        let direction = inverse.transform_vector3(focus - origin).normalize();

        Ray::new(origin_world, direction)
    }
}

//! Accumulation buffer for rendered samples.

use std::path::Path;

use glint_core::{Color, BLACK};

use crate::Result;

/// Width x height linear colors, stored row-major.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Create a canvas filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Accumulate `color` into the pixel at `(x, y)`.
    pub fn add_sample(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] += color;
    }

    /// Accumulate a full column of colors, top to bottom, into column `x`.
    pub fn add_column(&mut self, x: u32, column: &[Color]) {
        for (y, color) in column.iter().enumerate() {
            self.add_sample(x, y as u32, *color);
        }
    }

    /// Accumulate a `width`-wide block of row-major colors with its top-left
    /// corner at `(x0, y0)`.
    pub fn add_block(&mut self, x0: u32, y0: u32, width: u32, block: &[Color]) {
        for (i, color) in block.iter().enumerate() {
            let i = i as u32;
            self.add_sample(x0 + i % width, y0 + i / width, *color);
        }
    }

    /// Multiply every pixel by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.pixels {
            *p *= factor;
        }
    }

    /// Gamma-encoded 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| image::Rgba(color_to_rgba(self.get(x, y))))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Encode a linear channel with gamma 2.2 and clamp it to [0, 1].
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.powf(1.0 / 2.2).min(1.0)
    } else {
        0.0
    }
}

fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f64| (255.0 * linear_to_gamma(c)).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

//! Surface textures sampled by shaders.

use crate::hittable::HitRecord;
use glint_math::Color;

/// Checker squares span `CHECKER_SIZE / scale` units of u and v.
const CHECKER_SIZE: f64 = 5.0;

/// Texture trait: a color for each surface point.
pub trait Texture: Send + Sync {
    fn sample(&self, rec: &HitRecord) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SimpleColor {
    pub color: Color,
}

impl SimpleColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SimpleColor {
    fn sample(&self, _rec: &HitRecord) -> Color {
        self.color
    }
}

/// Alternating squares of two colors in (u, v) space.
#[derive(Debug, Clone, Copy)]
pub struct Checker {
    pub color1: Color,
    pub color2: Color,
    pub scale: f64,
}

impl Checker {
    pub fn new(color1: Color, color2: Color, scale: f64) -> Self {
        Self {
            color1,
            color2,
            scale,
        }
    }
}

impl Texture for Checker {
    fn sample(&self, rec: &HitRecord) -> Color {
        let x = (rec.u * self.scale / CHECKER_SIZE).floor();
        let y = (rec.v * self.scale / CHECKER_SIZE).floor();

        if (x + y).rem_euclid(2.0) == 0.0 {
            self.color1
        } else {
            self.color2
        }
    }
}

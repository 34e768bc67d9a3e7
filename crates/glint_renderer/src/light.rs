//! Point lights.

use crate::hittable::HitRecord;
use glint_core::LightDescription;
use glint_math::{Color, ColorExt, DVec3, Ray, VectorExt};

/// A point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: DVec3,
    pub color: Color,
    pub power: f64,
}

impl Light {
    pub fn new(position: DVec3, color: Color, power: f64) -> Self {
        Self {
            position,
            color,
            power,
        }
    }

    pub fn from_description(description: &LightDescription) -> Self {
        Self::new(description.position, description.color, description.power)
    }

    /// Light arriving at a hit point: `color * power / d^2 * cos(theta)`.
    ///
    /// `theta` is measured against the normal facing the incoming ray, so
    /// a light behind the surface gives a negative contribution. A light
    /// sitting exactly on the hit point contributes nothing.
    pub fn contribution(&self, ray: &Ray, rec: &HitRecord) -> Color {
        let to_light = self.position - rec.p;
        let distance_squared = to_light.length_squared();
        if !(distance_squared > 0.0) {
            return Color::BLACK;
        }

        let normal = ray.direction().face_forward(rec.normal);
        let cos_theta = (to_light / distance_squared.sqrt()).dot(normal);

        self.color * (self.power / distance_squared * cos_theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_hit() -> (Ray, HitRecord) {
        let ray = Ray::new(DVec3::new(0.0, 10.0, 0.0), -DVec3::Y);
        let rec = HitRecord {
            p: DVec3::ZERO,
            normal: DVec3::Y,
            t: 10.0,
            ..Default::default()
        };
        (ray, rec)
    }

    #[test]
    fn test_contribution_overhead() {
        let (ray, rec) = floor_hit();
        let light = Light::new(DVec3::new(0.0, 10.0, 0.0), Color::WHITE, 100.0);

        let color = light.contribution(&ray, &rec);
        assert!((color - Color::ONE).length() < 1e-12);
    }

    #[test]
    fn test_contribution_falloff_and_angle() {
        let (ray, rec) = floor_hit();
        let light = Light::new(DVec3::new(10.0, 10.0, 0.0), Color::new(1.0, 0.5, 0.0), 200.0);

        // d^2 = 200, cos = 1 / sqrt(2)
        let expected = Color::new(1.0, 0.5, 0.0) * std::f64::consts::FRAC_1_SQRT_2;
        assert!((light.contribution(&ray, &rec) - expected).length() < 1e-12);
    }

    #[test]
    fn test_contribution_light_below_surface() {
        let (ray, rec) = floor_hit();
        let light = Light::new(DVec3::new(0.0, -10.0, 0.0), Color::WHITE, 100.0);

        assert!(light.contribution(&ray, &rec).x < 0.0);
    }

    #[test]
    fn test_contribution_light_on_surface() {
        let (ray, rec) = floor_hit();
        let light = Light::new(DVec3::ZERO, Color::WHITE, 100.0);

        assert_eq!(light.contribution(&ray, &rec), Color::BLACK);
    }
}

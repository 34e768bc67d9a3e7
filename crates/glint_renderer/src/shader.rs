//! Surface shaders: local illumination with hard shadows.

use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::scene::Scene;
use crate::texture::Texture;
use glint_math::{Color, ColorExt, Ray, VectorExt};

/// Offset along the normal for shadow ray origins.
pub const SHADOW_BIAS: f64 = 1e-5;

/// Fraction of the diffuse color kept in shadow.
const SHADOW_FLOOR: f64 = 0.05;

/// How shaders combine the light list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LightAccumulation {
    /// Each light replaces the previous result, so only the last light shows
    #[default]
    LastLight,
    /// Contributions from every light are summed
    Accumulate,
}

/// Shading behaviors that differ between the classic look and a corrected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadingOptions {
    pub light_accumulation: LightAccumulation,
    /// Multiply the Phong result by the ambient light a second time
    pub phong_double_ambient: bool,
}

impl Default for ShadingOptions {
    fn default() -> Self {
        Self {
            light_accumulation: LightAccumulation::LastLight,
            phong_double_ambient: true,
        }
    }
}

/// Shader trait: the color seen along `ray` at a hit point.
pub trait Shader: Send + Sync {
    fn shade(&self, ray: &Ray, rec: &HitRecord, scene: &Scene) -> Color;
}

/// Texture sample if there is a texture, otherwise the flat color.
fn base_color(color: Color, texture: Option<&Arc<dyn Texture>>, rec: &HitRecord) -> Color {
    texture.map_or(color, |texture| texture.sample(rec))
}

/// Diffuse shader with shadow rays.
#[derive(Clone)]
pub struct Lambert {
    color: Color,
    texture: Option<Arc<dyn Texture>>,
}

impl Lambert {
    pub fn new(color: Color, texture: Option<Arc<dyn Texture>>) -> Self {
        Self { color, texture }
    }
}

impl Shader for Lambert {
    fn shade(&self, ray: &Ray, rec: &HitRecord, scene: &Scene) -> Color {
        let diffuse = base_color(self.color, self.texture.as_ref(), rec) * scene.ambient_light();
        let shadow_origin = rec.p + rec.normal * SHADOW_BIAS;
        let accumulation = scene.shading().light_accumulation;

        let mut result = Color::BLACK;
        for light in scene.lights() {
            let lit = if scene.is_visible(shadow_origin, light.position) {
                diffuse * light.contribution(ray, rec)
            } else {
                diffuse * SHADOW_FLOOR
            };

            match accumulation {
                LightAccumulation::LastLight => result = lit,
                LightAccumulation::Accumulate => result += lit,
            }
        }

        result
    }
}

/// Diffuse plus specular highlight. Casts no shadows.
#[derive(Clone)]
pub struct Phong {
    color: Color,
    texture: Option<Arc<dyn Texture>>,
    specular_multiplier: f64,
    specular_exponent: f64,
}

impl Phong {
    pub fn new(
        color: Color,
        texture: Option<Arc<dyn Texture>>,
        specular_multiplier: f64,
        specular_exponent: f64,
    ) -> Self {
        Self {
            color,
            texture,
            specular_multiplier,
            specular_exponent,
        }
    }
}

impl Shader for Phong {
    fn shade(&self, ray: &Ray, rec: &HitRecord, scene: &Scene) -> Color {
        let ambient = scene.ambient_light();
        let options = scene.shading();
        let view = -ray.direction();

        let mut diffuse = base_color(self.color, self.texture.as_ref(), rec);
        let mut specular_total = Color::BLACK;
        let mut result = Color::BLACK;
        for light in scene.lights() {
            let reflected = (rec.p - light.position).mirror(rec.normal);
            let cos_gamma = view.dot(reflected);
            let highlight = if cos_gamma > 0.0 {
                cos_gamma.powf(self.specular_exponent)
            } else {
                0.0
            };

            let light_color = ambient * light.contribution(ray, rec);
            diffuse += light_color;
            let specular = light_color * (highlight * self.specular_multiplier);

            result = match options.light_accumulation {
                LightAccumulation::LastLight => diffuse + specular,
                LightAccumulation::Accumulate => {
                    specular_total += specular;
                    diffuse + specular_total
                }
            };
        }

        if options.phong_double_ambient {
            result *= ambient;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use crate::plane::Plane;
    use crate::sphere::Sphere;
    use crate::texture::SimpleColor;
    use glint_core::PlaneOrientation;
    use glint_math::DVec3;

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

    fn assert_color(actual: Color, expected: Color) {
        assert!(
            (actual - expected).length() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    /// A light straight above the origin delivering exactly `scale`.
    fn overhead_light(scale: f64) -> Light {
        Light::new(DVec3::new(0.0, 10.0, 0.0), Color::WHITE, 100.0 * scale)
    }

    /// A light at 45 degrees delivering `scale * cos(45)`.
    fn side_light(scale: f64) -> Light {
        Light::new(DVec3::new(10.0, 10.0, 0.0), Color::WHITE, 200.0 * scale)
    }

    #[test]
    fn test_lambert_lit() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.set_ambient_light(Color::new(0.5, 1.0, 1.0));
        scene.add_light(overhead_light(0.8));

        let shader = Lambert::new(Color::new(1.0, 0.5, 0.25), None);
        assert_color(shader.shade(&ray, &rec, &scene), Color::new(0.4, 0.4, 0.2));
    }

    #[test]
    fn test_lambert_texture_overrides_color() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(overhead_light(1.0));

        let texture: Arc<dyn Texture> = Arc::new(SimpleColor::new(Color::new(0.0, 0.0, 1.0)));
        let shader = Lambert::new(Color::BLACK, Some(texture));
        assert_color(shader.shade(&ray, &rec, &scene), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_lambert_no_lights_is_black() {
        let (ray, rec) = floor_hit();
        let shader = Lambert::new(Color::WHITE, None);
        assert_eq!(shader.shade(&ray, &rec, &Scene::new()), Color::BLACK);
    }

    #[test]
    fn test_lambert_shadowed() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(overhead_light(1.0));
        let blocker: Arc<dyn Shader> = Arc::new(Lambert::new(Color::WHITE, None));
        scene.add_node(Box::new(Sphere::new(DVec3::new(0.0, 5.0, 0.0), 1.0)), blocker);

        let shader = Lambert::new(Color::new(1.0, 0.5, 0.0), None);
        assert_color(shader.shade(&ray, &rec, &scene), Color::new(0.05, 0.025, 0.0));
    }

    #[test]
    fn test_lambert_occluder_beyond_light_ignored() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(overhead_light(1.0));
        let blocker: Arc<dyn Shader> = Arc::new(Lambert::new(Color::WHITE, None));
        scene.add_node(Box::new(Sphere::new(DVec3::new(0.0, 20.0, 0.0), 1.0)), blocker);

        let shader = Lambert::new(Color::WHITE, None);
        assert_color(shader.shade(&ray, &rec, &scene), Color::WHITE);
    }

    #[test]
    fn test_lambert_surface_does_not_shadow_itself() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(side_light(1.0));
        let floor: Arc<dyn Shader> = Arc::new(Lambert::new(Color::WHITE, None));
        scene.add_node(Box::new(Plane::new(DVec3::ZERO, 100.0, PlaneOrientation::XZ)), floor);

        let shader = Lambert::new(Color::WHITE, None);
        let expected = Color::ONE * std::f64::consts::FRAC_1_SQRT_2;
        assert_color(shader.shade(&ray, &rec, &scene), expected);
    }

    #[test]
    fn test_lambert_light_accumulation() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(overhead_light(0.5));
        scene.add_light(overhead_light(0.25));
        let shader = Lambert::new(Color::WHITE, None);

        // Only the last light shows by default
        assert_color(shader.shade(&ray, &rec, &scene), Color::splat(0.25));

        scene.set_shading(ShadingOptions {
            light_accumulation: LightAccumulation::Accumulate,
            ..Default::default()
        });
        assert_color(shader.shade(&ray, &rec, &scene), Color::splat(0.75));
    }

    #[test]
    fn test_phong_diffuse_and_highlight() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.set_ambient_light(Color::splat(0.5));
        scene.add_light(overhead_light(1.0));

        // Light and eye both straight above: cos(gamma) = 1
        let shader = Phong::new(Color::new(0.2, 0.0, 0.0), None, 2.0, 10.0);
        let light_color = Color::splat(0.5);
        let diffuse = Color::new(0.2, 0.0, 0.0) + light_color;
        let expected = (diffuse + light_color * 2.0) * 0.5;
        assert_color(shader.shade(&ray, &rec, &scene), expected);
    }

    #[test]
    fn test_phong_single_ambient() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.set_ambient_light(Color::splat(0.5));
        scene.add_light(overhead_light(1.0));
        scene.set_shading(ShadingOptions {
            phong_double_ambient: false,
            ..Default::default()
        });

        let shader = Phong::new(Color::BLACK, None, 0.0, 1.0);
        assert_color(shader.shade(&ray, &rec, &scene), Color::splat(0.5));
    }

    #[test]
    fn test_phong_no_highlight_away_from_mirror() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(side_light(1.0));

        // The 45 degree light reflects to cos(gamma) = cos(45), squared is 0.5
        let shader = Phong::new(Color::BLACK, None, 1.0, 2.0);
        let light_color = Color::ONE * std::f64::consts::FRAC_1_SQRT_2;
        let expected = light_color + light_color * 0.5;
        assert_color(shader.shade(&ray, &rec, &scene), expected);
    }

    #[test]
    fn test_phong_ignores_occluders() {
        let (ray, rec) = floor_hit();
        let mut scene = Scene::new();
        scene.add_light(overhead_light(1.0));
        let blocker: Arc<dyn Shader> = Arc::new(Lambert::new(Color::WHITE, None));
        scene.add_node(Box::new(Sphere::new(DVec3::new(0.0, 5.0, 0.0), 1.0)), blocker);

        let shader = Phong::new(Color::BLACK, None, 0.0, 1.0);
        assert_color(shader.shade(&ray, &rec, &scene), Color::ONE);
    }

    #[test]
    fn test_phong_no_lights_is_black() {
        let (ray, rec) = floor_hit();
        let shader = Phong::new(Color::WHITE, None, 1.0, 1.0);
        assert_eq!(shader.shade(&ray, &rec, &Scene::new()), Color::BLACK);
    }
}

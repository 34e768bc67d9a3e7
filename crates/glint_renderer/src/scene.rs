//! Runtime scene: geometry paired with shaders, plus lights.

use std::sync::Arc;

use crate::cube::Cube;
use crate::hittable::{Geometry, HitRecord, FORWARD};
use crate::light::Light;
use crate::plane::Plane;
use crate::shader::{Lambert, Phong, Shader, ShadingOptions};
use crate::sphere::Sphere;
use crate::texture::{Checker, SimpleColor, Texture};
use glint_core::{GeometryDescription, SceneDescription, ShaderDescription, TextureDescription};
use glint_math::{Color, ColorExt, DVec3, Ray};

/// A piece of geometry and the shader that colors it.
pub struct Node {
    geometry: Box<dyn Geometry>,
    shader: Arc<dyn Shader>,
}

impl Node {
    pub fn new(geometry: Box<dyn Geometry>, shader: Arc<dyn Shader>) -> Self {
        Self { geometry, shader }
    }

    pub fn geometry(&self) -> &dyn Geometry {
        self.geometry.as_ref()
    }

    pub fn shader(&self) -> &dyn Shader {
        self.shader.as_ref()
    }
}

/// Everything a ray can hit or be lit by.
pub struct Scene {
    nodes: Vec<Node>,
    lights: Vec<Light>,
    ambient_light: Color,
    shading: ShadingOptions,
}

impl Scene {
    /// Create an empty scene with white ambient light.
    ///
    /// Scene files always set the ambient light. Hand-built scenes default
    /// to white rather than 0.5 grey so shader colors pass through unscaled.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            lights: Vec::new(),
            ambient_light: Color::WHITE,
            shading: ShadingOptions::default(),
        }
    }

    /// Build the runtime scene for a parsed description.
    pub fn from_description(description: &SceneDescription) -> Self {
        let mut scene = Self::new();
        scene.set_ambient_light(description.ambient_light);

        for light in &description.lights {
            scene.add_light(Light::from_description(light));
        }
        for node in &description.nodes {
            scene.add_node(build_geometry(&node.geometry), build_shader(&node.shader));
        }

        log::debug!(
            "Built scene with {} nodes and {} lights",
            scene.nodes.len(),
            scene.lights.len()
        );
        scene
    }

    pub fn add_node(&mut self, geometry: Box<dyn Geometry>, shader: Arc<dyn Shader>) {
        self.nodes.push(Node::new(geometry, shader));
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_ambient_light(&mut self, color: Color) {
        self.ambient_light = color;
    }

    pub fn set_shading(&mut self, shading: ShadingOptions) {
        self.shading = shading;
    }

    pub fn ambient_light(&self) -> Color {
        self.ambient_light
    }

    pub fn shading(&self) -> ShadingOptions {
        self.shading
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Find the nearest node along a ray.
    ///
    /// Linear in the node count. On equal distances the earlier node wins.
    pub fn closest_hit(&self, ray: &Ray) -> Option<(&Node, HitRecord)> {
        let mut closest: Option<(&Node, HitRecord)> = None;

        for node in &self.nodes {
            let mut rec = HitRecord::default();
            if !node.geometry().hit(ray, FORWARD, &mut rec) {
                continue;
            }
            if closest.as_ref().map_or(true, |(_, best)| rec.t < best.t) {
                closest = Some((node, rec));
            }
        }

        closest
    }

    /// True if nothing lies between `from` and `to`.
    ///
    /// Surfaces at or beyond `to` don't count as occluders.
    pub fn is_visible(&self, from: DVec3, to: DVec3) -> bool {
        let Some((ray, distance)) = Ray::between(from, to) else {
            return true;
        };

        self.nodes.iter().all(|node| {
            let mut rec = HitRecord::default();
            !(node.geometry().hit(&ray, FORWARD, &mut rec) && rec.t < distance)
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn build_geometry(description: &GeometryDescription) -> Box<dyn Geometry> {
    match *description {
        GeometryDescription::Sphere { center, radius } => Box::new(Sphere::new(center, radius)),
        GeometryDescription::Plane {
            center,
            limit,
            orientation,
        } => Box::new(Plane::new(center, limit, orientation)),
        GeometryDescription::Cube { center, edge } => Box::new(Cube::new(center, edge)),
    }
}

fn build_texture(description: &TextureDescription) -> Arc<dyn Texture> {
    match *description {
        TextureDescription::SimpleColor { color } => Arc::new(SimpleColor::new(color)),
        TextureDescription::Checker {
            color1,
            color2,
            scale,
        } => Arc::new(Checker::new(color1, color2, scale)),
    }
}

fn build_shader(description: &ShaderDescription) -> Arc<dyn Shader> {
    match description {
        ShaderDescription::Lambert { color, texture } => {
            Arc::new(Lambert::new(*color, texture.as_ref().map(build_texture)))
        }
        ShaderDescription::Phong {
            color,
            texture,
            specular_multiplier,
            specular_exponent,
        } => Arc::new(Phong::new(
            *color,
            texture.as_ref().map(build_texture),
            *specular_multiplier,
            *specular_exponent,
        )),
    }
}

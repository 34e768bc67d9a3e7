//! Scene description types for glint.
//!
//! These types describe a scene as it is written in a scene file, without
//! any renderer behavior attached. The renderer builds its own runtime
//! scene from a [`SceneDescription`].

use glint_math::{Color, ColorExt, DVec3};

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSettings {
    pub width: u32,
    pub height: u32,
}

impl FrameSettings {
    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Camera placement. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    pub position: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    /// Field of view across the screen diagonal
    pub fov: f64,
    pub aspect_ratio: f64,
}

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightDescription {
    pub position: DVec3,
    pub color: Color,
    pub power: f64,
}

/// Which axis-aligned plane a [`GeometryDescription::Plane`] lies in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneOrientation {
    XY,
    XZ,
    YZ,
}

impl PlaneOrientation {
    /// Parse the scene-file keyword for an orientation.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "XY" => Some(Self::XY),
            "XZ" => Some(Self::XZ),
            "YZ" => Some(Self::YZ),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GeometryDescription {
    Sphere {
        center: DVec3,
        radius: f64,
    },
    /// A finite square of side `limit` centered on `center`
    Plane {
        center: DVec3,
        limit: f64,
        orientation: PlaneOrientation,
    },
    /// An axis-aligned cube
    Cube {
        center: DVec3,
        edge: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextureDescription {
    SimpleColor {
        color: Color,
    },
    Checker {
        color1: Color,
        color2: Color,
        scale: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShaderDescription {
    Lambert {
        color: Color,
        texture: Option<TextureDescription>,
    },
    Phong {
        color: Color,
        texture: Option<TextureDescription>,
        specular_multiplier: f64,
        specular_exponent: f64,
    },
}

/// A geometry paired with the shader that colors it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescription {
    pub geometry: GeometryDescription,
    pub shader: ShaderDescription,
}

/// Everything the renderer needs to produce a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescription {
    pub frame: FrameSettings,
    pub camera: CameraSettings,
    pub ambient_light: Color,
    pub lights: Vec<LightDescription>,
    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    /// The built-in demo scene: a yellow sphere floating over a blue floor,
    /// lit by a single white light.
    pub fn demo() -> Self {
        let frame = FrameSettings {
            width: 640,
            height: 480,
        };

        Self {
            frame,
            camera: CameraSettings {
                position: DVec3::new(60.0, 60.0, -100.0),
                yaw: 0.0,
                pitch: 30.0,
                roll: 0.0,
                fov: 90.0,
                aspect_ratio: frame.aspect_ratio(),
            },
            ambient_light: Color::WHITE,
            lights: vec![LightDescription {
                position: DVec3::new(35.0, 180.0, -100.0),
                color: Color::WHITE,
                power: 25000.0,
            }],
            nodes: vec![
                NodeDescription {
                    geometry: GeometryDescription::Plane {
                        center: DVec3::ZERO,
                        limit: 300.0,
                        orientation: PlaneOrientation::XZ,
                    },
                    shader: ShaderDescription::Lambert {
                        color: Color::BLACK,
                        texture: Some(TextureDescription::SimpleColor {
                            color: Color::from_rgb8(0, 0, 255),
                        }),
                    },
                },
                NodeDescription {
                    geometry: GeometryDescription::Sphere {
                        center: DVec3::new(0.0, 70.0, 0.0),
                        radius: 20.0,
                    },
                    shader: ShaderDescription::Lambert {
                        color: Color::from_rgb8(0, 255, 0),
                        texture: Some(TextureDescription::SimpleColor {
                            color: Color::from_rgb8(255, 255, 0),
                        }),
                    },
                },
            ],
        }
    }

    /// Number of scene nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of lights.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

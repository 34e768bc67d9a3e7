//! Scene file parser.
//!
//! Scene files are a whitespace-delimited token stream with `{ }` blocks:
//!
//! ```text
//! FrameSettings { frameWidth 640 frameHeight 480 }
//! Camera { position 60 60 -100 yaw 0 pitch 30 roll 0 fov 90 aspectRatio 1.333 }
//! AmbientLight 255 255 255
//! Light { position 35 180 -100 color 255 255 255 power 25000 }
//! Node {
//!   geometry Sphere { center 0 70 0 radius 20 }
//!   shader Lambert { color 0 255 0 texture SimpleColor { color 255 255 0 } }
//! }
//! ```
//!
//! `FrameSettings`, `Camera` and `AmbientLight` come first in that order,
//! followed by any number of `Light` blocks and then any number of `Node`
//! blocks. Fields inside a block may appear in any order. Every field is
//! required except a shader's `texture`.

use glint_math::{Color, ColorExt, DVec3};
use thiserror::Error;

use crate::scene::*;

/// Errors that can occur while parsing a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at line {line}: expected {expected}, found `{found}`")]
    Unexpected {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEof(String),

    #[error("Invalid number `{token}` at line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Invalid color channel `{token}` at line {line} (expected 0-255)")]
    InvalidColor { line: usize, token: String },

    #[error("Invalid value at line {line}: {message}")]
    InvalidValue { line: usize, message: String },

    #[error("Duplicate field `{field}` in {block} block at line {line}")]
    DuplicateField {
        line: usize,
        block: &'static str,
        field: String,
    },

    #[error("Missing field `{field}` in {block} block")]
    MissingField {
        block: &'static str,
        field: &'static str,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A token and the 1-based line it was read from.
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    line: usize,
    text: &'a str,
}

/// Scene file parser.
pub struct SceneParser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
}

impl<'a> SceneParser<'a> {
    /// Create a new parser from file contents.
    pub fn new(content: &'a str) -> Self {
        let tokens = content
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                line.split_whitespace()
                    .map(move |text| Token { line: i + 1, text })
            })
            .collect();

        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the whole token stream into a scene description.
    pub fn parse(&mut self) -> ParseResult<SceneDescription> {
        let frame = self.parse_frame_settings()?;
        let camera = self.parse_camera()?;

        self.expect("AmbientLight")?;
        let ambient_light = self.parse_color()?;

        let mut lights = Vec::new();
        while self.peek_is("Light") {
            lights.push(self.parse_light()?);
        }

        let mut nodes = Vec::new();
        while self.peek_is("Node") {
            nodes.push(self.parse_node()?);
        }

        if let Some(token) = self.tokens.get(self.position) {
            return Err(ParseError::Unexpected {
                line: token.line,
                expected: "`Light`, `Node` or end of input".to_string(),
                found: token.text.to_string(),
            });
        }

        log::debug!(
            "Parsed scene: {}x{} frame, {} lights, {} nodes",
            frame.width,
            frame.height,
            lights.len(),
            nodes.len()
        );

        Ok(SceneDescription {
            frame,
            camera,
            ambient_light,
            lights,
            nodes,
        })
    }

    fn parse_frame_settings(&mut self) -> ParseResult<FrameSettings> {
        const BLOCK: &str = "FrameSettings";
        self.expect(BLOCK)?;

        let mut width = None;
        let mut height = None;
        self.parse_fields(BLOCK, |parser, key| {
            match key.text {
                "frameWidth" => store(&mut width, parser.parse_dimension()?, BLOCK, key)?,
                "frameHeight" => store(&mut height, parser.parse_dimension()?, BLOCK, key)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(FrameSettings {
            width: required(width, BLOCK, "frameWidth")?,
            height: required(height, BLOCK, "frameHeight")?,
        })
    }

    fn parse_camera(&mut self) -> ParseResult<CameraSettings> {
        const BLOCK: &str = "Camera";
        self.expect(BLOCK)?;

        let mut position = None;
        let mut yaw = None;
        let mut pitch = None;
        let mut roll = None;
        let mut fov = None;
        let mut aspect_ratio = None;
        self.parse_fields(BLOCK, |parser, key| {
            match key.text {
                "position" => store(&mut position, parser.parse_vector()?, BLOCK, key)?,
                "yaw" => store(&mut yaw, parser.parse_number()?, BLOCK, key)?,
                "pitch" => store(&mut pitch, parser.parse_number()?, BLOCK, key)?,
                "roll" => store(&mut roll, parser.parse_number()?, BLOCK, key)?,
                "fov" => store(&mut fov, parser.parse_number()?, BLOCK, key)?,
                "aspectRatio" => store(&mut aspect_ratio, parser.parse_number()?, BLOCK, key)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(CameraSettings {
            position: required(position, BLOCK, "position")?,
            yaw: required(yaw, BLOCK, "yaw")?,
            pitch: required(pitch, BLOCK, "pitch")?,
            roll: required(roll, BLOCK, "roll")?,
            fov: required(fov, BLOCK, "fov")?,
            aspect_ratio: required(aspect_ratio, BLOCK, "aspectRatio")?,
        })
    }

    fn parse_light(&mut self) -> ParseResult<LightDescription> {
        const BLOCK: &str = "Light";
        self.expect(BLOCK)?;

        let mut position = None;
        let mut color = None;
        let mut power = None;
        self.parse_fields(BLOCK, |parser, key| {
            match key.text {
                "position" => store(&mut position, parser.parse_vector()?, BLOCK, key)?,
                "color" => store(&mut color, parser.parse_color()?, BLOCK, key)?,
                "power" => store(&mut power, parser.parse_number()?, BLOCK, key)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(LightDescription {
            position: required(position, BLOCK, "position")?,
            color: required(color, BLOCK, "color")?,
            power: required(power, BLOCK, "power")?,
        })
    }

    fn parse_node(&mut self) -> ParseResult<NodeDescription> {
        const BLOCK: &str = "Node";
        self.expect(BLOCK)?;

        let mut geometry = None;
        let mut shader = None;
        self.parse_fields(BLOCK, |parser, key| {
            match key.text {
                "geometry" => store(&mut geometry, parser.parse_geometry()?, BLOCK, key)?,
                "shader" => store(&mut shader, parser.parse_shader()?, BLOCK, key)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(NodeDescription {
            geometry: required(geometry, BLOCK, "geometry")?,
            shader: required(shader, BLOCK, "shader")?,
        })
    }

    fn parse_geometry(&mut self) -> ParseResult<GeometryDescription> {
        let kind = self.next_token("a geometry type")?;
        match kind.text {
            "Sphere" => {
                const BLOCK: &str = "Sphere";
                let mut center = None;
                let mut radius = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "center" => store(&mut center, parser.parse_vector()?, BLOCK, key)?,
                        "radius" => store(&mut radius, parser.parse_number()?, BLOCK, key)?,
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(GeometryDescription::Sphere {
                    center: required(center, BLOCK, "center")?,
                    radius: required(radius, BLOCK, "radius")?,
                })
            }
            "Plane" => {
                const BLOCK: &str = "Plane";
                let mut center = None;
                let mut limit = None;
                let mut orientation = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "center" => store(&mut center, parser.parse_vector()?, BLOCK, key)?,
                        "limit" => store(&mut limit, parser.parse_number()?, BLOCK, key)?,
                        "orientation" => {
                            store(&mut orientation, parser.parse_orientation()?, BLOCK, key)?
                        }
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(GeometryDescription::Plane {
                    center: required(center, BLOCK, "center")?,
                    limit: required(limit, BLOCK, "limit")?,
                    orientation: required(orientation, BLOCK, "orientation")?,
                })
            }
            "Cube" => {
                const BLOCK: &str = "Cube";
                let mut center = None;
                let mut edge = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "center" => store(&mut center, parser.parse_vector()?, BLOCK, key)?,
                        "edge" => store(&mut edge, parser.parse_number()?, BLOCK, key)?,
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(GeometryDescription::Cube {
                    center: required(center, BLOCK, "center")?,
                    edge: required(edge, BLOCK, "edge")?,
                })
            }
            _ => Err(unexpected(kind, "`Sphere`, `Plane` or `Cube`")),
        }
    }

    fn parse_shader(&mut self) -> ParseResult<ShaderDescription> {
        let kind = self.next_token("a shader type")?;
        match kind.text {
            "Lambert" => {
                const BLOCK: &str = "Lambert";
                let mut color = None;
                let mut texture = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "color" => store(&mut color, parser.parse_color()?, BLOCK, key)?,
                        "texture" => store(&mut texture, parser.parse_texture()?, BLOCK, key)?,
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(ShaderDescription::Lambert {
                    color: required(color, BLOCK, "color")?,
                    texture,
                })
            }
            "Phong" => {
                const BLOCK: &str = "Phong";
                let mut color = None;
                let mut texture = None;
                let mut specular_multiplier = None;
                let mut specular_exponent = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "color" => store(&mut color, parser.parse_color()?, BLOCK, key)?,
                        "texture" => store(&mut texture, parser.parse_texture()?, BLOCK, key)?,
                        "specularMultiplier" => {
                            store(&mut specular_multiplier, parser.parse_number()?, BLOCK, key)?
                        }
                        "specularExponent" => {
                            store(&mut specular_exponent, parser.parse_number()?, BLOCK, key)?
                        }
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(ShaderDescription::Phong {
                    color: required(color, BLOCK, "color")?,
                    texture,
                    specular_multiplier: required(specular_multiplier, BLOCK, "specularMultiplier")?,
                    specular_exponent: required(specular_exponent, BLOCK, "specularExponent")?,
                })
            }
            _ => Err(unexpected(kind, "`Lambert` or `Phong`")),
        }
    }

    fn parse_texture(&mut self) -> ParseResult<TextureDescription> {
        let kind = self.next_token("a texture type")?;
        match kind.text {
            "SimpleColor" => {
                const BLOCK: &str = "SimpleColor";
                let mut color = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "color" => store(&mut color, parser.parse_color()?, BLOCK, key)?,
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(TextureDescription::SimpleColor {
                    color: required(color, BLOCK, "color")?,
                })
            }
            "Checker" => {
                const BLOCK: &str = "Checker";
                let mut color1 = None;
                let mut color2 = None;
                let mut scale = None;
                self.parse_fields(BLOCK, |parser, key| {
                    match key.text {
                        "color1" => store(&mut color1, parser.parse_color()?, BLOCK, key)?,
                        "color2" => store(&mut color2, parser.parse_color()?, BLOCK, key)?,
                        "scale" => store(&mut scale, parser.parse_number()?, BLOCK, key)?,
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
                Ok(TextureDescription::Checker {
                    color1: required(color1, BLOCK, "color1")?,
                    color2: required(color2, BLOCK, "color2")?,
                    scale: required(scale, BLOCK, "scale")?,
                })
            }
            _ => Err(unexpected(kind, "`SimpleColor` or `Checker`")),
        }
    }

    /// Parse a `{ key value ... }` block, handing each key to `on_field`.
    ///
    /// `on_field` consumes the value and returns false for unknown keys.
    fn parse_fields<F>(&mut self, block: &'static str, mut on_field: F) -> ParseResult<()>
    where
        F: FnMut(&mut Self, Token<'a>) -> ParseResult<bool>,
    {
        self.expect("{")?;
        loop {
            let key = self.next_token("a field name or `}`")?;
            if key.text == "}" {
                return Ok(());
            }
            if !on_field(self, key)? {
                return Err(unexpected(key, &format!("a {} field or `}}`", block)));
            }
        }
    }

    fn parse_number(&mut self) -> ParseResult<f64> {
        let token = self.next_token("a number")?;
        match token.text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::InvalidNumber {
                line: token.line,
                token: token.text.to_string(),
            }),
        }
    }

    fn parse_dimension(&mut self) -> ParseResult<u32> {
        let token = self.next_token("a frame dimension")?;
        let value = token
            .text
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidNumber {
                line: token.line,
                token: token.text.to_string(),
            })?;
        if value == 0 {
            return Err(ParseError::InvalidValue {
                line: token.line,
                message: "frame dimensions must be positive".to_string(),
            });
        }
        Ok(value)
    }

    fn parse_vector(&mut self) -> ParseResult<DVec3> {
        Ok(DVec3::new(
            self.parse_number()?,
            self.parse_number()?,
            self.parse_number()?,
        ))
    }

    fn parse_channel(&mut self) -> ParseResult<u8> {
        let token = self.next_token("a color channel")?;
        token.text.parse::<u8>().map_err(|_| ParseError::InvalidColor {
            line: token.line,
            token: token.text.to_string(),
        })
    }

    fn parse_color(&mut self) -> ParseResult<Color> {
        Ok(Color::from_rgb8(
            self.parse_channel()?,
            self.parse_channel()?,
            self.parse_channel()?,
        ))
    }

    fn parse_orientation(&mut self) -> ParseResult<PlaneOrientation> {
        let token = self.next_token("a plane orientation")?;
        PlaneOrientation::from_keyword(token.text)
            .ok_or_else(|| unexpected(token, "`XY`, `XZ` or `YZ`"))
    }

    fn next_token(&mut self, expected: &str) -> ParseResult<Token<'a>> {
        let token = self
            .tokens
            .get(self.position)
            .copied()
            .ok_or_else(|| ParseError::UnexpectedEof(expected.to_string()))?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, keyword: &str) -> ParseResult<()> {
        let expected = format!("`{}`", keyword);
        let token = self.next_token(&expected)?;
        if token.text != keyword {
            return Err(unexpected(token, &expected));
        }
        Ok(())
    }

    fn peek_is(&self, keyword: &str) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|token| token.text == keyword)
    }
}

/// Parse a scene from its file contents.
pub fn parse_scene(content: &str) -> ParseResult<SceneDescription> {
    SceneParser::new(content).parse()
}

fn unexpected(token: Token<'_>, expected: &str) -> ParseError {
    ParseError::Unexpected {
        line: token.line,
        expected: expected.to_string(),
        found: token.text.to_string(),
    }
}

fn store<T>(slot: &mut Option<T>, value: T, block: &'static str, key: Token<'_>) -> ParseResult<()> {
    if slot.is_some() {
        return Err(ParseError::DuplicateField {
            line: key.line,
            block,
            field: key.text.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

fn required<T>(slot: Option<T>, block: &'static str, field: &'static str) -> ParseResult<T> {
    slot.ok_or(ParseError::MissingField { block, field })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "
        FrameSettings { frameWidth 320 frameHeight 240 }
        Camera { position 0 10 -50 yaw 0 pitch 0 roll 0 fov 90 aspectRatio 1.3333 }
        AmbientLight 255 255 255
    ";

    fn scene_with(body: &str) -> String {
        format!("{}\n{}", HEADER, body)
    }

    #[test]
    fn test_parse_header_only() {
        let scene = parse_scene(HEADER).unwrap();

        assert_eq!(scene.frame, FrameSettings { width: 320, height: 240 });
        assert_eq!(scene.camera.position, DVec3::new(0.0, 10.0, -50.0));
        assert_eq!(scene.camera.fov, 90.0);
        assert_eq!(scene.ambient_light, Color::WHITE);
        assert!(scene.lights.is_empty());
        assert!(scene.nodes.is_empty());
    }

    #[test]
    fn test_parse_fields_in_any_order() {
        let content = "
            FrameSettings { frameHeight 48 frameWidth 64 }
            Camera { fov 60 aspectRatio 1 roll 1 pitch 2 yaw 3 position 1 2 3 }
            AmbientLight 0 0 0
        ";
        let scene = parse_scene(content).unwrap();

        assert_eq!(scene.frame, FrameSettings { width: 64, height: 48 });
        assert_eq!(scene.camera.yaw, 3.0);
        assert_eq!(scene.camera.pitch, 2.0);
        assert_eq!(scene.camera.roll, 1.0);
    }

    #[test]
    fn test_parse_lights_and_nodes() {
        let content = scene_with(
            "
            Light { position 35 180 -100 color 255 255 255 power 25000 }
            Light { power 10 color 255 0 0 position 0 0 0 }
            Node {
                geometry Plane { center 0 0 0 limit 300 orientation XZ }
                shader Lambert { color 0 0 0 texture SimpleColor { color 0 0 255 } }
            }
            Node {
                geometry Sphere { center 0 70 0 radius 20 }
                shader Phong {
                    color 0 255 0
                    texture Checker { color1 0 255 0 color2 255 0 0 scale 50 }
                    specularMultiplier 5.3
                    specularExponent 20
                }
            }
            Node {
                geometry Cube { center 10 10 10 edge 5 }
                shader Lambert { color 255 0 255 }
            }
            ",
        );
        let scene = parse_scene(&content).unwrap();

        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.lights[0].power, 25000.0);
        assert_eq!(scene.lights[1].color, Color::from_rgb8(255, 0, 0));

        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(
            scene.nodes[0].geometry,
            GeometryDescription::Plane {
                center: DVec3::ZERO,
                limit: 300.0,
                orientation: PlaneOrientation::XZ,
            }
        );
        match &scene.nodes[1].shader {
            ShaderDescription::Phong {
                texture: Some(TextureDescription::Checker { scale, .. }),
                specular_multiplier,
                specular_exponent,
                ..
            } => {
                assert_eq!(*scale, 50.0);
                assert_eq!(*specular_multiplier, 5.3);
                assert_eq!(*specular_exponent, 20.0);
            }
            other => panic!("unexpected shader {:?}", other),
        }
        assert_eq!(
            scene.nodes[2].shader,
            ShaderDescription::Lambert {
                color: Color::from_rgb8(255, 0, 255),
                texture: None,
            }
        );
    }

    #[test]
    fn test_unknown_keyword() {
        let err = parse_scene(&scene_with("Node { geometry Torus { } }")).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { ref found, .. } if found == "Torus"));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = parse_scene("FrameSettings { frameWidth wide frameHeight 10 }").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, .. }));
    }

    #[test]
    fn test_non_finite_number() {
        let err = parse_scene(&scene_with(
            "Light { position 0 0 0 color 255 255 255 power inf }",
        ))
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_color_out_of_range() {
        let err = parse_scene(&HEADER.replace("AmbientLight 255", "AmbientLight 256")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidColor { ref token, .. } if token == "256"));
    }

    #[test]
    fn test_missing_field() {
        let err = parse_scene(&scene_with(
            "Node { geometry Sphere { center 0 0 0 } shader Lambert { color 0 0 0 } }",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                block: "Sphere",
                field: "radius"
            }
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let err = parse_scene("FrameSettings { frameWidth 1 frameWidth 2 frameHeight 1 }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateField { block: "FrameSettings", .. }));
    }

    #[test]
    fn test_zero_frame_size() {
        let err = parse_scene("FrameSettings { frameWidth 0 frameHeight 10 }").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_orientation() {
        let err = parse_scene(&scene_with(
            "Node { geometry Plane { center 0 0 0 limit 1 orientation XW } }",
        ))
        .unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { ref found, .. } if found == "XW"));
    }

    #[test]
    fn test_unexpected_eof() {
        let err = parse_scene("FrameSettings { frameWidth 10").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_scene(&scene_with("Light { position 0 0 0 color 0 0 0 power 1 } Camera")).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { ref found, .. } if found == "Camera"));
    }

    #[test]
    fn test_error_reports_line() {
        let content = "FrameSettings {\n  frameWidth 10\n  frameHeight ten\n}";
        match parse_scene(content).unwrap_err() {
            ParseError::InvalidNumber { line, token } => {
                assert_eq!(line, 3);
                assert_eq!(token, "ten");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}

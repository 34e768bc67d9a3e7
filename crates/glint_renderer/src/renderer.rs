//! Core raytracing: one ray in, one color out.

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::{Camera, Scene, ShadingOptions};
use glint_math::{Color, ColorExt, Ray};

/// Default capacity of the pixel event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// How the frame is split between workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Partition {
    /// One partition per pixel column
    #[default]
    Columns,
    /// Square tiles of the given size, rendered from the center outward
    Buckets(u32),
}

impl Partition {
    /// Square tiles of [`DEFAULT_BUCKET_SIZE`] pixels.
    pub const fn default_buckets() -> Self {
        Self::Buckets(DEFAULT_BUCKET_SIZE)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color for rays that hit nothing
    pub background: Color,
    pub partition: Partition,
    /// Pixel events buffered before workers block
    pub channel_capacity: usize,
    /// Worker thread count; `None` uses one per core
    pub threads: Option<usize>,
    pub shading: ShadingOptions,
    /// Measure screen rays against a fixed 640x480 screen instead of the
    /// frame size
    pub legacy_screen_mapping: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            partition: Partition::Columns,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            threads: None,
            shading: ShadingOptions::default(),
            legacy_screen_mapping: false,
        }
    }
}

/// A finished pixel, published while the frame is still rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelEvent {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// Compute the color seen by a ray.
pub fn raytrace(ray: &Ray, scene: &Scene, config: &RenderConfig) -> Color {
    match scene.closest_hit(ray) {
        Some((node, rec)) => node.shader().shade(ray, &rec, scene),
        None => config.background,
    }
}

/// Render a single pixel.
pub fn render_pixel(camera: &Camera, scene: &Scene, x: u32, y: u32, config: &RenderConfig) -> Color {
    let ray = camera.get_screen_ray(x as f64, y as f64);
    raytrace(&ray, scene, config)
}

/// Row-major buffer holding a rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color.to_rgb8()).collect()
    }
}

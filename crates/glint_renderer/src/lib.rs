//! glint renderer - multithreaded CPU raytracing.
//!
//! Finds the nearest surface along each camera ray, shades it with a local
//! illumination model and hard shadows, and streams finished pixels to the
//! caller while the frame is still rendering.
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//! use glint_renderer::RenderManager;
//!
//! let mut manager = RenderManager::new();
//! manager.setup(&SceneDescription::demo())?;
//! for pixel in manager.render()? {
//!     println!("({}, {}) = {:?}", pixel.x, pixel.y, pixel.color);
//! }
//! let frame = manager.wait()?;
//! ```

mod bucket;
mod camera;
mod cube;
mod hittable;
mod light;
mod manager;
mod output;
mod plane;
mod renderer;
mod scene;
mod shader;
mod sphere;
mod texture;

pub use bucket::{
    generate_buckets, generate_columns, generate_partition, render_bucket, Bucket, BucketResult,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, LEGACY_SCREEN_HEIGHT, LEGACY_SCREEN_WIDTH};
pub use cube::Cube;
pub use hittable::{Geometry, HitRecord};
pub use light::Light;
pub use manager::{CancellationToken, PixelStream, RenderError, RenderManager, RenderState};
pub use output::{Display, ImageSaver, OutputError, PngSaver};
pub use plane::Plane;
pub use renderer::{
    raytrace, render_pixel, FrameBuffer, Partition, PixelEvent, RenderConfig,
    DEFAULT_CHANNEL_CAPACITY,
};
pub use scene::{Node, Scene};
pub use shader::{LightAccumulation, Lambert, Phong, Shader, ShadingOptions, SHADOW_BIAS};
pub use sphere::Sphere;
pub use texture::{Checker, SimpleColor, Texture};

/// Re-export the math types used in the public API
pub use glint_math::{Color, DVec3, Interval, Ray};

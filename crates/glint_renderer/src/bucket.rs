//! Frame partitioning for parallel rendering.
//!
//! The frame is divided into buckets that workers render independently.
//! Buckets never overlap, so each worker owns the pixels it writes.

use crate::renderer::{render_pixel, PixelEvent, Partition, RenderConfig};
use crate::{Camera, Color, RenderError, Scene};
use glint_math::ColorExt;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Default bucket size in pixels for [`Partition::Buckets`].
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// One full-height, 1-pixel-wide bucket per column, left to right.
pub fn generate_columns(width: u32, height: u32) -> Vec<Bucket> {
    (0..width)
        .map(|x| Bucket::new(x, 0, 1, height, x as usize))
        .collect()
}

/// Generate square buckets, sorted in spiral order from the center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Split a frame according to `partition`.
pub fn generate_partition(width: u32, height: u32, partition: Partition) -> Vec<Bucket> {
    match partition {
        Partition::Columns => generate_columns(width, height),
        Partition::Buckets(size) => generate_buckets(width, height, size),
    }
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let distance = |bucket: &Bucket| {
        let x = bucket.x as f64 + bucket.width as f64 / 2.0;
        let y = bucket.y as f64 + bucket.height as f64 / 2.0;
        (x - center_x).powi(2) + (y - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a single bucket, publishing each pixel through `emit`.
///
/// `should_stop` is polled once per bucket row; when it returns true the
/// bucket is abandoned with [`RenderError::Cancelled`]. A pixel that shades
/// to a non-finite color fails the bucket. Returns pixels in row-major order
/// within the bucket.
pub fn render_bucket<S, E>(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    should_stop: S,
    mut emit: E,
) -> Result<BucketResult, RenderError>
where
    S: Fn() -> bool,
    E: FnMut(PixelEvent) -> Result<(), RenderError>,
{
    let mut pixels = Vec::with_capacity(bucket.pixel_count());

    for local_y in 0..bucket.height {
        if should_stop() {
            return Err(RenderError::Cancelled);
        }
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let color = render_pixel(camera, scene, x, y, config);
            if !color.is_displayable() {
                return Err(RenderError::NonFinitePixel { x, y });
            }

            emit(PixelEvent { x, y, color })?;
            pixels.push(color);
        }
    }

    Ok(BucketResult::new(*bucket, pixels))
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Iterate over `(x, y, color)` in frame coordinates.
    pub fn frame_pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        let bucket = self.bucket;
        self.pixels.iter().enumerate().map(move |(i, color)| {
            let i = i as u32;
            (bucket.x + i % bucket.width, bucket.y + i / bucket.width, *color)
        })
    }
}

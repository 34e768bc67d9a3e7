//! Output collaborators: on-screen displays and image files.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use thiserror::Error;

use glint_math::{Color, ColorExt};

/// Errors that can occur while presenting or saving pixels.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Display error: {0}")]
    Display(String),
}

/// A surface that shows pixels as they arrive.
pub trait Display {
    /// Write one pixel to the back buffer. Pixels outside the surface are ignored.
    fn draw_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Show everything drawn so far.
    fn present(&mut self) -> Result<(), OutputError>;
}

/// A writer that persists a rectangular image.
pub trait ImageSaver {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<(), OutputError>;

    /// Encode the current pixels, replacing anything saved before.
    fn save(&mut self) -> Result<(), OutputError>;
}

/// Saves frames as 8-bit RGB PNG files.
pub struct PngSaver {
    path: PathBuf,
    writer: BufWriter<File>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PngSaver {
    /// Create (or truncate) `path` for a `width` x `height` image.
    ///
    /// Pixels start out black.
    pub fn open<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self, OutputError> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(File::create(&path)?);

        Ok(Self {
            path,
            writer,
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file.
    pub fn close(mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl ImageSaver for PngSaver {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<(), OutputError> {
        if x >= self.width || y >= self.height {
            return Err(OutputError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[offset..offset + 3].copy_from_slice(&color.to_rgb8());
        Ok(())
    }

    fn save(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        let file = self.writer.get_mut();
        file.set_len(0)?;
        file.rewind()?;

        PngEncoder::new(&mut self.writer).write_image(
            &self.pixels,
            self.width,
            self.height,
            ColorType::Rgb8,
        )?;
        self.writer.flush()?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glint-{}-{}.png", std::process::id(), name))
    }

    #[test]
    fn test_png_round_trip() {
        let path = temp_path("round-trip");
        let mut saver = PngSaver::open(&path, 4, 3).unwrap();
        assert_eq!(saver.path(), path.as_path());
        saver.set_pixel(0, 0, Color::from_rgb8(255, 0, 0)).unwrap();
        saver.set_pixel(3, 2, Color::from_rgb8(0, 128, 255)).unwrap();
        saver.set_pixel(1, 1, Color::new(2.0, -1.0, 0.5)).unwrap();
        saver.save().unwrap();
        saver.close().unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(image.get_pixel(3, 2).0, [0, 128, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [255, 0, 128]);
        assert_eq!(image.get_pixel(2, 0).0, [0, 0, 0]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_replaces_previous_image() {
        let path = temp_path("resave");
        let mut saver = PngSaver::open(&path, 2, 2).unwrap();
        saver.save().unwrap();
        saver.set_pixel(1, 0, Color::WHITE).unwrap();
        saver.save().unwrap();
        saver.close().unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let path = temp_path("bounds");
        let mut saver = PngSaver::open(&path, 2, 2).unwrap();

        let err = saver.set_pixel(2, 0, Color::WHITE).unwrap_err();
        assert!(matches!(err, OutputError::OutOfBounds { x: 2, y: 0, .. }));

        saver.close().unwrap();
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_missing_directory() {
        let path = std::env::temp_dir().join("glint-missing-dir").join("nested").join("out.png");
        assert!(matches!(PngSaver::open(path, 1, 1), Err(OutputError::Io(_))));
    }
}

//! Live preview window.
//!
//! Built on minifb when the `window` feature is enabled. Without it,
//! [`WindowDisplay::open`] logs a warning and the render runs headless.

#[cfg(feature = "window")]
mod enabled {
    use minifb::{Key, Scale, Window, WindowOptions};

    use glint_math::{Color, ColorExt};
    use glint_renderer::{Display, OutputError};

    pub struct WindowDisplay {
        window: Window,
        buffer: Vec<u32>,
        width: usize,
        height: usize,
    }

    impl WindowDisplay {
        pub fn open(width: u32, height: u32) -> Result<Option<Self>, OutputError> {
            let (width, height) = (width as usize, height as usize);
            let mut window = Window::new(
                "glint",
                width,
                height,
                WindowOptions {
                    scale: Scale::X1,
                    ..WindowOptions::default()
                },
            )
            .map_err(|err| OutputError::Display(err.to_string()))?;
            window.set_target_fps(60);

            log::info!("Opened {}x{} preview window", width, height);
            Ok(Some(Self {
                window,
                buffer: vec![0u32; width * height],
                width,
                height,
            }))
        }

        pub fn is_open(&self) -> bool {
            self.window.is_open() && !self.window.is_key_down(Key::Escape)
        }

        /// Keep showing the last frame until the window is closed.
        pub fn keep_open(&mut self) -> Result<(), OutputError> {
            while self.is_open() {
                self.present()?;
            }
            Ok(())
        }
    }

    impl Display for WindowDisplay {
        fn draw_pixel(&mut self, x: u32, y: u32, color: Color) {
            let (x, y) = (x as usize, y as usize);
            if x >= self.width || y >= self.height {
                return;
            }
            let [r, g, b] = color.to_rgb8();
            self.buffer[y * self.width + x] = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        }

        fn present(&mut self) -> Result<(), OutputError> {
            self.window
                .update_with_buffer(&self.buffer, self.width, self.height)
                .map_err(|err| OutputError::Display(err.to_string()))
        }
    }
}

#[cfg(not(feature = "window"))]
mod disabled {
    use glint_math::Color;
    use glint_renderer::{Display, OutputError};

    /// Never constructed when the `window` feature is off.
    pub enum WindowDisplay {}

    impl WindowDisplay {
        pub fn open(_width: u32, _height: u32) -> Result<Option<Self>, OutputError> {
            log::warn!("Built without the `window` feature, rendering without a display");
            Ok(None)
        }

        pub fn is_open(&self) -> bool {
            match *self {}
        }

        pub fn keep_open(&mut self) -> Result<(), OutputError> {
            match *self {}
        }
    }

    impl Display for WindowDisplay {
        fn draw_pixel(&mut self, _x: u32, _y: u32, _color: Color) {
            match *self {}
        }

        fn present(&mut self) -> Result<(), OutputError> {
            match *self {}
        }
    }
}

#[cfg(feature = "window")]
pub use enabled::WindowDisplay;

#[cfg(not(feature = "window"))]
pub use disabled::WindowDisplay;

#[cfg(all(test, not(feature = "window")))]
mod tests {
    use super::*;

    #[test]
    fn test_headless_open_returns_none() {
        assert!(WindowDisplay::open(4, 4).unwrap().is_none());
    }
}

//! RGB colors.
//!
//! Channels are f64 and logically in [0, 1], but arithmetic is unclamped;
//! clamping only happens when converting back to 8-bit channels.

use glam::DVec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// Conversions between [`Color`] and 8-bit RGB.
pub trait ColorExt {
    const WHITE: Self;
    const BLACK: Self;

    /// Create a color from 8-bit channels (`channel / 255`).
    fn from_rgb8(r: u8, g: u8, b: u8) -> Self;

    /// Clamp each channel to [0, 1] and convert to 8-bit.
    fn to_rgb8(&self) -> [u8; 3];

    /// True if every channel is a finite number.
    fn is_displayable(&self) -> bool;
}

impl ColorExt for Color {
    const WHITE: Self = DVec3::ONE;
    const BLACK: Self = DVec3::ZERO;

    fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        DVec3::new(r as f64, g as f64, b as f64) / 255.0
    }

    fn to_rgb8(&self) -> [u8; 3] {
        [channel_to_u8(self.x), channel_to_u8(self.y), channel_to_u8(self.z)]
    }

    fn is_displayable(&self) -> bool {
        self.is_finite()
    }
}

#[inline]
fn channel_to_u8(value: f64) -> u8 {
    // NaN clamps to NaN and casts to 0
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

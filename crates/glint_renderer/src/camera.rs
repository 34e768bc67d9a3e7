//! Camera for ray generation.

use glint_core::CameraSettings;
use glint_math::{DMat3, DVec3, Mat3Ext, Ray};

/// Screen size the pixel fractions are measured against unless told otherwise.
pub const LEGACY_SCREEN_WIDTH: u32 = 640;
pub const LEGACY_SCREEN_HEIGHT: u32 = 480;

/// Widens the screen beyond the nominal field of view.
const SCREEN_SCALE: f64 = 1.5;

/// A pinhole camera looking down +Z before rotation.
///
/// The screen is a rectangle at depth 1 described by three corners. Rays
/// start at the camera position and pass through the screen point for a
/// pixel.
#[derive(Debug, Clone)]
pub struct Camera {
    position: DVec3,
    top_left: DVec3,
    top_right: DVec3,
    bottom_left: DVec3,
    screen_width: f64,
    screen_height: f64,
}

impl Camera {
    /// Create a camera. Angles are in degrees.
    ///
    /// The orientation is `Rx(roll) * Ry(pitch) * Rz(yaw)` about the fixed
    /// world axes.
    pub fn new(position: DVec3, yaw: f64, pitch: f64, roll: f64, fov: f64, aspect_ratio: f64) -> Self {
        let half_diagonal = (fov / 2.0).to_radians().tan();
        let scale = half_diagonal / (aspect_ratio * aspect_ratio + 1.0).sqrt() * SCREEN_SCALE;
        let x = aspect_ratio * scale;
        let y = scale;

        let rotation = DMat3::rotation_xyz(roll.to_radians(), pitch.to_radians(), yaw.to_radians());
        let corner = |local: DVec3| rotation.transform_row(local) + position;

        Self {
            position,
            top_left: corner(DVec3::new(-x, y, 1.0)),
            top_right: corner(DVec3::new(x, y, 1.0)),
            bottom_left: corner(DVec3::new(-x, -y, 1.0)),
            screen_width: LEGACY_SCREEN_WIDTH as f64,
            screen_height: LEGACY_SCREEN_HEIGHT as f64,
        }
    }

    /// Create a camera from scene file settings.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(
            settings.position,
            settings.yaw,
            settings.pitch,
            settings.roll,
            settings.fov,
            settings.aspect_ratio,
        )
    }

    /// Set the pixel size of the screen that ray coordinates refer to.
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width.max(1) as f64;
        self.screen_height = height.max(1) as f64;
        self
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Generate the ray through screen pixel (x, y), measured from the
    /// top-left corner.
    ///
    /// The direction is normalized. A degenerate camera yields a zero
    /// direction, which no geometry reports a hit for.
    pub fn get_screen_ray(&self, x: f64, y: f64) -> Ray {
        let across = (self.top_right - self.top_left) * (x / self.screen_width);
        let down = (self.bottom_left - self.top_left) * (y / self.screen_height);
        let target = self.top_left + across + down;

        Ray::new(self.position, (target - self.position).normalize_or_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: DVec3, expected: DVec3) {
        assert!(
            (actual - expected).length() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn straight_camera() -> Camera {
        Camera::new(DVec3::ZERO, 0.0, 0.0, 0.0, 90.0, 4.0 / 3.0)
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let ray = straight_camera().get_screen_ray(320.0, 240.0);

        assert_eq!(ray.origin(), DVec3::ZERO);
        assert_close(ray.direction(), DVec3::Z);
    }

    #[test]
    fn test_corner_rays() {
        let camera = straight_camera();
        // tan(45) / sqrt((4/3)^2 + 1) * 1.5 = 0.9
        let top_left = camera.get_screen_ray(0.0, 0.0);
        assert_close(top_left.direction(), DVec3::new(-1.2, 0.9, 1.0).normalize());

        let bottom_right = camera.get_screen_ray(640.0, 480.0);
        assert_close(bottom_right.direction(), DVec3::new(1.2, -0.9, 1.0).normalize());
    }

    #[test]
    fn test_rays_are_normalized() {
        let camera = Camera::new(DVec3::new(60.0, 60.0, -100.0), 10.0, 30.0, -5.0, 75.0, 1.5);
        for (x, y) in [(0.0, 0.0), (17.0, 400.0), (639.0, 479.0)] {
            let ray = camera.get_screen_ray(x, y);
            assert!((ray.direction().length() - 1.0).abs() < 1e-12);
            assert_eq!(ray.origin(), DVec3::new(60.0, 60.0, -100.0));
        }
    }

    #[test]
    fn test_pitch_turns_around_y() {
        let camera = Camera::new(DVec3::ZERO, 0.0, 90.0, 0.0, 90.0, 4.0 / 3.0);
        assert_close(camera.get_screen_ray(320.0, 240.0).direction(), -DVec3::X);

        let camera = Camera::new(DVec3::ZERO, 0.0, 30.0, 0.0, 90.0, 4.0 / 3.0);
        let expected = DVec3::new(-0.5, 0.0, 3.0_f64.sqrt() / 2.0);
        assert_close(camera.get_screen_ray(320.0, 240.0).direction(), expected);
    }

    #[test]
    fn test_roll_turns_around_x() {
        let camera = Camera::new(DVec3::ZERO, 0.0, 0.0, 90.0, 90.0, 4.0 / 3.0);
        assert_close(camera.get_screen_ray(320.0, 240.0).direction(), DVec3::Y);
    }

    #[test]
    fn test_yaw_spins_screen() {
        let camera = Camera::new(DVec3::ZERO, 90.0, 0.0, 0.0, 90.0, 4.0 / 3.0);

        // Forward is unchanged, the screen's up axis now points along +X
        assert_close(camera.get_screen_ray(320.0, 240.0).direction(), DVec3::Z);
        let top = camera.get_screen_ray(320.0, 0.0).direction();
        assert!(top.x > 0.0);
        assert!(top.y.abs() < 1e-9);
    }

    #[test]
    fn test_screen_size() {
        let legacy = straight_camera();
        let small = straight_camera().with_screen_size(320, 240);

        assert_close(
            small.get_screen_ray(160.0, 120.0).direction(),
            legacy.get_screen_ray(320.0, 240.0).direction(),
        );
        assert_close(
            small.get_screen_ray(80.0, 60.0).direction(),
            legacy.get_screen_ray(160.0, 120.0).direction(),
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = CameraSettings {
            position: DVec3::new(1.0, 2.0, 3.0),
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            fov: 90.0,
            aspect_ratio: 4.0 / 3.0,
        };
        let camera = Camera::from_settings(&settings);

        assert_eq!(camera.position(), settings.position);
        assert_close(camera.get_screen_ray(320.0, 240.0).direction(), DVec3::Z);
    }
}

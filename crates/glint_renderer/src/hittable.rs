//! Geometry trait and HitRecord for ray-surface intersection.

use glint_math::{DVec3, Interval, Ray};

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: DVec3,
    /// Unit surface normal, always pointing against the ray
    pub normal: DVec3,
    /// Distance along the ray
    pub t: f64,
    /// Surface coordinates used by textures
    pub u: f64,
    pub v: f64,
}

impl HitRecord {
    /// Store `outward_normal`, flipped if it faces the same way as the ray.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: DVec3) {
        self.normal = if ray.direction().dot(outward_normal) > 0.0 {
            -outward_normal
        } else {
            outward_normal
        };
    }
}

/// Trait for surfaces that can be hit by rays.
pub trait Geometry: Send + Sync {
    /// Test if a ray hits this surface at a distance within `ray_t`.
    ///
    /// Returns true and fills in `rec` on a hit. On a miss `rec` is left
    /// untouched.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

/// Distances accepted for primary and shadow rays.
pub(crate) const FORWARD: Interval = Interval {
    min: 0.0,
    max: f64::INFINITY,
};

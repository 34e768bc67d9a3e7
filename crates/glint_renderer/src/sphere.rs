//! Sphere primitive for ray tracing.

use crate::hittable::{Geometry, HitRecord};
use glint_math::{DVec3, Interval, Ray};
use std::f64::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: DVec3,
    radius: f64,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Longitude/latitude coordinates of a point relative to the center.
    ///
    /// `u` runs over [0, 1] around the Y axis; `v` runs over [-1, 0] from
    /// the north pole down to the south pole.
    fn get_sphere_uv(&self, local: DVec3) -> (f64, f64) {
        let longitude = local.z.atan2(local.x);
        let latitude = (local.y / self.radius).clamp(-1.0, 1.0).asin();

        let u = (longitude + PI) / (2.0 * PI);
        let v = -(latitude + PI / 2.0) / PI;
        (u, v)
    }
}

impl Geometry for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        if !(self.radius > 0.0) {
            return false;
        }

        let h = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * h.dot(ray.direction());
        let c = h.length_squared() - self.radius * self.radius;

        if !(a > 0.0) {
            return false;
        }

        let discriminant = b * b - 4.0 * a * c;
        if !(discriminant >= 0.0) {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in the acceptable range
        let mut root = (-b - sqrtd) / (2.0 * a);
        if !ray_t.contains(root) {
            root = (-b + sqrtd) / (2.0 * a);
            if !ray_t.contains(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(root);
        let local = rec.p - self.center;
        rec.set_face_normal(ray, local / self.radius);
        (rec.u, rec.v) = self.get_sphere_uv(local);

        true
    }
}

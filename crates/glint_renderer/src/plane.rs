//! Finite axis-aligned plane.

use crate::hittable::{Geometry, HitRecord};
use glint_core::PlaneOrientation;
use glint_math::{DVec3, Interval, Ray};

/// A square of side `limit` lying in one of the axis planes.
#[derive(Debug, Clone)]
pub struct Plane {
    center: DVec3,
    limit: f64,
    orientation: PlaneOrientation,
}

impl Plane {
    /// Create a new plane.
    pub fn new(center: DVec3, limit: f64, orientation: PlaneOrientation) -> Self {
        Self {
            center,
            limit,
            orientation,
        }
    }

    /// (normal axis, u axis, v axis) as component indices.
    fn axes(&self) -> (usize, usize, usize) {
        match self.orientation {
            PlaneOrientation::XY => (2, 0, 1),
            PlaneOrientation::XZ => (1, 0, 2),
            PlaneOrientation::YZ => (0, 1, 2),
        }
    }

    fn outward_normal(&self) -> DVec3 {
        match self.orientation {
            PlaneOrientation::XY => DVec3::Z,
            PlaneOrientation::XZ => DVec3::Y,
            PlaneOrientation::YZ => DVec3::X,
        }
    }
}

impl Geometry for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        if !(self.limit > 0.0) {
            return false;
        }

        let (axis, u_axis, v_axis) = self.axes();
        let start = ray.origin()[axis];
        let direction = ray.direction()[axis];
        let level = self.center[axis];

        // Moving away from the plane, or parallel to it
        if (direction >= 0.0 && start > level) || (direction <= 0.0 && start < level) {
            return false;
        }
        if direction == 0.0 {
            return false;
        }

        let t = (start - level) / -direction;
        if !t.is_finite() || !ray_t.contains(t) {
            return false;
        }

        let p = ray.at(t);
        let half = self.limit / 2.0;
        let inside = |axis: usize| Interval::centered(self.center[axis], half).contains(p[axis]);
        if !inside(u_axis) || !inside(v_axis) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, self.outward_normal());
        rec.u = p[u_axis];
        rec.v = p[v_axis];

        true
    }
}

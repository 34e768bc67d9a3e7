//! Axis-aligned cube built from six face tests.

use crate::hittable::{Geometry, HitRecord};
use glint_math::{DVec3, Interval, Ray};

/// Slack on the face bounds so rays along an edge don't slip between faces.
const EDGE_TOLERANCE: f64 = 1e-6;

/// Faces as (axis, side) pairs.
const FACES: [(usize, f64); 6] = [
    (0, -1.0),
    (0, 1.0),
    (1, -1.0),
    (1, 1.0),
    (2, -1.0),
    (2, 1.0),
];

/// An axis-aligned cube.
#[derive(Debug, Clone)]
pub struct Cube {
    center: DVec3,
    edge: f64,
}

impl Cube {
    /// Create a new cube.
    pub fn new(center: DVec3, edge: f64) -> Self {
        Self { center, edge }
    }

    /// Distance and point where the ray crosses one face, if it lands on it.
    fn intersect_side(&self, ray: &Ray, axis: usize, side: f64) -> Option<(f64, DVec3)> {
        let half = self.edge / 2.0;
        let level = self.center[axis] + side * half;
        let start = ray.origin()[axis];
        let direction = ray.direction()[axis];

        if (start > level && direction >= 0.0) || (start < level && direction <= 0.0) {
            return None;
        }

        let t = (level - start) / direction;
        if !t.is_finite() {
            return None;
        }

        let p = ray.at(t);
        let on_face = (0..3).all(|i| {
            Interval::centered(self.center[i], half + EDGE_TOLERANCE).contains(p[i])
        });

        on_face.then_some((t, p))
    }
}

impl Geometry for Cube {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        if !(self.edge > 0.0) {
            return false;
        }

        let mut closest: Option<(f64, DVec3, usize, f64)> = None;
        for (axis, side) in FACES {
            let Some((t, p)) = self.intersect_side(ray, axis, side) else {
                continue;
            };
            if !ray_t.contains(t) {
                continue;
            }
            if closest.map_or(true, |(best, ..)| t < best) {
                closest = Some((t, p, axis, side));
            }
        }

        let Some((t, p, axis, side)) = closest else {
            return false;
        };

        let mut outward_normal = DVec3::ZERO;
        outward_normal[axis] = side;

        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, outward_normal);
        if axis == 1 {
            rec.u = p.x;
            rec.v = p.z;
        } else {
            rec.u = p.x + p.z;
            rec.v = p.y;
        }

        true
    }
}

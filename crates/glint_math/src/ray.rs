use crate::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// Every producer in glint (camera, shadow tests) hands out a normalized
/// direction, so `t` in [`Ray::at`] is a distance along the ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from `from` pointing at `to`, normalizing the direction.
    ///
    /// Returns the ray and the distance between the two points, or `None`
    /// when the points coincide.
    pub fn between(from: DVec3, to: DVec3) -> Option<(Self, f64)> {
        let offset = to - from;
        let distance = offset.length();
        if distance == 0.0 || !distance.is_finite() {
            return None;
        }
        Some((Self::new(from, offset / distance), distance))
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

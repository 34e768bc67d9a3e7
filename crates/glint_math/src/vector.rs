use glam::DVec3;

/// Shading helpers on top of glam's vector type.
pub trait VectorExt {
    /// Mirror reflection of `self` about `normal`, normalized.
    ///
    /// `self` must be non-zero and `normal` must be unit length.
    fn mirror(self, normal: DVec3) -> DVec3;

    /// Return `normal` oriented against `self` (the incoming direction).
    fn face_forward(self, normal: DVec3) -> DVec3;
}

impl VectorExt for DVec3 {
    fn mirror(self, normal: DVec3) -> DVec3 {
        let incoming = self.normalize();
        (incoming - 2.0 * incoming.dot(normal) * normal).normalize()
    }

    fn face_forward(self, normal: DVec3) -> DVec3 {
        if self.dot(normal) < 0.0 {
            normal
        } else {
            -normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror() {
        let reflected = DVec3::new(1.0, -1.0, 0.0).mirror(DVec3::Y);
        let expected = DVec3::new(1.0, 1.0, 0.0).normalize();
        assert!((reflected - expected).length() < 1e-12);
    }

    #[test]
    fn test_mirror_head_on() {
        let reflected = DVec3::new(0.0, 0.0, -4.0).mirror(DVec3::Z);
        assert!((reflected - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_face_forward() {
        let incoming = DVec3::new(0.0, -1.0, 0.0);

        assert_eq!(incoming.face_forward(DVec3::Y), DVec3::Y);
        assert_eq!(incoming.face_forward(-DVec3::Y), DVec3::Y);
    }

    #[test]
    fn test_face_forward_grazing_flips() {
        // Perpendicular incidence is not "against" the normal
        assert_eq!(DVec3::X.face_forward(DVec3::Y), -DVec3::Y);
    }
}

// Re-export the f64 glam types used across glint
pub use glam::{dvec3, DMat3, DVec3};

// glint math types
mod color;
mod interval;
mod ray;
mod transform;
mod vector;

pub use color::{Color, ColorExt};
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat3Ext;
pub use vector::VectorExt;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, DVec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, DVec3::new(3.0, 3.0, 3.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(DVec3::X.cross(DVec3::Y), DVec3::Z);
    }

    #[test]
    fn test_vec3_in_place() {
        let mut v = DVec3::new(3.0, 0.0, 4.0);
        v += DVec3::new(0.0, 1.0, 0.0);
        v *= 2.0;
        assert_eq!(v, DVec3::new(6.0, 2.0, 8.0));

        let n = DVec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!((-n - DVec3::new(-0.6, 0.0, -0.8)).length() < 1e-12);
    }
}

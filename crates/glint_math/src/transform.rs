// Rotation utilities for DMat3
//
// glam matrices are column-major and multiply column vectors. The camera
// composes rotations with row vectors (v' = v * M), so the helpers here
// keep that convention in one place.

use glam::{DMat3, DVec3};

/// Extension trait for DMat3 used to orient the camera screen.
pub trait Mat3Ext {
    /// Build a matrix from row-major rows.
    fn from_rows(rows: [[f64; 3]; 3]) -> Self;

    /// Compose `Rx(roll) * Ry(pitch) * Rz(yaw)` (radians, fixed world axes).
    fn rotation_xyz(roll: f64, pitch: f64, yaw: f64) -> Self;

    /// Multiply a row vector by this matrix: `v * M`.
    fn transform_row(&self, vector: DVec3) -> DVec3;
}

impl Mat3Ext for DMat3 {
    fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        DMat3::from_cols_array_2d(&rows).transpose()
    }

    fn rotation_xyz(roll: f64, pitch: f64, yaw: f64) -> Self {
        DMat3::from_rotation_x(roll) * DMat3::from_rotation_y(pitch) * DMat3::from_rotation_z(yaw)
    }

    fn transform_row(&self, vector: DVec3) -> DVec3 {
        // v * M == M^T * v
        self.transpose() * vector
    }
}

//! Floating-point rigid transforms for the render boundary.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

use crate::orientation::Orientation;
use crate::vector::{vec3_to_f64, Vec3};

/// A 4x4 affine transform in `f64`, handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Rotation followed by translation.
    pub fn from_rotation_translation(rotation: &Matrix3<f64>, translation: &Vector3<f64>) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
        m[(0, 3)] = translation.x;
        m[(1, 3)] = translation.y;
        m[(2, 3)] = translation.z;
        Self { matrix: m }
    }

    /// Local-to-world transform of an exact frame placed at `origin`.
    pub fn from_frame(orientation: &Orientation, origin: &Vec3) -> Self {
        Self::from_rotation_translation(&orientation.to_f64(), &vec3_to_f64(origin))
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Vector3::new(v.x, v.y, v.z)
    }
}

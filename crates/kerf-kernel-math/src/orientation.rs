//! Exact rotation frames.

use serde::{Deserialize, Serialize};

use crate::scalar::{integer, to_f64, Precision, Scalar};
use crate::tolerance::Tolerance;
use crate::vector::{norm_squared, normalize_with, scale, Mat3, Vec3};
use crate::MathError;

/// A 3D rotation stored as an exact 3x3 matrix.
///
/// Columns are the (width, height, length) directions of a timber in world
/// space, so the matrix maps timber-local coordinates to world coordinates.
/// Height is always `length x width`, which makes the frame right-handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    matrix: Mat3,
}

impl Orientation {
    /// The identity rotation.
    pub fn identity() -> Self {
        Self {
            matrix: Mat3::identity(),
        }
    }

    /// Build a frame from a length hint and a width hint.
    ///
    /// The length hint is normalized. The width hint is re-projected onto the
    /// plane perpendicular to the length (Gram-Schmidt) and normalized. Fails
    /// with [`MathError::AmbiguousOrientation`] if either hint is zero or the
    /// two are parallel.
    pub fn from_directions(length: &Vec3, width: &Vec3) -> Result<Self, MathError> {
        Self::from_directions_with(length, width, &Tolerance::default(), Precision::DEFAULT)
    }

    /// [`Orientation::from_directions`] with an explicit tolerance, and the
    /// precision irrational axis lengths are truncated to.
    pub fn from_directions_with(
        length: &Vec3,
        width: &Vec3,
        tol: &Tolerance,
        precision: Precision,
    ) -> Result<Self, MathError> {
        let ll = norm_squared(length);
        if ll == integer(0) || norm_squared(width) == integer(0) {
            return Err(MathError::AmbiguousOrientation);
        }
        if tol.are_parallel(length, width) {
            return Err(MathError::AmbiguousOrientation);
        }

        let along = width.dot(length) / &ll;
        let projected = width - scale(length, &along);

        let l = normalize_with(length, precision)?;
        let w = normalize_with(&projected, precision).map_err(|_| MathError::AmbiguousOrientation)?;
        let h = l.cross(&w);
        Ok(Self {
            matrix: Mat3::from_columns(&[w, h, l]),
        })
    }

    /// Wrap a matrix that is already a rotation.
    fn from_rows(rows: [[i64; 3]; 3]) -> Self {
        Self {
            matrix: Mat3::from_fn(|r, c| integer(rows[r][c])),
        }
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    /// World direction of the local +X (width) axis.
    pub fn width_direction(&self) -> Vec3 {
        self.matrix.column(0).into_owned()
    }

    /// World direction of the local +Y (height) axis.
    pub fn height_direction(&self) -> Vec3 {
        self.matrix.column(1).into_owned()
    }

    /// World direction of the local +Z (length) axis.
    pub fn length_direction(&self) -> Vec3 {
        self.matrix.column(2).into_owned()
    }

    /// Compose rotations: `self * other` applies `other` first.
    pub fn multiply(&self, other: &Orientation) -> Orientation {
        Orientation {
            matrix: &self.matrix * &other.matrix,
        }
    }

    /// Inverse rotation (the transpose).
    pub fn invert(&self) -> Orientation {
        Orientation {
            matrix: self.matrix.transpose(),
        }
    }

    /// Rotate a local vector into world space.
    pub fn apply(&self, v: &Vec3) -> Vec3 {
        &self.matrix * v
    }

    /// Rotate a world vector into local space.
    pub fn apply_inverse(&self, v: &Vec3) -> Vec3 {
        self.matrix.transpose() * v
    }

    /// Check that the columns are unit length, mutually perpendicular and
    /// right-handed within `tol`.
    pub fn is_orthonormal(&self, tol: &Tolerance) -> bool {
        let w = self.width_direction();
        let h = self.height_direction();
        let l = self.length_direction();
        let one = integer(1);
        let unit = |v: &Vec3| tol.scalars_equal(&norm_squared(v), &one);
        unit(&w)
            && unit(&h)
            && unit(&l)
            && tol.is_zero(&w.dot(&h))
            && tol.is_zero(&h.dot(&l))
            && tol.is_zero(&l.dot(&w))
            && tol.points_equal(&l.cross(&w), &h)
    }

    /// Float copy for renderers.
    pub fn to_f64(&self) -> nalgebra::Matrix3<f64> {
        self.matrix.map(|c: Scalar| to_f64(&c))
    }

    // =========================================================================
    // Named orientations (rotations of the identity frame)
    // =========================================================================

    /// Facing east (+X); the identity.
    pub fn east() -> Self {
        Self::identity()
    }

    /// Facing west (-X): half turn about Z.
    pub fn west() -> Self {
        Self::from_rows([[-1, 0, 0], [0, -1, 0], [0, 0, 1]])
    }

    /// Facing north (+Y): quarter turn counter-clockwise about Z.
    pub fn north() -> Self {
        Self::from_rows([[0, -1, 0], [1, 0, 0], [0, 0, 1]])
    }

    /// Facing south (-Y): quarter turn clockwise about Z.
    pub fn south() -> Self {
        Self::from_rows([[0, 1, 0], [-1, 0, 0], [0, 0, 1]])
    }

    /// Facing up (+Z): quarter turn about Y.
    pub fn up() -> Self {
        Self::from_rows([[0, 0, 1], [0, 1, 0], [-1, 0, 0]])
    }

    /// Facing down (-Z).
    pub fn down() -> Self {
        Self::from_rows([[0, 0, -1], [0, 1, 0], [1, 0, 0]])
    }

    /// +X rotates to +Y.
    pub fn rotate_left() -> Self {
        Self::north()
    }

    /// +X rotates to -Y.
    pub fn rotate_right() -> Self {
        Self::south()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::rational;
    use crate::vector::{east, north, up, vec3, vec3i};

    #[test]
    fn test_vertical_frame() {
        let o = Orientation::from_directions(&up(), &east()).unwrap();
        assert_eq!(o.length_direction(), up());
        assert_eq!(o.width_direction(), east());
        assert_eq!(o.height_direction(), north());
        assert!(o.is_orthonormal(&Tolerance::default()));
    }

    #[test]
    fn test_width_hint_is_reprojected() {
        // width hint leans along the length; only the perpendicular part survives
        let o = Orientation::from_directions(&up(), &vec3i(2, 0, 5)).unwrap();
        assert_eq!(o.width_direction(), east());
        assert_eq!(o.length_direction(), up());
    }

    #[test]
    fn test_parallel_hints_are_ambiguous() {
        assert_eq!(
            Orientation::from_directions(&up(), &vec3i(0, 0, -4)),
            Err(MathError::AmbiguousOrientation)
        );
        assert_eq!(
            Orientation::from_directions(&vec3i(0, 0, 0), &east()),
            Err(MathError::AmbiguousOrientation)
        );
    }

    #[test]
    fn test_irrational_frame_is_nearly_orthonormal() {
        let o = Orientation::from_directions(&vec3i(1, 1, 1), &vec3i(1, -1, 0)).unwrap();
        assert!(o.is_orthonormal(&Tolerance::default()));
    }

    #[test]
    fn test_frame_precision_bounds_denominators() {
        let tol = Tolerance::default();
        let coarse = Orientation::from_directions_with(
            &vec3i(1, 0, 1),
            &north(),
            &tol,
            Precision { sqrt_digits: 6 },
        )
        .unwrap();
        assert_eq!(coarse.length_direction().x, rational(707_106, 1_000_000));
        let fine = Orientation::from_directions(&vec3i(1, 0, 1), &north()).unwrap();
        assert_ne!(coarse, fine);
        assert_eq!(coarse.width_direction(), north());
    }

    #[test]
    fn test_exact_pythagorean_frame() {
        let o = Orientation::from_directions(&vec3i(3, 4, 0), &up()).unwrap();
        assert_eq!(
            o.length_direction(),
            vec3(rational(3, 5), rational(4, 5), integer(0))
        );
        let tol = Tolerance {
            linear: integer(0),
            parallel: integer(0),
        };
        // exact equality, not just within tolerance
        assert_eq!(norm_squared(&o.height_direction()), integer(1));
        assert!(tol.are_perpendicular(&o.height_direction(), &o.width_direction()));
    }

    #[test]
    fn test_invert_is_transpose() {
        let o = Orientation::from_directions(&east(), &north()).unwrap();
        assert_eq!(o.multiply(&o.invert()), Orientation::identity());
        let v = vec3i(1, 2, 3);
        assert_eq!(o.apply_inverse(&o.apply(&v)), v);
    }

    #[test]
    fn test_named_orientations() {
        assert_eq!(Orientation::north().apply(&east()), north());
        assert_eq!(Orientation::rotate_right().apply(&east()), vec3i(0, -1, 0));
        assert_eq!(Orientation::up().apply(&east()), vec3i(0, 0, -1));
        for o in [
            Orientation::east(),
            Orientation::west(),
            Orientation::north(),
            Orientation::south(),
            Orientation::up(),
            Orientation::down(),
        ] {
            assert!(o.is_orthonormal(&Tolerance::default()));
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let o = Orientation::from_directions(&east(), &up()).unwrap();
        let json = serde_json::to_string(&o).unwrap();
        let back: Orientation = serde_json::from_str(&json).unwrap();
        assert_eq!(o, back);
    }

    #[test]
    fn test_to_f64() {
        let o = Orientation::from_directions(&east(), &up()).unwrap();
        let m = o.to_f64();
        approx::assert_relative_eq!(m.column(2).into_owned(), nalgebra::Vector3::new(1.0, 0.0, 0.0));
    }
}

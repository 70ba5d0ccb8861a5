//! Exact tolerance comparisons.

use num_traits::Signed;

use crate::scalar::{rational, Scalar};
use crate::vector::{norm_squared, Vec3};

/// Tolerances for geometric comparisons.
///
/// Inputs built from perfect-square lengths compare exactly; inputs that went
/// through an approximated square root carry an error far below `linear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tolerance {
    /// Absolute distance tolerance in meters.
    pub linear: Scalar,
    /// Relative tolerance for parallel/perpendicular direction checks.
    pub parallel: Scalar,
}

impl Tolerance {
    /// Kernel defaults: 1e-8 m linear, 1e-4 relative for direction checks.
    pub fn standard() -> Self {
        Self {
            linear: rational(1, 100_000_000),
            parallel: rational(1, 10_000),
        }
    }

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, value: &Scalar) -> bool {
        value.abs() < self.linear
    }

    /// Check if two scalars are effectively equal.
    pub fn scalars_equal(&self, a: &Scalar, b: &Scalar) -> bool {
        self.is_zero(&(a - b))
    }

    /// Check if two points are coincident.
    pub fn points_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        norm_squared(&(a - b)) < &self.linear * &self.linear
    }

    /// Check if two directions are parallel or anti-parallel.
    ///
    /// Compares `|a x b|^2` against `eps^2 |a|^2 |b|^2` so no square root is
    /// taken. A zero vector counts as parallel to everything.
    pub fn are_parallel(&self, a: &Vec3, b: &Vec3) -> bool {
        let cross = a.cross(b);
        let bound = &self.parallel * &self.parallel * norm_squared(a) * norm_squared(b);
        norm_squared(&cross) <= bound
    }

    /// Check if two directions are perpendicular.
    pub fn are_perpendicular(&self, a: &Vec3, b: &Vec3) -> bool {
        let d = a.dot(b);
        let bound = &self.parallel * &self.parallel * norm_squared(a) * norm_squared(b);
        &d * &d <= bound
    }

    /// Check if two directions point the same way (parallel, positive dot).
    pub fn same_direction(&self, a: &Vec3, b: &Vec3) -> bool {
        self.are_parallel(a, b) && a.dot(b).is_positive()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::integer;
    use crate::vector::{east, normalize, north, up, vec3i};

    #[test]
    fn test_parallel_detects_antiparallel() {
        let tol = Tolerance::default();
        assert!(tol.are_parallel(&east(), &vec3i(-3, 0, 0)));
        assert!(!tol.are_parallel(&east(), &north()));
    }

    #[test]
    fn test_perpendicular() {
        let tol = Tolerance::default();
        assert!(tol.are_perpendicular(&east(), &up()));
        assert!(!tol.are_perpendicular(&east(), &vec3i(1, 1, 0)));
    }

    #[test]
    fn test_approximate_unit_vectors_compare_parallel() {
        let tol = Tolerance::default();
        let diag = normalize(&vec3i(1, 1, 0)).unwrap();
        assert!(tol.are_parallel(&diag, &vec3i(2, 2, 0)));
        assert!(tol.same_direction(&diag, &vec3i(2, 2, 0)));
        assert!(!tol.same_direction(&diag, &vec3i(-2, -2, 0)));
    }

    #[test]
    fn test_points_equal() {
        let tol = Tolerance::default();
        let a = vec3i(1, 2, 3);
        let b = &a + Vec3::new(rational(1, 1_000_000_000), integer(0), integer(0));
        assert!(tol.points_equal(&a, &b));
        assert!(!tol.points_equal(&a, &vec3i(1, 2, 4)));
    }
}

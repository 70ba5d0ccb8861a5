//! Exact vectors over [`Scalar`] and named world directions.

use nalgebra::{Matrix3, Vector2, Vector3};
use num_traits::Zero;

use crate::scalar::{integer, sqrt_exact, sqrt_with, truncate, Precision, Scalar};
use crate::MathError;

/// A point or vector in the ground plane.
pub type Vec2 = Vector2<Scalar>;

/// A point or vector in 3D space.
pub type Vec3 = Vector3<Scalar>;

/// A 3x3 matrix of exact scalars.
pub type Mat3 = Matrix3<Scalar>;

/// Build a 2D vector.
pub fn vec2(x: Scalar, y: Scalar) -> Vec2 {
    Vec2::new(x, y)
}

/// Build a 3D vector.
pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Build a 3D vector from integer components.
pub fn vec3i(x: i64, y: i64, z: i64) -> Vec3 {
    Vec3::new(integer(x), integer(y), integer(z))
}

/// Lift a ground-plane point to 3D at `z`.
pub fn lift(v: &Vec2, z: Scalar) -> Vec3 {
    Vec3::new(v.x.clone(), v.y.clone(), z)
}

/// Drop the Z component.
pub fn flatten(v: &Vec3) -> Vec2 {
    Vec2::new(v.x.clone(), v.y.clone())
}

/// Multiply every component of `v` by `s`.
pub fn scale(v: &Vec3, s: &Scalar) -> Vec3 {
    v.map(|c| c * s)
}

/// Multiply every component of a 2D vector by `s`.
pub fn scale2(v: &Vec2, s: &Scalar) -> Vec2 {
    v.map(|c| c * s)
}

/// Squared Euclidean length (exact).
pub fn norm_squared(v: &Vec3) -> Scalar {
    v.dot(v)
}

/// Squared Euclidean length of a 2D vector (exact).
pub fn norm_squared2(v: &Vec2) -> Scalar {
    v.dot(v)
}

/// Euclidean length; exact when the squared length is a rational square.
pub fn norm(v: &Vec3) -> Scalar {
    norm_with(v, Precision::DEFAULT)
}

/// [`norm`] truncated to `precision` when the length is irrational.
pub fn norm_with(v: &Vec3, precision: Precision) -> Scalar {
    sqrt_with(&norm_squared(v), precision).unwrap_or_else(Scalar::zero)
}

/// Euclidean length of a 2D vector.
pub fn norm2(v: &Vec2) -> Scalar {
    sqrt_with(&norm_squared2(v), Precision::DEFAULT).unwrap_or_else(Scalar::zero)
}

/// Unit vector in the direction of `v`.
///
/// Exact when `|v|` is rational. Otherwise each component is truncated to
/// [`Precision::DEFAULT`] digits so denominators stay bounded across chained
/// operations.
pub fn normalize(v: &Vec3) -> Result<Vec3, MathError> {
    normalize_with(v, Precision::DEFAULT)
}

/// [`normalize`] with an explicit precision for irrational lengths.
pub fn normalize_with(v: &Vec3, precision: Precision) -> Result<Vec3, MathError> {
    let n2 = norm_squared(v);
    if n2.is_zero() {
        return Err(MathError::ZeroVector);
    }
    match sqrt_exact(&n2) {
        Some(n) => Ok(v.map(|c| c / &n)),
        None => {
            let n = sqrt_with(&n2, precision).ok_or(MathError::ZeroVector)?;
            Ok(v.map(|c| truncate(&(c / &n), precision.sqrt_digits)))
        }
    }
}

/// Unit vector in the direction of a 2D vector.
pub fn normalize2(v: &Vec2) -> Result<Vec2, MathError> {
    let n = normalize(&lift(v, Scalar::zero()))?;
    Ok(flatten(&n))
}

/// Counter-clockwise perpendicular `(-y, x)` of a 2D vector.
pub fn perp_left(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y.clone(), v.x.clone())
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross2(a: &Vec2, b: &Vec2) -> Scalar {
    &a.x * &b.y - &a.y * &b.x
}

// =============================================================================
// Named world directions (RHS, Z up, Y north, X east)
// =============================================================================

/// +Z.
pub fn up() -> Vec3 {
    vec3i(0, 0, 1)
}

/// -Z.
pub fn down() -> Vec3 {
    vec3i(0, 0, -1)
}

/// +X.
pub fn east() -> Vec3 {
    vec3i(1, 0, 0)
}

/// -X.
pub fn west() -> Vec3 {
    vec3i(-1, 0, 0)
}

/// +Y.
pub fn north() -> Vec3 {
    vec3i(0, 1, 0)
}

/// -Y.
pub fn south() -> Vec3 {
    vec3i(0, -1, 0)
}

/// Convert to an `f64` vector for renderers.
pub fn vec3_to_f64(v: &Vec3) -> nalgebra::Vector3<f64> {
    v.map(|c| crate::scalar::to_f64(&c))
}

/// Convert a 2D vector to `f64` for renderers.
pub fn vec2_to_f64(v: &Vec2) -> nalgebra::Vector2<f64> {
    v.map(|c| crate::scalar::to_f64(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::rational;
    use num_traits::Signed;

    #[test]
    fn test_cross_and_dot_are_exact() {
        let x = east();
        let y = north();
        assert_eq!(x.cross(&y), up());
        assert_eq!(y.cross(&x), down());
        assert!(x.dot(&y).is_zero());
    }

    #[test]
    fn test_normalize_pythagorean_is_exact() {
        let v = vec3i(3, 4, 0);
        let n = normalize(&v).unwrap();
        assert_eq!(n, vec3(rational(3, 5), rational(4, 5), integer(0)));
        assert_eq!(norm_squared(&n), integer(1));
    }

    #[test]
    fn test_normalize_irrational_is_nearly_unit() {
        let n = normalize(&vec3i(1, 1, 0)).unwrap();
        let err = (norm_squared(&n) - integer(1)).abs();
        assert!(err < rational(1, 1_000_000_000_000_000_000));
    }

    #[test]
    fn test_normalize_zero_fails() {
        assert_eq!(normalize(&vec3i(0, 0, 0)), Err(MathError::ZeroVector));
    }

    #[test]
    fn test_normalize_with_precision_truncates_components() {
        let coarse = normalize_with(&vec3i(1, 1, 0), Precision { sqrt_digits: 4 }).unwrap();
        assert_eq!(coarse.x, rational(7071, 10_000));
        assert_eq!(norm_with(&vec3i(1, 0, 1), Precision { sqrt_digits: 3 }), rational(1414, 1000));
        // rational lengths stay exact
        assert_eq!(
            normalize_with(&vec3i(3, 4, 0), Precision { sqrt_digits: 1 }).unwrap(),
            vec3(rational(3, 5), rational(4, 5), integer(0))
        );
    }

    #[test]
    fn test_perp_left_is_ccw() {
        let v = Vec2::new(integer(1), integer(0));
        assert_eq!(perp_left(&v), Vec2::new(integer(0), integer(1)));
        assert_eq!(cross2(&v, &perp_left(&v)), integer(1));
    }

    #[test]
    fn test_vec3_to_f64() {
        let v = vec3(rational(1, 2), rational(-1, 4), integer(3));
        let f = vec3_to_f64(&v);
        approx::assert_relative_eq!(f, nalgebra::Vector3::new(0.5, -0.25, 3.0));
    }
}

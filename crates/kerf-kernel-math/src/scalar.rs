//! Exact scalar helpers.
//!
//! Every length, coordinate and direction component in the kernel is a
//! [`Scalar`]: an arbitrary-precision rational. Square roots are exact when
//! the radicand is a perfect rational square and otherwise rounded to
//! [`Precision::DEFAULT`] decimal digits.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Exact rational scalar used for all kernel geometry.
pub type Scalar = BigRational;

/// Decimal precision used when a square root has no exact rational value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    /// Number of decimal digits kept after the point.
    pub sqrt_digits: u32,
}

impl Precision {
    /// 40 decimal digits: far below any joinery tolerance.
    pub const DEFAULT: Self = Self { sqrt_digits: 40 };
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integer scalar.
pub fn integer(n: i64) -> Scalar {
    BigRational::from_integer(BigInt::from(n))
}

/// Rational scalar `numer / denom`.
///
/// # Panics
///
/// Panics if `denom` is zero.
pub fn rational(numer: i64, denom: i64) -> Scalar {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Convert a float to a scalar, rounded to the nearest nanometer.
///
/// Returns `None` for NaN, infinities and magnitudes beyond what a
/// nanometer count in an `i64` can hold.
pub fn from_f64(value: f64) -> Option<Scalar> {
    if !value.is_finite() {
        return None;
    }
    let nanos = (value * 1e9).round();
    if nanos.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(rational(nanos as i64, 1_000_000_000))
}

/// Convert a scalar to the nearest `f64`. Only used at the render boundary.
pub fn to_f64(value: &Scalar) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Absolute value.
pub fn abs(value: &Scalar) -> Scalar {
    value.abs()
}

/// Round `value` down to `digits` decimal places.
pub fn truncate(value: &Scalar, digits: u32) -> Scalar {
    let scale = BigInt::from(10u32).pow(digits);
    let scaled = (value * BigRational::from_integer(scale.clone())).floor();
    BigRational::new(scaled.to_integer(), scale)
}

/// Exact square root, if `value` is the square of a rational.
pub fn sqrt_exact(value: &Scalar) -> Option<Scalar> {
    if value.is_negative() {
        return None;
    }
    let numer = value.numer();
    let denom = value.denom();
    let n = numer.sqrt();
    let d = denom.sqrt();
    if &(&n * &n) == numer && &(&d * &d) == denom {
        Some(BigRational::new(n, d))
    } else {
        None
    }
}

/// Square root: exact when possible, otherwise truncated to
/// [`Precision::DEFAULT`] digits. Returns `None` for negative input.
pub fn sqrt(value: &Scalar) -> Option<Scalar> {
    sqrt_with(value, Precision::DEFAULT)
}

/// Square root with an explicit precision for the inexact case.
pub fn sqrt_with(value: &Scalar, precision: Precision) -> Option<Scalar> {
    if value.is_negative() {
        return None;
    }
    if let Some(root) = sqrt_exact(value) {
        return Some(root);
    }
    let scale = BigInt::from(10u32).pow(precision.sqrt_digits);
    let radicand = value.numer() * &scale * &scale / value.denom();
    Some(BigRational::new(radicand.sqrt(), scale))
}

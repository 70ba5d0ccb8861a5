#![warn(missing_docs)]

//! Math types for the kerf timber-frame kernel.
//!
//! Thin wrappers around nalgebra parameterized over an exact rational
//! scalar: vectors, rotation frames, tolerance checks, and a float
//! transform for the render boundary.
//!
//! # Example
//!
//! ```
//! use kerf_kernel_math::{east, up, Orientation};
//!
//! let o = Orientation::from_directions(&up(), &east()).unwrap();
//! assert_eq!(o.height_direction(), up().cross(&east()));
//! ```

pub mod orientation;
pub mod scalar;
pub mod tolerance;
pub mod transform;
pub mod vector;

pub use orientation::Orientation;
pub use scalar::{from_f64, integer, rational, sqrt, sqrt_with, to_f64, Precision, Scalar};
pub use tolerance::Tolerance;
pub use transform::Transform;
pub use vector::{
    cross2, down, east, flatten, lift, north, norm, norm2, norm_squared, norm_squared2, norm_with,
    normalize, normalize2, normalize_with, perp_left, scale, scale2, south, up, vec2, vec2_to_f64,
    vec3, vec3_to_f64, vec3i, west, Mat3, Vec2, Vec3,
};

/// Errors from exact vector and frame construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// Two direction hints are zero or parallel, so no unique frame exists.
    #[error("direction inputs are parallel or zero; no unique frame exists")]
    AmbiguousOrientation,

    /// Tried to normalize the zero vector.
    #[error("cannot normalize the zero vector")]
    ZeroVector,
}

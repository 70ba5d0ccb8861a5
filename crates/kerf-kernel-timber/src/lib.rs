#![warn(missing_docs)]

//! Timbers, reference features and placement for the kerf kernel.
//!
//! A [`Timber`] is an oriented rectangular prism. Its local frame has the
//! origin at the bottom-face centroid, +Z along the length, +X across the
//! width and +Y across the height. Timbers are immutable: placement,
//! extension and joining always return new values.
//!
//! # Example
//!
//! ```
//! use kerf_kernel_footprint::Footprint;
//! use kerf_kernel_math::{integer, rational, vec2};
//! use kerf_kernel_timber::{create_vertical_timber_on_footprint_corner, FootprintLocation};
//!
//! let square = Footprint::new(vec![
//!     vec2(integer(0), integer(0)),
//!     vec2(integer(4), integer(0)),
//!     vec2(integer(4), integer(4)),
//!     vec2(integer(0), integer(4)),
//! ]);
//! let post = create_vertical_timber_on_footprint_corner(
//!     &square,
//!     0,
//!     rational(5, 2),
//!     FootprintLocation::Inside,
//!     vec2(rational(1, 10), rational(1, 10)),
//! )
//! .unwrap();
//! assert_eq!(post.bottom_position().x, rational(1, 20));
//! ```

mod diagnostic;
pub mod join;
pub mod placement;
pub mod reference;
mod timber;

pub use diagnostic::{Diagnosed, Diagnostic};
pub use join::{
    join_perpendicular_on_face_parallel_timbers, join_timbers, FaceAlignedJoinedTimberOffset,
    JoinOffset, JoinTimbersParams, PerpendicularJoinParams, Stickout, StickoutReference,
};
pub use placement::{
    create_axis_aligned_timber, create_horizontal_timber_on_footprint_side, create_timber,
    create_vertical_timber_on_footprint_corner, create_vertical_timber_on_footprint_side,
    extend_timber, split_timber, FootprintLocation,
};
pub use reference::{
    DistanceFromEnd, DistanceFromFace, DistanceFromLongEdge, DistanceFromLongFace, ReferenceEnd,
    ReferenceLongEdge, ReferenceLongFace, TimberFace,
};
pub use timber::Timber;

use thiserror::Error;

use kerf_kernel_footprint::FootprintError;
use kerf_kernel_math::MathError;

/// Errors from timber construction and placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimberError {
    /// Two direction inputs do not define a frame.
    #[error("direction inputs are parallel or zero; no unique orientation")]
    AmbiguousOrientation,

    /// The footprint has too few corners or a self-intersecting boundary.
    #[error("invalid footprint: {0}")]
    InvalidFootprint(FootprintError),

    /// Corner placement needs perpendicular sides at the corner.
    #[error("footprint corner {0} is not orthogonal")]
    NonOrthogonalCorner(usize),

    /// The operation needs face-aligned (or face-parallel) timbers.
    #[error("timbers are not face-aligned")]
    NotFaceAligned,

    /// A length or cross-section dimension is not positive.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A parameter is outside the range the operation accepts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A footprint corner or side index past the end.
    #[error("index {index} out of range for footprint with {len} corners")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of corners.
        len: usize,
    },

    /// An exact vector operation failed for a reason other than orientation.
    #[error(transparent)]
    Math(MathError),
}

impl From<MathError> for TimberError {
    fn from(e: MathError) -> Self {
        match e {
            MathError::AmbiguousOrientation => TimberError::AmbiguousOrientation,
            other => TimberError::Math(other),
        }
    }
}

impl From<FootprintError> for TimberError {
    fn from(e: FootprintError) -> Self {
        match e {
            FootprintError::IndexOutOfRange { index, len } => {
                TimberError::IndexOutOfRange { index, len }
            }
            other => TimberError::InvalidFootprint(other),
        }
    }
}

/// Result type for timber operations.
pub type Result<T> = std::result::Result<T, TimberError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_errors_keep_their_kind() {
        assert_eq!(
            TimberError::from(MathError::AmbiguousOrientation),
            TimberError::AmbiguousOrientation
        );
        assert_eq!(
            TimberError::from(MathError::ZeroVector),
            TimberError::Math(MathError::ZeroVector)
        );
        assert_eq!(
            TimberError::from(MathError::ZeroVector).to_string(),
            "cannot normalize the zero vector"
        );
    }
}

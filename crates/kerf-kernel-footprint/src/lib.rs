#![warn(missing_docs)]

//! Footprints for the kerf timber-frame kernel.
//!
//! A [`Footprint`] is a simple polygon in the ground plane. Placement
//! constructors position posts and sills relative to its corners and sides;
//! inside and outside are decided by the winding of the corner sequence.
//!
//! # Example
//!
//! ```
//! use kerf_kernel_footprint::Footprint;
//! use kerf_kernel_math::{integer, vec2};
//!
//! let square = Footprint::new(vec![
//!     vec2(integer(0), integer(0)),
//!     vec2(integer(4), integer(0)),
//!     vec2(integer(4), integer(4)),
//!     vec2(integer(0), integer(4)),
//! ]);
//! assert!(square.is_valid());
//! assert!(square.contains_point(&vec2(integer(2), integer(2))));
//! assert!(square.corner_is_orthogonal(0).unwrap());
//! ```

mod footprint;
pub mod segment;

pub use footprint::{BoundaryDistance, Footprint};

use thiserror::Error;

/// Errors from footprint validation and indexing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FootprintError {
    /// Fewer than three corners.
    #[error("footprint needs at least 3 corners, got {0}")]
    TooFewCorners(usize),

    /// Two sides intersect, a side has zero length, or adjacent sides fold
    /// back over each other.
    #[error("footprint boundary is not simple: sides {first} and {second} intersect")]
    SelfIntersecting {
        /// First offending side.
        first: usize,
        /// Second offending side (equal to `first` for a zero-length side).
        second: usize,
    },

    /// A corner or side index past the end.
    #[error("index {index} out of range for footprint with {len} corners")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of corners.
        len: usize,
    },
}

/// Result type for footprint operations.
pub type Result<T> = std::result::Result<T, FootprintError>;

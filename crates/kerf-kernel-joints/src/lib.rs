#![warn(missing_docs)]

//! Joint construction for the kerf timber-frame kernel.
//!
//! Joints are built from [`Timber`](kerf_kernel_timber::Timber) values and
//! emit negative CSG nodes in each timber's local frame. A [`Joint`] lists
//! the operations it applies to every participating timber; a [`Frame`]
//! gathers the joints into one [`CutTimber`] per distinct timber.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use kerf_kernel_joints::{cut_simple_mortise_and_tenon_joint, Frame, MortiseAndTenonParams};
//! use kerf_kernel_math::{east, integer, north, rational, up, vec2, vec3i};
//! use kerf_kernel_timber::{create_timber, ReferenceEnd};
//!
//! let sill = create_timber(
//!     vec3i(0, 0, 0),
//!     integer(4),
//!     vec2(rational(1, 5), rational(1, 5)),
//!     &east(),
//!     &north(),
//! )
//! .unwrap();
//! // post standing on the sill, its bottom end at the sill centerline
//! let post = create_timber(
//!     vec3i(2, 0, 0),
//!     integer(2),
//!     vec2(rational(3, 20), rational(3, 20)),
//!     &up(),
//!     &north(),
//! )
//! .unwrap();
//!
//! let params = MortiseAndTenonParams::new(
//!     ReferenceEnd::Bottom,
//!     rational(1, 20),
//!     rational(1, 10),
//!     rational(1, 10),
//! );
//! let joint =
//!     cut_simple_mortise_and_tenon_joint(&Arc::new(sill), &Arc::new(post), &params).unwrap();
//! let frame = Frame::from_joints(&[joint]);
//! assert_eq!(frame.cut_timbers().len(), 2);
//! ```

mod accessory;
pub mod basic;
mod frame;
pub mod mortise;
pub mod mortise_and_tenon;
pub mod shavings;
pub mod shoulder;
pub mod tenon;

pub use accessory::{Accessory, Peg, PegShape, Wedge};
pub use basic::{
    check_splice_overlap, cut_basic_butt_joint_on_face_aligned_timbers,
    cut_basic_corner_joint_on_face_aligned_timbers, cut_basic_miter_joint,
    cut_basic_miter_joint_on_face_aligned_timbers, cut_basic_splice_joint_on_aligned_timbers,
};
pub use frame::{Cut, CutTimber, Frame, Joint, JointEntry, TimberOperation};
pub use mortise::StandardMortise;
pub use mortise_and_tenon::{
    cut_simple_mortise_and_tenon_joint, DrawborePeg, MortiseAndTenonParams, TenonWedges,
};
pub use shavings::{
    chop_lap_on_timber_end, chop_lap_on_timber_ends, chop_timber_end_with_half_plane,
    chop_timber_end_with_prism,
};
pub use shoulder::ShoulderPlane;
pub use tenon::{cut_multi_tenon, StandardTenon, TenonPosition};

use thiserror::Error;

use kerf_ir::{Aabb, CsgError};
use num_traits::Signed;

use kerf_kernel_math::{integer, vec3, MathError, Tolerance};
use kerf_kernel_timber::{Timber, TimberError};

/// Errors from joint construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JointError {
    /// The joint needs every axis of one timber parallel or perpendicular
    /// to every axis of the other.
    #[error("timbers are not face-aligned")]
    NotFaceAligned,

    /// The tenon (or the mortise pocket it needs) leaves the mortise timber.
    #[error("tenon is not contained in the mortise timber")]
    TenonNotContained,

    /// Tenons of a multi-tenon do not share one shoulder plane.
    #[error("tenons reference different shoulder planes")]
    ShoulderPlaneMismatch,

    /// The tenon end points at an end face of the mortise timber.
    #[error("mortise would be cut into an end face")]
    MortiseOnEndFace,

    /// The tenon end stops short of the mortise face.
    #[error("tenon end does not reach the mortise face")]
    TenonDoesNotReachMortise,

    /// Two ends cannot be spliced: they are not opposed and in line, or
    /// they leave a gap or overlap too far.
    #[error("splice misfit: {0}")]
    SpliceMisfit(String),

    /// A parameter is outside the range the operation accepts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure from a timber query or construction.
    #[error(transparent)]
    Timber(#[from] TimberError),

    /// Generated geometry failed CSG validation.
    #[error(transparent)]
    Csg(#[from] CsgError),
}

impl From<MathError> for JointError {
    fn from(e: MathError) -> Self {
        JointError::Timber(TimberError::from(e))
    }
}

/// Result type for joint operations.
pub type Result<T> = std::result::Result<T, JointError>;

/// A timber's box in its own local frame, padded by the linear tolerance.
pub(crate) fn local_bounds(timber: &Timber) -> Aabb {
    let hx = &timber.size().x / integer(2);
    let hy = &timber.size().y / integer(2);
    let mut bounds = Aabb::from_point(&vec3(-hx.clone(), -hy.clone(), integer(0)));
    bounds.include(&vec3(hx, hy, timber.length().clone()));
    bounds.pad(&Tolerance::default().linear)
}

/// Whether `b`'s cross-section overlaps `a`'s when looking down `a`'s
/// length axis.
pub(crate) fn cross_sections_overlap(a: &Timber, b: &Timber) -> bool {
    let offset = a.global_to_local(b.bottom_position());
    let reach_x = &a.size().x / integer(2) + b.cross_section_half_extent(&a.width_direction());
    let reach_y = &a.size().y / integer(2) + b.cross_section_half_extent(&a.height_direction());
    offset.x.abs() < reach_x && offset.y.abs() < reach_y
}

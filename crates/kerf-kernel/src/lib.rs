#![warn(missing_docs)]

//! Timber-frame geometry kernel facade for kerf.
//!
//! Re-exports the kernel crates, holds the [`KernelSettings`] that govern the
//! float boundary, and converts an assembled [`Frame`] into data a renderer
//! can draw.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use kerf_kernel::kerf_kernel_math::{east, north, rational, integer, up, vec2, vec3i};
//! use kerf_kernel::{
//!     create_timber, cut_simple_mortise_and_tenon_joint, render_frame, Frame, KernelSettings,
//!     MortiseAndTenonParams, ReferenceEnd,
//! };
//!
//! let sill = Arc::new(
//!     create_timber(vec3i(0, 0, 0), integer(4), vec2(rational(1, 5), rational(1, 5)), &east(), &north())
//!         .unwrap(),
//! );
//! let post = Arc::new(
//!     create_timber(vec3i(2, 0, 0), integer(3), vec2(rational(3, 20), rational(3, 20)), &up(), &north())
//!         .unwrap(),
//! );
//! let params = MortiseAndTenonParams::new(
//!     ReferenceEnd::Bottom,
//!     rational(1, 20),
//!     rational(1, 10),
//!     rational(1, 10),
//! );
//! let joint = cut_simple_mortise_and_tenon_joint(&sill, &post, &params).unwrap();
//! let frame = Frame::from_joints(&[joint]);
//!
//! let settings = KernelSettings::from_toml_str("extent_padding = 0.25").unwrap();
//! let rendered = render_frame(&frame, &settings).unwrap();
//! assert_eq!(rendered.timbers.len(), 2);
//! assert!(rendered.extent.is_some());
//! ```

pub use kerf_ir;
pub use kerf_kernel_footprint;
pub use kerf_kernel_joints;
pub use kerf_kernel_math;
pub use kerf_kernel_timber;

pub mod render;
pub mod settings;

pub use render::{render_frame, structure_extent_f64, RenderedFrame, RenderedTimber};
pub use settings::{KernelSettings, SettingsError};

pub use kerf_ir::{Aabb, CsgError, CsgNode};
pub use kerf_kernel_footprint::{Footprint, FootprintError};
pub use kerf_kernel_joints::{
    check_splice_overlap, chop_lap_on_timber_end, chop_lap_on_timber_ends,
    chop_timber_end_with_half_plane, chop_timber_end_with_prism,
    cut_basic_butt_joint_on_face_aligned_timbers, cut_basic_corner_joint_on_face_aligned_timbers,
    cut_basic_miter_joint, cut_basic_miter_joint_on_face_aligned_timbers,
    cut_basic_splice_joint_on_aligned_timbers, cut_multi_tenon, cut_simple_mortise_and_tenon_joint,
    Accessory, Cut, CutTimber, DrawborePeg, Frame, Joint, JointError, MortiseAndTenonParams, Peg,
    PegShape, ShoulderPlane, StandardMortise, StandardTenon, TenonPosition, TenonWedges, Wedge,
};
pub use kerf_kernel_math::{MathError, Orientation, Precision, Scalar, Tolerance, Transform};
pub use kerf_kernel_timber::{
    create_axis_aligned_timber, create_horizontal_timber_on_footprint_side, create_timber,
    create_vertical_timber_on_footprint_corner, create_vertical_timber_on_footprint_side,
    extend_timber, join_perpendicular_on_face_parallel_timbers, join_timbers, split_timber,
    Diagnosed, Diagnostic, FootprintLocation, JoinTimbersParams, PerpendicularJoinParams,
    ReferenceEnd, ReferenceLongEdge, ReferenceLongFace, Stickout, Timber, TimberError,
    TimberFace,
};

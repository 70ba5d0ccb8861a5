//! Connecting timbers between two existing timbers.

use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use kerf_kernel_math::{
    integer, norm_with, normalize_with, scale, Orientation, Precision, Scalar,
    Tolerance, Vec2, Vec3,
};

use crate::diagnostic::{Diagnosed, Diagnostic};
use crate::reference::TimberFace;
use crate::timber::Timber;
use crate::{Result, TimberError};

/// What a stickout distance is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StickoutReference {
    /// The joined timber's centerline.
    #[default]
    CenterLine,
    /// The joined timber's face toward the other joined timber.
    Inside,
    /// The joined timber's face away from the other joined timber.
    Outside,
}

/// How far a connecting timber runs past each connection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stickout {
    /// Past the first timber.
    pub first: Scalar,
    /// Past the second timber.
    pub second: Scalar,
    /// How `first` is measured.
    pub first_reference: StickoutReference,
    /// How `second` is measured.
    pub second_reference: StickoutReference,
}

impl Default for Stickout {
    fn default() -> Self {
        Self::new(Scalar::zero(), Scalar::zero())
    }
}

impl Stickout {
    /// Stickouts measured from the centerlines.
    pub fn new(first: Scalar, second: Scalar) -> Self {
        Self {
            first,
            second,
            first_reference: StickoutReference::CenterLine,
            second_reference: StickoutReference::CenterLine,
        }
    }

    /// The same stickout on both ends, from the given reference.
    pub fn symmetric(value: Scalar, reference: StickoutReference) -> Self {
        Self {
            first: value.clone(),
            second: value,
            first_reference: reference,
            second_reference: reference,
        }
    }

    /// No stickout.
    pub fn none() -> Self {
        Self::default()
    }

    /// Change both references.
    pub fn measured_from(mut self, first: StickoutReference, second: StickoutReference) -> Self {
        self.first_reference = first;
        self.second_reference = second;
        self
    }

    fn is_centerline(&self) -> bool {
        self.first_reference == StickoutReference::CenterLine
            && self.second_reference == StickoutReference::CenterLine
    }
}

/// Options for [`join_timbers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTimbersParams {
    /// Distance along A's centerline from its bottom end.
    pub location_on_a: Scalar,
    /// Distance along B's centerline from its bottom end. Defaults to the
    /// point of B's centerline at the height of A's point, or to the
    /// projection of A's point when B is horizontal.
    pub location_on_b: Option<Scalar>,
    /// Sideways shift along `normalize(A.length x join direction)`.
    pub lateral_offset: Scalar,
    /// Extension past each connection point; centerline references only.
    pub stickout: Stickout,
    /// Cross-section. Defaults to A's, swapped when the new width axis
    /// runs along A's height axis.
    pub size: Option<Vec2>,
    /// World direction projected perpendicular to the join to fix the new
    /// width axis. Defaults to A's length direction.
    pub orientation_width_hint: Option<Vec3>,
    /// Digits kept when the join direction has an irrational length.
    #[serde(default)]
    pub precision: Precision,
}

impl JoinTimbersParams {
    /// Defaults with the given location on A.
    pub fn at(location_on_a: Scalar) -> Self {
        Self {
            location_on_a,
            location_on_b: None,
            lateral_offset: Scalar::zero(),
            stickout: Stickout::none(),
            size: None,
            orientation_width_hint: None,
            precision: Precision::DEFAULT,
        }
    }

    /// Set the location on B.
    pub fn location_on_b(mut self, location: Scalar) -> Self {
        self.location_on_b = Some(location);
        self
    }

    /// Set the lateral offset.
    pub fn lateral_offset(mut self, offset: Scalar) -> Self {
        self.lateral_offset = offset;
        self
    }

    /// Set the stickout.
    pub fn stickout(mut self, stickout: Stickout) -> Self {
        self.stickout = stickout;
        self
    }

    /// Set the cross-section.
    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the width hint.
    pub fn orientation_width_hint(mut self, hint: Vec3) -> Self {
        self.orientation_width_hint = Some(hint);
        self
    }

    /// Set the square-root precision.
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

/// How far a perpendicular connecting timber sits from A, measured along
/// the normal of one of A's faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceAlignedJoinedTimberOffset {
    /// Face of A whose normal the offset is measured along.
    pub reference_face: TimberFace,
    /// Distance and what it is measured between.
    pub offset: JoinOffset,
}

impl FaceAlignedJoinedTimberOffset {
    /// Centerlines coincide.
    pub fn none() -> Self {
        Self {
            reference_face: TimberFace::Top,
            offset: JoinOffset::Centerline(Scalar::zero()),
        }
    }
}

/// A distance between a connecting timber and A.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinOffset {
    /// From A's centerline to the new timber's centerline.
    Centerline(Scalar),
    /// From A's reference face to the new timber's face on the same side.
    Face(Scalar),
}

/// Options for [`join_perpendicular_on_face_parallel_timbers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpendicularJoinParams {
    /// Distance along A's centerline from its bottom end.
    pub location_on_a: Scalar,
    /// Extension past each connection point.
    pub stickout: Stickout,
    /// Offset from A.
    pub offset: FaceAlignedJoinedTimberOffset,
    /// Cross-section; defaults as in [`JoinTimbersParams::size`].
    pub size: Option<Vec2>,
    /// Face of A whose outward direction becomes the new width axis.
    /// Defaults to [`TimberFace::Top`].
    pub orientation_face_on_a: Option<TimberFace>,
}

impl PerpendicularJoinParams {
    /// Defaults with the given location on A.
    pub fn at(location_on_a: Scalar) -> Self {
        Self {
            location_on_a,
            stickout: Stickout::none(),
            offset: FaceAlignedJoinedTimberOffset::none(),
            size: None,
            orientation_face_on_a: None,
        }
    }

    /// Set the stickout.
    pub fn stickout(mut self, stickout: Stickout) -> Self {
        self.stickout = stickout;
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: FaceAlignedJoinedTimberOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Set the cross-section.
    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the orientation face.
    pub fn orientation_face_on_a(mut self, face: TimberFace) -> Self {
        self.orientation_face_on_a = Some(face);
        self
    }
}

// =============================================================================
// Shared geometry
// =============================================================================

/// Unit join direction from `from` to `to`.
fn join_direction(from: &Vec3, to: &Vec3, precision: Precision) -> Result<Vec3> {
    normalize_with(&(to - from), precision).map_err(|_| {
        TimberError::InvalidParameter("connection points coincide".to_string())
    })
}

/// Frame of the connecting timber: length along `direction`, width from the
/// hint (or A's length), falling back to A's width direction.
fn connecting_frame(
    a: &Timber,
    direction: &Vec3,
    hint: Option<&Vec3>,
    precision: Precision,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Orientation> {
    let tol = Tolerance::default();
    let reference = match hint {
        Some(h) if !tol.are_parallel(h, direction) => h.clone(),
        Some(h) => {
            tracing::warn!(
                hint = ?h,
                "width hint is parallel to the join direction; using the first timber's width"
            );
            diagnostics.push(Diagnostic::OrientationFallbackApplied {
                requested: format!("width hint ({}, {}, {})", h.x, h.y, h.z),
                substituted: "first timber width direction".to_string(),
            });
            a.width_direction()
        }
        None => {
            let length = a.length_direction();
            if tol.are_parallel(&length, direction) {
                a.width_direction()
            } else {
                length
            }
        }
    };
    Ok(Orientation::from_directions_with(direction, &reference, &tol, precision)?)
}

/// A's cross-section mapped onto the new frame.
fn default_size(a: &Timber, orientation: &Orientation) -> Vec2 {
    if Tolerance::default().are_parallel(&orientation.width_direction(), &a.height_direction()) {
        a.swapped_size()
    } else {
        a.size().clone()
    }
}

/// `span` is the distance between the connection points.
fn connecting_timber(
    pos1: &Vec3,
    span: Scalar,
    direction: &Vec3,
    stickouts: (&Scalar, &Scalar),
    shift: &Vec3,
    size: Vec2,
    orientation: Orientation,
) -> Result<Timber> {
    let (first, second) = stickouts;
    let length = span + first + second;
    let bottom = pos1 - scale(direction, first) + shift;
    Timber::new(length, size, bottom, orientation)
}

// =============================================================================
// Joins
// =============================================================================

/// A new timber from a point on A's centerline to a point on B's.
///
/// The result carries an [`Diagnostic::OrientationFallbackApplied`] when
/// the width hint was parallel to the join and A's width direction was used
/// instead. Stickouts must be measured from the centerline.
pub fn join_timbers(a: &Timber, b: &Timber, params: &JoinTimbersParams) -> Result<Diagnosed<Timber>> {
    if !params.stickout.is_centerline() {
        return Err(TimberError::InvalidParameter(
            "join_timbers measures stickout from centerlines only".to_string(),
        ));
    }
    let tol = Tolerance::default();
    let pos1 = a.centerline_position_from_bottom(&params.location_on_a);
    let pos2 = match &params.location_on_b {
        Some(location) => b.centerline_position_from_bottom(location),
        None => {
            let l = b.length_direction();
            let t = if tol.is_zero(&l.z) {
                b.project_onto_centerline(&pos1)
            } else {
                (&pos1.z - &b.bottom_position().z) / &l.z
            };
            b.centerline_position_from_bottom(&t)
        }
    };
    let direction = join_direction(&pos1, &pos2, params.precision)?;

    let mut diagnostics = Vec::new();
    let orientation = connecting_frame(
        a,
        &direction,
        params.orientation_width_hint.as_ref(),
        params.precision,
        &mut diagnostics,
    )?;
    let size = match &params.size {
        Some(size) => size.clone(),
        None => default_size(a, &orientation),
    };

    let shift = if params.lateral_offset.is_zero() {
        Vec3::zeros()
    } else {
        let across = a.length_direction().cross(&direction);
        let side = normalize_with(&across, params.precision).map_err(|_| {
            TimberError::InvalidParameter(
                "lateral offset needs a join direction that is not along the first timber"
                    .to_string(),
            )
        })?;
        scale(&side, &params.lateral_offset)
    };

    let timber = connecting_timber(
        &pos1,
        norm_with(&(&pos2 - &pos1), params.precision),
        &direction,
        (&params.stickout.first, &params.stickout.second),
        &shift,
        size,
        orientation,
    )?;
    tracing::debug!(length = %timber.length(), "joined timbers");
    Ok(Diagnosed::with(timber, diagnostics))
}

/// A perpendicular timber between two timbers with parallel length axes.
///
/// B's connection point is A's point projected onto B's centerline, clamped
/// to B. Fails with [`TimberError::NotFaceAligned`] unless the length axes
/// are parallel. When the orientation face's normal runs along the join,
/// Top is used instead and a fallback diagnostic is returned.
pub fn join_perpendicular_on_face_parallel_timbers(
    a: &Timber,
    b: &Timber,
    params: &PerpendicularJoinParams,
) -> Result<Diagnosed<Timber>> {
    if !a.is_face_parallel_with(b) {
        return Err(TimberError::NotFaceAligned);
    }
    let tol = Tolerance::default();
    let pos1 = a.centerline_position_from_bottom(&params.location_on_a);
    let t = b.project_onto_centerline(&pos1);
    let t = if t < Scalar::zero() {
        Scalar::zero()
    } else if &t > b.length() {
        b.length().clone()
    } else {
        t
    };
    let pos2 = b.centerline_position_from_bottom(&t);
    let direction = join_direction(&pos1, &pos2, Precision::DEFAULT)?;

    let mut diagnostics = Vec::new();
    let face = params.orientation_face_on_a.unwrap_or(TimberFace::Top);
    let mut hint = a.face_direction(face);
    if tol.are_parallel(&hint, &direction) {
        tracing::warn!(?face, "orientation face is parallel to the join direction; using Top");
        diagnostics.push(Diagnostic::OrientationFallbackApplied {
            requested: format!("orientation face {face:?}"),
            substituted: "Top".to_string(),
        });
        hint = a.face_direction(TimberFace::Top);
    }
    let orientation = connecting_frame(a, &direction, Some(&hint), Precision::DEFAULT, &mut diagnostics)?;
    let size = match &params.size {
        Some(size) => size.clone(),
        None => default_size(a, &orientation),
    };

    let normal = a.face_direction(params.offset.reference_face);
    let distance = match &params.offset.offset {
        JoinOffset::Centerline(d) => d.clone(),
        JoinOffset::Face(d) => {
            let new_half = cross_section_half_extent(&orientation, &size, &normal);
            d + a.cross_section_half_extent(&normal) - new_half
        }
    };
    if !distance.is_zero() && !tol.are_perpendicular(&normal, &direction) {
        return Err(TimberError::InvalidParameter(format!(
            "offset face {:?} is not perpendicular to the join",
            params.offset.reference_face
        )));
    }
    let shift = scale(&normal, &distance);

    let face_half = stickout_face_half_size(a, &orientation, &size);
    let first = centerline_stickout(
        &params.stickout.first,
        params.stickout.first_reference,
        &face_half,
    );
    let second = centerline_stickout(
        &params.stickout.second,
        params.stickout.second_reference,
        &face_half,
    );

    let timber = connecting_timber(
        &pos1,
        norm_with(&(&pos2 - &pos1), Precision::DEFAULT),
        &direction,
        (&first, &second),
        &shift,
        size,
        orientation,
    )?;
    tracing::debug!(length = %timber.length(), "joined face-parallel timbers");
    Ok(Diagnosed::with(timber, diagnostics))
}

/// Half of the new member's cross-section dimension whose axis runs most
/// nearly perpendicular to A's length.
fn stickout_face_half_size(a: &Timber, orientation: &Orientation, size: &Vec2) -> Scalar {
    let along = a.length_direction();
    let w = orientation.width_direction().dot(&along).abs();
    let h = orientation.height_direction().dot(&along).abs();
    let dimension = if w < h { &size.x } else { &size.y };
    dimension / integer(2)
}

/// Stickout from the centerline: INSIDE adds half the face size, OUTSIDE
/// takes it away.
fn centerline_stickout(value: &Scalar, reference: StickoutReference, half_size: &Scalar) -> Scalar {
    match reference {
        StickoutReference::CenterLine => value.clone(),
        StickoutReference::Inside => value + half_size,
        StickoutReference::Outside => value - half_size,
    }
}

fn cross_section_half_extent(orientation: &Orientation, size: &Vec2, direction: &Vec3) -> Scalar {
    let w = orientation.width_direction().dot(direction).abs();
    let h = orientation.height_direction().dot(direction).abs();
    (w * &size.x + h * &size.y) / integer(2)
}

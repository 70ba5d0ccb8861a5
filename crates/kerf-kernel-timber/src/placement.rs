//! Timber constructors: free placement, footprint placement, extension and
//! splitting.
//!
//! Every constructor validates its inputs and returns a new [`Timber`] or an
//! error; no constructor mutates its arguments.

use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use kerf_kernel_footprint::Footprint;
use kerf_kernel_math::{integer, lift, scale2, up, Orientation, Scalar, Vec2, Vec3};

use crate::reference::{ReferenceEnd, TimberFace};
use crate::timber::Timber;
use crate::{Result, TimberError};

/// Where a placed timber sits relative to the footprint boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FootprintLocation {
    /// Body inside the footprint, a face on the boundary.
    Inside,
    /// Centered on the boundary.
    Center,
    /// Body outside the footprint, a face on the boundary.
    Outside,
}

// =============================================================================
// Free placement
// =============================================================================

/// Timber from explicit directions.
///
/// `width_direction` is re-projected perpendicular to `length_direction`.
/// Fails with [`TimberError::AmbiguousOrientation`] if the two are parallel
/// or either is zero.
pub fn create_timber(
    bottom_position: Vec3,
    length: Scalar,
    size: Vec2,
    length_direction: &Vec3,
    width_direction: &Vec3,
) -> Result<Timber> {
    let orientation = Orientation::from_directions(length_direction, width_direction)?;
    Timber::new(length, size, bottom_position, orientation)
}

/// Timber whose axes run along world axes named by [`TimberFace`] normals
/// (Top = +Z, Right = +X, Forward = +Y).
///
/// Without a width face the width runs Right, or Top when the length lies
/// on the X axis.
pub fn create_axis_aligned_timber(
    bottom_position: Vec3,
    length: Scalar,
    size: Vec2,
    length_face: TimberFace,
    width_face: Option<TimberFace>,
) -> Result<Timber> {
    let width_face = width_face.unwrap_or(match length_face {
        TimberFace::Right | TimberFace::Left => TimberFace::Top,
        _ => TimberFace::Right,
    });
    if length_face == TimberFace::Bottom {
        tracing::warn!("axis-aligned timber runs downward; Top is usually intended");
    }
    create_timber(
        bottom_position,
        length,
        size,
        &length_face.local_normal(),
        &width_face.local_normal(),
    )
}

// =============================================================================
// Footprint placement
// =============================================================================

fn half(value: &Scalar) -> Scalar {
    value / integer(2)
}

/// Vertical post standing on a footprint corner.
///
/// The width axis runs along the side leaving the corner. With
/// [`FootprintLocation::Inside`] one bottom vertex sits on the corner and the
/// body lies inside both adjacent sides; [`FootprintLocation::Outside`] puts
/// the diagonally opposite vertex on the corner instead. Both need an
/// orthogonal corner. [`FootprintLocation::Center`] centers the bottom face
/// on the corner.
pub fn create_vertical_timber_on_footprint_corner(
    footprint: &Footprint,
    corner: usize,
    length: Scalar,
    location: FootprintLocation,
    size: Vec2,
) -> Result<Timber> {
    footprint.validate()?;
    let point = footprint.corner(corner)?.clone();
    let incoming = (corner + footprint.len() - 1) % footprint.len();
    let outgoing_direction = footprint.side_direction(corner)?;

    let centroid = match location {
        FootprintLocation::Center => point,
        FootprintLocation::Inside | FootprintLocation::Outside => {
            if !footprint.corner_is_orthogonal(corner)? {
                return Err(TimberError::NonOrthogonalCorner(corner));
            }
            // n_in is parallel to the outgoing side (the width axis), n_out
            // to the height axis
            let n_in = footprint.inward_normal(incoming)?;
            let n_out = footprint.inward_normal(corner)?;
            let offset = scale2(&n_in, &half(&size.x)) + scale2(&n_out, &half(&size.y));
            if location == FootprintLocation::Inside {
                point + offset
            } else {
                point - offset
            }
        }
    };

    let timber = create_timber(
        lift(&centroid, Scalar::zero()),
        length,
        size,
        &up(),
        &lift(&outgoing_direction, Scalar::zero()),
    )?;
    tracing::debug!(corner, ?location, "placed corner post");
    Ok(timber)
}

/// Vertical post standing on a point `distance_along_side` from corner
/// `side` along that side.
///
/// The width axis runs along the side. Inside and outside placements put
/// one bottom edge on the side, centered on the point.
pub fn create_vertical_timber_on_footprint_side(
    footprint: &Footprint,
    side: usize,
    distance_along_side: Scalar,
    length: Scalar,
    location: FootprintLocation,
    size: Vec2,
) -> Result<Timber> {
    footprint.validate()?;
    let (start, _) = footprint.side(side)?;
    let side_length = footprint.side_length(side)?;
    if distance_along_side.is_negative() || distance_along_side > side_length {
        return Err(TimberError::InvalidParameter(format!(
            "distance {distance_along_side} is not on side {side}"
        )));
    }
    let direction = footprint.side_direction(side)?;
    let inward = footprint.inward_normal(side)?;

    let point = start + scale2(&direction, &distance_along_side);
    let across = scale2(&inward, &half(&size.y));
    let centroid = match location {
        FootprintLocation::Inside => point + across,
        FootprintLocation::Outside => point - across,
        FootprintLocation::Center => point,
    };

    let timber = create_timber(
        lift(&centroid, Scalar::zero()),
        length,
        size,
        &up(),
        &lift(&direction, Scalar::zero()),
    )?;
    tracing::debug!(side, ?location, "placed side post");
    Ok(timber)
}

/// Horizontal timber lying along side `side`, starting at its first corner.
///
/// The width axis is vertical, so `size.y` spans across the side. The
/// centerline sits at ground height. `length` defaults to the side length.
pub fn create_horizontal_timber_on_footprint_side(
    footprint: &Footprint,
    side: usize,
    location: FootprintLocation,
    size: Vec2,
    length: Option<Scalar>,
) -> Result<Timber> {
    footprint.validate()?;
    let (start, _) = footprint.side(side)?;
    let direction = footprint.side_direction(side)?;
    let inward = footprint.inward_normal(side)?;
    let length = match length {
        Some(l) => l,
        None => footprint.side_length(side)?,
    };

    let across = scale2(&inward, &half(&size.y));
    let bottom = match location {
        FootprintLocation::Inside => start + across,
        FootprintLocation::Outside => start - across,
        FootprintLocation::Center => start.clone(),
    };

    let timber = create_timber(
        lift(&bottom, Scalar::zero()),
        length,
        size,
        &lift(&direction, Scalar::zero()),
        &up(),
    )?;
    tracing::debug!(side, ?location, "placed horizontal timber");
    Ok(timber)
}

// =============================================================================
// Extension and splitting
// =============================================================================

/// A longer timber sharing `timber`'s frame and cross-section.
///
/// The reference end moves `extend_length` outward; the opposite end stays
/// put, so the result is `timber.length() + extend_length` long and covers
/// the whole original. `overlap_length` names how much of the original the
/// new piece shares with it and must lie within `[0, timber.length()]`.
pub fn extend_timber(
    timber: &Timber,
    end: ReferenceEnd,
    overlap_length: Scalar,
    extend_length: Scalar,
) -> Result<Timber> {
    if overlap_length.is_negative() || &overlap_length > timber.length() {
        return Err(TimberError::InvalidParameter(format!(
            "overlap {overlap_length} is outside a timber of length {}",
            timber.length()
        )));
    }
    if extend_length.is_negative() {
        return Err(TimberError::InvalidParameter(
            "extension must not be negative".to_string(),
        ));
    }
    let bottom = match end {
        ReferenceEnd::Top => timber.bottom_position().clone(),
        ReferenceEnd::Bottom => timber.centerline_position_from_bottom(&(-&extend_length)),
    };
    let length = timber.length() + &extend_length;
    let extended = Timber::new(length, timber.size().clone(), bottom, timber.orientation().clone())?;
    tracing::debug!(?end, %extend_length, "extended timber");
    Ok(match timber.name() {
        Some(name) => extended.with_name(format!("{name}_extended")),
        None => extended,
    })
}

/// Split `timber` at `distance_from_bottom` into a (bottom, top) pair.
///
/// Fails with [`TimberError::InvalidParameter`] unless the split point lies
/// strictly inside the timber. Named timbers produce `{name}_bottom` and
/// `{name}_top`.
pub fn split_timber(timber: &Timber, distance_from_bottom: &Scalar) -> Result<(Timber, Timber)> {
    if !distance_from_bottom.is_positive() || distance_from_bottom >= timber.length() {
        return Err(TimberError::InvalidParameter(format!(
            "split distance {distance_from_bottom} is not inside a timber of length {}",
            timber.length()
        )));
    }
    let size = timber.size().clone();
    let orientation = timber.orientation().clone();
    let bottom = Timber::new(
        distance_from_bottom.clone(),
        size.clone(),
        timber.bottom_position().clone(),
        orientation.clone(),
    )?;
    let top = Timber::new(
        timber.length() - distance_from_bottom,
        size,
        timber.centerline_position_from_bottom(distance_from_bottom),
        orientation,
    )?;
    Ok(match timber.name() {
        Some(name) => (
            bottom.with_name(format!("{name}_bottom")),
            top.with_name(format!("{name}_top")),
        ),
        None => (bottom, top),
    })
}

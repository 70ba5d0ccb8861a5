//! End chops: remove everything past a distance from one end, optionally
//! leaving a lap.

use num_traits::Signed;

use kerf_ir::{half_plane_cut, prism, union, CsgNode, Plane, PlaneSide};
use kerf_kernel_math::{integer, scale, vec2, vec3i, Orientation, Scalar};
use kerf_kernel_timber::{ReferenceEnd, Timber, TimberFace};

use crate::{cross_sections_overlap, Cut, JointError, Result};

fn check_distance(timber: &Timber, distance_from_end: &Scalar) -> Result<()> {
    if !distance_from_end.is_positive() || distance_from_end >= timber.length() {
        return Err(JointError::InvalidParameter(format!(
            "chop distance {distance_from_end} is not inside a timber of length {}",
            timber.length()
        )));
    }
    Ok(())
}

/// Chop an end with a prism the size of the cross-section, open past the
/// end.
pub fn chop_timber_end_with_prism(
    timber: &Timber,
    end: ReferenceEnd,
    distance_from_end: &Scalar,
) -> Result<Cut> {
    check_distance(timber, distance_from_end)?;
    let (start, stop) = match end {
        ReferenceEnd::Top => (Some(timber.length() - distance_from_end), None),
        ReferenceEnd::Bottom => (None, Some(distance_from_end.clone())),
    };
    let negative: CsgNode = prism(
        timber.size().clone(),
        vec3i(0, 0, 0),
        Orientation::identity(),
        start,
        stop,
    );
    Ok(Cut::new("end chop", negative, Some(end)))
}

/// Chop an end with a half-plane square to the length axis.
pub fn chop_timber_end_with_half_plane(
    timber: &Timber,
    end: ReferenceEnd,
    distance_from_end: &Scalar,
) -> Result<Cut> {
    check_distance(timber, distance_from_end)?;
    let normal = end.face().local_normal();
    let point = scale(
        &vec3i(0, 0, 1),
        &match end {
            ReferenceEnd::Top => timber.length() - distance_from_end,
            ReferenceEnd::Bottom => distance_from_end.clone(),
        },
    );
    let negative = half_plane_cut(Plane::through(&point, normal), PlaneSide::Positive);
    Ok(Cut::new("end chop", negative, Some(end)))
}

// =============================================================================
// Laps
// =============================================================================

/// Chop an end down to a lap: `lap_depth` is removed from `face` for
/// `lap_length` past the shoulder, and everything beyond the lap is removed.
///
/// The shoulder sits `shoulder_from_end` in from the end.
pub fn chop_lap_on_timber_end(
    timber: &Timber,
    end: ReferenceEnd,
    face: TimberFace,
    lap_length: &Scalar,
    shoulder_from_end: &Scalar,
    lap_depth: &Scalar,
) -> Result<Cut> {
    if face.as_long_face().is_none() {
        return Err(JointError::InvalidParameter(format!(
            "a lap is cut from a long face, not {face:?}"
        )));
    }
    if !lap_length.is_positive() {
        return Err(JointError::InvalidParameter(format!(
            "lap length must be positive, got {lap_length}"
        )));
    }
    check_distance(timber, shoulder_from_end)?;
    let across = timber.size_in_face_normal_axis(face);
    if !lap_depth.is_positive() || lap_depth >= &across {
        return Err(JointError::InvalidParameter(format!(
            "lap depth {lap_depth} must be inside a thickness of {across}"
        )));
    }

    let (shoulder_z, lap_end_z) = match end {
        ReferenceEnd::Top => {
            let shoulder = timber.length() - shoulder_from_end;
            let lap_end = &shoulder + lap_length;
            (shoulder, lap_end)
        }
        ReferenceEnd::Bottom => (shoulder_from_end.clone(), shoulder_from_end - lap_length),
    };
    let size = timber.size();
    let slab_size = match face {
        TimberFace::Right | TimberFace::Left => vec2(lap_depth.clone(), size.y.clone()),
        _ => vec2(size.x.clone(), lap_depth.clone()),
    };
    let slab_center = scale(&face.local_normal(), &((&across - lap_depth) / integer(2)));
    let (start, stop) = if shoulder_z < lap_end_z {
        (shoulder_z, lap_end_z.clone())
    } else {
        (lap_end_z.clone(), shoulder_z)
    };
    let slab = prism(slab_size, slab_center, Orientation::identity(), Some(start), Some(stop));
    let beyond = half_plane_cut(
        Plane::through(&scale(&vec3i(0, 0, 1), &lap_end_z), end.face().local_normal()),
        PlaneSide::Positive,
    );

    tracing::debug!(?end, ?face, %lap_depth, "chop lap");
    Ok(Cut::new("lap", union(vec![slab, beyond]), Some(end)))
}

/// Lap two opposed, in-line ends over each other.
///
/// `top` keeps its material away from `top_face`; `bottom` is lapped from
/// the opposite side down to the same plane, with its shoulder where the
/// top lap ends. Returns the cuts for `top` and `bottom` in that order.
#[allow(clippy::too_many_arguments)]
pub fn chop_lap_on_timber_ends(
    top: &Timber,
    top_end: ReferenceEnd,
    bottom: &Timber,
    bottom_end: ReferenceEnd,
    top_face: TimberFace,
    lap_length: &Scalar,
    top_shoulder_from_end: &Scalar,
    lap_depth: &Scalar,
) -> Result<(Cut, Cut)> {
    if !top.is_face_aligned_with(bottom) {
        return Err(JointError::NotFaceAligned);
    }
    if !top.is_face_parallel_with(bottom) {
        return Err(JointError::InvalidParameter(
            "lapped timbers must run in line".to_string(),
        ));
    }
    if !cross_sections_overlap(top, bottom) {
        return Err(JointError::InvalidParameter(
            "lapped timbers do not share a cross-section".to_string(),
        ));
    }
    let top_cut = chop_lap_on_timber_end(
        top,
        top_end,
        top_face,
        lap_length,
        top_shoulder_from_end,
        lap_depth,
    )?;

    let face_dir = top.face_direction(top_face);
    let bottom_face = bottom.closest_oriented_face(&-face_dir.clone());
    let cut_plane_point = top.face_center(top_face) - scale(&face_dir, lap_depth);
    let bottom_depth = (bottom.face_center(bottom_face) - &cut_plane_point).dot(&face_dir).abs();

    let top_lap_end = match top_end {
        ReferenceEnd::Top => top.length() - top_shoulder_from_end + lap_length,
        ReferenceEnd::Bottom => top_shoulder_from_end - lap_length,
    };
    let along_bottom =
        bottom.project_onto_centerline(&top.centerline_position_from_bottom(&top_lap_end));
    let bottom_shoulder = match bottom_end {
        ReferenceEnd::Top => bottom.length() - &along_bottom,
        ReferenceEnd::Bottom => along_bottom,
    };
    let bottom_cut = chop_lap_on_timber_end(
        bottom,
        bottom_end,
        bottom_face,
        lap_length,
        &bottom_shoulder,
        &bottom_depth,
    )?;
    Ok((top_cut, bottom_cut))
}

//! Plain end joints: miters, butts and splices.
//!
//! Each joint trims timber ends with a single half-plane per timber; no
//! material is interlocked.

use std::sync::Arc;

use num_traits::{Signed, Zero};

use kerf_ir::{half_plane_cut, CsgNode, Plane, PlaneSide};
use kerf_kernel_math::{integer, scale, Scalar, Tolerance, Vec3};
use kerf_kernel_timber::{ReferenceEnd, Timber};

use crate::{cross_sections_overlap, Cut, Joint, JointError, Result};

/// Outward direction and center of one end of a timber.
fn end_frame(timber: &Timber, end: ReferenceEnd) -> (Vec3, Vec3) {
    (timber.face_direction(end), timber.face_center(end))
}

/// Half-plane removing everything on the `normal` side of the world plane
/// through `point`, expressed in `timber`'s local frame.
fn local_half_plane(timber: &Timber, point: &Vec3, normal: &Vec3) -> CsgNode {
    let local_normal = timber.orientation().apply_inverse(normal);
    let offset = (point - timber.bottom_position()).dot(normal);
    half_plane_cut(Plane::new(local_normal, offset), PlaneSide::Positive)
}

fn distinct(a: &Arc<Timber>, b: &Arc<Timber>) -> Result<()> {
    if Arc::ptr_eq(a, b) {
        return Err(JointError::InvalidParameter(
            "a timber cannot be joined to itself".to_string(),
        ));
    }
    Ok(())
}

/// Midpoint of the closest approach between two non-parallel lines.
fn closest_approach(p1: &Vec3, d1: &Vec3, p2: &Vec3, d2: &Vec3) -> Result<Vec3> {
    let w0 = p1 - p2;
    let a = d1.dot(d1);
    let b = d1.dot(d2);
    let c = d2.dot(d2);
    let d = d1.dot(&w0);
    let e = d2.dot(&w0);
    let denom = &a * &c - &b * &b;
    if denom.is_zero() {
        return Err(JointError::InvalidParameter(
            "end directions do not define a corner".to_string(),
        ));
    }
    let t = (&b * &e - &c * &d) / &denom;
    let s = (&a * &e - &b * &d) / &denom;
    let on_first = p1 + scale(d1, &t);
    let on_second = p2 + scale(d2, &s);
    if !Tolerance::default().points_equal(&on_first, &on_second) {
        tracing::warn!("centerlines are skew; mitering at the midpoint of closest approach");
    }
    Ok((on_first + on_second) / integer(2))
}

// =============================================================================
// Miter and corner
// =============================================================================

/// Miter two timber ends so they meet on the plane bisecting the angle
/// between them.
///
/// The miter plane contains the bisector of the two outward end directions
/// and the normal of the plane they span. It passes through the meeting
/// point of the centerlines (or the midpoint of their closest approach when
/// they are skew). Fails with [`JointError::InvalidParameter`] for parallel
/// timbers.
pub fn cut_basic_miter_joint(
    a: &Arc<Timber>,
    a_end: ReferenceEnd,
    b: &Arc<Timber>,
    b_end: ReferenceEnd,
) -> Result<Joint> {
    distinct(a, b)?;
    let (dir_a, end_a) = end_frame(a, a_end);
    let (dir_b, end_b) = end_frame(b, b_end);
    if Tolerance::default().are_parallel(&dir_a, &dir_b) {
        return Err(JointError::InvalidParameter(
            "a miter needs timbers that are not parallel".to_string(),
        ));
    }

    let corner = closest_approach(&end_a, &dir_a, &end_b, &dir_b)?;
    let bisector = &dir_a + &dir_b;
    let miter = bisector.cross(&dir_a.cross(&dir_b));
    // each normal points out past its own timber's end
    let normal_a = if dir_a.dot(&miter).is_positive() {
        miter
    } else {
        -miter
    };
    let normal_b = -normal_a.clone();

    tracing::debug!(?a_end, ?b_end, "cut miter");
    Ok(Joint::new()
        .with_cut(a, Cut::new("miter", local_half_plane(a, &corner, &normal_a), Some(a_end)))
        .with_cut(b, Cut::new("miter", local_half_plane(b, &corner, &normal_b), Some(b_end))))
}

/// [`cut_basic_miter_joint`] for face-aligned timbers meeting at a right
/// angle.
pub fn cut_basic_miter_joint_on_face_aligned_timbers(
    a: &Arc<Timber>,
    a_end: ReferenceEnd,
    b: &Arc<Timber>,
    b_end: ReferenceEnd,
) -> Result<Joint> {
    if !a.is_face_aligned_with(b) {
        return Err(JointError::NotFaceAligned);
    }
    if !Tolerance::default().are_perpendicular(&a.length_direction(), &b.length_direction()) {
        return Err(JointError::InvalidParameter(
            "a square miter needs perpendicular length axes".to_string(),
        ));
    }
    cut_basic_miter_joint(a, a_end, b, b_end)
}

/// A square corner: the two ends mitered at 45 degrees.
pub fn cut_basic_corner_joint_on_face_aligned_timbers(
    a: &Arc<Timber>,
    a_end: ReferenceEnd,
    b: &Arc<Timber>,
    b_end: ReferenceEnd,
) -> Result<Joint> {
    cut_basic_miter_joint_on_face_aligned_timbers(a, a_end, b, b_end)
}

// =============================================================================
// Butt
// =============================================================================

/// Trim `butt`'s end flush with the face of `receiving` it runs into.
///
/// The receiving timber joins the frame uncut.
pub fn cut_basic_butt_joint_on_face_aligned_timbers(
    receiving: &Arc<Timber>,
    butt: &Arc<Timber>,
    butt_end: ReferenceEnd,
) -> Result<Joint> {
    distinct(receiving, butt)?;
    if !receiving.is_face_aligned_with(butt) {
        return Err(JointError::NotFaceAligned);
    }
    let approach = -butt.face_direction(butt_end);
    let face = receiving.closest_oriented_face(&approach);
    let inward = -receiving.face_direction(face);
    let cut = local_half_plane(butt, &receiving.face_center(face), &inward);

    tracing::debug!(?face, "cut butt joint");
    Ok(Joint::new()
        .with_timber(receiving)
        .with_cut(butt, Cut::new("butt", cut, Some(butt_end))))
}

// =============================================================================
// Splice
// =============================================================================

/// Check that two ends meet the way a splice needs, and return how far they
/// overlap along the first timber.
///
/// The ends must point in opposite directions along parallel axes, touch or
/// overlap without a gap, overlap less than either timber's length, and have
/// overlapping cross-sections. Failures are [`JointError::SpliceMisfit`].
pub fn check_splice_overlap(
    a: &Timber,
    a_end: ReferenceEnd,
    b: &Timber,
    b_end: ReferenceEnd,
) -> Result<Scalar> {
    let tol = Tolerance::default();
    let (dir_a, end_a) = end_frame(a, a_end);
    let (dir_b, end_b) = end_frame(b, b_end);
    if !tol.are_parallel(&dir_a, &dir_b) {
        return Err(JointError::SpliceMisfit(
            "joined ends are not parallel".to_string(),
        ));
    }
    if dir_a.dot(&dir_b).is_positive() {
        return Err(JointError::SpliceMisfit(
            "joined ends point the same way".to_string(),
        ));
    }
    let overlap = (&end_a - &end_b).dot(&dir_a);
    if overlap < -tol.linear.clone() {
        return Err(JointError::SpliceMisfit(format!(
            "gap of {} between the joined ends",
            -overlap
        )));
    }
    if &overlap >= a.length() || &overlap >= b.length() {
        return Err(JointError::SpliceMisfit(format!(
            "ends overlap by {overlap}, past the far end of a timber"
        )));
    }
    if !cross_sections_overlap(a, b) {
        return Err(JointError::SpliceMisfit(
            "cross-sections do not overlap".to_string(),
        ));
    }
    Ok(overlap)
}

/// Cut two in-line timbers square at a common splice point.
///
/// The splice point defaults to the midpoint between the two ends and is
/// projected onto `a`'s centerline. It must lie within both timbers.
pub fn cut_basic_splice_joint_on_aligned_timbers(
    a: &Arc<Timber>,
    a_end: ReferenceEnd,
    b: &Arc<Timber>,
    b_end: ReferenceEnd,
    splice_point: Option<&Vec3>,
) -> Result<Joint> {
    distinct(a, b)?;
    check_splice_overlap(a, a_end, b, b_end)?;
    let (dir_a, end_a) = end_frame(a, a_end);
    let (dir_b, end_b) = end_frame(b, b_end);

    let requested = match splice_point {
        Some(p) => p.clone(),
        None => (&end_a + &end_b) / integer(2),
    };
    let along_a = a.project_onto_centerline(&requested);
    let point = a.centerline_position_from_bottom(&along_a);
    if !Tolerance::default().points_equal(&point, &requested) {
        tracing::warn!("splice point is off the first centerline; projecting it");
    }
    let along_b = b.project_onto_centerline(&point);
    if along_a.is_negative()
        || &along_a > a.length()
        || along_b.is_negative()
        || &along_b > b.length()
    {
        return Err(JointError::InvalidParameter(format!(
            "splice point ({}, {}, {}) is not within both timbers",
            point.x, point.y, point.z
        )));
    }

    tracing::debug!(%along_a, "cut splice");
    Ok(Joint::new()
        .with_cut(a, Cut::new("splice", local_half_plane(a, &point, &dir_a), Some(a_end)))
        .with_cut(b, Cut::new("splice", local_half_plane(b, &point, &dir_b), Some(b_end))))
}

//! Shoulder planes: where a tenon leaves the body of its timber.

use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use kerf_ir::{half_plane_cut, CsgNode, Plane, PlaneSide};
use kerf_kernel_math::{integer, vec3, Scalar, Vec2, Vec3};
use kerf_kernel_timber::{DistanceFromEnd, ReferenceEnd, ReferenceLongEdge, Timber};

use crate::{JointError, Result};

/// A plane across a timber near one end.
///
/// The plane passes through the point on `reference_edge` (or on the
/// centerline when `None`) that lies `distance_from_end` from `end`.
/// `normal` is in the timber's local frame and points toward `end`, so the
/// material beyond the shoulder is on the positive side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoulderPlane {
    /// End the shoulder is measured from.
    pub end: ReferenceEnd,
    /// Distance from that end along the length axis.
    pub distance_from_end: Scalar,
    /// Local plane normal, pointing toward `end`.
    pub normal: Vec3,
    /// Long edge the distance is measured on; the centerline if `None`.
    pub reference_edge: Option<ReferenceLongEdge>,
}

impl ShoulderPlane {
    /// A shoulder square to the length axis.
    pub fn square(end: ReferenceEnd, distance_from_end: Scalar) -> Self {
        Self {
            end,
            distance_from_end,
            normal: end.face().local_normal(),
            reference_edge: None,
        }
    }

    /// An angled shoulder measured on a long edge.
    pub fn angled(
        end: ReferenceEnd,
        distance_from_end: Scalar,
        normal: Vec3,
        reference_edge: ReferenceLongEdge,
    ) -> Self {
        Self {
            end,
            distance_from_end,
            normal,
            reference_edge: Some(reference_edge),
        }
    }

    /// Check the plane against a timber.
    ///
    /// The distance must lie inside the timber and the normal must lean
    /// toward the reference end.
    pub fn validate(&self, timber: &Timber) -> Result<()> {
        if self.distance_from_end.is_negative() || &self.distance_from_end >= timber.length() {
            return Err(JointError::InvalidParameter(format!(
                "shoulder distance {} is not inside a timber of length {}",
                self.distance_from_end,
                timber.length()
            )));
        }
        let toward_end = self.normal.dot(&self.end.face().local_normal());
        if !toward_end.is_positive() {
            return Err(JointError::InvalidParameter(
                "shoulder normal must point toward its reference end".to_string(),
            ));
        }
        Ok(())
    }

    /// Local point the plane is anchored at.
    pub fn reference_point_local(&self, timber: &Timber) -> Vec3 {
        let xy = self
            .reference_edge
            .map(|edge| edge.cross_section_point(timber.size()))
            .unwrap_or_else(Vec2::zeros);
        let z = DistanceFromEnd::new(self.end, self.distance_from_end.clone())
            .distance_from_bottom(timber.length());
        vec3(xy.x.clone(), xy.y.clone(), z)
    }

    /// The plane in the timber's local frame.
    pub fn plane_local(&self, timber: &Timber) -> Plane {
        Plane::through(&self.reference_point_local(timber), self.normal.clone())
    }

    /// Local point on the plane directly above a cross-section position.
    ///
    /// Requires a validated plane, whose normal has a nonzero length
    /// component.
    pub fn point_over(&self, timber: &Timber, cross_section: &Vec2) -> Result<Vec3> {
        let plane = self.plane_local(timber);
        let nz = &plane.normal.z;
        if nz.is_zero() {
            return Err(JointError::InvalidParameter(
                "shoulder plane runs along the length axis".to_string(),
            ));
        }
        let z = (&plane.offset - &plane.normal.x * &cross_section.x - &plane.normal.y * &cross_section.y)
            / nz;
        Ok(vec3(cross_section.x.clone(), cross_section.y.clone(), z))
    }

    /// Everything beyond the shoulder, as a local half-plane.
    pub fn removal_local(&self, timber: &Timber) -> CsgNode {
        half_plane_cut(self.plane_local(timber), PlaneSide::Positive)
    }

    /// Local distance from the reference end to the plane along the
    /// centerline.
    pub fn centerline_distance(&self, timber: &Timber) -> Result<Scalar> {
        let p = self.point_over(timber, &Vec2::zeros())?;
        Ok(match self.end {
            ReferenceEnd::Bottom => p.z.clone(),
            ReferenceEnd::Top => timber.length() - &p.z,
        })
    }
}

impl Default for ShoulderPlane {
    fn default() -> Self {
        Self::square(ReferenceEnd::Top, integer(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::{east, north, rational, vec2, vec3i};
    use kerf_kernel_timber::create_timber;

    fn post() -> Timber {
        create_timber(
            vec3i(0, 0, 0),
            integer(2),
            vec2(rational(1, 5), rational(1, 10)),
            &kerf_kernel_math::up(),
            &east(),
        )
        .unwrap()
    }

    #[test]
    fn test_square_shoulder_point_and_plane() {
        let t = post();
        let s = ShoulderPlane::square(ReferenceEnd::Top, rational(3, 10));
        s.validate(&t).unwrap();
        let p = s.reference_point_local(&t);
        assert_eq!(p, vec3(integer(0), integer(0), rational(17, 10)));
        let plane = s.plane_local(&t);
        assert!(plane.signed_value(&p).is_zero());
        assert!(plane.signed_value(&vec3i(0, 0, 2)).is_positive());
    }

    #[test]
    fn test_bottom_shoulder_normal_points_down() {
        let t = post();
        let s = ShoulderPlane::square(ReferenceEnd::Bottom, rational(1, 4));
        assert_eq!(s.normal, vec3i(0, 0, -1));
        let removal = s.removal_local(&t);
        assert!(removal.contains_point(&vec3i(0, 0, 0)));
        assert!(!removal.contains_point(&vec3i(0, 0, 1)));
        assert_eq!(s.centerline_distance(&t).unwrap(), rational(1, 4));
    }

    #[test]
    fn test_angled_shoulder_on_long_edge() {
        let t = post();
        let s = ShoulderPlane::angled(
            ReferenceEnd::Top,
            rational(1, 2),
            vec3i(1, 0, 1),
            ReferenceLongEdge::RightForward,
        );
        s.validate(&t).unwrap();
        let p = s.reference_point_local(&t);
        assert_eq!(p, vec3(rational(1, 10), rational(1, 20), rational(3, 2)));
        // the plane drops toward the edge side: the centerline crosses higher
        let over = s.point_over(&t, &vec2(integer(0), integer(0))).unwrap();
        assert_eq!(over.z, rational(16, 10));
        assert_eq!(s.centerline_distance(&t).unwrap(), rational(2, 5));
    }

    #[test]
    fn test_validate_rejects_bad_planes() {
        let t = post();
        let wrong_way = ShoulderPlane {
            normal: vec3i(0, 0, -1),
            ..ShoulderPlane::square(ReferenceEnd::Top, rational(1, 2))
        };
        assert!(matches!(
            wrong_way.validate(&t),
            Err(JointError::InvalidParameter(_))
        ));
        let too_far = ShoulderPlane::square(ReferenceEnd::Top, integer(3));
        assert!(too_far.validate(&t).is_err());
        let along = ShoulderPlane {
            normal: north(),
            ..ShoulderPlane::square(ReferenceEnd::Top, rational(1, 2))
        };
        assert!(along.validate(&t).is_err());
    }
}

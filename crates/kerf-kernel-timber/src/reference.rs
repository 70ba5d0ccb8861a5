//! Named faces, ends and edges of a timber, and positions measured from them.
//!
//! These are pure labels. They resolve to geometry only against a timber's
//! local frame, where +X is the width axis, +Y the height axis and +Z the
//! length axis.

use serde::{Deserialize, Serialize};

use kerf_kernel_math::{integer, vec2, vec3i, Scalar, Vec2, Vec3};

use crate::{Result, TimberError};

/// One of the six faces of a timber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimberFace {
    /// Normal +Z (far end of the length axis).
    Top,
    /// Normal -Z.
    Bottom,
    /// Normal +X.
    Right,
    /// Normal +Y.
    Forward,
    /// Normal -X.
    Left,
    /// Normal -Y.
    Back,
}

impl TimberFace {
    /// All faces, in the order used to break ties between equally aligned
    /// faces.
    pub const ALL: [TimberFace; 6] = [
        TimberFace::Top,
        TimberFace::Bottom,
        TimberFace::Right,
        TimberFace::Left,
        TimberFace::Forward,
        TimberFace::Back,
    ];

    /// Outward unit normal in timber-local coordinates.
    pub fn local_normal(self) -> Vec3 {
        match self {
            TimberFace::Top => vec3i(0, 0, 1),
            TimberFace::Bottom => vec3i(0, 0, -1),
            TimberFace::Right => vec3i(1, 0, 0),
            TimberFace::Forward => vec3i(0, 1, 0),
            TimberFace::Left => vec3i(-1, 0, 0),
            TimberFace::Back => vec3i(0, -1, 0),
        }
    }

    /// The face on the other side of the timber.
    pub fn opposite(self) -> TimberFace {
        match self {
            TimberFace::Top => TimberFace::Bottom,
            TimberFace::Bottom => TimberFace::Top,
            TimberFace::Right => TimberFace::Left,
            TimberFace::Left => TimberFace::Right,
            TimberFace::Forward => TimberFace::Back,
            TimberFace::Back => TimberFace::Forward,
        }
    }

    /// Local axis index of the face normal: 0 = X, 1 = Y, 2 = Z.
    pub fn axis(self) -> usize {
        match self {
            TimberFace::Right | TimberFace::Left => 0,
            TimberFace::Forward | TimberFace::Back => 1,
            TimberFace::Top | TimberFace::Bottom => 2,
        }
    }

    /// Whether the two faces lie on different local axes.
    pub fn is_perpendicular(self, other: TimberFace) -> bool {
        self.axis() != other.axis()
    }

    /// The end this face is, if it is an end face.
    pub fn as_end(self) -> Option<ReferenceEnd> {
        match self {
            TimberFace::Top => Some(ReferenceEnd::Top),
            TimberFace::Bottom => Some(ReferenceEnd::Bottom),
            _ => None,
        }
    }

    /// The long face this face is, if it runs along the length.
    pub fn as_long_face(self) -> Option<ReferenceLongFace> {
        match self {
            TimberFace::Right => Some(ReferenceLongFace::Right),
            TimberFace::Forward => Some(ReferenceLongFace::Forward),
            TimberFace::Left => Some(ReferenceLongFace::Left),
            TimberFace::Back => Some(ReferenceLongFace::Back),
            TimberFace::Top | TimberFace::Bottom => None,
        }
    }
}

/// One end of a timber's length axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceEnd {
    /// The end at `length` along local Z.
    Top,
    /// The end at the local origin.
    Bottom,
}

impl ReferenceEnd {
    /// The matching end face.
    pub fn face(self) -> TimberFace {
        match self {
            ReferenceEnd::Top => TimberFace::Top,
            ReferenceEnd::Bottom => TimberFace::Bottom,
        }
    }

    /// The other end.
    pub fn opposite(self) -> ReferenceEnd {
        match self {
            ReferenceEnd::Top => ReferenceEnd::Bottom,
            ReferenceEnd::Bottom => ReferenceEnd::Top,
        }
    }
}

impl From<ReferenceEnd> for TimberFace {
    fn from(end: ReferenceEnd) -> Self {
        end.face()
    }
}

/// A face running along the length axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceLongFace {
    /// Normal +X.
    Right,
    /// Normal +Y.
    Forward,
    /// Normal -X.
    Left,
    /// Normal -Y.
    Back,
}

impl ReferenceLongFace {
    /// The matching timber face.
    pub fn face(self) -> TimberFace {
        match self {
            ReferenceLongFace::Right => TimberFace::Right,
            ReferenceLongFace::Forward => TimberFace::Forward,
            ReferenceLongFace::Left => TimberFace::Left,
            ReferenceLongFace::Back => TimberFace::Back,
        }
    }

    /// The face on the other side.
    pub fn opposite(self) -> ReferenceLongFace {
        match self {
            ReferenceLongFace::Right => ReferenceLongFace::Left,
            ReferenceLongFace::Forward => ReferenceLongFace::Back,
            ReferenceLongFace::Left => ReferenceLongFace::Right,
            ReferenceLongFace::Back => ReferenceLongFace::Forward,
        }
    }

    /// Next face clockwise looking down the length axis from the top.
    pub fn rotate_right(self) -> ReferenceLongFace {
        match self {
            ReferenceLongFace::Right => ReferenceLongFace::Back,
            ReferenceLongFace::Back => ReferenceLongFace::Left,
            ReferenceLongFace::Left => ReferenceLongFace::Forward,
            ReferenceLongFace::Forward => ReferenceLongFace::Right,
        }
    }

    /// Next face counter-clockwise looking down the length axis from the top.
    pub fn rotate_left(self) -> ReferenceLongFace {
        match self {
            ReferenceLongFace::Right => ReferenceLongFace::Forward,
            ReferenceLongFace::Forward => ReferenceLongFace::Left,
            ReferenceLongFace::Left => ReferenceLongFace::Back,
            ReferenceLongFace::Back => ReferenceLongFace::Right,
        }
    }

    /// Whether the two faces meet at a long edge.
    pub fn is_perpendicular(self, other: ReferenceLongFace) -> bool {
        self.face().is_perpendicular(other.face())
    }
}

impl From<ReferenceLongFace> for TimberFace {
    fn from(face: ReferenceLongFace) -> Self {
        face.face()
    }
}

/// One of the four edges running along the length axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceLongEdge {
    /// Between the Right and Forward faces (+X, +Y).
    RightForward,
    /// Between the Forward and Left faces (-X, +Y).
    ForwardLeft,
    /// Between the Left and Back faces (-X, -Y).
    LeftBack,
    /// Between the Back and Right faces (+X, -Y).
    BackRight,
}

impl ReferenceLongEdge {
    /// The edge where two perpendicular long faces meet.
    pub fn between(a: ReferenceLongFace, b: ReferenceLongFace) -> Option<ReferenceLongEdge> {
        use ReferenceLongFace::*;
        match (a, b) {
            (Right, Forward) | (Forward, Right) => Some(ReferenceLongEdge::RightForward),
            (Forward, Left) | (Left, Forward) => Some(ReferenceLongEdge::ForwardLeft),
            (Left, Back) | (Back, Left) => Some(ReferenceLongEdge::LeftBack),
            (Back, Right) | (Right, Back) => Some(ReferenceLongEdge::BackRight),
            _ => None,
        }
    }

    /// The two long faces meeting at this edge.
    pub fn faces(self) -> (ReferenceLongFace, ReferenceLongFace) {
        match self {
            ReferenceLongEdge::RightForward => (ReferenceLongFace::Right, ReferenceLongFace::Forward),
            ReferenceLongEdge::ForwardLeft => (ReferenceLongFace::Forward, ReferenceLongFace::Left),
            ReferenceLongEdge::LeftBack => (ReferenceLongFace::Left, ReferenceLongFace::Back),
            ReferenceLongEdge::BackRight => (ReferenceLongFace::Back, ReferenceLongFace::Right),
        }
    }

    /// Signs of the edge's (x, y) cross-section coordinates.
    pub fn signs(self) -> (i64, i64) {
        match self {
            ReferenceLongEdge::RightForward => (1, 1),
            ReferenceLongEdge::ForwardLeft => (-1, 1),
            ReferenceLongEdge::LeftBack => (-1, -1),
            ReferenceLongEdge::BackRight => (1, -1),
        }
    }

    /// Cross-section position of the edge for a timber of the given size.
    pub fn cross_section_point(self, size: &Vec2) -> Vec2 {
        let (sx, sy) = self.signs();
        vec2(
            &size.x * integer(sx) / integer(2),
            &size.y * integer(sy) / integer(2),
        )
    }
}

// =============================================================================
// Positions measured from reference features
// =============================================================================

/// A distance measured inward from a face along its normal axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceFromFace {
    /// Face measured from.
    pub face: TimberFace,
    /// Distance into the timber.
    pub distance: Scalar,
}

impl DistanceFromFace {
    /// Create a record.
    pub fn new(face: TimberFace, distance: Scalar) -> Self {
        Self { face, distance }
    }

    /// Local coordinate along the face's axis, for a timber of the given
    /// length and size.
    pub fn local_coordinate(&self, length: &Scalar, size: &Vec2) -> Scalar {
        match self.face {
            TimberFace::Top => length - &self.distance,
            TimberFace::Bottom => self.distance.clone(),
            TimberFace::Right => &size.x / integer(2) - &self.distance,
            TimberFace::Left => &self.distance - &size.x / integer(2),
            TimberFace::Forward => &size.y / integer(2) - &self.distance,
            TimberFace::Back => &self.distance - &size.y / integer(2),
        }
    }
}

/// A distance along the length axis measured from one end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceFromEnd {
    /// End measured from.
    pub end: ReferenceEnd,
    /// Distance toward the other end.
    pub distance: Scalar,
}

impl DistanceFromEnd {
    /// Create a record.
    pub fn new(end: ReferenceEnd, distance: Scalar) -> Self {
        Self { end, distance }
    }

    /// The same position measured from the bottom end.
    pub fn distance_from_bottom(&self, length: &Scalar) -> Scalar {
        match self.end {
            ReferenceEnd::Bottom => self.distance.clone(),
            ReferenceEnd::Top => length - &self.distance,
        }
    }
}

/// A distance measured inward from one long face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceFromLongFace {
    /// Face measured from.
    pub face: ReferenceLongFace,
    /// Distance into the timber.
    pub distance: Scalar,
}

impl DistanceFromLongFace {
    /// Create a record.
    pub fn new(face: ReferenceLongFace, distance: Scalar) -> Self {
        Self { face, distance }
    }

    /// Cross-section offset from the centerline, along the face's axis only.
    pub fn cross_section_offset(&self, size: &Vec2) -> Vec2 {
        let along = DistanceFromFace::new(self.face.face(), self.distance.clone())
            .local_coordinate(&integer(0), size);
        match self.face {
            ReferenceLongFace::Right | ReferenceLongFace::Left => vec2(along, integer(0)),
            ReferenceLongFace::Forward | ReferenceLongFace::Back => vec2(integer(0), along),
        }
    }
}

/// A cross-section position measured from two perpendicular long faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceFromLongEdge {
    first: DistanceFromLongFace,
    second: DistanceFromLongFace,
}

impl DistanceFromLongEdge {
    /// Pair two measurements; the faces must be perpendicular.
    pub fn new(first: DistanceFromLongFace, second: DistanceFromLongFace) -> Result<Self> {
        if !first.face.is_perpendicular(second.face) {
            return Err(TimberError::InvalidParameter(format!(
                "long faces {:?} and {:?} do not meet at an edge",
                first.face, second.face
            )));
        }
        Ok(Self { first, second })
    }

    /// First measurement.
    pub fn first(&self) -> &DistanceFromLongFace {
        &self.first
    }

    /// Second measurement.
    pub fn second(&self) -> &DistanceFromLongFace {
        &self.second
    }

    /// The edge the two faces meet at.
    pub fn long_edge(&self) -> ReferenceLongEdge {
        // perpendicularity is checked in `new`
        ReferenceLongEdge::between(self.first.face, self.second.face)
            .unwrap_or(ReferenceLongEdge::RightForward)
    }

    /// Cross-section offset from the centerline.
    pub fn cross_section_offset(&self, size: &Vec2) -> Vec2 {
        self.first.cross_section_offset(size) + self.second.cross_section_offset(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::rational;

    #[test]
    fn test_face_normals_and_opposites() {
        for face in TimberFace::ALL {
            assert_eq!(face.opposite().local_normal(), -face.local_normal());
            assert_eq!(face.opposite().opposite(), face);
        }
        assert!(TimberFace::Top.is_perpendicular(TimberFace::Right));
        assert!(!TimberFace::Right.is_perpendicular(TimberFace::Left));
    }

    #[test]
    fn test_long_face_rotation_cycles() {
        let f = ReferenceLongFace::Right;
        assert_eq!(f.rotate_right(), ReferenceLongFace::Back);
        assert_eq!(f.rotate_left(), ReferenceLongFace::Forward);
        assert_eq!(f.rotate_right().rotate_right(), f.opposite());
        assert_eq!(f.rotate_left().rotate_right(), f);
    }

    #[test]
    fn test_edges_from_faces() {
        for edge in [
            ReferenceLongEdge::RightForward,
            ReferenceLongEdge::ForwardLeft,
            ReferenceLongEdge::LeftBack,
            ReferenceLongEdge::BackRight,
        ] {
            let (a, b) = edge.faces();
            assert_eq!(ReferenceLongEdge::between(a, b), Some(edge));
            assert_eq!(ReferenceLongEdge::between(b, a), Some(edge));
        }
        assert_eq!(
            ReferenceLongEdge::between(ReferenceLongFace::Left, ReferenceLongFace::Right),
            None
        );
    }

    #[test]
    fn test_distance_from_end() {
        let length = integer(3);
        let d = DistanceFromEnd::new(ReferenceEnd::Top, rational(1, 2));
        assert_eq!(d.distance_from_bottom(&length), rational(5, 2));
        let d = DistanceFromEnd::new(ReferenceEnd::Bottom, rational(1, 2));
        assert_eq!(d.distance_from_bottom(&length), rational(1, 2));
    }

    #[test]
    fn test_distance_from_long_edge() {
        let size = vec2(rational(2, 10), rational(3, 10));
        let edge = DistanceFromLongEdge::new(
            DistanceFromLongFace::new(ReferenceLongFace::Left, rational(1, 20)),
            DistanceFromLongFace::new(ReferenceLongFace::Forward, rational(1, 10)),
        )
        .unwrap();
        assert_eq!(edge.long_edge(), ReferenceLongEdge::ForwardLeft);
        assert_eq!(
            edge.cross_section_offset(&size),
            vec2(rational(-1, 20), rational(1, 20))
        );

        let parallel = DistanceFromLongEdge::new(
            DistanceFromLongFace::new(ReferenceLongFace::Left, integer(0)),
            DistanceFromLongFace::new(ReferenceLongFace::Right, integer(0)),
        );
        assert!(matches!(parallel, Err(TimberError::InvalidParameter(_))));
    }

    #[test]
    fn test_edge_cross_section_point() {
        let size = vec2(integer(2), integer(4));
        assert_eq!(
            ReferenceLongEdge::BackRight.cross_section_point(&size),
            vec2(integer(1), integer(-2))
        );
    }
}

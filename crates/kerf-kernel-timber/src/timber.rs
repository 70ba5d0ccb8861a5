//! The timber entity and its geometric queries.

use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use kerf_ir::{prism, Aabb, CsgNode};
use kerf_kernel_footprint::{Footprint, FootprintError};
use kerf_kernel_math::{
    flatten, integer, scale, vec2, vec3, vec3i, Orientation, Scalar, Tolerance, Transform, Vec2,
    Vec3,
};

use crate::reference::{ReferenceLongEdge, TimberFace};
use crate::{Result, TimberError};

/// An oriented rectangular timber.
///
/// The local frame has its origin at the bottom-face centroid; the
/// orientation columns are the (width, height, length) directions in world
/// space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimberRecord")]
pub struct Timber {
    length: Scalar,
    size: Vec2,
    bottom_position: Vec3,
    orientation: Orientation,
    name: Option<String>,
}

/// Unchecked serialized form of a [`Timber`].
#[derive(Deserialize)]
struct TimberRecord {
    length: Scalar,
    size: Vec2,
    bottom_position: Vec3,
    orientation: Orientation,
    name: Option<String>,
}

impl TryFrom<TimberRecord> for Timber {
    type Error = TimberError;

    fn try_from(record: TimberRecord) -> Result<Self> {
        if !record.orientation.is_orthonormal(&Tolerance::default()) {
            return Err(TimberError::AmbiguousOrientation);
        }
        let timber = Timber::new(
            record.length,
            record.size,
            record.bottom_position,
            record.orientation,
        )?;
        Ok(match record.name {
            Some(name) => timber.with_name(name),
            None => timber,
        })
    }
}

impl Timber {
    /// Create a timber; fails with [`TimberError::InvalidDimension`] unless
    /// the length and both cross-section sizes are positive.
    pub fn new(
        length: Scalar,
        size: Vec2,
        bottom_position: Vec3,
        orientation: Orientation,
    ) -> Result<Self> {
        if !length.is_positive() {
            return Err(TimberError::InvalidDimension(format!(
                "length must be positive, got {length}"
            )));
        }
        if !size.x.is_positive() || !size.y.is_positive() {
            return Err(TimberError::InvalidDimension(format!(
                "cross-section must be positive, got {} x {}",
                size.x, size.y
            )));
        }
        Ok(Self {
            length,
            size,
            bottom_position,
            orientation,
            name: None,
        })
    }

    /// The same timber with a name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Length along local Z.
    pub fn length(&self) -> &Scalar {
        &self.length
    }

    /// Cross-section: width along local X, height along local Y.
    pub fn size(&self) -> &Vec2 {
        &self.size
    }

    /// World position of the bottom-face centroid.
    pub fn bottom_position(&self) -> &Vec3 {
        &self.bottom_position
    }

    /// Local frame.
    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    /// Optional display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// World direction of local +Z.
    pub fn length_direction(&self) -> Vec3 {
        self.orientation.length_direction()
    }

    /// World direction of local +X.
    pub fn width_direction(&self) -> Vec3 {
        self.orientation.width_direction()
    }

    /// World direction of local +Y.
    pub fn height_direction(&self) -> Vec3 {
        self.orientation.height_direction()
    }

    /// Local point to world.
    pub fn local_to_global(&self, local: &Vec3) -> Vec3 {
        &self.bottom_position + self.orientation.apply(local)
    }

    /// World point to local.
    pub fn global_to_local(&self, global: &Vec3) -> Vec3 {
        self.orientation
            .apply_inverse(&(global - &self.bottom_position))
    }

    /// Local direction to world; directions ignore the translation.
    pub fn local_direction_to_global(&self, local: &Vec3) -> Vec3 {
        self.orientation.apply(local)
    }

    /// Local-to-world transform for renderers.
    pub fn transform_f64(&self) -> Transform {
        Transform::from_frame(&self.orientation, &self.bottom_position)
    }

    // =========================================================================
    // Centerline
    // =========================================================================

    /// Point on the centerline `distance` from the bottom end.
    pub fn centerline_position_from_bottom(&self, distance: &Scalar) -> Vec3 {
        &self.bottom_position + scale(&self.length_direction(), distance)
    }

    /// Point on the centerline `distance` from the top end.
    pub fn centerline_position_from_top(&self, distance: &Scalar) -> Vec3 {
        self.centerline_position_from_bottom(&(&self.length - distance))
    }

    /// Centroid of the bottom face.
    pub fn bottom_center(&self) -> Vec3 {
        self.bottom_position.clone()
    }

    /// Centroid of the top face.
    pub fn top_center(&self) -> Vec3 {
        self.centerline_position_from_bottom(&self.length)
    }

    /// Parameter of the orthogonal projection of `point` onto the centerline
    /// line, measured from the bottom end. May be negative or past the top.
    pub fn project_onto_centerline(&self, point: &Vec3) -> Scalar {
        let l = self.length_direction();
        (point - &self.bottom_position).dot(&l) / l.dot(&l)
    }

    // =========================================================================
    // Faces
    // =========================================================================

    /// Outward world direction of a face.
    pub fn face_direction(&self, face: impl Into<TimberFace>) -> Vec3 {
        self.local_direction_to_global(&face.into().local_normal())
    }

    /// Size of the timber along the face's normal axis.
    pub fn size_in_face_normal_axis(&self, face: impl Into<TimberFace>) -> Scalar {
        match face.into() {
            TimberFace::Top | TimberFace::Bottom => self.length.clone(),
            TimberFace::Right | TimberFace::Left => self.size.x.clone(),
            TimberFace::Forward | TimberFace::Back => self.size.y.clone(),
        }
    }

    /// Face whose outward direction best matches `direction`.
    ///
    /// Ties keep the earlier face of [`TimberFace::ALL`].
    pub fn closest_oriented_face(&self, direction: &Vec3) -> TimberFace {
        let mut best = TimberFace::ALL[0];
        let mut best_alignment = direction.dot(&self.face_direction(best));
        for face in &TimberFace::ALL[1..] {
            let alignment = direction.dot(&self.face_direction(*face));
            if alignment > best_alignment {
                best = *face;
                best_alignment = alignment;
            }
        }
        best
    }

    /// Local centroid of a face.
    pub fn face_center_local(&self, face: impl Into<TimberFace>) -> Vec3 {
        let half = integer(2);
        match face.into() {
            TimberFace::Top => vec3(integer(0), integer(0), self.length.clone()),
            TimberFace::Bottom => vec3i(0, 0, 0),
            TimberFace::Right => vec3(&self.size.x / &half, integer(0), &self.length / &half),
            TimberFace::Left => vec3(-(&self.size.x / &half), integer(0), &self.length / &half),
            TimberFace::Forward => vec3(integer(0), &self.size.y / &half, &self.length / &half),
            TimberFace::Back => vec3(integer(0), -(&self.size.y / &half), &self.length / &half),
        }
    }

    /// World centroid of a face.
    pub fn face_center(&self, face: impl Into<TimberFace>) -> Vec3 {
        self.local_to_global(&self.face_center_local(face))
    }

    /// Orthogonal projection of a world point onto the plane of a face.
    pub fn project_onto_face(&self, point: &Vec3, face: impl Into<TimberFace>) -> Vec3 {
        let face = face.into();
        let local = self.global_to_local(point);
        let n = face.local_normal();
        let on_plane = self.face_center_local(face);
        let excess = (&local - &on_plane).dot(&n);
        self.local_to_global(&(local - scale(&n, &excess)))
    }

    /// World point on a long edge, `distance` from the bottom end.
    pub fn long_edge_point(&self, edge: ReferenceLongEdge, distance_from_bottom: &Scalar) -> Vec3 {
        let xy = edge.cross_section_point(&self.size);
        self.local_to_global(&vec3(xy.x.clone(), xy.y.clone(), distance_from_bottom.clone()))
    }

    /// Half the cross-section's extent along a unit world direction.
    ///
    /// The length axis does not contribute: this is the distance from the
    /// centerline to the outer face in `direction`.
    pub fn cross_section_half_extent(&self, direction: &Vec3) -> Scalar {
        let w = self.width_direction().dot(direction).abs();
        let h = self.height_direction().dot(direction).abs();
        (w * &self.size.x + h * &self.size.y) / integer(2)
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// The eight corners in world space, bottom face first.
    pub fn corners(&self) -> [Vec3; 8] {
        let hx = &self.size.x / integer(2);
        let hy = &self.size.y / integer(2);
        let corner = |sx: &Scalar, sy: &Scalar, z: &Scalar| {
            self.local_to_global(&vec3(sx.clone(), sy.clone(), z.clone()))
        };
        let (nx, ny) = (-hx.clone(), -hy.clone());
        let zero = Scalar::zero();
        [
            corner(&nx, &ny, &zero),
            corner(&hx, &ny, &zero),
            corner(&hx, &hy, &zero),
            corner(&nx, &hy, &zero),
            corner(&nx, &ny, &self.length),
            corner(&hx, &ny, &self.length),
            corner(&hx, &hy, &self.length),
            corner(&nx, &hy, &self.length),
        ]
    }

    /// World axis-aligned bounding box.
    pub fn bounding_box(&self) -> Aabb {
        let corners = self.corners();
        let mut bounds = Aabb::from_point(&corners[0]);
        for c in &corners[1..] {
            bounds.include(c);
        }
        bounds
    }

    /// The timber's solid in its own local frame.
    pub fn csg_local(&self) -> CsgNode {
        prism(
            self.size.clone(),
            vec3i(0, 0, 0),
            Orientation::identity(),
            Some(Scalar::zero()),
            Some(self.length.clone()),
        )
    }

    // =========================================================================
    // Footprint relations
    // =========================================================================

    /// Face pointing into the footprint from the nearest boundary side.
    pub fn inside_face(&self, footprint: &Footprint) -> Result<TimberFace> {
        let inward = self.nearest_inward_normal(footprint)?;
        Ok(self.closest_oriented_face(&inward))
    }

    /// Face pointing out of the footprint from the nearest boundary side.
    pub fn outside_face(&self, footprint: &Footprint) -> Result<TimberFace> {
        let inward = self.nearest_inward_normal(footprint)?;
        Ok(self.closest_oriented_face(&-inward))
    }

    fn nearest_inward_normal(&self, footprint: &Footprint) -> Result<Vec3> {
        footprint.validate()?;
        let bottom = flatten(&self.bottom_center());
        let top = flatten(&self.top_center());
        let nearest = footprint
            .nearest_boundary_from_segment(&bottom, &top)
            .ok_or(TimberError::InvalidFootprint(FootprintError::TooFewCorners(
                footprint.len(),
            )))?;
        let n = footprint.inward_normal(nearest.index)?;
        Ok(vec3(n.x.clone(), n.y.clone(), integer(0)))
    }

    // =========================================================================
    // Relations between timbers
    // =========================================================================

    /// Whether every axis of one timber is parallel or perpendicular to
    /// every axis of the other.
    pub fn is_face_aligned_with(&self, other: &Timber) -> bool {
        let tol = Tolerance::default();
        let mine = [
            self.width_direction(),
            self.height_direction(),
            self.length_direction(),
        ];
        let theirs = [
            other.width_direction(),
            other.height_direction(),
            other.length_direction(),
        ];
        mine.iter().all(|a| {
            theirs
                .iter()
                .all(|b| tol.are_parallel(a, b) || tol.are_perpendicular(a, b))
        })
    }

    /// Whether the two length axes are parallel.
    pub fn is_face_parallel_with(&self, other: &Timber) -> bool {
        Tolerance::default().are_parallel(&self.length_direction(), &other.length_direction())
    }

    /// Cross-section with width and height exchanged.
    pub(crate) fn swapped_size(&self) -> Vec2 {
        vec2(self.size.y.clone(), self.size.x.clone())
    }
}

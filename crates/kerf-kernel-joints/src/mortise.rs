//! Rectangular mortises cut into a long face.

use num_traits::Signed;
use serde::{Deserialize, Serialize};

use kerf_ir::{prism, CsgNode};
use kerf_kernel_math::{integer, scale, vec2, vec3, vec3i, Orientation, Scalar, Vec2, Vec3};
use kerf_kernel_timber::{DistanceFromEnd, DistanceFromLongFace, ReferenceLongFace, Timber};

use crate::{local_bounds, JointError, Result};

/// A rectangular pocket cut into one long face.
///
/// `width` is measured across the face, `height` along the length axis and
/// `depth` into the timber. The pocket is centered on
/// `position_rel_to_end` along the length and on `position_rel_to_long_face`
/// across the face, or on the face's center line when that is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardMortise {
    /// Face the pocket opens on.
    pub face: ReferenceLongFace,
    /// Pocket center along the length axis.
    pub position_rel_to_end: DistanceFromEnd,
    /// Pocket center across the face, measured from a perpendicular face.
    pub position_rel_to_long_face: Option<DistanceFromLongFace>,
    /// Size across the face.
    pub width: Scalar,
    /// Size along the length axis.
    pub height: Scalar,
    /// Depth into the timber.
    pub depth: Scalar,
}

impl StandardMortise {
    /// A mortise centered across its face.
    pub fn new(
        face: ReferenceLongFace,
        position_rel_to_end: DistanceFromEnd,
        width: Scalar,
        height: Scalar,
        depth: Scalar,
    ) -> Self {
        Self {
            face,
            position_rel_to_end,
            position_rel_to_long_face: None,
            width,
            height,
            depth,
        }
    }

    /// Offset the pocket across the face.
    pub fn with_long_face_position(mut self, position: DistanceFromLongFace) -> Self {
        self.position_rel_to_long_face = Some(position);
        self
    }

    /// Local axis running across the face.
    fn across_axis(&self) -> Vec3 {
        match self.face {
            ReferenceLongFace::Right | ReferenceLongFace::Left => vec3i(0, 1, 0),
            ReferenceLongFace::Forward | ReferenceLongFace::Back => vec3i(1, 0, 0),
        }
    }

    /// Local center of the pocket's opening.
    pub fn opening_center_local(&self, timber: &Timber) -> Result<Vec3> {
        let lateral = match &self.position_rel_to_long_face {
            None => Vec2::zeros(),
            Some(d) if d.face.is_perpendicular(self.face) => d.cross_section_offset(timber.size()),
            Some(d) => {
                return Err(JointError::InvalidParameter(format!(
                    "mortise on {:?} cannot be positioned from {:?}",
                    self.face, d.face
                )))
            }
        };
        let n = self.face.face().local_normal();
        let half = timber.size_in_face_normal_axis(self.face) / integer(2);
        let z = self.position_rel_to_end.distance_from_bottom(timber.length());
        Ok(vec3(lateral.x.clone(), lateral.y.clone(), z) + scale(&n, &half))
    }

    /// The pocket solid in the timber's local frame.
    ///
    /// Fails if a dimension is not positive or the pocket leaves the timber.
    pub fn to_csg_local(&self, timber: &Timber) -> Result<CsgNode> {
        for (name, value) in [
            ("width", &self.width),
            ("height", &self.height),
            ("depth", &self.depth),
        ] {
            if !value.is_positive() {
                return Err(JointError::InvalidParameter(format!(
                    "mortise {name} must be positive, got {value}"
                )));
            }
        }
        let inward = -self.face.face().local_normal();
        let orientation = Orientation::from_directions(&inward, &self.across_axis())?;
        let node = prism(
            vec2(self.width.clone(), self.height.clone()),
            self.opening_center_local(timber)?,
            orientation,
            Some(integer(0)),
            Some(self.depth.clone()),
        );
        node.validate()?;
        if !local_bounds(timber).contains_aabb(&node.bounds()?) {
            return Err(JointError::InvalidParameter(
                "mortise leaves its timber".to_string(),
            ));
        }
        Ok(node)
    }
}

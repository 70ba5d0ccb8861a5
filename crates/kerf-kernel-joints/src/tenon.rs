//! Tenons and multi-tenons.

use std::sync::Arc;

use num_traits::Signed;
use serde::{Deserialize, Serialize};

use kerf_ir::{difference, prism, union, CsgNode};
use kerf_kernel_math::{integer, normalize, vec2, vec3i, Orientation, Scalar, Tolerance, Vec2, Vec3};
use kerf_kernel_timber::{DistanceFromLongEdge, Timber};

use crate::{local_bounds, Cut, Joint, JointError, Result, ShoulderPlane};

/// Where a tenon sits in its timber's cross-section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenonPosition {
    /// Offset of the tenon center from the centerline, in local (x, y).
    Centerline(Vec2),
    /// Tenon center measured from two long faces.
    LongEdge(DistanceFromLongEdge),
}

/// A rectangular tenon standing on a shoulder plane.
///
/// `width` runs along the timber's local X, `height` along local Y, and
/// `depth` along the extrusion axis. The axis is local to the timber and
/// defaults to the outward normal of the shoulder's reference end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardTenon {
    /// Plane the tenon starts from.
    pub shoulder_plane: ShoulderPlane,
    /// Cross-section position; centered when `None`.
    pub position: Option<TenonPosition>,
    /// Size along local X.
    pub width: Scalar,
    /// Size along local Y.
    pub height: Scalar,
    /// Length past the shoulder.
    pub depth: Scalar,
    /// Local extrusion direction; the end normal when `None`.
    pub axis: Option<Vec3>,
}

impl StandardTenon {
    /// A centered tenon extruded straight out of the end.
    pub fn new(shoulder_plane: ShoulderPlane, width: Scalar, height: Scalar, depth: Scalar) -> Self {
        Self {
            shoulder_plane,
            position: None,
            width,
            height,
            depth,
            axis: None,
        }
    }

    /// Place the tenon in the cross-section.
    pub fn with_position(mut self, position: TenonPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Extrude along a custom local axis.
    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Cross-section center in local (x, y).
    pub fn cross_section_center(&self, timber: &Timber) -> Vec2 {
        match &self.position {
            None => Vec2::zeros(),
            Some(TenonPosition::Centerline(offset)) => offset.clone(),
            Some(TenonPosition::LongEdge(d)) => d.cross_section_offset(timber.size()),
        }
    }

    /// Unit local extrusion axis.
    pub fn axis_local(&self) -> Result<Vec3> {
        let end_normal = self.shoulder_plane.end.face().local_normal();
        let axis = match &self.axis {
            Some(a) => normalize(a)?,
            None => return Ok(end_normal),
        };
        if !axis.dot(&end_normal).is_positive() {
            return Err(JointError::InvalidParameter(
                "tenon axis must point out of its reference end".to_string(),
            ));
        }
        Ok(axis)
    }

    /// The tenon solid in the timber's local frame.
    ///
    /// Fails if a dimension is not positive or the shoulder does not fit
    /// the timber.
    pub fn to_csg_local(&self, timber: &Timber) -> Result<CsgNode> {
        self.prism_local(timber, &self.depth)
    }

    /// The tenon cut: material beyond the shoulder minus the tenon.
    pub fn cut_local(&self, timber: &Timber) -> Result<CsgNode> {
        let tenon = self.to_csg_local(timber)?;
        Ok(difference(
            self.shoulder_plane.removal_local(timber),
            vec![tenon],
        ))
    }

    /// The tenon cross-section extruded `depth` from the shoulder, local.
    pub(crate) fn prism_local(&self, timber: &Timber, depth: &Scalar) -> Result<CsgNode> {
        for (name, value) in [
            ("width", &self.width),
            ("height", &self.height),
            ("depth", depth),
        ] {
            if !value.is_positive() {
                return Err(JointError::InvalidParameter(format!(
                    "tenon {name} must be positive, got {value}"
                )));
            }
        }
        self.shoulder_plane.validate(timber)?;

        let axis = self.axis_local()?;
        let base = self
            .shoulder_plane
            .point_over(timber, &self.cross_section_center(timber))?;
        let hint = if Tolerance::default().are_parallel(&axis, &vec3i(1, 0, 0)) {
            vec3i(0, 1, 0)
        } else {
            vec3i(1, 0, 0)
        };
        let orientation = Orientation::from_directions(&axis, &hint)?;
        let node = prism(
            vec2(self.width.clone(), self.height.clone()),
            base,
            orientation,
            Some(integer(0)),
            Some(depth.clone()),
        );
        node.validate()?;
        Ok(node)
    }

    /// Check the tenon stays inside its timber.
    pub(crate) fn check_within(&self, timber: &Timber) -> Result<()> {
        let bounds = self.to_csg_local(timber)?.bounds()?;
        if !local_bounds(timber).contains_aabb(&bounds) {
            return Err(JointError::InvalidParameter(
                "tenon leaves its timber".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cut several tenons sharing one shoulder plane from a timber end.
///
/// The negative is everything beyond the shoulder minus the union of the
/// tenons. Fails with [`JointError::ShoulderPlaneMismatch`] if the tenons
/// do not all reference the same plane.
pub fn cut_multi_tenon(timber: &Arc<Timber>, tenons: &[StandardTenon]) -> Result<Joint> {
    let first = tenons.first().ok_or_else(|| {
        JointError::InvalidParameter("multi-tenon needs at least one tenon".to_string())
    })?;
    if tenons
        .iter()
        .any(|t| t.shoulder_plane != first.shoulder_plane)
    {
        return Err(JointError::ShoulderPlaneMismatch);
    }

    let mut solids = Vec::with_capacity(tenons.len());
    for tenon in tenons {
        tenon.check_within(timber)?;
        solids.push(tenon.to_csg_local(timber)?);
    }
    let shoulder = &first.shoulder_plane;
    let negative = difference(shoulder.removal_local(timber), vec![union(solids)]);
    negative.validate()?;

    tracing::debug!(
        timber = timber.name().unwrap_or("<unnamed>"),
        tenons = tenons.len(),
        "cut multi-tenon"
    );
    Ok(Joint::new().with_cut(
        timber,
        Cut::new("multi-tenon", negative, Some(shoulder.end)),
    ))
}

#![warn(missing_docs)]

//! CSG tree for the kerf timber-frame kernel.
//!
//! Every node is an immutable value built bottom-up with the constructor
//! functions in this crate. Prisms, cylinders and half-planes may be
//! unbounded; renderers clip them against a structure extent. The kernel
//! never tessellates.
//!
//! # Example
//!
//! ```
//! use kerf_ir::{difference, half_plane_cut, prism, Plane, PlaneSide};
//! use kerf_kernel_math::{integer, rational, up, vec2, vec3i, Orientation};
//!
//! let body = prism(
//!     vec2(rational(1, 10), rational(1, 10)),
//!     vec3i(0, 0, 0),
//!     Orientation::identity(),
//!     Some(integer(0)),
//!     Some(integer(2)),
//! );
//! // chop everything above z = 1
//! let chop = half_plane_cut(Plane::new(up(), integer(1)), PlaneSide::Positive);
//! let cut = difference(body, vec![chop]);
//! assert!(!cut.contains_point(&vec3i(0, 0, 1)));
//! assert!(cut.bounds().is_ok());
//! ```

pub mod aabb;
mod query;

pub use aabb::Aabb;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kerf_kernel_math::{Orientation, Scalar, Vec2, Vec3};

/// Errors from CSG validation and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsgError {
    /// A union has no children.
    #[error("union has no children")]
    EmptyUnion,

    /// A prism cross-section or cylinder radius is not positive.
    #[error("primitive size must be positive")]
    NonPositiveSize,

    /// A primitive's start distance is not before its end distance.
    #[error("primitive extent is empty: start must be before end")]
    EmptyExtent,

    /// A half-plane normal is the zero vector.
    #[error("half-plane normal is zero")]
    ZeroNormal,

    /// A cylinder axis is the zero vector.
    #[error("cylinder axis is zero")]
    ZeroAxis,

    /// The node extends to infinity in the requested direction.
    #[error("geometry is unbounded")]
    Unbounded,
}

// =============================================================================
// Node types
// =============================================================================

/// A plane `{p : p . normal = offset}`.
///
/// `offset` is measured in units of `normal`; with a unit normal it is the
/// signed distance of the plane from the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plane {
    /// Plane normal.
    pub normal: Vec3,
    /// Offset along the normal.
    pub offset: Scalar,
}

impl Plane {
    /// Create a plane.
    pub fn new(normal: Vec3, offset: Scalar) -> Self {
        Self { normal, offset }
    }

    /// Plane through `point` with the given normal.
    pub fn through(point: &Vec3, normal: Vec3) -> Self {
        let offset = point.dot(&normal);
        Self { normal, offset }
    }

    /// `p . normal - offset`; positive on the side the normal points to.
    pub fn signed_value(&self, p: &Vec3) -> Scalar {
        p.dot(&self.normal) - &self.offset
    }
}

/// Which side of a [`Plane`] a half-plane node keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneSide {
    /// Points with `p . normal >= offset`.
    Positive,
    /// Points with `p . normal <= offset`.
    Negative,
}

/// Rectangular prism along its local Z axis.
///
/// The cross-section `size` (width, height) is centered on the local Z axis.
/// `start`/`end` are distances along local Z from `position`; `None` leaves
/// that end open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prism {
    /// Cross-section (width along local X, height along local Y).
    pub size: Vec2,
    /// Origin of the local frame.
    pub position: Vec3,
    /// Local frame.
    pub orientation: Orientation,
    /// Start distance along local Z, or open.
    pub start: Option<Scalar>,
    /// End distance along local Z, or open.
    pub end: Option<Scalar>,
}

/// Round cylinder along a unit axis through `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cylinder {
    /// A point on the axis; distances are measured from here.
    pub position: Vec3,
    /// Unit axis direction.
    pub axis: Vec3,
    /// Radius.
    pub radius: Scalar,
    /// Start distance along the axis, or open.
    pub start: Option<Scalar>,
    /// End distance along the axis, or open.
    pub end: Option<Scalar>,
}

/// Leaf solids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Primitive {
    /// Rectangular prism.
    Prism(Prism),
    /// Round cylinder.
    Cylinder(Cylinder),
}

/// A node of the CSG tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CsgNode {
    /// Leaf solid.
    Primitive(Primitive),
    /// Points in any child.
    Union {
        /// Children, in order.
        children: Vec<CsgNode>,
    },
    /// Points in `base` and in none of `subtract`.
    Difference {
        /// Solid to cut from.
        base: Box<CsgNode>,
        /// Solids removed, in order.
        subtract: Vec<CsgNode>,
    },
    /// The half-space on one side of a plane.
    HalfPlaneCut {
        /// Bounding plane.
        plane: Plane,
        /// Side kept.
        keep: PlaneSide,
    },
}

// =============================================================================
// Constructors
// =============================================================================

/// Rectangular prism node.
pub fn prism(
    size: Vec2,
    position: Vec3,
    orientation: Orientation,
    start: Option<Scalar>,
    end: Option<Scalar>,
) -> CsgNode {
    CsgNode::Primitive(Primitive::Prism(Prism {
        size,
        position,
        orientation,
        start,
        end,
    }))
}

/// Cylinder node.
pub fn cylinder(
    position: Vec3,
    axis: Vec3,
    radius: Scalar,
    start: Option<Scalar>,
    end: Option<Scalar>,
) -> CsgNode {
    CsgNode::Primitive(Primitive::Cylinder(Cylinder {
        position,
        axis,
        radius,
        start,
        end,
    }))
}

/// Union node.
pub fn union(children: Vec<CsgNode>) -> CsgNode {
    CsgNode::Union { children }
}

/// Difference node.
pub fn difference(base: CsgNode, subtract: Vec<CsgNode>) -> CsgNode {
    CsgNode::Difference {
        base: Box::new(base),
        subtract,
    }
}

/// Half-plane node.
pub fn half_plane_cut(plane: Plane, keep: PlaneSide) -> CsgNode {
    CsgNode::HalfPlaneCut { plane, keep }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::{integer, rational, up, vec2, vec3i};

    fn unit_box() -> CsgNode {
        prism(
            vec2(integer(1), integer(1)),
            vec3i(0, 0, 0),
            Orientation::identity(),
            Some(integer(0)),
            Some(integer(1)),
        )
    }

    #[test]
    fn test_tagged_json() {
        let node = union(vec![unit_box()]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Union");
        assert_eq!(json["children"][0]["type"], "Primitive");
        assert_eq!(json["children"][0]["shape"], "Prism");
    }

    #[test]
    fn test_json_roundtrip_preserves_exact_values() {
        let node = difference(
            unit_box(),
            vec![half_plane_cut(
                Plane::new(up(), rational(1, 3)),
                PlaneSide::Positive,
            )],
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: CsgNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_plane_through() {
        let plane = Plane::through(&vec3i(0, 0, 2), up());
        assert_eq!(plane.offset, integer(2));
        assert_eq!(plane.signed_value(&vec3i(5, 5, 3)), integer(1));
    }
}

//! Loose parts that travel with a joint: pegs and wedges.

use num_traits::Signed;
use serde::{Deserialize, Serialize};

use kerf_ir::{cylinder, difference, half_plane_cut, prism, CsgNode, Plane, PlaneSide};
use kerf_kernel_math::{integer, vec2, vec3, vec3i, Orientation, Scalar, Vec3};

use crate::{JointError, Result};

/// Cross-section of a peg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PegShape {
    /// Round peg; `size` is the diameter.
    Round,
    /// Square peg; `size` is the side length.
    Square,
}

/// A peg driven through a joint.
///
/// The peg runs along its local Z axis: `forward_length` into the wood from
/// `position`, and `stickout_length` back out of the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peg {
    /// World point where the peg enters the wood.
    pub position: Vec3,
    /// World frame; local Z points into the wood.
    pub orientation: Orientation,
    /// Cross-section shape.
    pub shape: PegShape,
    /// Diameter or side length.
    pub size: Scalar,
    /// Length inside the wood.
    pub forward_length: Scalar,
    /// Length left standing proud of the surface.
    pub stickout_length: Scalar,
}

impl Peg {
    /// The peg solid in its own frame.
    pub fn to_csg_local(&self) -> CsgNode {
        self.solid(-self.stickout_length.clone())
    }

    /// The peg solid in world space.
    pub fn to_csg(&self) -> CsgNode {
        self.to_csg_local()
            .transformed(&self.orientation, &self.position)
    }

    /// The hole the peg needs, in world space: the solid without its stickout.
    pub fn hole_csg(&self) -> CsgNode {
        self.solid(integer(0))
            .transformed(&self.orientation, &self.position)
    }

    fn solid(&self, start: Scalar) -> CsgNode {
        match self.shape {
            PegShape::Square => prism(
                vec2(self.size.clone(), self.size.clone()),
                vec3i(0, 0, 0),
                Orientation::identity(),
                Some(start),
                Some(self.forward_length.clone()),
            ),
            PegShape::Round => cylinder(
                vec3i(0, 0, 0),
                vec3i(0, 0, 1),
                &self.size / integer(2),
                Some(start),
                Some(self.forward_length.clone()),
            ),
        }
    }
}

/// A tapered wedge, driven into a kerf in a tenon end.
///
/// In the wedge's frame the thick end sits on the XY plane centered on the
/// origin and the wedge runs along +Z for `length`. The width along X tapers
/// from `base_width` to `tip_width`; the height along Y is constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wedge {
    /// World position of the center of the thick end.
    pub position: Vec3,
    /// World frame; local Z points toward the tip.
    pub orientation: Orientation,
    /// Width at the thick end.
    pub base_width: Scalar,
    /// Width at the tip.
    pub tip_width: Scalar,
    /// Constant thickness along local Y.
    pub height: Scalar,
    /// Distance from thick end to tip.
    pub length: Scalar,
}

impl Wedge {
    /// Check the wedge dimensions.
    pub fn validate(&self) -> Result<()> {
        if !self.base_width.is_positive() || !self.height.is_positive() || !self.length.is_positive() {
            return Err(JointError::InvalidParameter(
                "wedge base width, height and length must be positive".to_string(),
            ));
        }
        if self.tip_width.is_negative() || self.tip_width > self.base_width {
            return Err(JointError::InvalidParameter(format!(
                "wedge tip width {} must lie between 0 and the base width {}",
                self.tip_width, self.base_width
            )));
        }
        Ok(())
    }

    /// The wedge solid in its own frame: a box with both tapered sides
    /// trimmed by half-planes.
    pub fn to_csg_local(&self) -> CsgNode {
        let body = prism(
            vec2(self.base_width.clone(), self.height.clone()),
            vec3i(0, 0, 0),
            Orientation::identity(),
            Some(integer(0)),
            Some(self.length.clone()),
        );
        let lean = (&self.base_width - &self.tip_width) / integer(2);
        let offset = &self.length * &self.base_width / integer(2);
        let side = |sign: i64| {
            half_plane_cut(
                Plane::new(
                    vec3(&self.length * integer(sign), integer(0), lean.clone()),
                    offset.clone(),
                ),
                PlaneSide::Positive,
            )
        };
        difference(body, vec![side(1), side(-1)])
    }

    /// The wedge solid in world space.
    pub fn to_csg(&self) -> CsgNode {
        self.to_csg_local()
            .transformed(&self.orientation, &self.position)
    }
}

/// A loose part attached to a timber by a joint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accessory {
    /// A peg.
    Peg(Peg),
    /// A wedge.
    Wedge(Wedge),
}

impl Accessory {
    /// World-space solid.
    pub fn to_csg(&self) -> CsgNode {
        match self {
            Accessory::Peg(p) => p.to_csg(),
            Accessory::Wedge(w) => w.to_csg(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::{east, rational, up};

    fn peg(shape: PegShape) -> Peg {
        Peg {
            position: vec3i(1, 2, 3),
            orientation: Orientation::identity(),
            shape,
            size: rational(1, 50),
            forward_length: rational(3, 10),
            stickout_length: rational(1, 20),
        }
    }

    #[test]
    fn test_square_peg_spans_stickout_to_forward() {
        let p = peg(PegShape::Square);
        let local = p.to_csg_local();
        assert!(local.contains_point(&vec3(integer(0), integer(0), rational(-1, 20))));
        assert!(local.contains_point(&vec3(integer(0), integer(0), rational(3, 10))));
        assert!(!local.contains_point(&vec3(integer(0), integer(0), rational(-1, 10))));
        let b = p.to_csg().bounds().unwrap();
        assert_eq!(b.min.z, rational(59, 20));
        assert_eq!(b.max.z, rational(33, 10));
    }

    #[test]
    fn test_round_peg_hole_has_no_stickout() {
        let p = peg(PegShape::Round);
        let hole = p.hole_csg();
        assert!(hole.contains_point(&vec3i(1, 2, 3)));
        assert!(!hole.contains_point(&vec3(integer(1), integer(2), rational(299, 100))));
        assert!(p.to_csg().contains_point(&vec3(integer(1), integer(2), rational(299, 100))));
        // radius is half the size
        assert!(!hole.contains_point(&vec3(rational(1011, 1000), integer(2), rational(31, 10))));
    }

    #[test]
    fn test_wedge_tapers_from_base_to_tip() {
        let w = Wedge {
            position: vec3i(0, 0, 0),
            orientation: Orientation::from_directions(&up(), &east()).unwrap(),
            base_width: rational(1, 10),
            tip_width: rational(1, 50),
            height: rational(1, 20),
            length: rational(1, 5),
        };
        w.validate().unwrap();
        let local = w.to_csg_local();
        // tapered faces belong to the trimmed half-planes, so sample just inside
        assert!(local.contains_point(&vec3(rational(49, 1000), integer(0), integer(0))));
        assert!(local.contains_point(&vec3(rational(9, 1000), integer(0), rational(1, 5))));
        assert!(!local.contains_point(&vec3(rational(1, 40), integer(0), rational(1, 5))));
        assert!(!local.contains_point(&vec3(rational(-1, 40), integer(0), rational(1, 5))));
        // halfway the half-width is (0.05 + 0.01) / 2
        assert!(local.contains_point(&vec3(rational(29, 1000), integer(0), rational(1, 10))));
        assert!(!local.contains_point(&vec3(rational(31, 1000), integer(0), rational(1, 10))));
        assert!(Accessory::Wedge(w).to_csg().bounds().is_ok());
    }

    #[test]
    fn test_wedge_validation() {
        let w = Wedge {
            position: vec3i(0, 0, 0),
            orientation: Orientation::identity(),
            base_width: rational(1, 10),
            tip_width: rational(1, 5),
            height: rational(1, 20),
            length: rational(1, 5),
        };
        assert!(matches!(w.validate(), Err(JointError::InvalidParameter(_))));
    }

    #[test]
    fn test_accessory_serde_round_trip() {
        let a = Accessory::Peg(peg(PegShape::Round));
        let json = serde_json::to_string(&a).unwrap();
        let back: Accessory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}

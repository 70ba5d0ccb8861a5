//! The footprint polygon and its queries.

use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use kerf_kernel_math::{
    cross2, integer, lift, normalize, perp_left, sqrt, Scalar, Tolerance, Vec2,
};

use crate::segment::{
    point_on_segment, point_segment_distance_squared, segment_segment_distance_squared,
    segments_intersect,
};
use crate::{FootprintError, Result};

/// Distance from a query to the nearest footprint side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryDistance {
    /// Index of the side (side `i` runs from corner `i` to corner `i + 1`).
    pub index: usize,
    /// Exact squared distance.
    pub distance_squared: Scalar,
    /// Distance (exact when the squared distance is a rational square).
    pub distance: Scalar,
}

/// An ordered ring of ground-plane corners; the last connects to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    corners: Vec<Vec2>,
}

impl Footprint {
    /// Wrap a corner ring. Use [`Footprint::validate`] before placing timbers.
    pub fn new(corners: Vec<Vec2>) -> Self {
        Self { corners }
    }

    /// All corners in order.
    pub fn corners(&self) -> &[Vec2] {
        &self.corners
    }

    /// Number of corners (and sides).
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Whether there are no corners at all.
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.corners.len() {
            Ok(())
        } else {
            Err(FootprintError::IndexOutOfRange {
                index,
                len: self.corners.len(),
            })
        }
    }

    /// Corner `i`.
    pub fn corner(&self, index: usize) -> Result<&Vec2> {
        self.check_index(index)?;
        Ok(&self.corners[index])
    }

    /// Side `i` as `(corner i, corner i + 1)`.
    pub fn side(&self, index: usize) -> Result<(&Vec2, &Vec2)> {
        self.check_index(index)?;
        let next = (index + 1) % self.corners.len();
        Ok((&self.corners[index], &self.corners[next]))
    }

    /// All sides in order.
    pub fn sides(&self) -> Vec<(&Vec2, &Vec2)> {
        let n = self.corners.len();
        (0..n)
            .map(|i| (&self.corners[i], &self.corners[(i + 1) % n]))
            .collect()
    }

    /// Unnormalized vector from corner `i` to corner `i + 1`.
    pub fn side_vector(&self, index: usize) -> Result<Vec2> {
        let (a, b) = self.side(index)?;
        Ok(b - a)
    }

    /// Unit direction of side `i`.
    pub fn side_direction(&self, index: usize) -> Result<Vec2> {
        let v = self.side_vector(index)?;
        let n = normalize(&lift(&v, Scalar::zero())).map_err(|_| {
            FootprintError::SelfIntersecting {
                first: index,
                second: index,
            }
        })?;
        Ok(Vec2::new(n.x.clone(), n.y.clone()))
    }

    /// Length of side `i`.
    pub fn side_length(&self, index: usize) -> Result<Scalar> {
        let v = self.side_vector(index)?;
        Ok(sqrt(&v.dot(&v)).unwrap_or_else(Scalar::zero))
    }

    // =========================================================================
    // Validity
    // =========================================================================

    /// Whether the footprint is a simple polygon with at least 3 corners.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the footprint, reporting the first defect found.
    ///
    /// Requires at least 3 corners, no zero-length side, no contact between
    /// non-adjacent sides, and no adjacent sides folding back along each
    /// other.
    pub fn validate(&self) -> Result<()> {
        let n = self.corners.len();
        if n < 3 {
            return Err(FootprintError::TooFewCorners(n));
        }
        let sides = self.sides();

        for (i, (a, b)) in sides.iter().enumerate() {
            if a == b {
                return Err(FootprintError::SelfIntersecting {
                    first: i,
                    second: i,
                });
            }
        }

        for i in 0..n {
            let j = (i + 1) % n;
            let (a, b) = sides[i];
            let (_, c) = sides[j];
            // adjacent sides share corner b; they overlap only when c folds back onto a-b
            let u = b - a;
            let v = c - b;
            if cross2(&u, &v).is_zero() && u.dot(&v).is_negative() {
                return Err(FootprintError::SelfIntersecting { first: i, second: j });
            }
        }

        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (p1, p2) = sides[i];
                let (p3, p4) = sides[j];
                if segments_intersect(p1, p2, p3, p4) {
                    return Err(FootprintError::SelfIntersecting { first: i, second: j });
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Winding
    // =========================================================================

    /// Shoelace signed area; positive for counter-clockwise corners.
    pub fn signed_area(&self) -> Scalar {
        let n = self.corners.len();
        let twice: Scalar = (0..n)
            .map(|i| cross2(&self.corners[i], &self.corners[(i + 1) % n]))
            .fold(Scalar::zero(), |acc, v| acc + v);
        twice / integer(2)
    }

    /// Whether the corners wind counter-clockwise seen from above.
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area().is_positive()
    }

    /// Unit normal of side `i` pointing into the footprint.
    ///
    /// Taken from the winding: the left perpendicular for counter-clockwise
    /// footprints, the right one otherwise.
    pub fn inward_normal(&self, index: usize) -> Result<Vec2> {
        let dir = self.side_direction(index)?;
        let left = perp_left(&dir);
        Ok(if self.is_counter_clockwise() { left } else { -left })
    }

    // =========================================================================
    // Point queries
    // =========================================================================

    /// Even-odd ray cast. Points on the boundary count as inside.
    pub fn contains_point(&self, p: &Vec2) -> bool {
        let sides = self.sides();
        if sides.iter().any(|(a, b)| point_on_segment(a, b, p)) {
            return true;
        }
        let mut inside = false;
        for (a, b) in sides {
            // half-open in y so a vertex on the ray is counted once
            if (a.y > p.y) != (b.y > p.y) {
                let t = (&p.y - &a.y) / (&b.y - &a.y);
                let x_cross = &a.x + t * (&b.x - &a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Index and position of the corner closest to `p`; ties go to the
    /// lowest index. `None` for an empty footprint.
    pub fn nearest_corner(&self, p: &Vec2) -> Option<(usize, &Vec2)> {
        let mut best: Option<(usize, Scalar)> = None;
        for (i, c) in self.corners.iter().enumerate() {
            let d = c - p;
            let d2 = d.dot(&d);
            if best.as_ref().map_or(true, |(_, b)| d2 < *b) {
                best = Some((i, d2));
            }
        }
        best.map(|(i, _)| (i, &self.corners[i]))
    }

    /// Side closest to `p` by clamped perpendicular distance; ties go to the
    /// lowest side index. `None` for an empty footprint.
    pub fn nearest_boundary(&self, p: &Vec2) -> Option<BoundaryDistance> {
        self.nearest_side_by(|a, b| point_segment_distance_squared(p, a, b))
    }

    /// Side closest to the segment `start`-`end`; ties go to the lowest side
    /// index. `None` for an empty footprint.
    pub fn nearest_boundary_from_segment(&self, start: &Vec2, end: &Vec2) -> Option<BoundaryDistance> {
        self.nearest_side_by(|a, b| segment_segment_distance_squared(start, end, a, b))
    }

    fn nearest_side_by(&self, dist2: impl Fn(&Vec2, &Vec2) -> Scalar) -> Option<BoundaryDistance> {
        let mut best: Option<(usize, Scalar)> = None;
        for (i, (a, b)) in self.sides().into_iter().enumerate() {
            let d2 = dist2(a, b);
            if best.as_ref().map_or(true, |(_, current)| d2 < *current) {
                best = Some((i, d2));
            }
        }
        best.map(|(index, distance_squared)| BoundaryDistance {
            index,
            distance: sqrt(&distance_squared).unwrap_or_else(Scalar::zero),
            distance_squared,
        })
    }

    /// Whether the two sides meeting at corner `i` are perpendicular.
    ///
    /// Exact for rational corners; approximated inputs are compared within
    /// [`Tolerance::default`].
    pub fn corner_is_orthogonal(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        let n = self.corners.len();
        let prev = (index + n - 1) % n;
        let incoming = self.side_vector(prev)?;
        let outgoing = self.side_vector(index)?;
        Ok(Tolerance::default().are_perpendicular(
            &lift(&incoming, Scalar::zero()),
            &lift(&outgoing, Scalar::zero()),
        ))
    }
}

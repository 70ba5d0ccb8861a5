//! Exact queries over CSG nodes: validation, membership, bounds.

use num_traits::{Signed, Zero};

use kerf_kernel_math::{integer, normalize, rational, scale, vec3i, Orientation, Scalar, Tolerance, Vec3};

use crate::{Aabb, CsgError, CsgNode, Cylinder, Plane, PlaneSide, Primitive, Prism};

impl CsgNode {
    /// Check structural validity of the whole tree.
    ///
    /// Sizes and radii must be positive, closed ranges non-empty, normals
    /// and axes non-zero and unions non-empty.
    pub fn validate(&self) -> Result<(), CsgError> {
        match self {
            CsgNode::Primitive(Primitive::Prism(p)) => {
                if !p.size.x.is_positive() || !p.size.y.is_positive() {
                    return Err(CsgError::NonPositiveSize);
                }
                check_range(&p.start, &p.end)
            }
            CsgNode::Primitive(Primitive::Cylinder(c)) => {
                if !c.radius.is_positive() {
                    return Err(CsgError::NonPositiveSize);
                }
                if c.axis.iter().all(|v| v.is_zero()) {
                    return Err(CsgError::ZeroAxis);
                }
                check_range(&c.start, &c.end)
            }
            CsgNode::Union { children } => {
                if children.is_empty() {
                    return Err(CsgError::EmptyUnion);
                }
                children.iter().try_for_each(CsgNode::validate)
            }
            CsgNode::Difference { base, subtract } => {
                base.validate()?;
                subtract.iter().try_for_each(CsgNode::validate)
            }
            CsgNode::HalfPlaneCut { plane, .. } => {
                if plane.normal.iter().all(|v| v.is_zero()) {
                    return Err(CsgError::ZeroNormal);
                }
                Ok(())
            }
        }
    }

    /// Exact point membership (boundaries count as inside).
    pub fn contains_point(&self, p: &Vec3) -> bool {
        match self {
            CsgNode::Primitive(Primitive::Prism(prism)) => prism_contains(prism, p),
            CsgNode::Primitive(Primitive::Cylinder(cyl)) => cylinder_contains(cyl, p),
            CsgNode::Union { children } => children.iter().any(|c| c.contains_point(p)),
            CsgNode::Difference { base, subtract } => {
                base.contains_point(p) && !subtract.iter().any(|c| c.contains_point(p))
            }
            CsgNode::HalfPlaneCut { plane, keep } => {
                let v = plane.signed_value(p);
                match keep {
                    PlaneSide::Positive => !v.is_negative(),
                    PlaneSide::Negative => !v.is_positive(),
                }
            }
        }
    }

    /// Whether the node describes a finite solid.
    pub fn is_bounded(&self) -> bool {
        match self {
            CsgNode::Primitive(Primitive::Prism(p)) => p.start.is_some() && p.end.is_some(),
            CsgNode::Primitive(Primitive::Cylinder(c)) => c.start.is_some() && c.end.is_some(),
            CsgNode::Union { children } => {
                !children.is_empty() && children.iter().all(CsgNode::is_bounded)
            }
            CsgNode::Difference { base, .. } => base.is_bounded(),
            CsgNode::HalfPlaneCut { .. } => false,
        }
    }

    /// Conservative axis-aligned bounds of a bounded node.
    ///
    /// Differences report their base's bounds. Cylinders are boxed by their
    /// end disks padded by the radius on every axis.
    pub fn bounds(&self) -> Result<Aabb, CsgError> {
        match self {
            CsgNode::Primitive(Primitive::Prism(p)) => {
                let corners = prism_corners(p)?;
                Aabb::from_points(corners.iter()).ok_or(CsgError::Unbounded)
            }
            CsgNode::Primitive(Primitive::Cylinder(c)) => {
                let (start, end) = match (&c.start, &c.end) {
                    (Some(s), Some(e)) => (s, e),
                    _ => return Err(CsgError::Unbounded),
                };
                let a = &c.position + scale(&c.axis, start);
                let b = &c.position + scale(&c.axis, end);
                let mut out = Aabb::from_point(&a);
                out.include(&b);
                Ok(out.pad(&c.radius))
            }
            CsgNode::Union { children } => {
                let mut iter = children.iter();
                let first = iter.next().ok_or(CsgError::EmptyUnion)?.bounds()?;
                iter.try_fold(first, |acc, c| Ok(acc.union(&c.bounds()?)))
            }
            CsgNode::Difference { base, .. } => base.bounds(),
            CsgNode::HalfPlaneCut { .. } => Err(CsgError::Unbounded),
        }
    }

    /// A boundary point minimizing `p . direction`.
    ///
    /// Fails with [`CsgError::Unbounded`] when the node runs to infinity
    /// against `direction`. A half-plane is bounded only when `direction`
    /// points into its kept side along the normal.
    pub fn minimal_boundary(&self, direction: &Vec3) -> Result<Vec3, CsgError> {
        match self {
            CsgNode::Primitive(Primitive::Prism(p)) => {
                let length = p.orientation.length_direction();
                let along = direction.dot(&length);
                if (p.start.is_none() && along.is_positive())
                    || (p.end.is_none() && along.is_negative())
                {
                    return Err(CsgError::Unbounded);
                }
                // an open end is never minimal here, so close it at the other end
                let closed = Prism {
                    start: p.start.clone().or_else(|| p.end.clone()),
                    end: p.end.clone().or_else(|| p.start.clone()),
                    ..p.clone()
                };
                let corners = prism_corners(&closed)?;
                min_by_dot(corners.iter(), direction).ok_or(CsgError::Unbounded)
            }
            CsgNode::Primitive(Primitive::Cylinder(c)) => cylinder_minimal(c, direction),
            CsgNode::Union { children } => {
                let points: Vec<Vec3> = children
                    .iter()
                    .filter_map(|c| c.minimal_boundary(direction).ok())
                    .collect();
                min_by_dot(points.iter(), direction).ok_or(CsgError::Unbounded)
            }
            CsgNode::Difference { base, .. } => base.minimal_boundary(direction),
            CsgNode::HalfPlaneCut { plane, keep } => {
                let inward = match keep {
                    PlaneSide::Positive => plane.normal.clone(),
                    PlaneSide::Negative => -plane.normal.clone(),
                };
                if !Tolerance::default().same_direction(&inward, direction) {
                    return Err(CsgError::Unbounded);
                }
                let nn = plane.normal.dot(&plane.normal);
                if nn.is_zero() {
                    return Err(CsgError::ZeroNormal);
                }
                Ok(scale(&plane.normal, &(&plane.offset / nn)))
            }
        }
    }

    /// Copy of this tree with every point mapped by `p -> rotation * p + translation`.
    pub fn transformed(&self, rotation: &Orientation, translation: &Vec3) -> CsgNode {
        let map_point = |p: &Vec3| rotation.apply(p) + translation;
        match self {
            CsgNode::Primitive(Primitive::Prism(p)) => CsgNode::Primitive(Primitive::Prism(Prism {
                size: p.size.clone(),
                position: map_point(&p.position),
                orientation: rotation.multiply(&p.orientation),
                start: p.start.clone(),
                end: p.end.clone(),
            })),
            CsgNode::Primitive(Primitive::Cylinder(c)) => {
                CsgNode::Primitive(Primitive::Cylinder(Cylinder {
                    position: map_point(&c.position),
                    axis: rotation.apply(&c.axis),
                    radius: c.radius.clone(),
                    start: c.start.clone(),
                    end: c.end.clone(),
                }))
            }
            CsgNode::Union { children } => CsgNode::Union {
                children: children
                    .iter()
                    .map(|c| c.transformed(rotation, translation))
                    .collect(),
            },
            CsgNode::Difference { base, subtract } => CsgNode::Difference {
                base: Box::new(base.transformed(rotation, translation)),
                subtract: subtract
                    .iter()
                    .map(|c| c.transformed(rotation, translation))
                    .collect(),
            },
            CsgNode::HalfPlaneCut { plane, keep } => {
                let normal = rotation.apply(&plane.normal);
                let offset = &plane.offset + translation.dot(&normal);
                CsgNode::HalfPlaneCut {
                    plane: Plane { normal, offset },
                    keep: *keep,
                }
            }
        }
    }
}

fn check_range(start: &Option<Scalar>, end: &Option<Scalar>) -> Result<(), CsgError> {
    match (start, end) {
        (Some(s), Some(e)) if s >= e => Err(CsgError::EmptyExtent),
        _ => Ok(()),
    }
}

fn prism_contains(p: &Prism, point: &Vec3) -> bool {
    let local = p.orientation.apply_inverse(&(point - &p.position));
    let hw = &p.size.x / integer(2);
    let hh = &p.size.y / integer(2);
    if local.x.abs() > hw || local.y.abs() > hh {
        return false;
    }
    let after_start = p.start.as_ref().map_or(true, |s| &local.z >= s);
    let before_end = p.end.as_ref().map_or(true, |e| &local.z <= e);
    after_start && before_end
}

fn cylinder_contains(c: &Cylinder, point: &Vec3) -> bool {
    let d = point - &c.position;
    let t = d.dot(&c.axis);
    let radial_sq = d.dot(&d) - &t * &t;
    if radial_sq > &c.radius * &c.radius {
        return false;
    }
    let after_start = c.start.as_ref().map_or(true, |s| &t >= s);
    let before_end = c.end.as_ref().map_or(true, |e| &t <= e);
    after_start && before_end
}

/// The eight corners of a closed prism.
fn prism_corners(p: &Prism) -> Result<Vec<Vec3>, CsgError> {
    let (start, end) = match (&p.start, &p.end) {
        (Some(s), Some(e)) => (s, e),
        _ => return Err(CsgError::Unbounded),
    };
    let two = integer(2);
    let hw = &p.size.x / &two;
    let hh = &p.size.y / &two;
    let w = p.orientation.width_direction();
    let h = p.orientation.height_direction();
    let l = p.orientation.length_direction();
    let mut out = Vec::with_capacity(8);
    for z in [start, end] {
        for sw in [-1i64, 1] {
            for sh in [-1i64, 1] {
                let sw = integer(sw);
                let sh = integer(sh);
                let corner = &p.position
                    + scale(&l, z)
                    + scale(&w, &(&hw * &sw))
                    + scale(&h, &(&hh * &sh));
                out.push(corner);
            }
        }
    }
    Ok(out)
}

fn cylinder_minimal(c: &Cylinder, direction: &Vec3) -> Result<Vec3, CsgError> {
    let along = direction.dot(&c.axis);
    if (c.start.is_none() && along.is_positive()) || (c.end.is_none() && along.is_negative()) {
        return Err(CsgError::Unbounded);
    }
    let perp = direction - scale(&c.axis, &along);
    let radial = match normalize(&perp) {
        Ok(n) => -n,
        // direction runs along the axis: every rim point is minimal, pick one
        Err(_) => {
            let helper = if c.axis.x.abs() < rational(1, 2) {
                vec3i(1, 0, 0)
            } else {
                vec3i(0, 1, 0)
            };
            normalize(&c.axis.cross(&helper)).map_err(|_| CsgError::ZeroAxis)?
        }
    };
    let rim = scale(&radial, &c.radius);
    let candidates: Vec<Vec3> = [&c.start, &c.end]
        .into_iter()
        .flatten()
        .map(|d| &c.position + scale(&c.axis, d) + &rim)
        .collect();
    min_by_dot(candidates.iter(), direction).ok_or(CsgError::Unbounded)
}

fn min_by_dot<'a>(points: impl Iterator<Item = &'a Vec3>, direction: &Vec3) -> Option<Vec3> {
    points
        .min_by(|a, b| a.dot(direction).cmp(&b.dot(direction)))
        .cloned()
}

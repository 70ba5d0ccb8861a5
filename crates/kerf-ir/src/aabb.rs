//! Exact axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use kerf_kernel_math::{vec3_to_f64, Scalar, Vec3};

/// An axis-aligned box `[min, max]`, closed on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box holding a single point.
    pub fn from_point(p: &Vec3) -> Self {
        Self {
            min: p.clone(),
            max: p.clone(),
        }
    }

    /// Smallest box holding every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = Self::from_point(iter.next()?);
        Some(iter.fold(first, |mut acc, p| {
            acc.include(p);
            acc
        }))
    }

    /// Grow to include `p`.
    pub fn include(&mut self, p: &Vec3) {
        for i in 0..3 {
            if p[i] < self.min[i] {
                self.min[i] = p[i].clone();
            }
            if p[i] > self.max[i] {
                self.max[i] = p[i].clone();
            }
        }
    }

    /// Smallest box holding both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = self.clone();
        out.include(&other.min);
        out.include(&other.max);
        out
    }

    /// Grow by `padding` on every side.
    pub fn pad(&self, padding: &Scalar) -> Aabb {
        Aabb {
            min: self.min.map(|c| c - padding),
            max: self.max.map(|c| c + padding),
        }
    }

    /// Closed containment test.
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    /// Edge lengths along X, Y, Z.
    pub fn size(&self) -> Vec3 {
        &self.max - &self.min
    }

    /// The eight corners.
    pub fn corners(&self) -> [Vec3; 8] {
        let pick = |bits: usize| {
            Vec3::from_fn(|i, _| {
                if bits & (1 << i) == 0 {
                    self.min[i].clone()
                } else {
                    self.max[i].clone()
                }
            })
        };
        std::array::from_fn(pick)
    }

    /// Float `(min, max)` for renderers.
    pub fn to_f64(&self) -> (nalgebra::Vector3<f64>, nalgebra::Vector3<f64>) {
        (vec3_to_f64(&self.min), vec3_to_f64(&self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::{rational, vec3i};

    #[test]
    fn test_from_points_and_contains() {
        let pts = [vec3i(0, 0, 0), vec3i(2, -1, 3), vec3i(1, 4, -2)];
        let b = Aabb::from_points(pts.iter()).unwrap();
        assert_eq!(b.min, vec3i(0, -1, -2));
        assert_eq!(b.max, vec3i(2, 4, 3));
        assert!(pts.iter().all(|p| b.contains(p)));
        assert!(!b.contains(&vec3i(3, 0, 0)));
        assert!(Aabb::from_points(std::iter::empty::<&Vec3>()).is_none());
    }

    #[test]
    fn test_pad_and_union() {
        let a = Aabb::from_point(&vec3i(0, 0, 0));
        let b = Aabb::from_point(&vec3i(1, 1, 1));
        let u = a.union(&b).pad(&rational(1, 2));
        assert_eq!(u.size(), vec3i(2, 2, 2));
        assert!(u.contains_aabb(&a));
    }

    #[test]
    fn test_corners_are_distinct() {
        let b = Aabb::from_points([vec3i(0, 0, 0), vec3i(1, 2, 3)].iter()).unwrap();
        let corners = b.corners();
        assert_eq!(corners[0], vec3i(0, 0, 0));
        assert_eq!(corners[7], vec3i(1, 2, 3));
        assert_eq!(corners[1], vec3i(1, 0, 0));
    }
}

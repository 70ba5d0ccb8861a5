//! Exact 2D segment predicates and distances.

use num_traits::{One, Signed, Zero};

use kerf_kernel_math::{cross2, Scalar, Vec2};

/// Sign of the turn `a -> b -> c`: positive for counter-clockwise.
pub fn orient(a: &Vec2, b: &Vec2, c: &Vec2) -> Scalar {
    cross2(&(b - a), &(c - a))
}

/// Whether `p`, known to be collinear with `a`-`b`, lies within its box.
fn within_box(a: &Vec2, b: &Vec2, p: &Vec2) -> bool {
    let (lo_x, hi_x) = if a.x <= b.x { (&a.x, &b.x) } else { (&b.x, &a.x) };
    let (lo_y, hi_y) = if a.y <= b.y { (&a.y, &b.y) } else { (&b.y, &a.y) };
    lo_x <= &p.x && &p.x <= hi_x && lo_y <= &p.y && &p.y <= hi_y
}

/// Whether `p` lies on the closed segment `a`-`b`.
pub fn point_on_segment(a: &Vec2, b: &Vec2, p: &Vec2) -> bool {
    orient(a, b, p).is_zero() && within_box(a, b, p)
}

/// Whether closed segments `p1`-`p2` and `p3`-`p4` share any point.
pub fn segments_intersect(p1: &Vec2, p2: &Vec2, p3: &Vec2, p4: &Vec2) -> bool {
    let d1 = orient(p3, p4, p1);
    let d2 = orient(p3, p4, p2);
    let d3 = orient(p1, p2, p3);
    let d4 = orient(p1, p2, p4);

    let straddles = |a: &Scalar, b: &Scalar| {
        (a.is_positive() && b.is_negative()) || (a.is_negative() && b.is_positive())
    };
    if straddles(&d1, &d2) && straddles(&d3, &d4) {
        return true;
    }
    (d1.is_zero() && within_box(p3, p4, p1))
        || (d2.is_zero() && within_box(p3, p4, p2))
        || (d3.is_zero() && within_box(p1, p2, p3))
        || (d4.is_zero() && within_box(p1, p2, p4))
}

/// Squared distance from `p` to the closed segment `a`-`b`.
pub fn point_segment_distance_squared(p: &Vec2, a: &Vec2, b: &Vec2) -> Scalar {
    let ab = b - a;
    let ap = p - a;
    let len2 = ab.dot(&ab);
    if len2.is_zero() {
        return ap.dot(&ap);
    }
    let mut t = ap.dot(&ab) / &len2;
    if t.is_negative() {
        t = Scalar::zero();
    } else if t > Scalar::one() {
        t = Scalar::one();
    }
    let closest = a + ab.map(|c| c * &t);
    let d = p - closest;
    d.dot(&d)
}

/// Squared distance between two closed segments; zero when they intersect.
pub fn segment_segment_distance_squared(p1: &Vec2, p2: &Vec2, p3: &Vec2, p4: &Vec2) -> Scalar {
    if segments_intersect(p1, p2, p3, p4) {
        return Scalar::zero();
    }
    [
        point_segment_distance_squared(p1, p3, p4),
        point_segment_distance_squared(p2, p3, p4),
        point_segment_distance_squared(p3, p1, p2),
        point_segment_distance_squared(p4, p1, p2),
    ]
    .into_iter()
    .min()
    .unwrap_or_else(Scalar::zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::{integer, vec2};

    fn p(x: i64, y: i64) -> Vec2 {
        vec2(integer(x), integer(y))
    }

    #[test]
    fn test_crossing_segments_intersect() {
        assert!(segments_intersect(&p(0, 0), &p(2, 2), &p(0, 2), &p(2, 0)));
        assert!(!segments_intersect(&p(0, 0), &p(1, 0), &p(0, 1), &p(1, 1)));
    }

    #[test]
    fn test_touching_and_collinear_segments() {
        // T junction
        assert!(segments_intersect(&p(0, 0), &p(2, 0), &p(1, 0), &p(1, 5)));
        // collinear overlap
        assert!(segments_intersect(&p(0, 0), &p(3, 0), &p(2, 0), &p(5, 0)));
        // collinear, disjoint
        assert!(!segments_intersect(&p(0, 0), &p(1, 0), &p(2, 0), &p(5, 0)));
    }

    #[test]
    fn test_point_segment_distance_clamps() {
        assert_eq!(point_segment_distance_squared(&p(1, 3), &p(0, 0), &p(2, 0)), integer(9));
        assert_eq!(point_segment_distance_squared(&p(5, 4), &p(0, 0), &p(2, 0)), integer(25));
    }

    #[test]
    fn test_segment_segment_distance() {
        assert_eq!(
            segment_segment_distance_squared(&p(0, 0), &p(4, 0), &p(0, 2), &p(4, 2)),
            integer(4)
        );
        assert_eq!(
            segment_segment_distance_squared(&p(0, 0), &p(4, 4), &p(0, 4), &p(4, 0)),
            integer(0)
        );
    }
}

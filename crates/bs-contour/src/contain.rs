use bs_core::{Point2f, Rect, Segment, Shape};
use bs_path::sample_closed;
use serde::Serialize;

/// Even-odd test of `p` against the closed polygon through `polygon`.
pub fn polygon_contains(polygon: &[Point2f], p: Point2f) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut prev = polygon[polygon.len() - 1];
    for &cur in polygon {
        if Segment::new(prev, cur).cuts(p) {
            inside = !inside;
        }
        prev = cur;
    }
    inside
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Containment {
    /// Member centers inside the sampled contour.
    pub members_inside: usize,
    pub all_members: bool,
    /// Non-member centers inside the sampled contour.
    pub leaked: usize,
}

/// Checks member and non-member centers against `contour` (screen space),
/// sampled every `skip` points.
pub fn validate_contour(
    contour: &[Point2f],
    members: &[Shape],
    non_members: &[Shape],
    skip: usize,
) -> Containment {
    let polygon = sample_closed(contour, skip);
    let Some(bounds) = bounds_of(&polygon) else {
        return Containment::default();
    };

    let inside = |s: &Shape| {
        let c = s.center();
        bounds.contains_point(c) && polygon_contains(&polygon, c)
    };

    let members_inside = members.iter().filter(|m| inside(m)).count();
    Containment {
        members_inside,
        all_members: !members.is_empty() && members_inside == members.len(),
        leaked: non_members.iter().filter(|n| inside(n)).count(),
    }
}

fn bounds_of(polygon: &[Point2f]) -> Option<Rect> {
    if polygon.len() < 3 {
        return None;
    }
    let first = Rect::new(polygon[0].x, polygon[0].y, 0.0, 0.0);
    Some(polygon[1..].iter().fold(first, |r, &p| r.union_point(p)))
}

#[cfg(test)]
mod tests {
    use bs_core::{Point2f, Shape};

    use super::{polygon_contains, validate_contour};

    fn square(n: usize, side: f32) -> Vec<Point2f> {
        // `n` points per side, walked clockwise from the origin.
        let step = side / n as f32;
        let mut pts = Vec::with_capacity(4 * n);
        for i in 0..n {
            pts.push(Point2f::new(i as f32 * step, 0.0));
        }
        for i in 0..n {
            pts.push(Point2f::new(side, i as f32 * step));
        }
        for i in 0..n {
            pts.push(Point2f::new(side - i as f32 * step, side));
        }
        for i in 0..n {
            pts.push(Point2f::new(0.0, side - i as f32 * step));
        }
        pts
    }

    #[test]
    fn even_odd_containment() {
        let sq = square(1, 10.0);
        assert!(polygon_contains(&sq, Point2f::new(5.0, 5.0)));
        assert!(!polygon_contains(&sq, Point2f::new(15.0, 5.0)));
        assert!(!polygon_contains(&sq, Point2f::new(5.0, -1.0)));
        assert!(!polygon_contains(&sq[..2], Point2f::new(5.0, 5.0)));
    }

    #[test]
    fn concave_polygon_excludes_its_notch() {
        let u = [
            Point2f::new(0.0, 0.0),
            Point2f::new(3.0, 0.0),
            Point2f::new(3.0, 3.0),
            Point2f::new(2.0, 3.0),
            Point2f::new(2.0, 1.0),
            Point2f::new(1.0, 1.0),
            Point2f::new(1.0, 3.0),
            Point2f::new(0.0, 3.0),
        ];
        assert!(polygon_contains(&u, Point2f::new(0.5, 2.0)));
        assert!(!polygon_contains(&u, Point2f::new(1.5, 2.0)));
        assert!(polygon_contains(&u, Point2f::new(2.5, 2.0)));
    }

    #[test]
    fn members_and_leaks_are_counted() {
        let contour = square(8, 100.0);
        let members = [Shape::rect(10.0, 10.0, 10.0, 10.0), Shape::circle(80.0, 50.0, 5.0)];
        let outside = Shape::rect(140.0, 10.0, 10.0, 10.0);
        let intruder = Shape::circle(50.0, 50.0, 5.0);

        let ok = validate_contour(&contour, &members, &[outside, intruder], 8);
        assert!(ok.all_members);
        assert_eq!(ok.members_inside, 2);
        assert_eq!(ok.leaked, 1);

        let partial = validate_contour(&contour, &[members[0], outside], &[], 8);
        assert!(!partial.all_members);
        assert_eq!(partial.members_inside, 1);
    }

    #[test]
    fn degenerate_contours_contain_nothing() {
        let members = [Shape::rect(0.0, 0.0, 10.0, 10.0)];
        let line = [Point2f::new(0.0, 0.0), Point2f::new(10.0, 10.0)];

        assert!(!validate_contour(&line, &members, &[], 8).all_members);
        assert!(!validate_contour(&[], &members, &[], 8).all_members);
        assert!(!validate_contour(&square(4, 100.0), &[], &[], 8).all_members);
    }
}

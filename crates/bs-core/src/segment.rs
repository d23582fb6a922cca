use serde::{Deserialize, Serialize};

use crate::geom::Point2f;
use crate::rect::Rect;

/// Straight line segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point2f,
    pub b: Point2f,
}

impl Segment {
    pub const fn new(a: Point2f, b: Point2f) -> Self {
        Self { a, b }
    }

    pub const fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            a: Point2f::new(x1, y1),
            b: Point2f::new(x2, y2),
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_corners(self.a, self.b)
    }

    pub fn length_sq(&self) -> f32 {
        self.a.dist_sq(self.b)
    }

    /// Squared distance from `p` to the closest point of the segment.
    pub fn dist_sq(&self, p: Point2f) -> f32 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let mut px = p.x - self.a.x;
        let mut py = p.y - self.a.y;

        let mut dot = px * dx + py * dy;
        let proj_len_sq = if dot <= 0.0 {
            0.0
        } else {
            px = dx - px;
            py = dy - py;
            dot = px * dx + py * dy;
            if dot <= 0.0 {
                0.0
            } else {
                dot * dot / (dx * dx + dy * dy)
            }
        };

        let len_sq = px * px + py * py - proj_len_sq;
        len_sq.max(0.0)
    }

    /// Whether a ray from `p` toward `+x` crosses this segment.
    ///
    /// Horizontal segments never count; the lower endpoint is exclusive and
    /// the upper inclusive, so a vertex shared by two edges counts once.
    pub fn cuts(&self, p: Point2f) -> bool {
        let (x1, y1, x2, y2) = (self.a.x, self.a.y, self.b.x, self.b.y);
        if y1 == y2 {
            return false;
        }
        if (p.y < y1 && p.y <= y2) || (p.y > y1 && p.y >= y2) {
            return false;
        }
        if p.x > x1 && p.x >= x2 {
            return false;
        }
        if p.x < x1 && p.x <= x2 {
            return true;
        }
        let cross = x1 + (p.y - y1) * (x2 - x1) / (y2 - y1);
        p.x <= cross
    }

    /// Whether `p` lies within the segment's bounding box padded by `r`.
    pub fn pt_close(&self, p: Point2f, r: f32) -> bool {
        let (min_x, max_x) = (self.a.x.min(self.b.x), self.a.x.max(self.b.x));
        let (min_y, max_y) = (self.a.y.min(self.b.y), self.a.y.max(self.b.y));
        p.x >= min_x - r && p.x <= max_x + r && p.y >= min_y - r && p.y <= max_y + r
    }
}

/// Outcome of intersecting two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    Point(Point2f),
    Parallel,
    Coincident,
    None,
}

impl Intersection {
    pub fn is_point(&self) -> bool {
        matches!(self, Intersection::Point(_))
    }

    pub fn point(&self) -> Option<Point2f> {
        match self {
            Intersection::Point(p) => Some(*p),
            _ => None,
        }
    }
}

pub fn intersect_segments(la: &Segment, lb: &Segment) -> Intersection {
    let (ua_t, ub_t, u_b) = cross_terms(la, lb);
    if u_b != 0.0 {
        let ua = ua_t / u_b;
        let ub = ub_t / u_b;
        if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
            return Intersection::Point(Point2f::new(
                la.a.x + ua * (la.b.x - la.a.x),
                la.a.y + ua * (la.b.y - la.a.y),
            ));
        }
        return Intersection::None;
    }
    if ua_t == 0.0 || ub_t == 0.0 {
        Intersection::Coincident
    } else {
        Intersection::Parallel
    }
}

/// Parameter along `la` at which it meets `lb`, if the segments cross.
pub fn fraction_along(la: &Segment, lb: &Segment) -> Option<f32> {
    let (ua_t, ub_t, u_b) = cross_terms(la, lb);
    if u_b == 0.0 {
        return None;
    }
    let ua = ua_t / u_b;
    let ub = ub_t / u_b;
    ((0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)).then_some(ua)
}

fn cross_terms(la: &Segment, lb: &Segment) -> (f32, f32, f32) {
    let ua_t = (lb.b.x - lb.a.x) * (la.a.y - lb.a.y) - (lb.b.y - lb.a.y) * (la.a.x - lb.a.x);
    let ub_t = (la.b.x - la.a.x) * (la.a.y - lb.a.y) - (la.b.y - la.a.y) * (la.a.x - lb.a.x);
    let u_b = (lb.b.y - lb.a.y) * (la.b.x - la.a.x) - (lb.b.x - lb.a.x) * (la.b.y - la.a.y);
    (ua_t, ub_t, u_b)
}

/// How a segment crosses the four edges of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectCrossing {
    pub top: Intersection,
    pub left: Intersection,
    pub bottom: Intersection,
    pub right: Intersection,
    pub count: usize,
}

pub fn rect_crossing(line: &Segment, rect: &Rect) -> RectCrossing {
    let [top, left, bottom, right] = rect.edges().map(|edge| intersect_segments(line, &edge));
    let count = [top, left, bottom, right]
        .iter()
        .filter(|i| i.is_point())
        .count();
    RectCrossing {
        top,
        left,
        bottom,
        right,
        count,
    }
}

/// Smallest distance, in line parameter units, between the midpoint of
/// `line` and a point where it crosses an edge of `rect`.
///
/// Edges are visited top, left, bottom, right and the scan stops once two
/// crossings are found. `None` when the line crosses no edge.
pub fn fraction_to_line_center(rect: &Rect, line: &Segment) -> Option<f32> {
    scan_edge_fractions(rect, line, |ua| (ua - 0.5).abs())
}

/// Like [`fraction_to_line_center`] but measured from the start of `line`.
pub fn fraction_to_line_end(rect: &Rect, line: &Segment) -> Option<f32> {
    scan_edge_fractions(rect, line, |ua| ua)
}

fn scan_edge_fractions(rect: &Rect, line: &Segment, measure: impl Fn(f32) -> f32) -> Option<f32> {
    let [top, left, bottom, right] = rect.edges();
    let mut best: Option<f32> = None;
    let mut count = 0usize;

    for (i, edge) in [top, left, bottom, right].iter().enumerate() {
        if i >= 2 && count > 1 {
            break;
        }
        if let Some(ua) = fraction_along(line, edge) {
            let d = measure(ua);
            count += 1;
            if best.is_none_or(|b| d < b) {
                best = Some(d);
            }
        }
    }
    best
}

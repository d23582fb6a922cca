use serde::{Deserialize, Serialize};

use crate::geom::Point2f;
use crate::segment::Segment;

pub const OUT_LEFT: u8 = 1;
pub const OUT_TOP: u8 = 2;
pub const OUT_RIGHT: u8 = 4;
pub const OUT_BOTTOM: u8 = 8;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle spanning both points.
    pub fn from_corners(a: Point2f, b: Point2f) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }

    pub fn x2(&self) -> f32 {
        self.x + self.width
    }

    pub fn y2(&self) -> f32 {
        self.y + self.height
    }

    pub fn cx(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn cy(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point2f {
        Point2f::new(self.cx(), self.cy())
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.x2().max(other.x2()) - x,
            height: self.y2().max(other.y2()) - y,
        }
    }

    pub fn union_point(&self, p: Point2f) -> Rect {
        let x = self.x.min(p.x);
        let y = self.y.min(p.y);
        Rect {
            x,
            y,
            width: self.x2().max(p.x) - x,
            height: self.y2().max(p.y) - y,
        }
    }

    /// Overlap of both rectangles, `None` when they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let x2 = self.x2().min(other.x2());
        let y2 = self.y2().min(other.y2());
        if x2 < x || y2 < y {
            return None;
        }
        Some(Rect::new(x, y, x2 - x, y2 - y))
    }

    /// Strict interior overlap. Degenerate rectangles never intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.area() <= 0.0 || other.area() <= 0.0 {
            return false;
        }
        other.x2() > self.x && other.y2() > self.y && other.x < self.x2() && other.y < self.y2()
    }

    /// Inclusive on all four edges.
    pub fn contains_point(&self, p: Point2f) -> bool {
        p.x >= self.x && p.x <= self.x2() && p.y >= self.y && p.y <= self.y2()
    }

    pub fn padded(&self, padding: f32) -> Rect {
        Rect {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + 2.0 * padding,
            height: self.height + 2.0 * padding,
        }
    }

    /// Cohen-Sutherland region flags of `p` relative to this rectangle.
    ///
    /// A degenerate axis reports both of its flags for every point.
    pub fn outcode(&self, p: Point2f) -> u8 {
        let mut out = 0;
        if self.width <= 0.0 {
            out |= OUT_LEFT | OUT_RIGHT;
        } else if p.x < self.x {
            out |= OUT_LEFT;
        } else if p.x > self.x2() {
            out |= OUT_RIGHT;
        }

        if self.height <= 0.0 {
            out |= OUT_TOP | OUT_BOTTOM;
        } else if p.y < self.y {
            out |= OUT_TOP;
        } else if p.y > self.y2() {
            out |= OUT_BOTTOM;
        }
        out
    }

    /// Squared distance from `p` to the rectangle, zero inside.
    pub fn dist_sq(&self, p: Point2f) -> f32 {
        if self.contains_point(p) {
            return 0.0;
        }

        let out = self.outcode(p);
        if out & OUT_TOP != 0 {
            if out & OUT_LEFT != 0 {
                return p.dist_sq(Point2f::new(self.x, self.y));
            }
            if out & OUT_RIGHT != 0 {
                return p.dist_sq(Point2f::new(self.x2(), self.y));
            }
            return (self.y - p.y) * (self.y - p.y);
        }
        if out & OUT_BOTTOM != 0 {
            if out & OUT_LEFT != 0 {
                return p.dist_sq(Point2f::new(self.x, self.y2()));
            }
            if out & OUT_RIGHT != 0 {
                return p.dist_sq(Point2f::new(self.x2(), self.y2()));
            }
            return (p.y - self.y2()) * (p.y - self.y2());
        }
        if out & OUT_LEFT != 0 {
            return (self.x - p.x) * (self.x - p.x);
        }
        if out & OUT_RIGHT != 0 {
            return (p.x - self.x2()) * (p.x - self.x2());
        }
        0.0
    }

    /// Whether any part of `seg` touches the rectangle (clipping test).
    pub fn intersects_segment(&self, seg: &Segment) -> bool {
        let (mut x1, mut y1) = (seg.a.x, seg.a.y);
        let (x2, y2) = (seg.b.x, seg.b.y);

        let out2 = self.outcode(seg.b);
        if out2 == 0 {
            return true;
        }

        let mut out1 = self.outcode(seg.a);
        while out1 != 0 {
            if out1 & out2 != 0 {
                return false;
            }
            if out1 & (OUT_LEFT | OUT_RIGHT) != 0 {
                let x = if out1 & OUT_RIGHT != 0 {
                    self.x2()
                } else {
                    self.x
                };
                y1 += (x - x1) * (y2 - y1) / (x2 - x1);
                x1 = x;
            } else {
                let y = if out1 & OUT_BOTTOM != 0 {
                    self.y2()
                } else {
                    self.y
                };
                x1 += (y - y1) * (x2 - x1) / (y2 - y1);
                y1 = y;
            }
            out1 = self.outcode(Point2f::new(x1, y1));
        }
        true
    }

    /// Edges in `top, left, bottom, right` order.
    pub fn edges(&self) -> [Segment; 4] {
        let tl = Point2f::new(self.x, self.y);
        let tr = Point2f::new(self.x2(), self.y);
        let bl = Point2f::new(self.x, self.y2());
        let br = Point2f::new(self.x2(), self.y2());
        [
            Segment::new(tl, tr),
            Segment::new(tl, bl),
            Segment::new(bl, br),
            Segment::new(tr, br),
        ]
    }
}

/// Grows every rectangle by `padding` on all sides.
pub fn pad_all(rects: &[Rect], padding: f32) -> Vec<Rect> {
    rects.iter().map(|r| r.padded(padding)).collect()
}

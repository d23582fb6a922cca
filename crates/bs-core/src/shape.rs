use serde::{Deserialize, Serialize};

use crate::Error;
use crate::geom::Point2f;
use crate::rect::Rect;
use crate::segment::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl Circle {
    pub const fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { cx, cy, radius }
    }

    pub fn center(&self) -> Point2f {
        Point2f::new(self.cx, self.cy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Circle,
}

/// A member or non-member of a bubble set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub const fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Rect(Rect::new(x, y, width, height))
    }

    pub const fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        Shape::Circle(Circle::new(cx, cy, radius))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    pub fn center(&self) -> Point2f {
        match self {
            Shape::Rect(r) => r.center(),
            Shape::Circle(c) => c.center(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => Rect::new(
                c.cx - c.radius,
                c.cy - c.radius,
                2.0 * c.radius,
                2.0 * c.radius,
            ),
        }
    }

    /// Squared distance from `p` to the shape outline, zero inside.
    pub fn dist_sq(&self, p: Point2f) -> f32 {
        match self {
            Shape::Rect(r) => r.dist_sq(p),
            Shape::Circle(c) => {
                let d = p.dist_sq(c.center()).sqrt() - c.radius;
                if d <= 0.0 { 0.0 } else { d * d }
            }
        }
    }

    pub fn contains_point(&self, p: Point2f) -> bool {
        match self {
            Shape::Rect(r) => r.contains_point(p),
            Shape::Circle(c) => p.dist_sq(c.center()) <= c.radius * c.radius,
        }
    }

    pub fn intersects_segment(&self, seg: &Segment) -> bool {
        match self {
            Shape::Rect(r) => r.intersects_segment(seg),
            Shape::Circle(c) => seg.dist_sq(c.center()) <= c.radius * c.radius,
        }
    }

    /// Rejects non-finite coordinates and negative dimensions.
    pub fn validate(&self) -> Result<(), Error> {
        let (values, dims) = match self {
            Shape::Rect(r) => (vec![r.x, r.y, r.width, r.height], vec![r.width, r.height]),
            Shape::Circle(c) => (vec![c.cx, c.cy, c.radius], vec![c.radius]),
        };
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidShape {
                reason: format!("non-finite coordinate in {self:?}"),
            });
        }
        if dims.iter().any(|&d| d < 0.0) {
            return Err(Error::InvalidShape {
                reason: format!("negative dimension in {self:?}"),
            });
        }
        Ok(())
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

#[cfg(test)]
mod tests {
    use super::{Shape, ShapeKind};
    use crate::geom::Point2f;
    use crate::rect::Rect;
    use crate::segment::Segment;

    #[test]
    fn circle_capabilities() {
        let c = Shape::circle(10.0, 10.0, 5.0);

        assert_eq!(c.kind(), ShapeKind::Circle);
        assert_eq!(c.center(), Point2f::new(10.0, 10.0));
        assert_eq!(c.bounds(), Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(c.dist_sq(Point2f::new(12.0, 10.0)), 0.0);
        assert!((c.dist_sq(Point2f::new(18.0, 10.0)) - 9.0).abs() < 1e-5);
        assert!(c.contains_point(Point2f::new(13.0, 13.0)));
        assert!(!c.contains_point(Point2f::new(14.0, 14.0)));

        assert!(c.intersects_segment(&Segment::from_coords(0.0, 12.0, 20.0, 12.0)));
        // Cuts the bounding box corner but misses the disc.
        assert!(!c.intersects_segment(&Segment::from_coords(4.0, 7.0, 7.0, 4.0)));
    }

    #[test]
    fn rect_capabilities_delegate() {
        let r = Shape::rect(0.0, 0.0, 10.0, 20.0);

        assert_eq!(r.kind(), ShapeKind::Rect);
        assert_eq!(r.center(), Point2f::new(5.0, 10.0));
        assert!((r.dist_sq(Point2f::new(13.0, 10.0)) - 9.0).abs() < 1e-6);
        assert!(r.intersects_segment(&Segment::from_coords(-5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn validation_rejects_bad_numbers() {
        assert!(Shape::rect(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(Shape::rect(0.0, 0.0, -1.0, 1.0).validate().is_err());
        assert!(Shape::circle(f32::NAN, 0.0, 1.0).validate().is_err());
        assert!(Shape::circle(0.0, 0.0, f32::INFINITY).validate().is_err());
    }

    #[test]
    fn serde_uses_kind_tag() {
        let json = r#"[{"kind":"rect","x":1,"y":2,"width":3,"height":4},
                       {"kind":"circle","cx":5,"cy":6,"radius":7}]"#;
        let shapes: Vec<Shape> = serde_json::from_str(json).expect("valid shapes");
        assert_eq!(
            shapes,
            vec![Shape::rect(1.0, 2.0, 3.0, 4.0), Shape::circle(5.0, 6.0, 7.0)]
        );
    }
}

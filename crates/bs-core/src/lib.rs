//! Foundational primitives for bubble set outlines.
//!
//! ## Coordinates
//! All shapes live in one screen coordinate space with `y` growing downward.
//! Rectangles are anchored at their top-left corner; circles at their center.
//!
//! ## Grids
//! [`Grid`] is a dense row-major buffer addressed by `(x, y)` cell indices.
//! Potential fields and influence templates are both grids of `f32` energy.
//!
//! ## Containment
//! Polygon containment is even-odd: a horizontal ray cast toward `+x` from the
//! query point is counted against every polygon edge with [`Segment::cuts`].

mod config;
mod error;
mod geom;
mod grid;
mod rect;
mod segment;
mod shape;

pub use config::OutlineConfig;
pub use error::Error;
pub use geom::{Point2f, Vec2f};
pub use grid::Grid;
pub use rect::{OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, Rect, pad_all};
pub use segment::{
    Intersection, RectCrossing, Segment, fraction_along, fraction_to_line_center,
    fraction_to_line_end, intersect_segments, rect_crossing,
};
pub use shape::{Circle, Shape, ShapeKind};

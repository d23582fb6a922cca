//! Post-processing of traced contours into consumable outlines.
//!
//! Pipeline, in order:
//! - [`sample_closed`] keeps every `skip`-th contour point. The stride shrinks
//!   toward 1 until at least three points survive (see [`sample_stride`]).
//! - [`simplify`] drops points that stay within a tolerance of the line
//!   spanned by their neighbours.
//! - [`bspline`] evaluates a uniform cubic B-spline over the control polygon.
//!
//! Simplification and smoothing are optional; [`PathConfig`] selects them.

mod bspline;
mod path;
mod sample;
mod simplify;

pub use bspline::bspline;
pub use path::{PathConfig, PointPath};
pub use sample::{sample_closed, sample_stride};
pub use simplify::simplify;

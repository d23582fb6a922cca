//! Contour extraction from a potential field.
//!
//! [`MarchingSquares`] walks the boundary of the super-level set
//! `energy > threshold`, one grid point per step. Cell state bits:
//! `1 = (x, y)`, `2 = (x + 1, y)`, `4 = (x, y + 1)`, `8 = (x + 1, y + 1)`.
//! Only the first loop found by a column-major scan is returned.
//!
//! [`validate_contour`] decides whether a traced loop encloses every member
//! center under the even-odd rule, after sampling it the same way the final
//! outline is sampled.

mod contain;
mod march;

pub use contain::{Containment, polygon_contains, validate_contour};
pub use march::{Contour, Direction, MarchingSquares, TraceEnd};

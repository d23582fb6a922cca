//! Bubble set outlines: iso-contours of a potential field that enclose a
//! group of member shapes while avoiding non-members.
//!
//! One computation runs these stages:
//! 1. Route virtual edges between members around non-members (`bs-route`).
//! 2. Cover members and edges with a padded active region and place one
//!    influence area per shape and edge segment (`bs-field`).
//! 3. Refine: fill the field, trace a contour at the current threshold and
//!    check that it holds every member center (`bs-contour`). Rejected
//!    contours loosen the threshold and factors, see [`RefineState::relax`].
//! 4. Sample the accepted contour into a screen-space [`bs_path::PointPath`].
//!
//! Failing to find a contour is not an error: [`Outline::outcome`] reports
//! why the path is empty.
//!
//! [`create_outline`] computes from scratch. [`BubbleSession`] keeps shapes
//! between calls and reuses influence areas for unchanged records.

mod outline;
mod refine;
mod region;
mod session;
mod sink;

pub use outline::{
    Outline, OutlineStats, create_outline, create_outline_with_sink, try_create_outline,
};
pub use refine::{FieldAreas, RefineOutcome, RefineReport, RefineState, fill_field, refine};
pub use region::{active_region, relevant_non_members};
pub use session::{BubbleSession, EdgeId, Role, ShapeId};
pub use sink::{FieldCell, FieldSink, FieldSnapshot, SnapshotSink};

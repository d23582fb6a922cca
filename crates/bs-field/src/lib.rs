//! Potential field over the active region of a bubble set.
//!
//! The field is a grid of `f32` energies sampled at cell corners: cell
//! `(i, j)` sits at screen point `origin + (i, j) * pixel_group`.
//!
//! Every shape or edge contributes through an [`InfluenceArea`], a small grid
//! placed at a signed cell offset. Each sample within `r1` of the geometry
//! holds `(d - r1)^2` at unit weight; callers scale it by
//! `factor / (r0 - r1)^2` when accumulating.
//!
//! Shape templates depend only on a [`TemplateKey`] (kind, size, sub-cell
//! phase, `r1`, `pixel_group`), so [`TemplateCache`] hands out shared grids
//! that are bit-identical to freshly built ones.

mod cache;
mod field;
mod layout;
mod template;

pub use cache::TemplateCache;
pub use field::PotentialField;
pub use layout::FieldLayout;
pub use template::{InfluenceArea, TemplateKey, build_segment_area, build_shape_area, influence};

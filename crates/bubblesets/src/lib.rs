//! Umbrella crate for the `bubblesets` workspace.
//!
//! Re-exports every stage crate; most callers only need
//! [`create_outline`] or [`BubbleSession`] plus the geometry types.

pub use bs_contour::*;
pub use bs_core::*;
pub use bs_field::*;
pub use bs_outline::*;
pub use bs_path::*;
pub use bs_route::*;

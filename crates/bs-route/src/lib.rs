//! Virtual edges that keep a bubble set connected.
//!
//! Members are visited in ascending distance from their centroid. Each member
//! links to the closest already-visited member, where the squared distance is
//! inflated by `(k + 1)^2` for the `k` obstacles the straight connection
//! crosses. The connection is then split at detour points placed just outside
//! an obstacle corner until no segment passes through an obstacle, and
//! finally consecutive segments are re-merged where the merged line is clear.
//!
//! Routing is best effort: a connection that still crosses an obstacle when
//! its iteration budget runs out is kept as-is and flagged.

mod corner;
mod router;

pub use corner::Corner;
pub use router::{EdgeRouter, VirtualEdge, route_virtual_edges};

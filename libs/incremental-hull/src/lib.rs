//! Randomized incremental 3D convex hull.
//!
//! The hull is kept as an index-based half-edge mesh ([`mesh::Dcel`]) while a
//! conflict graph ([`conflict::ConflictGraph`]) records which pending points
//! see which facets. [`HullBuilder`] inserts the points in a random order,
//! replacing the facets each point sees with a cone of caps around their
//! horizon. Caps coplanar with a neighbor extend it instead, so the result
//! may contain polygons with more than three sides.
//!
//! ```rust
//! use incremental_hull::{convex_hull, Vec3};
//!
//! let mut points = Vec::new();
//! for x in [0.0, 1.0] {
//!     for y in [0.0, 1.0] {
//!         for z in [0.0, 1.0] {
//!             points.push(Vec3::new(x, y, z));
//!         }
//!     }
//! }
//! points.push(Vec3::splat(0.5));
//!
//! let hull = convex_hull(points)?;
//! assert_eq!(hull.facet_count(), 6);
//! # Ok::<(), incremental_hull::HullError>(())
//! ```

pub mod builder;
pub mod conflict;
pub mod core;
pub mod error;
pub mod hull;
pub mod io;
pub mod mesh;
pub mod predicates;

pub use builder::{BuildState, BuildStats, HullBuilder};
pub use conflict::ConflictGraph;
pub use crate::core::vec3::Vec3;
pub use error::{HullError, HullResult};
pub use hull::{ConvexHull, HullFacet, TriangleMesh};
pub use mesh::{Dcel, FacetId, HalfEdgeId, PointId, TopologyError, TopologyResult};

pub use config::constants::{ConfigError, HullSettings};

/// Computes the convex hull of `points` with default settings.
pub fn convex_hull(points: Vec<Vec3>) -> HullResult<ConvexHull> {
    HullBuilder::new(points)?.build()
}

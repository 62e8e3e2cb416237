//! Restoring a minimal boundary around the facets an insertion touched.
//!
//! After stitching, a cap may share a plane with a neighboring cap or with an
//! older facet, and merged caps may leave a vertex on a straight line between
//! two facets. Each touched facet is repaired until none of its neighbors is
//! coplanar with it and none of its vertices is straight.

use crate::conflict::ConflictGraph;
use crate::error::{HullError, HullResult};
use crate::mesh::{Dcel, FacetId, HalfEdgeId, PointId};
use crate::predicates::collinear;
use std::collections::BTreeSet;
use tracing::trace;

/// Repairs made while tidying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Tidy {
    /// Facets absorbed into a coplanar neighbor
    pub fused: usize,
    /// Straight vertices dropped
    pub dropped: usize,
}

enum Repair {
    Fuse(FacetId),
    Straighten(HalfEdgeId),
}

/// Repairs every facet in `touched` and any facet a repair changes.
pub(super) fn tidy(
    mesh: &mut Dcel,
    conflicts: &mut ConflictGraph,
    point: PointId,
    touched: BTreeSet<FacetId>,
) -> HullResult<Tidy> {
    let mut pending = touched;
    let mut done = Tidy::default();
    // Every repair unlinks at least two half-edges.
    let budget = pending.len() + mesh.half_edge_count();

    for _ in 0..budget {
        let Some(facet) = pending.pop_first() else {
            return Ok(done);
        };
        if !mesh.facet(facet)?.alive {
            continue;
        }
        match next_repair(mesh, facet)? {
            None => {}
            Some(Repair::Fuse(absorbed)) => {
                mesh.fuse_facets(facet, absorbed)?;
                conflicts.absorb(mesh, facet, absorbed)?;
                trace!(point = point.0, facet = facet.0, absorbed = absorbed.0, "facets fused");
                done.fused += 1;
                pending.insert(facet);
            }
            Some(Repair::Straighten(edge)) => {
                let across = mesh.facet_of(mesh.twin_of(edge)?)?;
                let vertex = mesh.remove_vertex(edge)?;
                trace!(point = point.0, vertex = vertex.0, "straight vertex dropped");
                done.dropped += 1;
                pending.insert(facet);
                pending.insert(across);
            }
        }
    }
    if pending.is_empty() {
        Ok(done)
    } else {
        Err(HullError::invariant(
            Some(point),
            format!("{} facets still need repair after {budget} rounds", pending.len()),
        ))
    }
}

/// First repair `facet` needs: a coplanar neighbor, then a vertex shared
/// with only one other facet and lying on the line through its neighbors.
fn next_repair(mesh: &Dcel, facet: FacetId) -> HullResult<Option<Repair>> {
    let edges = mesh.facet_edges(facet)?;
    for &edge in &edges {
        let across = mesh.facet_of(mesh.twin_of(edge)?)?;
        if across != facet && mesh.facets_coplanar(facet, across)? {
            return Ok(Some(Repair::Fuse(across)));
        }
    }

    for &edge in &edges {
        let next = mesh.next_of(edge)?;
        let twin = mesh.twin_of(edge)?;
        if mesh.next_of(mesh.twin_of(next)?)? != twin {
            continue;
        }
        let straight = collinear(
            mesh.point(mesh.origin_of(edge)?)?,
            mesh.point(mesh.origin_of(next)?)?,
            mesh.point(mesh.destination_of(next)?)?,
            mesh.tolerance(),
        );
        if !straight {
            continue;
        }
        let across = mesh.facet_of(twin)?;
        // Dropping the vertex would leave a two-sided facet; the triangle is
        // a sliver along the other facet's edge and folds into it instead.
        if edges.len() == 3 || mesh.facet_edges(across)?.len() == 3 {
            return Ok(Some(Repair::Fuse(across)));
        }
        return Ok(Some(Repair::Straighten(edge)));
    }
    Ok(None)
}

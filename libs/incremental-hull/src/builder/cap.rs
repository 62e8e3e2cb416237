//! Patching the hole left by the visible facets.
//!
//! Every horizon edge `a → b` gets a cap: either a new triangle `(a, b, p)`
//! or, when the facet across the edge is coplanar with `p`, that facet is
//! extended through `p`. Both paths hand back the cap's `b → p` half-edge,
//! whose successor is `p → a`, so stitching treats them alike.

use crate::conflict::ConflictGraph;
use crate::error::{HullError, HullResult};
use crate::mesh::{Dcel, FacetId, HalfEdgeId, PointId};
use tracing::trace;

/// Result of capping one horizon edge.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cap {
    /// The cap's `b → p` half-edge
    pub edge: HalfEdgeId,
    /// True when the cap extended an existing facet
    pub merged: bool,
}

/// Caps the horizon edge `edge` with the new apex `point`.
pub(super) fn add_cap(
    mesh: &mut Dcel,
    conflicts: &mut ConflictGraph,
    point: PointId,
    edge: HalfEdgeId,
) -> HullResult<Cap> {
    let across = mesh.twin_of(edge)?;
    let inner = mesh.facet_of(edge)?;
    let outer = mesh.facet_of(across)?;

    if mesh.is_coplanar(outer, point)? {
        mesh.split(across, point)?;
        conflicts.propagate(mesh, &[inner], outer, point)?;
        trace!(point = point.0, facet = outer.0, "cap merged");
        return Ok(Cap {
            edge: across,
            merged: true,
        });
    }

    let a = mesh.origin_of(edge)?;
    let b = mesh.destination_of(edge)?;
    let cap = mesh.add_facet(a, b, point)?;
    let base = mesh.find_edge(cap, a, b)?.ok_or_else(|| {
        HullError::invariant(
            Some(point),
            format!("cap {cap:?} was wound against horizon edge {edge:?}"),
        )
    })?;
    mesh.twin(across, base)?;
    conflicts.propagate(mesh, &[inner, outer], cap, point)?;
    Ok(Cap {
        edge: mesh.next_of(base)?,
        merged: false,
    })
}

/// Twins each cap's `p → a` edge with the previous cap's `a → p` edge.
///
/// Consecutive caps merged into the same facet leave an out-and-back spike
/// there instead, which is collapsed. Returns the number of collapsed spikes.
pub(super) fn stitch_caps(mesh: &mut Dcel, point: PointId, caps: &[HalfEdgeId]) -> HullResult<usize> {
    let facets = caps
        .iter()
        .map(|&cap| mesh.facet_of(cap))
        .collect::<Result<Vec<FacetId>, _>>()?;
    let count = caps.len();
    let prev = |i: usize| (i + count - 1) % count;

    // Start where the cap facet changes so no collapse runs before the twin
    // it depends on.
    let start = (0..count)
        .find(|&i| facets[i] != facets[prev(i)])
        .ok_or_else(|| {
            HullError::invariant(
                Some(point),
                format!("all {count} caps landed on one facet"),
            )
        })?;

    let mut spikes = 0;
    for offset in 0..count {
        let i = (start + offset) % count;
        if facets[i] == facets[prev(i)] {
            mesh.collapse_spike(caps[i])?;
            spikes += 1;
        } else {
            let inbound = mesh.next_of(caps[i])?;
            mesh.twin(inbound, caps[prev(i)])?;
        }
    }
    Ok(spikes)
}

//! Horizon discovery around the facets a point can see.

use crate::error::{HullError, HullResult};
use crate::mesh::{Dcel, FacetId, HalfEdgeId, PointId};
use std::collections::BTreeSet;

/// Returns the horizon of `visible` as a closed cycle of half-edges.
///
/// Each returned half-edge lies on a visible facet and its twin on a facet
/// outside `visible`. Consecutive entries share a vertex: the destination of
/// one is the origin of the next. The walk is bounded by the number of
/// boundary half-edges of the visible facets.
pub(super) fn find_horizon(
    mesh: &Dcel,
    visible: &BTreeSet<FacetId>,
    point: PointId,
) -> HullResult<Vec<HalfEdgeId>> {
    let crosses = |edge: HalfEdgeId| -> HullResult<bool> {
        let facet = mesh.facet_of(mesh.twin_of(edge)?)?;
        Ok(!visible.contains(&facet))
    };

    let mut bound = 0;
    let mut start = None;
    for &facet in visible {
        let edges = mesh.facet_edges(facet)?;
        bound += edges.len();
        if start.is_none() {
            for edge in edges {
                if crosses(edge)? {
                    start = Some(edge);
                    break;
                }
            }
        }
    }
    let start = start.ok_or_else(|| {
        HullError::invariant(
            Some(point),
            format!("no horizon edge among visible facets {visible:?}"),
        )
    })?;

    let mut horizon = vec![start];
    let mut current = start;
    loop {
        // Rotate around the destination of `current` until leaving the
        // visible region.
        let mut candidate = mesh.next_of(current)?;
        let mut turns = 0;
        while !crosses(candidate)? {
            turns += 1;
            if turns > bound {
                return Err(HullError::invariant(
                    Some(point),
                    format!("rotation around {candidate:?} does not leave the visible region"),
                ));
            }
            candidate = mesh.next_of(mesh.twin_of(candidate)?)?;
        }

        if candidate == start {
            return Ok(horizon);
        }
        if horizon.len() >= bound {
            return Err(HullError::invariant(
                Some(point),
                format!(
                    "horizon from {start:?} on {:?} does not close within {bound} edges",
                    mesh.facet_of(start)?
                ),
            ));
        }
        horizon.push(candidate);
        current = candidate;
    }
}

//! Structural and orientation checks over the live polytope.

use super::{Dcel, FacetId, TopologyError, TopologyResult};
use crate::predicates;

impl Dcel {
    /// Validates closure and outward orientation of every live facet.
    ///
    /// For each boundary half-edge of a live facet this checks that it belongs
    /// to the facet, that `next.prev` points back, that its twin exists, lies
    /// on a live facet, points back, and runs in the opposite direction.
    /// The facet across must not be coplanar with this one. Finally the
    /// interior point must not be visible to any live facet.
    pub fn validate(&self) -> TopologyResult<()> {
        for id in self.live_facets() {
            self.validate_facet(id)?;
        }
        Ok(())
    }

    fn validate_facet(&self, id: FacetId) -> TopologyResult<()> {
        let edges = self.facet_edges(id)?;
        if edges.len() < 3 {
            return Err(TopologyError::Inconsistent(format!(
                "facet {id:?} has only {} sides",
                edges.len()
            )));
        }

        for edge in edges {
            if self.facet_of(edge)? != id {
                return Err(TopologyError::Inconsistent(format!(
                    "{edge:?} is listed on {id:?} but owned elsewhere"
                )));
            }
            let next = self.next_of(edge)?;
            if self.prev_of(next)? != edge {
                return Err(TopologyError::Inconsistent(format!(
                    "prev of {next:?} does not return to {edge:?}"
                )));
            }

            let twin = self.twin_of(edge)?;
            if self.twin_of(twin)? != edge {
                return Err(TopologyError::TwinMismatch { edge, twin });
            }
            let across = self.facet_of(twin)?;
            self.live_facet(across)?;
            if self.origin_of(twin)? != self.origin_of(next)?
                || self.destination_of(twin)? != self.origin_of(edge)?
            {
                return Err(TopologyError::TwinMismatch { edge, twin });
            }
            if across == id || self.facets_coplanar(id, across)? {
                return Err(TopologyError::CoplanarNeighbors(id, across));
            }
        }

        let facet = self.facet(id)?;
        let on_plane = self.point(self.origin_of(facet.an_edge)?)?;
        if predicates::visible(facet.normal, on_plane, self.interior) {
            return Err(TopologyError::Inverted(id));
        }
        Ok(())
    }
}

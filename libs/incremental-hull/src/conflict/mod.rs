//! # Conflict Graph
//!
//! Bipartite visibility index between unprocessed points and live facets.
//!
//! A point and a facet are in conflict when the point lies strictly in front
//! of the facet. Both directions are stored and every mutation updates both,
//! so `facets_of` and `points_of` always agree. Ordered sets keep iteration
//! deterministic for a given insertion order.

use crate::mesh::{Dcel, FacetId, PointId, TopologyError, TopologyResult};
use std::collections::BTreeSet;

/// Symmetric point/facet conflict relation.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    /// Facets visible from each point, indexed by point
    point_facets: Vec<BTreeSet<FacetId>>,
    /// Points seeing each facet, indexed by facet; grows with the mesh
    facet_points: Vec<BTreeSet<PointId>>,
}

impl ConflictGraph {
    /// Creates an empty graph sized for `point_count` points.
    pub fn new(point_count: usize) -> Self {
        Self {
            point_facets: vec![BTreeSet::new(); point_count],
            facet_points: Vec::new(),
        }
    }

    /// Tests every (facet, point) pair and records the visible ones.
    pub fn build(mesh: &Dcel, facets: &[FacetId], points: &[PointId]) -> TopologyResult<Self> {
        let mut graph = Self::new(mesh.points().len());
        for &facet in facets {
            for &point in points {
                if mesh.is_visible(facet, point)? {
                    graph.add_conflict(facet, point);
                }
            }
        }
        Ok(graph)
    }

    /// Facets the point can see, in id order.
    pub fn facets_of(&self, point: PointId) -> impl Iterator<Item = FacetId> + '_ {
        self.point_facets
            .get(point.index())
            .into_iter()
            .flatten()
            .copied()
    }

    /// Points that can see the facet, in id order.
    pub fn points_of(&self, facet: FacetId) -> impl Iterator<Item = PointId> + '_ {
        self.facet_points
            .get(facet.index())
            .into_iter()
            .flatten()
            .copied()
    }

    /// Returns true when the point sees at least one facet.
    pub fn has_conflicts(&self, point: PointId) -> bool {
        self.point_facets
            .get(point.index())
            .is_some_and(|facets| !facets.is_empty())
    }

    /// Total number of recorded (point, facet) pairs.
    pub fn len(&self) -> usize {
        self.point_facets.iter().map(BTreeSet::len).sum()
    }

    /// Returns true when no conflicts are recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records a conflict on both sides.
    pub fn add_conflict(&mut self, facet: FacetId, point: PointId) {
        if self.point_facets.len() <= point.index() {
            self.point_facets.resize(point.index() + 1, BTreeSet::new());
        }
        if self.facet_points.len() <= facet.index() {
            self.facet_points.resize(facet.index() + 1, BTreeSet::new());
        }
        self.point_facets[point.index()].insert(facet);
        self.facet_points[facet.index()].insert(point);
    }

    /// Removes a conflict from both sides. Returns true if it was present.
    pub fn remove_conflict(&mut self, facet: FacetId, point: PointId) -> bool {
        let from_point = self
            .point_facets
            .get_mut(point.index())
            .is_some_and(|facets| facets.remove(&facet));
        let from_facet = self
            .facet_points
            .get_mut(facet.index())
            .is_some_and(|points| points.remove(&point));
        from_point || from_facet
    }

    /// Tests every point conflicting with any of `sources` against `target`
    /// and records the visible ones. `exclude` is never tested.
    ///
    /// Returns the number of conflicts added.
    pub fn propagate(
        &mut self,
        mesh: &Dcel,
        sources: &[FacetId],
        target: FacetId,
        exclude: PointId,
    ) -> TopologyResult<usize> {
        let candidates: BTreeSet<PointId> = sources
            .iter()
            .flat_map(|&source| self.points_of(source))
            .filter(|&point| point != exclude)
            .collect();

        let mut added = 0;
        for point in candidates {
            if mesh.is_visible(target, point)? {
                self.add_conflict(target, point);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Drops every conflict of a facet that is about to be removed.
    pub fn detach_facet(&mut self, facet: FacetId) {
        let Some(points) = self.facet_points.get_mut(facet.index()) else {
            return;
        };
        for point in std::mem::take(points) {
            if let Some(facets) = self.point_facets.get_mut(point.index()) {
                facets.remove(&facet);
            }
        }
    }

    /// Drops every conflict of a point that has just been processed.
    pub fn detach_point(&mut self, point: PointId) {
        let Some(facets) = self.point_facets.get_mut(point.index()) else {
            return;
        };
        for facet in std::mem::take(facets) {
            if let Some(points) = self.facet_points.get_mut(facet.index()) {
                points.remove(&point);
            }
        }
    }

    /// Hands the conflicts of `absorbed` to `keep` after the two facets
    /// were fused.
    ///
    /// Points of both facets are re-tested against the plane `keep` ends up
    /// with; only the visible ones stay.
    pub fn absorb(&mut self, mesh: &Dcel, keep: FacetId, absorbed: FacetId) -> TopologyResult<()> {
        let candidates: BTreeSet<PointId> = self
            .points_of(keep)
            .chain(self.points_of(absorbed))
            .collect();
        self.detach_facet(keep);
        self.detach_facet(absorbed);
        for point in candidates {
            if mesh.is_visible(keep, point)? {
                self.add_conflict(keep, point);
            }
        }
        Ok(())
    }

    /// Reports the first (point, facet) pair recorded on one side only.
    pub fn validate(&self) -> TopologyResult<()> {
        for (i, facets) in self.point_facets.iter().enumerate() {
            let point = PointId(i as u32);
            for &facet in facets {
                let mirrored = self
                    .facet_points
                    .get(facet.index())
                    .is_some_and(|points| points.contains(&point));
                if !mirrored {
                    return Err(TopologyError::AsymmetricConflict { point, facet });
                }
            }
        }
        for (i, points) in self.facet_points.iter().enumerate() {
            let facet = FacetId(i as u32);
            for &point in points {
                let mirrored = self
                    .point_facets
                    .get(point.index())
                    .is_some_and(|facets| facets.contains(&facet));
                if !mirrored {
                    return Err(TopologyError::AsymmetricConflict { point, facet });
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn insert_one_sided(&mut self, facet: FacetId, point: PointId) {
        self.add_conflict(facet, point);
        self.facet_points[facet.index()].remove(&point);
    }
}

//! Fusing coplanar neighbors and dropping straight vertices.
//!
//! Caps are built one horizon edge at a time, so two new triangles, or a new
//! triangle and an old facet, can end up side by side in one plane. Fusing
//! them removes the shared boundary. Fusing and merging can also leave a
//! vertex where only two facets meet; such a vertex sits on the line through
//! its neighbors and is dropped from both facets.

use super::{Dcel, FacetId, HalfEdgeId, PointId, TopologyError, TopologyResult};

impl Dcel {
    /// True when two facets face the same way and every vertex of each lies
    /// on the other's plane within tolerance.
    pub fn facets_coplanar(&self, a: FacetId, b: FacetId) -> TopologyResult<bool> {
        if self.facet(a)?.normal.dot(self.facet(b)?.normal) <= 0.0 {
            return Ok(false);
        }
        for (facet, other) in [(a, b), (b, a)] {
            for vertex in self.facet_vertices(other)? {
                if !self.is_coplanar(facet, vertex)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn borders(&self, edge: HalfEdgeId, facet: FacetId) -> TopologyResult<bool> {
        Ok(self.facet_of(self.twin_of(edge)?)? == facet)
    }

    /// Fuses `absorbed` into `keep` across their shared boundary.
    ///
    /// The run of consecutive edges the two facets share is unlinked and the
    /// remaining boundary of `absorbed`, if any, is spliced into `keep`.
    /// `keep` takes the longer of the two normals and `absorbed` is
    /// tombstoned. Returns the number of shared edges removed.
    pub fn fuse_facets(&mut self, keep: FacetId, absorbed: FacetId) -> TopologyResult<usize> {
        self.live_facet(keep)?;
        self.live_facet(absorbed)?;
        if keep == absorbed {
            return Err(TopologyError::Inconsistent(format!(
                "cannot fuse {keep:?} with itself"
            )));
        }

        let edges = self.facet_edges(keep)?;
        let count = edges.len();
        let mut start = None;
        for (i, &edge) in edges.iter().enumerate() {
            if self.borders(edge, absorbed)? {
                start = Some(i);
                break;
            }
        }
        let Some(mut first) = start else {
            return Err(TopologyError::Inconsistent(format!(
                "{keep:?} and {absorbed:?} share no edge"
            )));
        };

        // Widen to the whole shared run.
        let mut len = 1;
        while len < count && self.borders(edges[(first + count - 1) % count], absorbed)? {
            first = (first + count - 1) % count;
            len += 1;
        }
        while len < count && self.borders(edges[(first + len) % count], absorbed)? {
            len += 1;
        }
        if len == count {
            return Err(TopologyError::Inconsistent(format!(
                "{absorbed:?} surrounds {keep:?}"
            )));
        }

        let run: Vec<HalfEdgeId> = (0..len).map(|k| edges[(first + k) % count]).collect();
        let twins = run
            .iter()
            .map(|&edge| self.twin_of(edge))
            .collect::<TopologyResult<Vec<_>>>()?;
        let before = edges[(first + count - 1) % count];
        let after = edges[(first + len) % count];

        // On `absorbed` the twins run in reverse order.
        let mut current = twins[len - 1];
        for &twin in twins.iter().rev() {
            if current != twin {
                return Err(TopologyError::Inconsistent(format!(
                    "{absorbed:?} touches {keep:?} along a broken run"
                )));
            }
            current = self.next_of(current)?;
        }
        let mut moved = Vec::new();
        while current != twins[len - 1] {
            if moved.len() > self.half_edges.len() {
                return Err(TopologyError::OpenLoop(absorbed));
            }
            moved.push(current);
            current = self.next_of(current)?;
        }
        for &edge in &moved {
            self.half_edge_mut(edge)?.facet = Some(keep);
        }
        match (moved.first(), moved.last()) {
            (Some(&moved_first), Some(&moved_last)) => {
                self.connect(before, moved_first)?;
                self.connect(moved_last, after)?;
            }
            // `absorbed` sat in a pinch of `keep`; closing the pinch is enough.
            _ => self.connect(before, after)?,
        }
        for edge in run.into_iter().chain(twins) {
            self.half_edge_mut(edge)?.detach();
        }

        let absorbed_normal = self.facet(absorbed)?.normal;
        let facet = self.facet_mut(keep)?;
        facet.an_edge = before;
        if absorbed_normal.length_squared() > facet.normal.length_squared() {
            facet.normal = absorbed_normal;
        }
        self.remove_facet(absorbed)?;

        for edge in self.facet_edges(keep)? {
            if self.borders(edge, keep)? {
                return Err(TopologyError::Inconsistent(format!(
                    "fusing {absorbed:?} left {keep:?} bordering itself"
                )));
            }
        }
        Ok(len)
    }

    /// Drops the vertex at the end of `edge` when exactly two facets meet
    /// there.
    ///
    /// `x → s → y` becomes `x → y` in the facet of `edge` and `y → s → x`
    /// becomes `y → x` in the facet across. Both facets must keep at least
    /// three sides. Returns the dropped point.
    pub fn remove_vertex(&mut self, edge: HalfEdgeId) -> TopologyResult<PointId> {
        let facet = self.facet_of(edge)?;
        let next = self.next_of(edge)?;
        let twin = self.twin_of(edge)?;
        let next_twin = self.twin_of(next)?;
        if self.next_of(next_twin)? != twin {
            return Err(TopologyError::Inconsistent(format!(
                "vertex after {edge:?} touches more than two facets"
            )));
        }
        let other = self.facet_of(twin)?;
        if other == facet
            || self.facet_edges(facet)?.len() < 4
            || self.facet_edges(other)?.len() < 4
        {
            return Err(TopologyError::Inconsistent(format!(
                "dropping the vertex after {edge:?} would leave a two-sided facet"
            )));
        }

        let vertex = self.origin_of(next)?;
        let after = self.next_of(next)?;
        let resume = self.next_of(twin)?;
        self.connect(edge, after)?;
        self.connect(next_twin, resume)?;
        self.half_edge_mut(next)?.detach();
        self.half_edge_mut(twin)?.detach();
        self.twin(edge, next_twin)?;
        self.facet_mut(facet)?.an_edge = edge;
        self.facet_mut(other)?.an_edge = next_twin;
        Ok(vertex)
    }
}

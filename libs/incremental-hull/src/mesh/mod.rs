//! # Half-Edge Mesh
//!
//! Index-based doubly connected edge list holding the evolving polytope.
//!
//! ## Layout
//!
//! Points, half-edges and facets live in flat arenas addressed by `u32`
//! newtype ids. Nothing is ever freed: removing a facet only clears its
//! `alive` flag, and half-edges detached by an edit simply lose their links.
//! Ids therefore stay valid for the whole build.
//!
//! ## Orientation
//!
//! Every facet stores the raw cross product of two boundary edges as its
//! normal. The sign is fixed against an interior reference point (the
//! centroid of the seed tetrahedron): a facet whose normal lets it see the
//! interior point is flipped on creation.

mod fuse;
mod validate;

use crate::core::vec3::Vec3;
use crate::hull::HullFacet;
use crate::predicates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Index of an input point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PointId(pub u32);

/// Index of a half-edge in the mesh arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub u32);

/// Stable identifier of a facet, valid even after the facet is removed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FacetId(pub u32);

impl PointId {
    /// Arena slot of this id.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl HalfEdgeId {
    /// Arena slot of this id.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FacetId {
    /// Arena slot of this id.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// Directed boundary edge of a facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfEdge {
    /// Point this half-edge starts at
    pub origin: PointId,
    /// Facet on the left of this half-edge
    pub facet: Option<FacetId>,
    /// Opposite half-edge in the neighboring facet
    pub twin: Option<HalfEdgeId>,
    /// Next half-edge around the facet
    pub next: Option<HalfEdgeId>,
    /// Previous half-edge around the facet
    pub prev: Option<HalfEdgeId>,
}

impl HalfEdge {
    fn new(origin: PointId, facet: Option<FacetId>) -> Self {
        Self {
            origin,
            facet,
            twin: None,
            next: None,
            prev: None,
        }
    }

    fn detach(&mut self) {
        self.facet = None;
        self.twin = None;
        self.next = None;
        self.prev = None;
    }
}

/// Planar convex polygon of the polytope.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    /// Any half-edge on the boundary
    pub an_edge: HalfEdgeId,
    /// Outward normal, unnormalized
    pub normal: Vec3,
    /// False once the facet has been removed
    pub alive: bool,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Topology errors raised by mesh access and editing.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("Invalid point reference: {0:?}")]
    InvalidPoint(PointId),

    #[error("Invalid half-edge reference: {0:?}")]
    InvalidHalfEdge(HalfEdgeId),

    #[error("Invalid facet reference: {0:?}")]
    InvalidFacet(FacetId),

    #[error("Half-edge {edge:?} has no {link} link")]
    MissingLink {
        edge: HalfEdgeId,
        link: &'static str,
    },

    #[error("Half-edges {edge:?} and {twin:?} do not run in opposite directions")]
    TwinMismatch { edge: HalfEdgeId, twin: HalfEdgeId },

    #[error("Facet {0:?} has been removed")]
    DeadFacet(FacetId),

    #[error("Boundary of facet {0:?} does not close")]
    OpenLoop(FacetId),

    #[error("Points {0:?} span no plane")]
    DegenerateFacet([PointId; 3]),

    #[error("Facet {0:?} faces the interior point")]
    Inverted(FacetId),

    #[error("Adjacent facets {0:?} and {1:?} are coplanar")]
    CoplanarNeighbors(FacetId, FacetId),

    #[error("Conflict between {point:?} and {facet:?} is recorded on one side only")]
    AsymmetricConflict { point: PointId, facet: FacetId },

    #[error("Inconsistent half-edge topology: {0}")]
    Inconsistent(String),
}

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

// =============================================================================
// MESH
// =============================================================================

/// Half-edge polytope over a fixed point store.
#[derive(Debug, Clone)]
pub struct Dcel {
    points: Vec<Vec3>,
    half_edges: Vec<HalfEdge>,
    facets: Vec<Facet>,
    interior: Vec3,
    live_count: usize,
    tolerance: f64,
}

impl Dcel {
    /// Creates an empty polytope over `points`.
    ///
    /// `tolerance` drives the coplanar merge test.
    pub fn new(points: Vec<Vec3>, tolerance: f64) -> Self {
        Self {
            half_edges: Vec::with_capacity(points.len() * 6),
            facets: Vec::with_capacity(points.len() * 2),
            points,
            interior: Vec3::ZERO,
            live_count: 0,
            tolerance,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns every input point, including ones that never became vertices.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Returns the position of a point.
    pub fn point(&self, id: PointId) -> TopologyResult<Vec3> {
        self.points
            .get(id.index())
            .copied()
            .ok_or(TopologyError::InvalidPoint(id))
    }

    /// Distance under which a point counts as lying on a plane or line.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Reference point strictly inside the polytope.
    pub fn interior(&self) -> Vec3 {
        self.interior
    }

    /// Gets a half-edge by id.
    pub fn half_edge(&self, id: HalfEdgeId) -> TopologyResult<&HalfEdge> {
        self.half_edges
            .get(id.index())
            .ok_or(TopologyError::InvalidHalfEdge(id))
    }

    fn half_edge_mut(&mut self, id: HalfEdgeId) -> TopologyResult<&mut HalfEdge> {
        self.half_edges
            .get_mut(id.index())
            .ok_or(TopologyError::InvalidHalfEdge(id))
    }

    /// Gets a facet by id, dead or alive.
    pub fn facet(&self, id: FacetId) -> TopologyResult<&Facet> {
        self.facets
            .get(id.index())
            .ok_or(TopologyError::InvalidFacet(id))
    }

    fn facet_mut(&mut self, id: FacetId) -> TopologyResult<&mut Facet> {
        self.facets
            .get_mut(id.index())
            .ok_or(TopologyError::InvalidFacet(id))
    }

    /// Gets a facet by id, failing if it has been removed.
    pub fn live_facet(&self, id: FacetId) -> TopologyResult<&Facet> {
        let facet = self.facet(id)?;
        if facet.alive {
            Ok(facet)
        } else {
            Err(TopologyError::DeadFacet(id))
        }
    }

    /// Returns the number of half-edges ever allocated.
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Returns the number of facets ever allocated.
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Returns the number of facets not yet removed.
    pub fn live_facet_count(&self) -> usize {
        self.live_count
    }

    /// Ids of all live facets in creation order.
    pub fn live_facets(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.facets
            .iter()
            .enumerate()
            .filter(|(_, facet)| facet.alive)
            .map(|(i, _)| FacetId(i as u32))
    }

    /// Next half-edge around the same facet.
    pub fn next_of(&self, id: HalfEdgeId) -> TopologyResult<HalfEdgeId> {
        self.half_edge(id)?
            .next
            .ok_or(TopologyError::MissingLink { edge: id, link: "next" })
    }

    /// Previous half-edge around the same facet.
    pub fn prev_of(&self, id: HalfEdgeId) -> TopologyResult<HalfEdgeId> {
        self.half_edge(id)?
            .prev
            .ok_or(TopologyError::MissingLink { edge: id, link: "prev" })
    }

    /// Opposite half-edge.
    pub fn twin_of(&self, id: HalfEdgeId) -> TopologyResult<HalfEdgeId> {
        self.half_edge(id)?
            .twin
            .ok_or(TopologyError::MissingLink { edge: id, link: "twin" })
    }

    /// Facet the half-edge bounds.
    pub fn facet_of(&self, id: HalfEdgeId) -> TopologyResult<FacetId> {
        self.half_edge(id)?
            .facet
            .ok_or(TopologyError::MissingLink { edge: id, link: "facet" })
    }

    /// Start point of the half-edge.
    pub fn origin_of(&self, id: HalfEdgeId) -> TopologyResult<PointId> {
        Ok(self.half_edge(id)?.origin)
    }

    /// End point of the half-edge, read from its successor.
    pub fn destination_of(&self, id: HalfEdgeId) -> TopologyResult<PointId> {
        self.origin_of(self.next_of(id)?)
    }

    /// Boundary half-edges of a facet in `next` order, starting at `an_edge`.
    pub fn facet_edges(&self, id: FacetId) -> TopologyResult<Vec<HalfEdgeId>> {
        let start = self.facet(id)?.an_edge;
        let mut edges = Vec::with_capacity(3);
        let mut current = start;
        loop {
            edges.push(current);
            if edges.len() > self.half_edges.len() {
                return Err(TopologyError::OpenLoop(id));
            }
            current = self.next_of(current)?;
            if current == start {
                return Ok(edges);
            }
        }
    }

    /// Boundary vertices of a facet, counter-clockwise seen from outside.
    pub fn facet_vertices(&self, id: FacetId) -> TopologyResult<Vec<PointId>> {
        self.facet_edges(id)?
            .into_iter()
            .map(|edge| self.origin_of(edge))
            .collect()
    }

    /// Finds the half-edge `from → to` on the boundary of a facet.
    pub fn find_edge(
        &self,
        facet: FacetId,
        from: PointId,
        to: PointId,
    ) -> TopologyResult<Option<HalfEdgeId>> {
        for edge in self.facet_edges(facet)? {
            if self.origin_of(edge)? == from && self.destination_of(edge)? == to {
                return Ok(Some(edge));
            }
        }
        Ok(None)
    }

    // -------------------------------------------------------------------------
    // Predicates bound to facets
    // -------------------------------------------------------------------------

    fn plane(&self, id: FacetId) -> TopologyResult<(Vec3, Vec3)> {
        let facet = self.facet(id)?;
        let on_plane = self.point(self.origin_of(facet.an_edge)?)?;
        Ok((facet.normal, on_plane))
    }

    /// True when the point lies strictly in front of the facet.
    pub fn is_visible(&self, facet: FacetId, point: PointId) -> TopologyResult<bool> {
        let (normal, on_plane) = self.plane(facet)?;
        Ok(predicates::visible(normal, on_plane, self.point(point)?))
    }

    /// True when the point lies on the facet's plane within tolerance.
    pub fn is_coplanar(&self, facet: FacetId, point: PointId) -> TopologyResult<bool> {
        let (normal, on_plane) = self.plane(facet)?;
        Ok(predicates::coplanar(
            normal,
            on_plane,
            self.point(point)?,
            self.tolerance,
        ))
    }

    // -------------------------------------------------------------------------
    // Editing primitives
    // -------------------------------------------------------------------------

    fn push_half_edge(&mut self, origin: PointId, facet: Option<FacetId>) -> HalfEdgeId {
        let id = HalfEdgeId(self.half_edges.len() as u32);
        self.half_edges.push(HalfEdge::new(origin, facet));
        id
    }

    /// Builds the seed polytope from four non-coplanar points.
    ///
    /// The centroid of the four points becomes the interior reference point.
    /// Returns the four facet ids with all twelve twin links wired.
    pub fn seed_tetrahedron(&mut self, seed: [PointId; 4]) -> TopologyResult<[FacetId; 4]> {
        let corners = seed
            .iter()
            .map(|&id| self.point(id))
            .collect::<TopologyResult<Vec<_>>>()?;
        self.interior = crate::core::vec3::centroid(&corners);

        let [a, b, c, d] = seed;
        let facets = [
            self.add_facet(a, b, c)?,
            self.add_facet(a, b, d)?,
            self.add_facet(a, c, d)?,
            self.add_facet(b, c, d)?,
        ];

        let mut edges = Vec::with_capacity(12);
        for &facet in &facets {
            edges.extend(self.facet_edges(facet)?);
        }
        for &edge in &edges {
            if self.half_edge(edge)?.twin.is_some() {
                continue;
            }
            let from = self.origin_of(edge)?;
            let to = self.destination_of(edge)?;
            let mut partner = None;
            for &other in &edges {
                if self.origin_of(other)? == to && self.destination_of(other)? == from {
                    partner = Some(other);
                    break;
                }
            }
            let partner = partner.ok_or_else(|| {
                TopologyError::Inconsistent(format!("seed edge {edge:?} has no opposite"))
            })?;
            self.twin(edge, partner)?;
        }
        Ok(facets)
    }

    /// Adds a triangle with a fresh id, wound so its normal points away from
    /// the interior point.
    pub fn add_facet(&mut self, p1: PointId, p2: PointId, p3: PointId) -> TopologyResult<FacetId> {
        let (a, b, c) = (self.point(p1)?, self.point(p2)?, self.point(p3)?);
        let mut order = [p1, p2, p3];
        let mut normal = (b - a).cross(c - a);
        if normal == Vec3::ZERO {
            return Err(TopologyError::DegenerateFacet(order));
        }
        if predicates::visible(normal, a, self.interior) {
            order.swap(1, 2);
            normal = -normal;
        }

        let id = FacetId(self.facets.len() as u32);
        let edges = order.map(|origin| self.push_half_edge(origin, Some(id)));
        for i in 0..3 {
            self.connect(edges[i], edges[(i + 1) % 3])?;
        }
        self.facets.push(Facet {
            an_edge: edges[0],
            normal,
            alive: true,
        });
        self.live_count += 1;
        Ok(id)
    }

    /// Makes `b` follow `a`, moving `b` into `a`'s facet when `a` has one.
    pub fn connect(&mut self, a: HalfEdgeId, b: HalfEdgeId) -> TopologyResult<()> {
        self.half_edge(b)?;
        let facet = {
            let edge = self.half_edge_mut(a)?;
            edge.next = Some(b);
            edge.facet
        };
        let edge = self.half_edge_mut(b)?;
        edge.prev = Some(a);
        if facet.is_some() {
            edge.facet = facet;
        }
        Ok(())
    }

    /// Links two half-edges as twins.
    ///
    /// Fails unless `a` and `b` connect the same two points in opposite
    /// directions.
    pub fn twin(&mut self, a: HalfEdgeId, b: HalfEdgeId) -> TopologyResult<()> {
        let opposite = self.destination_of(a)? == self.origin_of(b)?
            && self.destination_of(b)? == self.origin_of(a)?;
        if !opposite {
            return Err(TopologyError::TwinMismatch { edge: a, twin: b });
        }
        self.half_edge_mut(a)?.twin = Some(b);
        self.half_edge_mut(b)?.twin = Some(a);
        Ok(())
    }

    /// Routes `edge` through `point`: `b → a` becomes `b → point → a`.
    ///
    /// The new half-edge `point → a` joins the same facet. `edge` loses its
    /// twin. Returns the new half-edge.
    pub fn split(&mut self, edge: HalfEdgeId, point: PointId) -> TopologyResult<HalfEdgeId> {
        self.point(point)?;
        let facet = self.facet_of(edge)?;
        let after = self.next_of(edge)?;
        let inserted = self.push_half_edge(point, Some(facet));
        self.connect(edge, inserted)?;
        self.connect(inserted, after)?;
        self.half_edge_mut(edge)?.twin = None;
        Ok(inserted)
    }

    /// Removes the out-and-back pair following `edge` in its facet.
    ///
    /// Expects `edge → p`, `p → q`, `q → p`, `p → r` and leaves `edge → p → r`.
    pub fn collapse_spike(&mut self, edge: HalfEdgeId) -> TopologyResult<()> {
        let facet = self.facet_of(edge)?;
        let spike = self.next_of(edge)?;
        let back = self.next_of(spike)?;
        let resume = self.next_of(back)?;
        if self.origin_of(resume)? != self.origin_of(spike)? || spike == resume {
            return Err(TopologyError::Inconsistent(format!(
                "no spike follows {edge:?} in {facet:?}"
            )));
        }
        self.connect(edge, resume)?;
        self.half_edge_mut(spike)?.detach();
        self.half_edge_mut(back)?.detach();
        self.facet_mut(facet)?.an_edge = edge;
        Ok(())
    }

    /// Tombstones a facet. Its id stays valid.
    pub fn remove_facet(&mut self, id: FacetId) -> TopologyResult<()> {
        let facet = self.facet_mut(id)?;
        if !facet.alive {
            return Err(TopologyError::DeadFacet(id));
        }
        facet.alive = false;
        self.live_count -= 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Snapshot of the live facets with unit normals.
    pub fn facets(&self) -> TopologyResult<Vec<HullFacet>> {
        self.live_facets()
            .map(|id| -> TopologyResult<HullFacet> {
                let vertices = self.facet_vertices(id)?;
                let positions = vertices
                    .iter()
                    .map(|&v| self.point(v))
                    .collect::<TopologyResult<Vec<_>>>()?;
                Ok(HullFacet {
                    id,
                    normal: self.facet(id)?.normal.normalize_or_zero(),
                    vertices,
                    positions,
                })
            })
            .collect()
    }
}

//! # Hull Output
//!
//! Read-only views of a finished polytope: polygonal facets, an indexed
//! triangle mesh for renderers, and a few geometric queries.

use crate::builder::BuildStats;
use crate::core::vec3::{triple, Vec3};
use crate::error::HullResult;
use crate::mesh::{Dcel, FacetId, PointId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One live facet of the hull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullFacet {
    /// Facet id in the mesh arena
    pub id: FacetId,
    /// Outward unit normal
    pub normal: Vec3,
    /// Boundary vertices, counter-clockwise seen from outside
    pub vertices: Vec<PointId>,
    /// Positions of `vertices`, same order
    pub positions: Vec<Vec3>,
}

impl HullFacet {
    /// Fan triangles over the boundary, starting at the first vertex.
    pub fn fan(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let apex = self.positions.first().copied().unwrap_or(Vec3::ZERO);
        self.positions
            .windows(2)
            .skip(1)
            .map(move |pair| [apex, pair[0], pair[1]])
    }

    /// Signed distance of `point` from the facet plane, positive outside.
    pub fn signed_distance(&self, point: Vec3) -> f64 {
        match self.positions.first() {
            Some(&on_plane) => self.normal.dot(point - on_plane),
            None => 0.0,
        }
    }

    /// Area of the polygon.
    pub fn area(&self) -> f64 {
        self.fan()
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum()
    }
}

/// Indexed triangle mesh of a hull.
///
/// Vertices are compacted to the points actually on the hull. Each triangle
/// carries the unit normal of the facet it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Input point each vertex came from
    pub sources: Vec<PointId>,
    /// Counter-clockwise vertex index triples
    pub triangles: Vec<[u32; 3]>,
    /// Unit normal per triangle
    pub normals: Vec<Vec3>,
}

impl TriangleMesh {
    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        rest.iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)))
    }

    /// Flattens the triangles to 9 coordinates each.
    ///
    /// Triangles with an index outside `vertices` are skipped.
    pub fn to_flat_coordinates(&self) -> Vec<f64> {
        let mut coords = Vec::with_capacity(self.triangles.len() * 9);
        for tri in &self.triangles {
            let corners: Option<Vec<Vec3>> = tri
                .iter()
                .map(|&index| self.vertices.get(index as usize).copied())
                .collect();
            let Some(corners) = corners else {
                continue;
            };
            for v in corners {
                coords.extend_from_slice(&[v.x, v.y, v.z]);
            }
        }
        coords
    }
}

/// Convex hull of a point set.
#[derive(Debug, Clone)]
pub struct ConvexHull {
    points: Vec<Vec3>,
    facets: Vec<HullFacet>,
    stats: BuildStats,
    tolerance: f64,
}

impl ConvexHull {
    pub(crate) fn from_mesh(mesh: &Dcel, stats: BuildStats, tolerance: f64) -> HullResult<Self> {
        Ok(Self {
            points: mesh.points().to_vec(),
            facets: mesh.facets()?,
            stats,
            tolerance,
        })
    }

    /// The input points, including interior ones.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Live facets in creation order.
    pub fn facets(&self) -> &[HullFacet] {
        &self.facets
    }

    /// Returns the number of facets.
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Counters from the build.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Input points that are hull vertices.
    pub fn vertex_ids(&self) -> BTreeSet<PointId> {
        self.facets
            .iter()
            .flat_map(|facet| facet.vertices.iter().copied())
            .collect()
    }

    /// True when `point` is inside or within tolerance of the hull.
    pub fn contains(&self, point: Vec3) -> bool {
        self.facets
            .iter()
            .all(|facet| facet.signed_distance(point) <= self.tolerance)
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        let origin = self
            .facets
            .first()
            .and_then(|facet| facet.positions.first())
            .copied()
            .unwrap_or(Vec3::ZERO);
        self.facets
            .iter()
            .flat_map(HullFacet::fan)
            .map(|[a, b, c]| triple(a - origin, b - origin, c - origin))
            .sum::<f64>()
            / 6.0
    }

    /// Total facet area.
    pub fn surface_area(&self) -> f64 {
        self.facets.iter().map(HullFacet::area).sum()
    }

    /// Fan-triangulates every facet into an indexed mesh.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::default();
        let mut remap: BTreeMap<PointId, u32> = BTreeMap::new();

        for facet in &self.facets {
            let indices: Vec<u32> = facet
                .vertices
                .iter()
                .zip(&facet.positions)
                .map(|(&id, &position)| {
                    *remap.entry(id).or_insert_with(|| {
                        mesh.vertices.push(position);
                        mesh.sources.push(id);
                        (mesh.vertices.len() - 1) as u32
                    })
                })
                .collect();
            for pair in indices.windows(2).skip(1) {
                mesh.triangles.push([indices[0], pair[0], pair[1]]);
                mesh.normals.push(facet.normal);
            }
        }
        mesh
    }
}

//! # Incremental Hull Builder
//!
//! Randomized incremental construction driven as an explicit state machine.
//!
//! ## Algorithm Steps
//!
//! 1. Draw four random points spanning a tetrahedron
//! 2. Build the seed polytope and the conflict graph for every other point
//! 3. Shuffle the remaining points
//! 4. For each point in that order:
//!    a. Skip it when it sees no facet off its own plane
//!    b. Walk the horizon of the facets it sees
//!    c. Cap every horizon edge, merging into coplanar neighbors
//!    d. Stitch the caps into a closed ring
//!    e. Remove the visible facets and their conflicts
//!    f. Fuse coplanar neighbors and drop straight vertices around the caps
//!
//! ## Stepping
//!
//! [`HullBuilder::step`] performs one state transition, so callers can stop
//! between insertions and inspect [`HullBuilder::mesh`]. Any error moves the
//! builder to [`BuildState::Failed`]; every later call returns
//! [`HullError::Aborted`].

mod cap;
mod horizon;
mod seed;
mod tidy;

use crate::core::vec3::Vec3;
use crate::conflict::ConflictGraph;
use crate::error::{HullError, HullResult};
use crate::hull::ConvexHull;
use crate::mesh::{Dcel, FacetId, PointId};
use config::constants::{HullSettings, MIN_HULL_POINTS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Position of the builder in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Drawing the four seed points.
    SelectingSeed,
    /// Seed chosen; the tetrahedron and conflict graph come next.
    SeededMeshBuilt,
    /// About to insert the point at this position of the permutation.
    Inserting(usize),
    /// Every point has been processed.
    Done,
    /// A step reported an error.
    Failed,
}

/// Counters collected while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Points that changed the polytope
    pub inserted: usize,
    /// Points already enclosed when their turn came
    pub skipped: usize,
    /// Triangles created as caps (seed facets included)
    pub facets_created: usize,
    /// Caps merged into a coplanar neighbor
    pub facets_merged: usize,
    /// Facets removed because an inserted point saw them
    pub facets_removed: usize,
    /// Spike vertices dropped while stitching merged caps
    pub spikes_collapsed: usize,
    /// Facets absorbed into a coplanar neighbor after stitching
    pub facets_fused: usize,
    /// Vertices dropped for lying on a straight edge
    pub vertices_dropped: usize,
}

/// Incremental convex hull construction over a fixed point set.
///
/// # Example
///
/// ```rust
/// use incremental_hull::{HullBuilder, Vec3};
///
/// let points = vec![
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 0.0),
///     Vec3::new(0.0, 1.0, 0.0),
///     Vec3::new(0.0, 0.0, 1.0),
///     Vec3::new(0.1, 0.1, 0.1),
/// ];
/// let hull = HullBuilder::new(points)?.build()?;
/// assert_eq!(hull.facet_count(), 4);
/// # Ok::<(), incremental_hull::HullError>(())
/// ```
#[derive(Debug)]
pub struct HullBuilder<R = ChaCha8Rng> {
    settings: HullSettings,
    rng: R,
    state: BuildState,
    mesh: Dcel,
    conflicts: ConflictGraph,
    seed: Option<[PointId; 4]>,
    order: Vec<PointId>,
    stats: BuildStats,
}

impl HullBuilder<ChaCha8Rng> {
    /// Creates a builder with default settings.
    pub fn new(points: Vec<Vec3>) -> HullResult<Self> {
        Self::with_settings(points, HullSettings::default())
    }

    /// Creates a builder whose generator is seeded from `settings.rng_seed`.
    pub fn with_settings(points: Vec<Vec3>, settings: HullSettings) -> HullResult<Self> {
        let rng = ChaCha8Rng::seed_from_u64(settings.rng_seed);
        Self::with_rng(points, settings, rng)
    }
}

impl<R: Rng> HullBuilder<R> {
    /// Creates a builder drawing all randomness from `rng`.
    ///
    /// Fails on fewer than four points, on non-finite coordinates, and on
    /// settings that would not pass [`HullSettings::new`].
    pub fn with_rng(points: Vec<Vec3>, settings: HullSettings, rng: R) -> HullResult<Self> {
        HullSettings::new(settings.tolerance, settings.seed_attempts)?;
        if points.len() < MIN_HULL_POINTS {
            return Err(HullError::degenerate(format!(
                "need at least {MIN_HULL_POINTS} points, got {}",
                points.len()
            )));
        }
        if points.len() > u32::MAX as usize {
            return Err(HullError::degenerate("too many points for 32-bit ids"));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(HullError::NonFinitePoint { index });
        }

        Ok(Self {
            conflicts: ConflictGraph::new(points.len()),
            mesh: Dcel::new(points, settings.tolerance),
            settings,
            rng,
            state: BuildState::SelectingSeed,
            seed: None,
            order: Vec::new(),
            stats: BuildStats::default(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// The polytope built so far.
    pub fn mesh(&self) -> &Dcel {
        &self.mesh
    }

    /// Current conflict relation.
    pub fn conflicts(&self) -> &ConflictGraph {
        &self.conflicts
    }

    /// The four seed points, once selected.
    pub fn seed_points(&self) -> Option<[PointId; 4]> {
        self.seed
    }

    /// Settings this builder runs with.
    pub fn settings(&self) -> &HullSettings {
        &self.settings
    }

    /// Counters so far.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// `(processed, total)` non-seed points.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.mesh.points().len() - MIN_HULL_POINTS;
        let processed = match self.state {
            BuildState::Inserting(i) => i,
            BuildState::Done => total,
            _ => 0,
        };
        (processed, total)
    }

    /// Checks mesh closure, orientation and conflict symmetry.
    pub fn validate(&self) -> HullResult<()> {
        self.mesh.validate()?;
        self.conflicts.validate()?;
        Ok(())
    }

    /// Advances by one state transition and returns the new state.
    pub fn step(&mut self) -> HullResult<BuildState> {
        if self.state == BuildState::Failed {
            return Err(HullError::Aborted);
        }
        match self.advance() {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(err) => {
                self.state = BuildState::Failed;
                Err(err)
            }
        }
    }

    /// Runs every remaining step and returns the finished hull.
    pub fn build(mut self) -> HullResult<ConvexHull> {
        while self.step()? != BuildState::Done {}
        debug!(
            facets = self.mesh.live_facet_count(),
            inserted = self.stats.inserted,
            skipped = self.stats.skipped,
            merged = self.stats.facets_merged,
            "hull complete"
        );
        ConvexHull::from_mesh(&self.mesh, self.stats, self.settings.tolerance)
    }

    fn advance(&mut self) -> HullResult<BuildState> {
        match self.state {
            BuildState::SelectingSeed => {
                self.seed = Some(self.select_seed()?);
                Ok(BuildState::SeededMeshBuilt)
            }
            BuildState::SeededMeshBuilt => {
                self.build_seed_mesh()?;
                Ok(self.after(0))
            }
            BuildState::Inserting(i) => {
                let point = *self.order.get(i).ok_or_else(|| {
                    HullError::invariant(None, format!("permutation has no position {i}"))
                })?;
                self.insert(point)?;
                Ok(self.after(i + 1))
            }
            BuildState::Done => Ok(BuildState::Done),
            BuildState::Failed => Err(HullError::Aborted),
        }
    }

    fn after(&self, position: usize) -> BuildState {
        if position < self.order.len() {
            BuildState::Inserting(position)
        } else {
            BuildState::Done
        }
    }

    fn build_seed_mesh(&mut self) -> HullResult<()> {
        let seed = self
            .seed
            .ok_or_else(|| HullError::invariant(None, "seed mesh requested before seed selection"))?;
        let facets = self.mesh.seed_tetrahedron(seed)?;
        self.stats.facets_created += facets.len();

        let mut rest: Vec<PointId> = (0..self.mesh.points().len() as u32)
            .map(PointId)
            .filter(|id| !seed.contains(id))
            .collect();
        self.conflicts = ConflictGraph::build(&self.mesh, &facets, &rest)?;
        rest.shuffle(&mut self.rng);
        self.order = rest;

        debug!(
            seed = ?seed,
            conflicts = self.conflicts.len(),
            remaining = self.order.len(),
            "seed polytope built"
        );
        if self.settings.validate_each_step {
            self.validate()?;
        }
        Ok(())
    }

    fn insert(&mut self, point: PointId) -> HullResult<()> {
        // A facet seen only through rounding is one the point lies on; it
        // stays and takes the point through a merge instead.
        let mut visible = BTreeSet::new();
        for facet in self.conflicts.facets_of(point) {
            if !self.mesh.is_coplanar(facet, point)? {
                visible.insert(facet);
            }
        }
        if visible.is_empty() {
            self.conflicts.detach_point(point);
            self.stats.skipped += 1;
            trace!(point = point.0, "enclosed, skipped");
            return Ok(());
        }

        let horizon = horizon::find_horizon(&self.mesh, &visible, point)?;
        let mut caps = Vec::with_capacity(horizon.len());
        for &edge in &horizon {
            let cap = cap::add_cap(&mut self.mesh, &mut self.conflicts, point, edge)?;
            if cap.merged {
                self.stats.facets_merged += 1;
            } else {
                self.stats.facets_created += 1;
            }
            caps.push(cap.edge);
        }
        // Stitching detaches the spikes, so read the cap facets first.
        let touched = caps
            .iter()
            .map(|&cap| self.mesh.facet_of(cap))
            .collect::<Result<BTreeSet<FacetId>, _>>()?;
        self.stats.spikes_collapsed += cap::stitch_caps(&mut self.mesh, point, &caps)?;

        for &facet in &visible {
            self.conflicts.detach_facet(facet);
            self.mesh.remove_facet(facet)?;
        }
        self.conflicts.detach_point(point);
        self.stats.facets_removed += visible.len();

        let repairs = tidy::tidy(&mut self.mesh, &mut self.conflicts, point, touched)?;
        self.stats.facets_fused += repairs.fused;
        self.stats.vertices_dropped += repairs.dropped;
        self.stats.inserted += 1;

        trace!(
            point = point.0,
            visible = visible.len(),
            horizon = horizon.len(),
            fused = repairs.fused,
            live = self.mesh.live_facet_count(),
            "point inserted"
        );
        if self.settings.validate_each_step {
            self.validate()?;
        }
        Ok(())
    }
}

//! Random selection of the four seed points.
//!
//! Each of the four picks first draws at random from a shared budget of
//! `settings.seed_attempts`. Once the budget is spent, a pick falls back to
//! one linear scan over the input, so an input with only a handful of points
//! off a common line or plane still finds them.

use super::HullBuilder;
use crate::core::vec3::Vec3;
use crate::error::{HullError, HullResult};
use crate::mesh::PointId;
use crate::predicates::{collinear, coplanar4};
use rand::Rng;
use tracing::debug;

impl<R: Rng> HullBuilder<R> {
    /// Picks point ids until they span a tetrahedron.
    ///
    /// Fails only when the scan after the random draws finds no acceptable
    /// point, reporting what the input degenerates to.
    pub(super) fn select_seed(&mut self) -> HullResult<[PointId; 4]> {
        let tolerance = self.settings.tolerance;
        let mut attempts = 0;

        let first = self
            .pick(&mut attempts, |_| true)
            .ok_or_else(|| HullError::degenerate("no points to draw from"))?;
        let p1 = self.position(first)?;

        let second = self
            .pick(&mut attempts, |p| p.distance(p1) > tolerance)
            .ok_or_else(|| HullError::degenerate("all points coincide"))?;
        let p2 = self.position(second)?;

        let third = self
            .pick(&mut attempts, |p| !collinear(p1, p2, p, tolerance))
            .ok_or_else(|| HullError::degenerate("all points are collinear"))?;
        let p3 = self.position(third)?;

        let fourth = self
            .pick(&mut attempts, |p| !coplanar4(p1, p2, p3, p, tolerance))
            .ok_or_else(|| HullError::degenerate("all points are coplanar"))?;

        debug!(
            seed = ?[first.0, second.0, third.0, fourth.0],
            attempts,
            "seed tetrahedron selected"
        );
        Ok([first, second, third, fourth])
    }

    /// Draws until `accept` holds or the budget runs out, then scans.
    fn pick(&mut self, attempts: &mut usize, accept: impl Fn(Vec3) -> bool) -> Option<PointId> {
        let count = self.mesh.points().len();
        if count == 0 {
            return None;
        }
        while *attempts < self.settings.seed_attempts {
            *attempts += 1;
            let index = self.rng.gen_range(0..count);
            if self.mesh.points().get(index).is_some_and(|&p| accept(p)) {
                return Some(PointId(index as u32));
            }
        }
        let index = self.mesh.points().iter().position(|&p| accept(p))?;
        debug!(index, "seed pick fell back to a scan");
        Some(PointId(index as u32))
    }

    fn position(&self, id: PointId) -> HullResult<Vec3> {
        Ok(self.mesh.point(id)?)
    }
}

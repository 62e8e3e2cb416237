//! Thin wrapper around `glam::DVec3` shared across the hull modules.
//!
//! Points and displacements are both `Vec3`; the helpers below cover the few
//! aggregate operations the builder needs.

pub use glam::DVec3 as Vec3;

/// Returns the arithmetic mean of the given positions, or the origin when empty.
///
/// # Examples
/// ```
/// use incremental_hull::core::vec3::{centroid, Vec3};
/// let c = centroid(&[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)]);
/// assert_eq!(c, Vec3::new(1.0, 0.0, 0.0));
/// ```
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f64
}

/// Scalar triple product `a · (b × c)`.
///
/// Six times the signed volume of the tetrahedron spanned by the three edge
/// vectors.
pub fn triple(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    a.dot(b.cross(c))
}

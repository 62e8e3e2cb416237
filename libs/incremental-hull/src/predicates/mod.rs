//! # Geometric Predicates
//!
//! Floating point tests deciding visibility, coplanarity and collinearity.
//!
//! ## Conventions
//!
//! Facet normals are passed unnormalized (the raw edge cross product). The
//! visibility test is a strict sign comparison and needs no scaling, so it
//! stays exact for small integer coordinates. The tolerance-based tests divide
//! by the relevant length so `tolerance` is always a Euclidean distance.

use crate::core::vec3::{triple, Vec3};

/// Returns true when `point` lies strictly in front of the plane through
/// `on_plane` with outward normal `normal`.
///
/// # Examples
/// ```
/// use incremental_hull::predicates::visible;
/// use incremental_hull::Vec3;
/// assert!(visible(Vec3::Z, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)));
/// assert!(!visible(Vec3::Z, Vec3::ZERO, Vec3::new(5.0, 5.0, 0.0)));
/// ```
#[inline]
pub fn visible(normal: Vec3, on_plane: Vec3, point: Vec3) -> bool {
    normal.dot(point) > normal.dot(on_plane)
}

/// Returns true when `point` is within `tolerance` of the plane through
/// `on_plane` with normal `normal`.
///
/// A zero normal never reports coplanarity.
#[inline]
pub fn coplanar(normal: Vec3, on_plane: Vec3, point: Vec3, tolerance: f64) -> bool {
    let length = normal.length();
    if length == 0.0 {
        return false;
    }
    normal.dot(point - on_plane).abs() < tolerance * length
}

/// Returns true when `c` is within `tolerance` of the line through `a` and `b`.
///
/// Coincident `a` and `b` do not define a line and count as collinear.
///
/// # Examples
/// ```
/// use incremental_hull::predicates::collinear;
/// use incremental_hull::Vec3;
/// let a = Vec3::ZERO;
/// let b = Vec3::new(1.0, 1.0, 1.0);
/// assert!(collinear(a, b, Vec3::new(3.0, 3.0, 3.0), 1.0e-8));
/// assert!(!collinear(a, b, Vec3::new(3.0, 3.0, 2.0), 1.0e-8));
/// ```
pub fn collinear(a: Vec3, b: Vec3, c: Vec3, tolerance: f64) -> bool {
    let axis = b - a;
    let length = axis.length();
    if length <= tolerance {
        return true;
    }
    axis.cross(c - a).length() / length < tolerance
}

/// Returns true when `d` is within `tolerance` of the plane through `a`, `b`
/// and `c`.
///
/// A degenerate triangle `abc` does not define a plane and counts as coplanar.
pub fn coplanar4(a: Vec3, b: Vec3, c: Vec3, d: Vec3, tolerance: f64) -> bool {
    let area = (b - a).cross(c - a).length();
    if area == 0.0 {
        return true;
    }
    triple(d - a, b - a, c - a).abs() / area < tolerance
}

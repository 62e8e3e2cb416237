//! # Config Crate
//!
//! Centralized configuration constants for the incremental convex hull
//! workspace. All tolerances, retry bounds and default seeds are defined here
//! so the predicates, the builder and the tests agree on a single value.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{HullSettings, EPSILON_TOLERANCE, MIN_HULL_POINTS};
//!
//! // One tolerance shared by every predicate
//! let distance: f64 = 1e-9;
//! assert!(distance.abs() < EPSILON_TOLERANCE);
//!
//! // Settings default to the constants
//! let settings = HullSettings::default();
//! assert_eq!(settings.tolerance, EPSILON_TOLERANCE);
//! assert_eq!(MIN_HULL_POINTS, 4);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Reproducible**: The default generator seed is fixed
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

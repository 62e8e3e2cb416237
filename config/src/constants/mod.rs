//! Centralized configuration values shared across the incremental hull
//! workspace.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Numerical tolerance shared by every geometric predicate.
///
/// Coplanarity, collinearity and seed selection all compare distances against
/// this one value so that decisions agree at shared facet boundaries.
/// Visibility is the exception: it is a strict sign test.
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = 1.0e-8;

// =============================================================================
// SEED SELECTION
// =============================================================================

/// Number of points needed to bootstrap a 3D polytope.
///
/// # Examples
/// ```
/// use config::constants::MIN_HULL_POINTS;
/// assert_eq!(MIN_HULL_POINTS, 4);
/// ```
pub const MIN_HULL_POINTS: usize = 4;

/// Upper bound on random index draws while selecting the seed tetrahedron.
///
/// Exceeding it means the input is collinear or coplanar.
///
/// # Examples
/// ```
/// use config::constants::SEED_SELECTION_MAX_ATTEMPTS;
/// assert!(SEED_SELECTION_MAX_ATTEMPTS >= 1024);
/// ```
pub const SEED_SELECTION_MAX_ATTEMPTS: usize = 4096;

/// Seed for the default random generator.
///
/// Builds are reproducible unless the caller supplies another seed or
/// generator.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RNG_SEED;
/// assert_ne!(DEFAULT_RNG_SEED, 0);
/// ```
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_C0DE_2024_0001;

// =============================================================================
// SETTINGS
// =============================================================================

/// Immutable snapshot of the settings driving one hull construction.
///
/// # Examples
/// ```
/// use config::constants::HullSettings;
/// let settings = HullSettings::default();
/// assert!(settings.tolerance > 0.0);
/// assert!(!settings.validate_each_step);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullSettings {
    /// Tolerance propagated into the coplanarity and collinearity predicates.
    pub tolerance: f64,
    /// Maximum random draws spent selecting the seed tetrahedron.
    pub seed_attempts: usize,
    /// Seed for the default generator.
    pub rng_seed: u64,
    /// Run the full mesh and conflict-graph validators after every insertion.
    pub validate_each_step: bool,
}

impl HullSettings {
    /// Builds settings enforcing strict validation of the supplied tolerance
    /// and retry bound.
    ///
    /// # Examples
    /// ```
    /// use config::constants::HullSettings;
    /// let settings = HullSettings::new(1.0e-7, 512).expect("valid settings");
    /// assert_eq!(settings.seed_attempts, 512);
    /// ```
    pub fn new(tolerance: f64, seed_attempts: usize) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if seed_attempts < MIN_HULL_POINTS {
            return Err(ConfigError::InvalidSeedAttempts(seed_attempts));
        }
        Ok(Self {
            tolerance,
            seed_attempts,
            ..Self::default()
        })
    }

    /// Returns a copy using the given generator seed.
    ///
    /// # Examples
    /// ```
    /// use config::constants::HullSettings;
    /// let settings = HullSettings::default().with_rng_seed(7);
    /// assert_eq!(settings.rng_seed, 7);
    /// ```
    pub fn with_rng_seed(self, rng_seed: u64) -> Self {
        Self { rng_seed, ..self }
    }

    /// Returns a copy that validates the polytope after every insertion.
    pub fn with_validation(self, validate_each_step: bool) -> Self {
        Self {
            validate_each_step,
            ..self
        }
    }
}

impl Default for HullSettings {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            seed_attempts: SEED_SELECTION_MAX_ATTEMPTS,
            rng_seed: DEFAULT_RNG_SEED,
            validate_each_step: false,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the retry bound cannot even draw four indices.
    InvalidSeedAttempts(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidSeedAttempts(value) => {
                write!(f, "seed_attempts must be >= {MIN_HULL_POINTS}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

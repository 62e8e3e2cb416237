//! # Hull Errors
//!
//! Error types surfaced by hull construction and point loading.

use crate::mesh::{PointId, TopologyError};
use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur while building a convex hull.
#[derive(Debug, Error)]
pub enum HullError {
    /// Too few points, or every point lies on one line or plane.
    #[error("Degenerate input: {message}")]
    DegenerateInput {
        /// What made the input unusable
        message: String,
    },

    /// An input coordinate is NaN or infinite.
    #[error("Point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Position of the offending point in the input
        index: usize,
    },

    /// The insertion algorithm reached a state it cannot continue from.
    #[error("Invariant violated while inserting {point:?}: {message}")]
    InvariantViolation {
        /// Point being inserted, if any
        point: Option<PointId>,
        /// Description of the broken invariant
        message: String,
    },

    /// Arena reference or linkage failure inside the half-edge mesh.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Settings rejected by validation.
    #[error("Invalid settings: {0}")]
    Config(#[from] ConfigError),

    /// Malformed point file.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// One-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Point file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous step failed; the builder no longer accepts work.
    #[error("Build aborted after an earlier failure")]
    Aborted,
}

impl HullError {
    /// Creates a degenerate input error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(point: Option<PointId>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            point,
            message: message.into(),
        }
    }

    /// Creates a parse error for a one-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Returns true when the failure points at a broken mesh rather than at
    /// the input.
    ///
    /// This does not decide the builder's state: any error returned by
    /// [`crate::HullBuilder::step`], degenerate input included, leaves it
    /// [`crate::BuildState::Failed`].
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolation { .. } | Self::Topology(_) | Self::Aborted
        )
    }
}

/// Result type for hull operations.
pub type HullResult<T> = Result<T, HullError>;

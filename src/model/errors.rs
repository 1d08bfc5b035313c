//! Errors for the renewal model layer (panel validation, parameter packing,
//! and model construction).
//!
//! ## Conventions
//! - **Indices are 0-based internally**; observed state indices arrive
//!   1-based and are converted (and validated) at [`ReplacementData`]
//!   construction.
//! - Decisions are booleans (`true` = replace); transition-category indices
//!   are 0-based.
//! - Fixed-point failures encountered while simulating a panel are
//!   normalized into [`ModelError::FixedPointFailure`] with a readable
//!   status.
//!
//! [`ReplacementData`]: crate::model::data::ReplacementData
use crate::solver::errors::SolveError;

/// Result alias for model-layer operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for the renewal model layer.
///
/// Covers grid/model construction, panel-data validation, and the explicit
/// bijection between flat optimizer vectors and structured parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Model construction ----
    /// Discount factor must satisfy 0 < beta < 1.
    InvalidBeta { value: f64 },

    /// The state grid needs at least two points.
    GridTooSmall { n: usize },

    /// The grid upper bound must be finite and strictly positive.
    InvalidGridMax { value: f64 },

    // ---- Panel validation ----
    /// Panel contains no observations.
    EmptyPanel,

    /// Observed state index out of range (1-based, must be in 1..=n).
    StateOutOfRange { index: usize, x: usize, n: usize },

    /// Observed transition increment out of range for the grid.
    IncrementOutOfRange { index: usize, dx1: usize, n: usize },

    /// Panel transition categories exceed what the parameter set describes.
    CategoryMismatch { expected: usize, actual: usize },

    // ---- Parameter packing ----
    /// Flat parameter vector length inconsistent with the parameter set.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Parameter entries must be finite.
    NonFiniteTheta { index: usize, value: f64 },

    /// Transition-probability masses must be finite.
    NonFiniteProbability { index: usize, value: f64 },

    // ---- Simulation ----
    /// Inner fixed-point solve failed while simulating a panel.
    FixedPointFailure { status: String },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidBeta { value } => {
                write!(f, "Invalid discount factor {value}: must satisfy 0 < beta < 1")
            }
            ModelError::GridTooSmall { n } => {
                write!(f, "State grid needs at least two points, got {n}")
            }
            ModelError::InvalidGridMax { value } => {
                write!(f, "Invalid grid upper bound {value}: must be finite and > 0")
            }
            ModelError::EmptyPanel => {
                write!(f, "Panel contains no observations")
            }
            ModelError::StateOutOfRange { index, x, n } => {
                write!(f, "Observation {index}: state index {x} out of range 1..={n}")
            }
            ModelError::IncrementOutOfRange { index, dx1, n } => {
                write!(f, "Observation {index}: increment {dx1} exceeds grid of size {n}")
            }
            ModelError::CategoryMismatch { expected, actual } => {
                write!(
                    f,
                    "Panel has {actual} transition categories but the parameter set \
                     describes {expected}"
                )
            }
            ModelError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, got {actual}")
            }
            ModelError::NonFiniteTheta { index, value } => {
                write!(f, "Parameter entry {index} is not finite: {value}")
            }
            ModelError::NonFiniteProbability { index, value } => {
                write!(f, "Transition mass {index} is not finite: {value}")
            }
            ModelError::FixedPointFailure { status } => {
                write!(f, "Fixed-point solve failed during simulation: {status}")
            }
        }
    }
}

impl From<SolveError> for ModelError {
    fn from(err: SolveError) -> Self {
        ModelError::FixedPointFailure { status: err.to_string() }
    }
}

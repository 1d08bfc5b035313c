//! Unified error surface for the estimation driver.
//!
//! The driver crosses every layer boundary in the crate (panel validation,
//! inner fixed-point solves, outer optimization, covariance inversion), so
//! its error type wraps each layer's error and converts via `From` so `?`
//! works throughout.
use crate::inference::errors::InferenceError;
use crate::model::errors::ModelError;
use crate::optimization::errors::OptError;
use crate::solver::errors::SolveError;

/// Result alias for the estimation driver.
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Errors surfaced by the full estimation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// Model or panel validation failure.
    Model(ModelError),
    /// Inner fixed-point solve failure.
    FixedPoint(SolveError),
    /// Outer optimization failure.
    Optimization(OptError),
    /// Covariance computation failure.
    Inference(InferenceError),
}

impl std::error::Error for EstimationError {}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationError::Model(e) => write!(f, "Model error: {e}"),
            EstimationError::FixedPoint(e) => write!(f, "Fixed-point error: {e}"),
            EstimationError::Optimization(e) => write!(f, "Optimization error: {e}"),
            EstimationError::Inference(e) => write!(f, "Inference error: {e}"),
        }
    }
}

impl From<ModelError> for EstimationError {
    fn from(err: ModelError) -> Self {
        EstimationError::Model(err)
    }
}

impl From<SolveError> for EstimationError {
    fn from(err: SolveError) -> Self {
        EstimationError::FixedPoint(err)
    }
}

impl From<OptError> for EstimationError {
    fn from(err: OptError) -> Self {
        EstimationError::Optimization(err)
    }
}

impl From<InferenceError> for EstimationError {
    fn from(err: InferenceError) -> Self {
        EstimationError::Inference(err)
    }
}

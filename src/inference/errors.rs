//! Errors for post-estimation inference.

/// Result alias for inference computations.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Failures while turning an information matrix into standard errors.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// The scaled information matrix could not be inverted.
    CovarianceUnavailable { dim: usize, reason: &'static str },

    /// Information matrix is not square.
    NotSquare { rows: usize, cols: usize },

    /// Information matrix entries must be finite.
    NonFiniteInformation { row: usize, col: usize, value: f64 },
}

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::CovarianceUnavailable { dim, reason } => {
                write!(f, "Covariance unavailable for {dim}x{dim} information matrix: {reason}")
            }
            InferenceError::NotSquare { rows, cols } => {
                write!(f, "Information matrix must be square, got {rows}x{cols}")
            }
            InferenceError::NonFiniteInformation { row, col, value } => {
                write!(f, "Information matrix entry ({row}, {col}) is not finite: {value}")
            }
        }
    }
}

//! Errors for the fixed-point solver layer.

/// Result alias for solver operations that may produce [`SolveError`].
pub type SolveResult<T> = Result<T, SolveError>;

/// Failure modes of the hybrid fixed-point solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Iteration caps exhausted before the residual fell below tolerance.
    NoConvergence { contraction_iters: usize, newton_iters: usize, residual: f64 },

    /// The Newton-Kantorovich system `(I - Γ')` could not be factorized.
    SingularSystem { dim: usize },

    /// Initial value has the wrong length for the operator.
    DimensionMismatch { expected: usize, actual: usize },

    // ---- Options validation ----
    /// Tolerances must be finite and strictly positive.
    InvalidTolerance { name: &'static str, value: f64 },

    /// Iteration caps must be strictly positive.
    InvalidIterationCap { name: &'static str },
}

impl std::error::Error for SolveError {}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::NoConvergence { contraction_iters, newton_iters, residual } => {
                write!(
                    f,
                    "Fixed point not reached after {contraction_iters} contraction and \
                     {newton_iters} Newton iterations (residual {residual:e})"
                )
            }
            SolveError::SingularSystem { dim } => {
                write!(f, "Singular Newton-Kantorovich system of dimension {dim}")
            }
            SolveError::DimensionMismatch { expected, actual } => {
                write!(f, "Initial value length mismatch: expected {expected}, got {actual}")
            }
            SolveError::InvalidTolerance { name, value } => {
                write!(f, "Invalid solver tolerance {name} = {value}: must be finite and > 0")
            }
            SolveError::InvalidIterationCap { name } => {
                write!(f, "Invalid solver iteration cap {name}: must be > 0")
            }
        }
    }
}

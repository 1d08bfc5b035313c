//! Configuration for the hybrid fixed-point solver.
use crate::solver::errors::{SolveError, SolveResult};

/// Tuning knobs for the successive-approximation / Newton-Kantorovich hybrid.
///
/// Fields:
/// - `contraction_tol`: sup-norm tolerance at which plain successive
///   approximation is already accepted as converged.
/// - `newton_tol`: sup-norm residual tolerance for the Newton phase.
/// - `switch_tol`: switch to Newton once the ratio of successive iterate
///   gaps is within this distance of the contraction modulus (the signature
///   of linear convergence having set in).
/// - `min_contraction_iters`: iterations to run before the switch rule is
///   consulted, so the ratio estimate is meaningful.
/// - `max_contraction_iters` / `max_newton_iters`: hard caps; exhausting
///   both surfaces [`SolveError::NoConvergence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub contraction_tol: f64,
    pub newton_tol: f64,
    pub switch_tol: f64,
    pub min_contraction_iters: usize,
    pub max_contraction_iters: usize,
    pub max_newton_iters: usize,
}

impl SolverOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`SolveError::InvalidTolerance`] for non-finite or non-positive
    ///   tolerances.
    /// - [`SolveError::InvalidIterationCap`] for zero iteration caps.
    pub fn new(
        contraction_tol: f64, newton_tol: f64, switch_tol: f64, min_contraction_iters: usize,
        max_contraction_iters: usize, max_newton_iters: usize,
    ) -> SolveResult<Self> {
        for (name, value) in [
            ("contraction_tol", contraction_tol),
            ("newton_tol", newton_tol),
            ("switch_tol", switch_tol),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SolveError::InvalidTolerance { name, value });
            }
        }
        if max_contraction_iters == 0 {
            return Err(SolveError::InvalidIterationCap { name: "max_contraction_iters" });
        }
        if max_newton_iters == 0 {
            return Err(SolveError::InvalidIterationCap { name: "max_newton_iters" });
        }
        Ok(Self {
            contraction_tol,
            newton_tol,
            switch_tol,
            min_contraction_iters,
            max_contraction_iters,
            max_newton_iters,
        })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            contraction_tol: 1e-10,
            newton_tol: 1e-12,
            switch_tol: 1e-2,
            min_contraction_iters: 2,
            max_contraction_iters: 300,
            max_newton_iters: 40,
        }
    }
}

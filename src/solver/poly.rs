//! Hybrid successive-approximation / Newton-Kantorovich fixed-point solver.
//!
//! Purpose
//! -------
//! Find `v* = Γ(v*)` for a contraction `Γ` with modulus `β < 1`. Plain
//! successive approximation converges linearly at rate `β`; once the ratio of
//! successive iterate gaps settles near `β` — the telltale of linear
//! convergence having set in, meaning the iterate is inside the Newton basin —
//! the solver switches to Newton-Kantorovich steps on `F(v) = v − Γ(v)`,
//! which converge quadratically. Each Newton step solves the linear system
//! `(I − Γ'(v)) Δ = v − Γ(v)` and updates `v ← v − Δ`.
//!
//! Key behaviors
//! -------------
//! - An empty starting point is replaced by zeros so callers can warm-start
//!   opportunistically; a non-empty start of the wrong length is rejected as
//!   a [`SolveError::DimensionMismatch`].
//! - Returns the fixed point together with the auxiliary vector and the
//!   Jacobian evaluated *at* the fixed point — downstream code inverts
//!   `I − Γ'(v*)` for implicit differentiation and must not be handed a
//!   stale Jacobian from an earlier iterate.
//! - Iteration-cap exhaustion is a hard [`SolveError::NoConvergence`];
//!   callers decide whether to treat it as fatal.
use crate::solver::{
    contraction::ContractionMap,
    errors::{SolveError, SolveResult},
    options::SolverOptions,
};
use crate::utils::{from_dvector, to_dmatrix, to_dvector};
use ndarray::{Array1, Array2};

/// A converged fixed point together with the quantities evaluated there.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPoint {
    /// The fixed point `v*` with `‖v* − Γ(v*)‖∞` below tolerance.
    pub value: Array1<f64>,
    /// Auxiliary vector returned by the operator at `v*` (keep
    /// probabilities for the renewal model).
    pub aux: Array1<f64>,
    /// Jacobian `Γ'(v*)`.
    pub jacobian: Array2<f64>,
    /// Successive-approximation iterations performed.
    pub contraction_iters: usize,
    /// Newton-Kantorovich iterations performed.
    pub newton_iters: usize,
    /// Final sup-norm residual `‖v* − Γ(v*)‖∞`.
    pub residual: f64,
}

/// Solve `v = Γ(v)` with the hybrid scheme.
///
/// # Arguments
/// - `map`: the contraction operator (with Jacobian).
/// - `start`: initial guess; an empty guess stands for "no warm start" and
///   is replaced by zeros.
/// - `opts`: tolerances and iteration caps.
///
/// # Errors
/// - [`SolveError::DimensionMismatch`] when a non-empty `start` does not
///   match `map.dim()`.
/// - [`SolveError::NoConvergence`] when both phase caps are exhausted.
/// - [`SolveError::SingularSystem`] when `(I − Γ')` cannot be factorized;
///   for a genuine contraction this indicates a broken operator, not a bad
///   starting point.
pub fn solve<M: ContractionMap>(
    map: &M, start: Array1<f64>, opts: &SolverOptions,
) -> SolveResult<FixedPoint> {
    let n = map.dim();
    let beta = map.modulus();
    let mut v = if start.is_empty() {
        Array1::zeros(n)
    } else if start.len() == n {
        start
    } else {
        return Err(SolveError::DimensionMismatch { expected: n, actual: start.len() });
    };

    // Phase 1: successive approximation.
    let mut contraction_iters = 0;
    let mut prev_gap = f64::INFINITY;
    for it in 0..opts.max_contraction_iters {
        let (next, _aux) = map.apply(&v);
        let gap = sup_norm_diff(&next, &v);
        v = next;
        contraction_iters = it + 1;
        if gap < opts.contraction_tol {
            return finish(map, v, contraction_iters, 0);
        }
        let ratio_settled =
            prev_gap.is_finite() && prev_gap > 0.0 && (gap / prev_gap - beta).abs() < opts.switch_tol;
        if it + 1 >= opts.min_contraction_iters && ratio_settled {
            break;
        }
        prev_gap = gap;
    }

    // Phase 2: Newton-Kantorovich on F(v) = v - Γ(v).
    for it in 0..opts.max_newton_iters {
        let (image, aux) = map.apply(&v);
        let residual = &v - &image;
        let res_norm = residual.iter().fold(0.0_f64, |m, r| m.max(r.abs()));
        if res_norm < opts.newton_tol {
            return finish(map, v, contraction_iters, it);
        }
        let jac = map.jacobian(&v, &aux);
        let system = to_dmatrix(&(Array2::eye(n) - &jac));
        let rhs = to_dvector(&residual);
        let step = system
            .lu()
            .solve(&rhs)
            .ok_or(SolveError::SingularSystem { dim: n })?;
        v -= &from_dvector(&step);
    }

    let (image, _aux) = map.apply(&v);
    Err(SolveError::NoConvergence {
        contraction_iters,
        newton_iters: opts.max_newton_iters,
        residual: sup_norm_diff(&v, &image),
    })
}

/// Re-evaluate the operator at the accepted iterate so the returned auxiliary
/// vector and Jacobian are consistent with the fixed point itself.
fn finish<M: ContractionMap>(
    map: &M, v: Array1<f64>, contraction_iters: usize, newton_iters: usize,
) -> SolveResult<FixedPoint> {
    let (image, aux) = map.apply(&v);
    let residual = sup_norm_diff(&v, &image);
    // Return everything evaluated at the same point, so the Jacobian handed
    // to implicit differentiation is consistent with `value` and `aux`.
    let jacobian = map.jacobian(&v, &aux);
    Ok(FixedPoint { value: v, aux, jacobian, contraction_iters, newton_iters, residual })
}

fn sup_norm_diff(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a.iter().zip(b.iter()).fold(0.0_f64, |m, (x, y)| m.max((x - y).abs()))
}

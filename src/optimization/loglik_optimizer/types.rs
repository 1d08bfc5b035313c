//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! log-likelihood optimizer. By defining these in one place, the rest of
//! the optimization code can stay agnostic to `ndarray` and Argmin
//! generics and can more easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients,
//!   Hessians, and scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired trust-region solver aliases for the two supported
//!   subproblem strategies, using the common `(Theta, Grad, Hessian)`
//!   numeric shapes.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors and matrices are represented as `ndarray`
//!   containers over `f64`.
//! - `Cost` is always a scalar `f64`; higher layers handle the sign flip
//!   between cost and log-likelihood.
//! - The trust-region aliases assume Argmin's generic forms as of the
//!   pinned Argmin version.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are treated conceptually as column vectors with
//!   length equal to the number of free parameters.
//! - `Hessian` is a dense square matrix with dimension
//!   `theta.len() × theta.len()`.
//! - `NewtonState` is the full iteration state a second-order Argmin
//!   solver threads through the run; runners read parameters, gradients,
//!   and counters from it after termination.
//!
//! Downstream usage
//! ----------------
//! - Other optimizer modules import these aliases instead of referring
//!   directly to `ndarray` or Argmin generics.
//! - Solver wrappers construct concrete trust-region instances via
//!   [`TrustRegionSteihaug`] and [`TrustRegionCauchy`].
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; there are no
//!   dedicated unit tests.
//! - Correctness is exercised indirectly by tests in the surrounding
//!   optimizer modules that instantiate solvers and operate on these
//!   aliases.
use argmin::core::IterState;
use argmin::solver::trustregion::{CauchyPoint, Steihaug, TrustRegion};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` for log-likelihood optimization.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)` for optimization.
///
/// Alias for `ndarray::Array1<f64>`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix for second-order information.
///
/// Alias for `ndarray::Array2<f64>`; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the cost `c(θ) = -ℓ(θ)` derived from a
/// log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Hard iteration cap applied when [`Tolerances`] leaves `max_iter`
/// unset. Trust-region solvers never self-terminate, so a cap is always
/// installed on the executor.
///
/// [`Tolerances`]: crate::optimization::loglik_optimizer::Tolerances
pub const DEFAULT_MAX_ITER: usize = 500;

/// Steihaug conjugate-gradient subproblem specialized to this crate's
/// numeric types.
pub type SteihaugSub = Steihaug<Theta, f64>;

/// Cauchy-point subproblem (steepest descent to the region boundary).
pub type CauchySub = CauchyPoint<f64>;

/// Trust-region solver wired to the Steihaug subproblem.
pub type TrustRegionSteihaug = TrustRegion<SteihaugSub, f64>;

/// Trust-region solver wired to the Cauchy-point subproblem.
pub type TrustRegionCauchy = TrustRegion<CauchySub, f64>;

/// Full iteration state threaded through a second-order Argmin run.
pub type NewtonState = IterState<Theta, Grad, (), Hessian, (), f64>;

//! optimization — MLE stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer with a single error/result
//! surface. Callers implement a scored log-likelihood, choose tolerances,
//! and obtain fitted parameters and diagnostics without touching backend
//! solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`) with trust-region Newton solvers, including
//!   configuration of subproblems and stopping criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and assume
//!   that inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - Log-likelihood implementations are expected to treat domain violations
//!   (e.g., parameter points where the inner fixed point fails) as
//!   recoverable errors surfaced through the optimization layer.
pub mod errors;
pub mod loglik_optimizer;

pub use errors::{OptError, OptResult};
pub use loglik_optimizer::{
    NewtonOptions, OptimOutcome, ScoredLikelihood, Subproblem, Tolerances, maximize,
};

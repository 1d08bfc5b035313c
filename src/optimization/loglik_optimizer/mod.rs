//! loglik_optimizer — MLE-friendly, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)` with analytic scores. Callers implement a single
//! trait, [`ScoredLikelihood`], and invoke [`maximize`] to run a
//! trust-region Newton solver with a configurable subproblem, tolerances,
//! and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Expose a single, user-facing entrypoint [`maximize`] that:
//!   - validates the initial guess with [`ScoredLikelihood::check`],
//!   - selects a trust-region solver via [`builders`] based on
//!     [`traits::Subproblem`],
//!   - executes the solver via [`run::run_trust_region`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide robust finite-difference helpers in [`finite_diff`] for
//!   gradients and Hessians when analytic derivatives are missing, with
//!   post-hoc validation and error capture.
//! - Centralize optimizer configuration ([`Tolerances`], [`NewtonOptions`])
//!   and validation logic ([`validation`]) so downstream code can assume
//!   sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** a log-likelihood `ℓ(θ)` by minimizing
//!   a cost `c(θ) = -ℓ(θ)`; user code must implement `ℓ(θ)` and `∇ℓ(θ)`
//!   (when available), **never** the cost directly. The information matrix
//!   is the one exception: it approximates the cost curvature directly and
//!   is passed through unflipped.
//! - [`ScoredLikelihood::value`] and [`ScoredLikelihood::grad`] must treat
//!   invalid inputs as recoverable [`OptError`] values, not panics.
//! - Trust-region solvers never terminate on their own; the runner always
//!   installs an iteration cap, and convergence is judged post-run from
//!   first-order conditions (see [`OptimOutcome`]).
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`]
//!   (`Array1<f64>`). Any mapping from constrained → unconstrained space
//!   happens in the model layer.
//! - Cost is always `c(θ) = -ℓ(θ)` internally; all user-facing APIs and
//!   diagnostics (including [`OptimOutcome::value`]) are expressed in terms
//!   of the log-likelihood `ℓ`.
//! - Errors bubble up as [`OptResult<T>`] / [`OptError`]; this module and its
//!   children never intentionally panic or use `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - The estimation layer implements [`ScoredLikelihood`] for its nested
//!   fixed-point likelihood, then calls [`maximize`] with:
//!   - a model instance,
//!   - an initial parameter vector [`Theta`],
//!   - a data payload, and
//!   - a [`NewtonOptions`] configuration (tolerances, subproblem choice).
//! - Internal optimizer code:
//!   - uses [`adapter`] to bridge into Argmin,
//!   - uses [`builders`] to construct trust-region solvers,
//!   - delegates execution to [`run::run_trust_region`], and
//!   - relies on [`finite_diff`] and [`validation`] for derivative and
//!     state checks.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - sign conventions and gradient handling in [`adapter`],
//!   - finite-difference + validation behavior in [`finite_diff`] and
//!     [`validation`],
//!   - configuration and outcome invariants in [`traits`],
//!   - full trust-region runs on toy quadratics in [`api`].
//! - Integration tests exercise [`maximize`] implicitly through the full
//!   estimation pipeline.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{NewtonOptions, OptimOutcome, ScoredLikelihood, Subproblem, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use nfxp::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        NewtonOptions, OptimOutcome, ScoredLikelihood, Subproblem, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}

//! nfxp — nested fixed-point maximum-likelihood estimation for dynamic
//! discrete-choice renewal models.
//!
//! Purpose
//! -------
//! Estimate the structural parameters of a two-action renewal model — a
//! replacement cost `RC`, a marginal cost slope `c`, and a nonparametric
//! state-transition distribution `p` — from a panel of observed states and
//! decisions, by maximizing the likelihood implied by the model's optimal
//! policy. The likelihood itself depends on the fixed point of a Bellman
//! contraction, so every outer-loop evaluation nests an inner fixed-point
//! solve (the NFXP structure).
//!
//! Key behaviors
//! -------------
//! - Solve the expected-value fixed point with a hybrid successive
//!   approximation / Newton-Kantorovich scheme ([`solver`]).
//! - Evaluate per-observation choice and transition likelihood
//!   contributions, with a warm-started inner solve ([`estimation`]).
//! - Differentiate through the fixed point with the implicit-function
//!   theorem to obtain exact analytic scores and a BHHH information
//!   matrix ([`estimation::score`]).
//! - Drive a two- or three-stage estimation (nonparametric transition
//!   probabilities first, structural parameters second, optionally a
//!   joint pass) with a trust-region Newton outer loop
//!   ([`estimation::driver`], [`optimization`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The discount factor satisfies `0 < β < 1`, so the Bellman operator is
//!   a contraction and `I − Γ'(ev)` is invertible at the fixed point.
//! - Parameter vectors flow through an explicit [`model::params::ParamSpec`]
//!   bijection; no ambient mutable state is shared between estimation runs.
//! - All vectors and matrices on the estimation path are `ndarray`
//!   containers over `f64`; linear solves go through `nalgebra`.
//!
//! Downstream usage
//! ----------------
//! - Construct a [`model::zurcher::Zurcher`] and a validated
//!   [`model::data::ReplacementData`] panel, then call
//!   [`estimation::driver::estimate`].
//! - The lower layers ([`solver::poly::solve`], the
//!   [`optimization::loglik_optimizer`] surface) are public for callers
//!   that want to reuse the fixed-point solver or the outer optimizer with
//!   their own models.

pub mod estimation;
pub mod inference;
pub mod model;
pub mod optimization;
pub mod solver;
pub mod utils;

//! loglik_optimizer::builders — trust-region solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the trust-region solvers used by
//! the log-likelihood optimizer. These helpers hide Argmin's generic
//! wiring so that higher-level code can request a configured solver
//! without touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct trust-region solvers with either the Steihaug truncated-CG
//!   subproblem or the Cauchy-point subproblem, based on crate-level
//!   aliases.
//! - Leave the initial parameter vector and maximum iterations to the
//!   runner/executor layer, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical optimizer numeric types
//!   [`Theta`], [`Grad`], and [`Hessian`] as defined in
//!   [`loglik_optimizer::types`].
//! - Trust-region radius management uses Argmin's defaults; convergence
//!   is judged post-run by the crate's first-order verdict, not by the
//!   solver itself.
//!
//! Downstream usage
//! ----------------
//! - The high-level entry point calls [`build_trust_region_steihaug`] or
//!   [`build_trust_region_cauchy`] based on the configured
//!   [`Subproblem`] in [`NewtonOptions`].
//! - The returned solver is passed to `run::run_trust_region` along with
//!   an adapted problem and initial parameters.
//!
//! [`Theta`]: crate::optimization::loglik_optimizer::types::Theta
//! [`Grad`]: crate::optimization::loglik_optimizer::types::Grad
//! [`Hessian`]: crate::optimization::loglik_optimizer::types::Hessian
//! [`loglik_optimizer::types`]: crate::optimization::loglik_optimizer::types
//! [`Subproblem`]: crate::optimization::loglik_optimizer::traits::Subproblem
//! [`NewtonOptions`]: crate::optimization::loglik_optimizer::traits::NewtonOptions
use crate::optimization::loglik_optimizer::types::{
    CauchySub, SteihaugSub, TrustRegionCauchy, TrustRegionSteihaug,
};

/// Construct a trust-region solver with the Steihaug truncated-CG
/// subproblem.
///
/// This is the preferred configuration: the subproblem uses curvature
/// information from the full Hessian, so a handful of outer iterations
/// usually suffice when the information matrix is analytic.
pub fn build_trust_region_steihaug() -> TrustRegionSteihaug {
    TrustRegionSteihaug::new(SteihaugSub::new())
}

/// Construct a trust-region solver with the Cauchy-point subproblem.
///
/// Cheaper per iteration than Steihaug but first-order along the steepest
/// descent direction; useful as a robust fallback.
pub fn build_trust_region_cauchy() -> TrustRegionCauchy {
    TrustRegionCauchy::new(CauchySub::new())
}

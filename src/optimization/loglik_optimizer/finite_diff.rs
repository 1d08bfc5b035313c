//! loglik_optimizer::finite_diff — robust finite-difference fallbacks.
//!
//! Purpose
//! -------
//! Provide the numerical-derivative fallbacks used when a model does not
//! implement analytic derivatives: a forward-difference gradient with
//! error capture, and a central-then-forward Hessian of a gradient
//! function with validation and symmetrization.
//!
//! Key behaviors
//! -------------
//! - Finite-difference closures cannot return `Result`, so evaluation
//!   errors are routed into a shared `RefCell` slot and surfaced after
//!   the FD routine returns.
//! - Central differences are preferred; any validation failure on the
//!   central approximation triggers an automatic forward-difference
//!   retry, and only the retry's validation result is surfaced.
//! - Hessians are symmetrized after validation so diagnostics still
//!   point at the raw offending entry.
//!
//! Testing notes
//! -------------
//! - Unit tests cover both successful and failing paths for gradient and
//!   Hessian computation, including the central→forward Hessian fallback
//!   behavior.
//! - Integration tests for the full optimizer exercise these helpers
//!   implicitly when derivatives are requested via finite differences.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Compute a forward-difference gradient of `func` at `theta`, with error capture.
///
/// The FD closure can't return `Result`, so any error raised by `func` is
/// stored into `closure_err` and the closure returns `NaN`. This helper:
/// - clears `closure_err`,
/// - performs `forward_diff`,
/// - if an error was captured, returns it as `Err`,
/// - validates the resulting gradient,
/// - if validation succeeds, returns the gradient as `Ok(grad)`.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD routine
/// or by validation of the resulting gradient.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// Approximate the Hessian of a gradient function at `theta`.
///
/// Tries a central-difference Hessian first; if the result fails shape or
/// finiteness validation, retries with forward differences and surfaces
/// only the retry's validation result. The returned matrix is symmetrized
/// via [`symmetrize_hess`].
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] when the fallback Hessian has the
///   wrong shape.
/// - [`OptError::InvalidHessian`] when the fallback Hessian contains
///   non-finite entries.
///
/// [`OptError::HessianDimMismatch`]: crate::optimization::errors::OptError::HessianDimMismatch
/// [`OptError::InvalidHessian`]: crate::optimization::errors::OptError::InvalidHessian
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

/// Symmetrize a Hessian in place, `h ← (h + hᵀ) / 2`.
///
/// Finite-difference Hessians pick up asymmetric round-off; downstream
/// linear algebra assumes symmetry.
pub fn symmetrize_hess(hessian: &mut Hessian) {
    let transposed = hessian.t().to_owned();
    *hessian += &transposed;
    *hessian *= 0.5;
}

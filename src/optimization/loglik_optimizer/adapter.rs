//! Adapter that exposes a user `ScoredLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
//!
//! Second-order information follows a different sign rule: the outer-product
//! information matrix `sᵀs / N` returned by
//! [`ScoredLikelihood::information`] already approximates the curvature of
//! the cost (it is positive semidefinite by construction), so it passes
//! through unflipped. The finite-difference fallback differentiates the
//! cost gradient and needs no flip either.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::{compute_hessian, run_fd_diff},
        traits::ScoredLikelihood,
        types::{Cost, Grad, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::{CostFunction, Error, Gradient, Hessian};
use finitediff::FiniteDiff;

/// Bridges a user `ScoredLikelihood` to `argmin`'s `CostFunction`,
/// `Gradient`, and `Hessian`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood).
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
/// - `Hessian::hessian` returns:
///   - the user's information matrix unflipped, or
///   - a finite-difference Hessian of the cost gradient.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: ScoredLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: ScoredLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// - Calls the user's `value(θ, data)` and checks the result is finite.
    /// - Returns `Error(NonFiniteCost)` if the value is not finite.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: ScoredLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(θ, data)`, we validate it and return `-grad`
    ///   (because the cost is `-ℓ`).
    /// - Otherwise, we compute a finite-difference gradient of the **cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), retry with *forward* differences.
    ///   - Validate the FD gradient; if it fails (e.g., non-finite), retry once
    ///     with *forward* differences and validate again.
    ///
    /// Implementation notes:
    /// - The FD closure must return `f64`, so we can't use `?` inside it; we capture
    ///   the first error in `closure_err` and return `NaN` from the closure. After
    ///   FD, we turn that captured error back into a real error (or switch to
    ///   forward diff).
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(e) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                match e {
                    OptError::GradientNotImplemented => {
                        let cost_func = |theta: &Theta| -> f64 {
                            match self.cost(theta) {
                                Ok(val) => val,
                                Err(e) => {
                                    let mut slot = closure_err.borrow_mut();
                                    if slot.is_none() {
                                        *slot = Some(e);
                                    }
                                    f64::NAN
                                }
                            }
                        };
                        let mut fd_grad = theta.central_diff(&cost_func);
                        if closure_err.borrow().is_some() {
                            fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                            return Ok(fd_grad);
                        }
                        match validate_grad(&fd_grad, dim) {
                            Ok(()) => Ok(fd_grad),
                            Err(_) => {
                                fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                                Ok(fd_grad)
                            }
                        }
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

impl<'a, F: ScoredLikelihood> Hessian for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Hessian = crate::optimization::loglik_optimizer::types::Hessian;

    /// Evaluate the cost Hessian at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `information(θ, data)`, we validate it and
    ///   return it as-is: the outer-product information matrix is already
    ///   the curvature approximation for the cost `-ℓ`.
    /// - Otherwise, we finite-difference the cost gradient via
    ///   [`compute_hessian`], which needs no sign flip either.
    ///
    /// # Errors
    /// - Propagates user errors from `information` (non-`HessianNotImplemented`).
    /// - Returns validation errors if the matrix has wrong shape or
    ///   non-finite entries.
    fn hessian(&self, theta: &Self::Param) -> Result<Self::Hessian, Error> {
        let dim = theta.len();
        match self.f.information(theta, self.data) {
            Ok(info) => {
                validate_hessian(&info, dim)?;
                Ok(info)
            }
            Err(OptError::HessianNotImplemented) => {
                // Errors in the inner gradient become NaN rows and are
                // rejected by compute_hessian's validation.
                let grad_func = |theta: &Theta| -> Grad {
                    self.gradient(theta).unwrap_or_else(|_| Grad::from_elem(dim, f64::NAN))
                };
                Ok(compute_hessian(&grad_func, theta)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: ScoredLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `ScoredLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Concave quadratic ℓ(θ) = -θ·θ with analytic derivatives.
    struct Quadratic {
        analytic: bool,
    }

    impl ScoredLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            Ok(-theta.dot(theta))
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            if self.analytic {
                Ok(theta.mapv(|x| -2.0 * x))
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }

        fn information(
            &self, theta: &Theta, _: &(),
        ) -> OptResult<crate::optimization::loglik_optimizer::types::Hessian> {
            if self.analytic {
                Ok(2.0 * ndarray::Array2::eye(theta.len()))
            } else {
                Err(OptError::HessianNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated log-likelihood, and the analytic gradient is
    // negated to match.
    fn sign_conventions() {
        let model = Quadratic { analytic: true };
        let adapter = ArgMinAdapter::new(&model, &());
        let theta = array![1.0, 2.0];
        assert_abs_diff_eq!(adapter.cost(&theta).unwrap(), 5.0, epsilon = 1e-12);
        let grad = adapter.gradient(&theta).unwrap();
        assert_abs_diff_eq!(grad[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grad[1], 4.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With no analytic derivatives the FD fallbacks agree with the analytic
    // path to FD accuracy, including the unflipped Hessian.
    fn fd_fallbacks_match_analytic() {
        let analytic = Quadratic { analytic: true };
        let numeric = Quadratic { analytic: false };
        let theta = array![0.5, -1.5];

        let ga = ArgMinAdapter::new(&analytic, &()).gradient(&theta).unwrap();
        let gn = ArgMinAdapter::new(&numeric, &()).gradient(&theta).unwrap();
        for (a, n) in ga.iter().zip(gn.iter()) {
            assert_abs_diff_eq!(a, n, epsilon = 1e-5);
        }

        let ha = ArgMinAdapter::new(&analytic, &()).hessian(&theta).unwrap();
        let hn = ArgMinAdapter::new(&numeric, &()).hessian(&theta).unwrap();
        for (a, n) in ha.iter().zip(hn.iter()) {
            assert_abs_diff_eq!(a, n, epsilon = 1e-3);
        }
    }
}

//! Public API surface for log-likelihood maximization.
//!
//! - [`ScoredLikelihood`]: trait users implement for their model.
//! - [`NewtonOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`Subproblem`]: choice of trust-region subproblem solver.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed. The
//! information matrix, when provided, is already the curvature of the cost and
//! passes through unflipped.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        types::Hessian,
        validation::{validate_theta_hat, validate_value, verify_tol_grad, verify_tol_step},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface with optional analytic
/// derivatives.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
/// If you provide an information matrix, return the outer-product
/// approximation `sᵀs / N`: it is positive semidefinite and already equals
/// the curvature of the cost, so no sign flip is applied.
///
/// - `type Data`: per-model data carried into `value`/`grad`/`information`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
///   - Errors: return a descriptive `OptError` for invalid inputs or model failures.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, robust finite differences are used automatically.
/// - `information(&Theta, &Data) -> OptResult<Hessian>`: outer-product
///   information matrix. If not implemented, the Hessian is finite-differenced
///   from the gradient.
pub trait ScoredLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn information(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Hessian> {
        Err(OptError::HessianNotImplemented)
    }
}

/// Choice of subproblem solver used inside the trust-region iteration.
///
/// Variants:
/// - `Steihaug`: truncated conjugate-gradient subproblem.
/// - `Cauchy`: Cauchy-point subproblem (steepest descent to the boundary).
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"Steihaug"`, `"Cauchy"`). Unknown names return
/// `OptError::InvalidSubproblem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subproblem {
    Steihaug,
    Cauchy,
}

impl FromStr for Subproblem {
    type Err = OptError;

    /// Parse a subproblem choice from a string (case-insensitive).
    ///
    /// Accepts:
    /// - `"Steihaug"`
    /// - `"Cauchy"`
    /// - Any case variant (e.g., `"steihaug"`, `"CAUCHY"`).
    ///
    /// Any other value returns `OptError::InvalidSubproblem` with a helpful message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steihaug" => Ok(Subproblem::Steihaug),
            "cauchy" => Ok(Subproblem::Cauchy),
            _ => Err(OptError::InvalidSubproblem {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Steihaug' or 'Cauchy'.",
            }),
        }
    }
}

/// Optimizer-level configuration for the trust-region Newton runs.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `subproblem: Subproblem` — trust-region subproblem solver.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
///
/// Constructor:
/// - `new(tols, subproblem, verbose) -> Self` — builds options; validation of
///   numeric values is handled in `Tolerances::new`.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_step = 1e-10`, `max_iter = 200`
/// - `subproblem`: `Steihaug`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonOptions {
    pub tols: Tolerances,
    pub subproblem: Subproblem,
    pub verbose: bool,
}

impl NewtonOptions {
    /// Create a new set of optimizer options.
    ///
    /// This constructor does not mutate values; validation of numeric fields is
    /// performed inside [`Tolerances::new`].
    pub fn new(tols: Tolerances, subproblem: Subproblem, verbose: bool) -> Self {
        Self { tols, subproblem, verbose }
    }
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::new(Some(1e-6), Some(1e-10), Some(200)).unwrap(),
            subproblem: Subproblem::Steihaug,
            verbose: false,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: declare convergence when the final gradient norm falls
///   below this threshold.
/// - `tol_step`: declare convergence when the final step norm falls below
///   this threshold.
/// - `max_iter`: hard cap on the number of iterations; when `None` the
///   runner installs [`DEFAULT_MAX_ITER`], because trust-region solvers
///   iterate until the cap.
///
/// At least one of `tol_grad` and `tol_step` must be provided: they define
/// the post-run convergence verdict (see [`OptimOutcome`]).
///
/// [`DEFAULT_MAX_ITER`]: crate::optimization::loglik_optimizer::types::DEFAULT_MAX_ITER
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_step: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad` or `tol_step` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if both tolerances are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolStep`] for non-finite or non-positive tolerances.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_step: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_step.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_step(tol_step)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_step, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: the crate-level convergence verdict; see below.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
///   - Keys follow argmin's counters, e.g., cost_count, gradient_count, etc.
/// - `grad_norm`: norm of the last available gradient, if present.
/// - `step_norm`: norm of the final iteration's parameter step, if present.
///
/// Convergence verdict: trust-region solvers run until the iteration cap,
/// so the solver's own termination status only says the cap was reached.
/// `converged` is therefore computed from first-order conditions at the
/// final iterate: it is `true` when either the gradient norm is below
/// `tol_grad` or the step norm is below `tol_step` (whichever tolerances
/// were provided).
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    pub step_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into a human-readable `status`.
    /// - Computes `grad_norm` if a gradient was provided.
    /// - Applies the convergence verdict against `tols`.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>, step_norm: Option<f64>,
        tols: &Tolerances,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        let grad_ok = match (tols.tol_grad, grad_norm) {
            (Some(tol), Some(norm)) => norm <= tol,
            _ => false,
        };
        let step_ok = match (tols.tol_step, step_norm) {
            (Some(tol), Some(norm)) => norm <= tol,
            _ => false,
        };
        Ok(Self {
            theta_hat,
            value,
            converged: grad_ok || step_ok,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
            step_norm,
        })
    }
}

//! The staged estimation driver.
//!
//! Purpose
//! -------
//! Orchestrate the full estimator over a validated panel:
//!
//! 1. **First stage.** Transition masses from the empirical increment
//!    shares, a consistent nonparametric estimate that needs no
//!    optimization.
//! 2. **Structural stage.** Maximize the likelihood over `[RC, c]` with the
//!    first-stage masses held fixed.
//! 3. **Joint stage** (unless `two_step`). Re-maximize over
//!    `[RC, c, p₀, …]` from the stage-two point, letting the choice data
//!    sharpen the transition estimates.
//!
//! The warm-start cache is threaded between stages, so each stage's inner
//! solves start from the previous stage's fixed point.
//!
//! Key behaviors
//! -------------
//! - Covariance is best-effort: a singular information matrix (an
//!   unidentified parameter) yields `covariance = None` rather than failing
//!   an otherwise successful estimation.
//! - A panel where only increment category 0 occurs has no free masses; the
//!   joint stage is skipped and the degenerate distribution `[1.0]` is
//!   reported.
//!
//! Downstream usage
//! ----------------
//! `estimate` is the crate's main entry point; the integration tests drive
//! it end to end on simulated panels.
use crate::estimation::errors::EstimationResult;
use crate::estimation::likelihood::NfxpLikelihood;
use crate::inference::covariance::{asymptotic_covariance, standard_errors};
use crate::model::data::ReplacementData;
use crate::model::params::{ParamSpec, Params};
use crate::model::zurcher::Zurcher;
use crate::optimization::loglik_optimizer::{
    NewtonOptions, OptimOutcome, ScoredLikelihood, Theta, maximize,
};
use crate::solver::SolverOptions;
use ndarray::{s, Array1, Array2};

/// Configuration for a full estimation run.
#[derive(Debug, Clone)]
pub struct EstimateOptions {
    /// Stop after the structural stage, keeping the first-stage transition
    /// masses.
    pub two_step: bool,
    /// Starting values for `[RC, c]`; defaults to zeros.
    pub theta0: Option<Theta>,
    /// Outer trust-region configuration, shared by both stages.
    pub newton: NewtonOptions,
    /// Inner fixed-point solver configuration.
    pub solver: SolverOptions,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            two_step: false,
            theta0: None,
            newton: NewtonOptions::default(),
            solver: SolverOptions::default(),
        }
    }
}

/// A completed estimation.
#[derive(Debug, Clone)]
pub struct Estimation {
    /// Final structural parameters (masses folded nonnegative).
    pub params: Params,
    /// Layout of `theta_hat`.
    pub spec: ParamSpec,
    /// Flat estimate in optimizer space.
    pub theta_hat: Theta,
    /// Raw optimizer outcome of the final stage.
    pub outcome: OptimOutcome,
    /// First-stage empirical transition shares over all observed
    /// categories.
    pub transition_shares: Array1<f64>,
    /// Asymptotic covariance of `theta_hat`, when the information matrix
    /// is invertible.
    pub covariance: Option<Array2<f64>>,
    /// Convergence verdict of the final stage.
    pub converged: bool,
    /// Human-readable labels for `theta_hat` entries.
    pub labels: Vec<String>,
}

impl Estimation {
    /// Standard errors when a covariance is available.
    pub fn standard_errors(&self) -> Option<Array1<f64>> {
        self.covariance.as_ref().map(standard_errors)
    }
}

/// Run the staged estimator on a validated panel.
///
/// # Errors
/// Propagates panel/model mismatches, fixed-point failures at probed
/// parameter points, and optimizer failures. A non-invertible information
/// matrix is not an error; see [`Estimation::covariance`].
pub fn estimate(
    model: &Zurcher, data: &ReplacementData, opts: &EstimateOptions,
) -> EstimationResult<Estimation> {
    // First stage: empirical increment shares; the last category's mass is
    // implied, so only the leading ones are free.
    let shares = data.transition_frequencies();
    let n_free = shares.len() - 1;
    let mut base = Params::new(0.0, 0.0, shares.slice(s![..n_free]).to_owned());

    // Structural stage over [RC, c].
    let structural = NfxpLikelihood::new(model, base.clone(), ParamSpec::Structural)
        .with_solver_options(opts.solver);
    let theta0 = opts.theta0.clone().unwrap_or_else(|| Theta::zeros(2));
    let structural_outcome = maximize(&structural, theta0, data, &opts.newton)?;
    base.rc = structural_outcome.theta_hat[0];
    base.c = structural_outcome.theta_hat[1];
    let warm_ev = structural.into_warm_start();

    // Joint stage over [RC, c, p], skipped for two-step runs and for
    // degenerate panels with a single increment category.
    let (spec, outcome, warm_ev) = if !opts.two_step && n_free > 0 {
        let spec = ParamSpec::Full { n_free };
        let joint = NfxpLikelihood::new(model, base.clone(), spec)
            .with_solver_options(opts.solver)
            .with_warm_start(warm_ev);
        let theta0 = spec.pack(&base)?;
        let joint_outcome = maximize(&joint, theta0, data, &opts.newton)?;
        (spec, joint_outcome, joint.into_warm_start())
    } else {
        (ParamSpec::Structural, structural_outcome, warm_ev)
    };

    let theta_hat = outcome.theta_hat.clone();
    let params = spec.unpack(&theta_hat, &base)?;

    // Covariance from the outer-product information at the estimate. The
    // inner solve here reuses the final stage's fixed point.
    let covariance_lik = NfxpLikelihood::new(model, base.clone(), spec)
        .with_solver_options(opts.solver)
        .with_warm_start(warm_ev);
    let information = covariance_lik.information(&theta_hat, data)?;
    let covariance = asymptotic_covariance(&information, data.n_obs()).ok();

    let converged = outcome.converged;
    let labels = spec.labels();
    Ok(Estimation {
        params,
        spec,
        theta_hat,
        outcome,
        transition_shares: shares,
        covariance,
        converged,
        labels,
    })
}

//! Integration tests for the nested fixed-point estimation pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end estimator: from a simulated replacement
//!   panel, through the staged driver, to parameter estimates, the
//!   convergence verdict, and standard errors.
//! - Exercise a realistic parameter regime (discounting near one, a
//!   thousand observations, a well-scaled cost grid) rather than toy
//!   edge cases only.
//!
//! Coverage
//! --------
//! - `model`:
//!   - `Zurcher` construction, panel simulation, and panel ingestion.
//! - `estimation::driver`:
//!   - Joint (three-stage) and two-step runs, recovery of the true
//!     parameters, and the first-stage transition shares.
//! - `estimation::likelihood` / `estimation::score`:
//!   - Exercised implicitly through the driver's trust-region runs with
//!     analytic scores and BHHH curvature.
//! - `inference::covariance`:
//!   - Standard errors from the outer-product information matrix.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (solver phase
//!   switching, parameter packing, panel validation) — these are covered
//!   by unit tests.
//! - Exhaustive stress testing over sample sizes and parameter grids —
//!   those belong in targeted performance and property tests.
use ndarray::array;
use nfxp::{
    estimation::{estimate, EstimateOptions},
    model::{simulate_panel, Params, ReplacementData, Zurcher},
    optimization::loglik_optimizer::{NewtonOptions, Subproblem, Tolerances},
};

/// True structural parameters shared by the tests.
fn truth() -> Params {
    Params::new(5.0, 1.0, array![0.65, 0.25])
}

/// Environment with five mileage states and a cost grid scaled so the
/// slope parameter is well identified on a short grid.
fn environment() -> Zurcher {
    Zurcher::with_grid_max(5, 0.95, 4000.0).unwrap()
}

/// Simulate and ingest a panel under the true parameters.
fn simulated_panel(n_obs: usize, seed: u64) -> ReplacementData {
    let model = environment();
    let observations = simulate_panel(&model, &truth(), n_obs, seed).unwrap();
    ReplacementData::from_observations(&observations, model.n_states()).unwrap()
}

#[test]
// Purpose
// -------
// The joint estimator recovers the true replacement cost and cost slope
// from 1000 simulated observations, reports convergence, and produces
// finite standard errors for the structural parameters.
fn joint_estimation_recovers_parameters() {
    let model = environment();
    let data = simulated_panel(1000, 42);

    let fit = estimate(&model, &data, &EstimateOptions::default()).unwrap();

    assert!(fit.converged, "final stage did not converge: {}", fit.outcome.status);
    assert!(
        (fit.params.rc - 5.0).abs() < 0.5,
        "RC estimate {} too far from 5.0",
        fit.params.rc
    );
    assert!(
        (fit.params.c - 1.0).abs() < 0.5,
        "c estimate {} too far from 1.0",
        fit.params.c
    );

    // Transition masses stay close to the truth and inside the simplex.
    let masses = fit.params.full_masses();
    assert!((masses[0] - 0.65).abs() < 0.1);
    assert!((masses[1] - 0.25).abs() < 0.1);
    assert!(masses.iter().all(|&m| m > 0.0));

    let se = fit.standard_errors().expect("covariance should be available");
    assert_eq!(se.len(), fit.theta_hat.len());
    assert!(se.iter().all(|s| s.is_finite() && *s > 0.0));
}

#[test]
// Purpose
// -------
// A two-step run keeps the first-stage transition shares and still
// recovers the structural parameters; the joint run's final likelihood
// can only improve on it.
fn two_step_agrees_with_joint() {
    let model = environment();
    let data = simulated_panel(1000, 42);

    let two_step = estimate(
        &model,
        &data,
        &EstimateOptions { two_step: true, ..EstimateOptions::default() },
    )
    .unwrap();
    let joint = estimate(&model, &data, &EstimateOptions::default()).unwrap();

    assert!(two_step.converged);
    assert_eq!(two_step.theta_hat.len(), 2);
    assert_eq!(joint.theta_hat.len(), 4);

    // Structural estimates from the two procedures agree loosely.
    assert!((two_step.params.rc - joint.params.rc).abs() < 0.5);
    assert!((two_step.params.c - joint.params.c).abs() < 0.5);

    // Two-step masses are exactly the empirical shares.
    let shares = data.transition_frequencies();
    for (free, share) in two_step.params.p.iter().zip(shares.iter()) {
        assert!((free - share).abs() < 1e-12);
    }

    // The joint objective weakly dominates: it maximizes over a superset,
    // and the two-step full-likelihood value is attainable there.
    let mileage: f64 = {
        let masses = two_step.params.full_masses();
        data.increments().iter().map(|&dx1| masses[dx1].ln()).sum::<f64>()
            / data.n_obs() as f64
    };
    let two_step_full_value = two_step.outcome.value + mileage;
    assert!(joint.outcome.value >= two_step_full_value - 1e-6);
}

#[test]
// Purpose
// -------
// The Cauchy-point subproblem reaches comparable estimates, just with
// more outer iterations than the Steihaug default.
fn cauchy_subproblem_reaches_same_estimates() {
    let model = environment();
    let data = simulated_panel(1000, 7);

    let opts = EstimateOptions {
        newton: NewtonOptions::new(
            Tolerances::new(Some(1e-5), Some(1e-9), Some(400)).unwrap(),
            Subproblem::Cauchy,
            false,
        ),
        ..EstimateOptions::default()
    };
    let fit = estimate(&model, &data, &opts).unwrap();

    assert!((fit.params.rc - 5.0).abs() < 0.75, "RC estimate {}", fit.params.rc);
    assert!((fit.params.c - 1.0).abs() < 0.75, "c estimate {}", fit.params.c);
}

#[test]
// Purpose
// -------
// Estimation is deterministic given the same panel: two runs produce
// identical estimates.
fn estimation_is_deterministic() {
    let model = environment();
    let data = simulated_panel(600, 3);

    let a = estimate(&model, &data, &EstimateOptions::default()).unwrap();
    let b = estimate(&model, &data, &EstimateOptions::default()).unwrap();

    assert_eq!(a.theta_hat, b.theta_hat);
    assert_eq!(a.outcome.value, b.outcome.value);
}

//! The nested fixed-point log-likelihood.
//!
//! Purpose
//! -------
//! Implement the outer objective of the estimator: given a flat parameter
//! vector `θ`, solve the inner expected-value fixed point at `θ` and
//! evaluate the mean log-likelihood of the observed panel under the implied
//! choice probabilities. The type implements [`ScoredLikelihood`] so the
//! trust-region optimizer can consume it directly, with the analytic score
//! and information matrix supplied by [`estimation::score`].
//!
//! Key behaviors
//! -------------
//! - **Warm starting.** The converged expected-value vector is kept in a
//!   `RefCell` and used as the starting point of the next inner solve. The
//!   optimizer probes nearby `θ` values, so the previous fixed point is an
//!   excellent start and the inner solver typically needs only a few Newton
//!   steps. The cache is interior mutability only; it never changes the
//!   value computed at a given `θ` beyond solver tolerance.
//! - **Penalty region.** When transition masses are estimated jointly, the
//!   implied last-category mass `1 − Σp` can go non-positive. The
//!   likelihood then swaps the mileage term `ln π(dx1)` for the linear
//!   penalty `−100000 · π(dx1)`, keeping the objective finite and sloped
//!   back toward the simplex.
//!
//! Invariants & assumptions
//! ------------------------
//! - `θ` layout is owned by [`ParamSpec`]; any length mismatch is a hard
//!   error before the inner solve runs.
//! - Free masses arrive folded through `abs()`, so only the implied last
//!   category can be non-positive.
//!
//! Testing notes
//! -------------
//! - Unit tests cover warm-start idempotence, the penalty branch, and the
//!   structural-only specification ignoring the mileage term.
use std::cell::RefCell;

use crate::estimation::score;
use crate::model::data::ReplacementData;
use crate::model::errors::ModelError;
use crate::model::params::{ParamSpec, Params};
use crate::model::zurcher::Zurcher;
use crate::optimization::errors::{OptError, OptResult};
use crate::optimization::loglik_optimizer::types::Hessian;
use crate::optimization::loglik_optimizer::{Cost, Grad, ScoredLikelihood, Theta};
use crate::solver::{solve, SolverOptions};
use ndarray::{Array1, Array2};

/// Everything the likelihood and score need at a parameter point, produced
/// by one inner fixed-point solve.
pub struct LikelihoodParts {
    /// Structured parameters implied by `θ` (masses folded nonnegative).
    pub params: Params,
    /// Converged expected-value vector.
    pub ev: Array1<f64>,
    /// Keep probabilities at the fixed point.
    pub pk: Array1<f64>,
    /// Bellman-operator Jacobian at the fixed point.
    pub dev: Array2<f64>,
}

/// The NFXP objective: mean panel log-likelihood with a nested fixed-point
/// solve per evaluation.
pub struct NfxpLikelihood<'a> {
    model: &'a Zurcher,
    base: Params,
    spec: ParamSpec,
    solver_opts: SolverOptions,
    ev: RefCell<Array1<f64>>,
}

impl<'a> NfxpLikelihood<'a> {
    /// Build a likelihood over `model` with `base` supplying any parameter
    /// fields the specification does not estimate.
    pub fn new(model: &'a Zurcher, base: Params, spec: ParamSpec) -> Self {
        Self {
            model,
            base,
            spec,
            solver_opts: SolverOptions::default(),
            ev: RefCell::new(Array1::zeros(0)),
        }
    }

    /// Replace the inner-solver configuration.
    pub fn with_solver_options(mut self, opts: SolverOptions) -> Self {
        self.solver_opts = opts;
        self
    }

    /// Seed the warm-start cache, typically with the fixed point of a
    /// previous estimation stage.
    pub fn with_warm_start(self, ev: Array1<f64>) -> Self {
        *self.ev.borrow_mut() = ev;
        self
    }

    /// Clear the warm-start cache; the next solve starts from zeros.
    pub fn reset_warm_start(&self) {
        *self.ev.borrow_mut() = Array1::zeros(0);
    }

    /// Consume the likelihood and hand back the cached expected values, for
    /// threading into the next estimation stage.
    pub fn into_warm_start(self) -> Array1<f64> {
        self.ev.into_inner()
    }

    /// The model environment this likelihood is bound to.
    pub fn model(&self) -> &Zurcher {
        self.model
    }

    /// Parameter layout being estimated.
    pub fn spec(&self) -> ParamSpec {
        self.spec
    }

    /// Solve the inner fixed point at `θ` and collect the pieces both the
    /// likelihood value and the score need.
    ///
    /// Updates the warm-start cache with the converged expected values.
    ///
    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] / [`OptError::NonFiniteTheta`]
    ///   from unpacking.
    /// - [`OptError::FixedPointNoConvergence`] when the inner solve fails.
    pub fn parts(&self, theta: &Theta) -> OptResult<LikelihoodParts> {
        let params = self.spec.unpack(theta, &self.base)?;
        let map = self.model.bellman(&params);
        let start = self.ev.borrow().clone();
        let fp = solve(&map, start, &self.solver_opts)?;
        *self.ev.borrow_mut() = fp.value.clone();
        Ok(LikelihoodParts { params, ev: fp.value, pk: fp.aux, dev: fp.jacobian })
    }

    /// Per-observation log-likelihood contributions at an already-solved
    /// parameter point.
    ///
    /// The choice term is `ln pk(x)` for keep and `ln(1 − pk(x))` for
    /// replace. When the specification estimates transition masses, the
    /// mileage term `ln π(dx1)` is added, switching to the linear penalty
    /// `−100000 · π(dx1)` whenever any implied mass is non-positive.
    pub fn contributions(
        &self, parts: &LikelihoodParts, data: &ReplacementData,
    ) -> Array1<f64> {
        let masses = parts.params.full_masses();
        let penalize = masses.iter().any(|&m| m <= 0.0);
        let states = data.states();
        let decisions = data.decisions();
        let increments = data.increments();

        let mut out = Array1::zeros(data.n_obs());
        for i in 0..data.n_obs() {
            let pk = parts.pk[states[i]];
            let choice_prob = pk * (1.0 - decisions[i]) + (1.0 - pk) * decisions[i];
            let mut ll = choice_prob.ln();
            if self.spec.estimates_transitions() {
                let mass = masses[increments[i]];
                if penalize {
                    ll -= 100000.0 * mass;
                } else {
                    ll += mass.ln();
                }
            }
            out[i] = ll;
        }
        out
    }
}

impl<'a> ScoredLikelihood for NfxpLikelihood<'a> {
    type Data = ReplacementData;

    /// Mean log-likelihood `ℓ(θ)` over the panel.
    fn value(&self, theta: &Theta, data: &ReplacementData) -> OptResult<Cost> {
        let parts = self.parts(theta)?;
        let contributions = self.contributions(&parts, data);
        Ok(contributions.mean().unwrap_or(f64::NEG_INFINITY))
    }

    /// Reject panels inconsistent with the model grid or parameter layout
    /// before the first inner solve.
    fn check(&self, theta: &Theta, data: &ReplacementData) -> OptResult<()> {
        if theta.len() != self.spec.theta_len() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.spec.theta_len(),
                actual: theta.len(),
            });
        }
        if data.n_states() != self.model.n_states() {
            return Err(OptError::ModelInvalid {
                text: format!(
                    "panel validated on {} states but the model grid has {}",
                    data.n_states(),
                    self.model.n_states()
                ),
            });
        }
        if let ParamSpec::Full { n_free } = self.spec {
            if data.n_categories() > n_free + 1 {
                return Err(ModelError::CategoryMismatch {
                    expected: n_free + 1,
                    actual: data.n_categories(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Analytic mean score `∇ℓ(θ)`, via the implicit-function theorem.
    fn grad(&self, theta: &Theta, data: &ReplacementData) -> OptResult<Grad> {
        score::gradient(self, theta, data)
    }

    /// Outer-product information matrix `sᵀs / N` of the score rows.
    fn information(&self, theta: &Theta, data: &ReplacementData) -> OptResult<Hessian> {
        score::information(self, theta, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data::Observation;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn fixture() -> (Zurcher, Params, ReplacementData) {
        let model = Zurcher::with_grid_max(5, 0.95, 4000.0).unwrap();
        let base = Params::new(5.0, 1.0, array![0.65, 0.25]);
        let data = ReplacementData::from_observations(
            &[
                Observation { x: 1, replaced: false, dx1: 0 },
                Observation { x: 2, replaced: false, dx1: 1 },
                Observation { x: 3, replaced: true, dx1: 2 },
                Observation { x: 1, replaced: false, dx1: 1 },
                Observation { x: 4, replaced: false, dx1: 0 },
            ],
            5,
        )
        .unwrap();
        (model, base, data)
    }

    #[test]
    // Purpose
    // -------
    // Re-evaluating at the same theta after the warm-start cache fills
    // reproduces the value to solver tolerance.
    fn warm_start_is_idempotent() {
        let (model, base, data) = fixture();
        let lik = NfxpLikelihood::new(&model, base, ParamSpec::Full { n_free: 2 });
        let theta = array![5.0, 1.0, 0.65, 0.25];
        let first = lik.value(&theta, &data).unwrap();
        let second = lik.value(&theta, &data).unwrap();
        assert_abs_diff_eq!(first, second, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Structural and full specifications differ exactly by the mileage
    // term, which the structural spec omits.
    fn structural_spec_omits_mileage_term() {
        let (model, base, data) = fixture();
        let structural =
            NfxpLikelihood::new(&model, base.clone(), ParamSpec::Structural);
        let full = NfxpLikelihood::new(&model, base.clone(), ParamSpec::Full { n_free: 2 });

        let v_structural = structural.value(&array![5.0, 1.0], &data).unwrap();
        let v_full = full.value(&array![5.0, 1.0, 0.65, 0.25], &data).unwrap();

        let masses = base.full_masses();
        let mileage: f64 = data
            .increments()
            .iter()
            .map(|&dx1| masses[dx1].ln())
            .sum::<f64>()
            / data.n_obs() as f64;
        assert_abs_diff_eq!(v_full, v_structural + mileage, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Outside the simplex the mileage term switches to the finite linear
    // penalty instead of ln of a non-positive mass.
    fn penalty_branch_stays_finite() {
        let (model, _, data) = fixture();
        let base = Params::new(5.0, 1.0, array![0.8, 0.4]);
        let lik = NfxpLikelihood::new(&model, base, ParamSpec::Full { n_free: 2 });
        let value = lik.value(&array![5.0, 1.0, 0.8, 0.4], &data).unwrap();
        assert!(value.is_finite());
        // The implied last mass is -0.2, so the penalty dominates.
        assert!(value < -100.0);
    }

    #[test]
    // Purpose
    // -------
    // check() rejects a wrong-length theta and a panel with more increment
    // categories than the specification carries.
    fn check_rejects_inconsistent_inputs() {
        let (model, base, data) = fixture();
        let lik = NfxpLikelihood::new(&model, base.clone(), ParamSpec::Structural);
        assert!(matches!(
            lik.check(&array![1.0, 2.0, 3.0], &data),
            Err(OptError::ThetaLengthMismatch { expected: 2, actual: 3 })
        ));

        let narrow = NfxpLikelihood::new(&model, base, ParamSpec::Full { n_free: 1 });
        assert!(narrow.check(&array![1.0, 2.0, 0.5], &data).is_err());
    }
}

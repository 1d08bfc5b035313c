//! Analytic score, gradient, and outer-product information matrix.
//!
//! Purpose
//! -------
//! Differentiate the mean log-likelihood exactly. The expected-value vector
//! is defined implicitly by `ev = Γ(ev, θ)`, so its parameter derivative
//! comes from the implicit-function theorem:
//!
//! ```text
//! (I − Γ'_ev) · W = ∂Γ/∂θ,    W = ∂ev/∂θ
//! ```
//!
//! with `Γ'_ev` the operator Jacobian already computed at the fixed point.
//! The per-observation score then combines the direct parameter effects on
//! the keep/replace value difference with the propagated effect `β·W`, plus
//! the mileage-process terms when transition masses are estimated.
//!
//! Key derivatives (keep value `vk`, replace value `vr`, `u = vk − vr`,
//! residual `r = d − (1 − pk(x))`):
//!
//! - `∂Γ/∂RC = −P · (1 − pk)` where `P` is the keep-action transition
//!   matrix: the replace branch of every reachable next state shifts.
//! - `∂Γ/∂c  = −P · (pk ∘ dc)` with `dc` the cost slope (`dc(0) = 0`).
//! - `∂Γ/∂pⱼ = m(min(x+j, n−1)) − m(min(x+n_free, n−1))` with `m` the
//!   smoothed surplus; the last-category mass is the implied complement.
//! - Score row: `r · (direct + β·(W[0, ·] − W[x, ·]))` with direct effects
//!   `(−1, dc(x), 0, …)`.
//! - Mileage terms: `+1/πⱼ` on column `j` when `dx1 = j`, and `−1/π_last`
//!   on every free column when `dx1` is the last category. In the penalty
//!   region the terms are the penalty's own derivative, `∓100000`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All pieces are evaluated at the *same* fixed point; `LikelihoodParts`
//!   guarantees the triple `(ev, pk, dev)` is consistent.
//! - The gradient returned here is `∇ℓ(θ)` (log-likelihood convention); the
//!   optimizer adapter owns the sign flip to cost space.
//! - The information matrix `sᵀs / N` is positive semidefinite and is used
//!   both as the optimizer's curvature and for asymptotic covariance.
use crate::estimation::likelihood::NfxpLikelihood;
use crate::model::data::ReplacementData;
use crate::model::params::ParamSpec;
use crate::optimization::errors::OptResult;
use crate::optimization::loglik_optimizer::{Grad, Theta};
use crate::solver::errors::SolveError;
use crate::utils::{from_dmatrix, to_dmatrix};
use ndarray::{Array1, Array2, Axis};

/// Per-observation score matrix, `N × θ.len()`.
///
/// Solves one inner fixed point at `θ` (warm-started), assembles
/// `∂Γ/∂θ`, solves the implicit-function system, and maps the result
/// through the panel.
///
/// # Errors
/// - Propagates unpacking and fixed-point errors from
///   [`NfxpLikelihood::parts`].
/// - [`SolveError::SingularSystem`] (converted) if `I − Γ'` cannot be
///   solved; a converged contraction fixed point rules this out in
///   practice.
pub fn score_matrix(
    lik: &NfxpLikelihood<'_>, theta: &Theta, data: &ReplacementData,
) -> OptResult<Array2<f64>> {
    let parts = lik.parts(theta)?;
    let model = lik.model();
    let n = model.n_states();
    let beta = model.beta();
    let k = theta.len();
    let n_free = match lik.spec() {
        ParamSpec::Full { n_free } => n_free,
        ParamSpec::Structural => 0,
    };

    let masses = parts.params.full_masses();
    let transition = model.transition_matrix(&masses);
    let dc = model.cost_slope();
    let pk = &parts.pk;

    // ∂Γ/∂θ, column by column.
    let mut dgamma = Array2::zeros((n, k));
    let replace_term = pk.mapv(|p| -(1.0 - p));
    let drc = transition.dot(&replace_term);
    let cost_term =
        Array1::from_iter(pk.iter().zip(dc.iter()).map(|(&p, &slope)| -p * slope));
    let dcost = transition.dot(&cost_term);
    for x in 0..n {
        dgamma[[x, 0]] = drc[x];
        dgamma[[x, 1]] = dcost[x];
    }
    if n_free > 0 {
        let map = model.bellman(&parts.params);
        let m = map.surplus(&parts.ev);
        for j in 0..n_free {
            for x in 0..n {
                dgamma[[x, 2 + j]] = m[(x + j).min(n - 1)] - m[(x + n_free).min(n - 1)];
            }
        }
    }

    // Implicit-function system (I − Γ') W = ∂Γ/∂θ, one LU for all columns.
    let fe = Array2::eye(n) - &parts.dev;
    let lu = to_dmatrix(&fe).lu();
    let w = lu
        .solve(&to_dmatrix(&dgamma))
        .ok_or(SolveError::SingularSystem { dim: n })?;
    let w = from_dmatrix(&w);

    let states = data.states();
    let decisions = data.decisions();
    let increments = data.increments();
    let penalize = masses.iter().any(|&mass| mass <= 0.0);

    let mut scores = Array2::zeros((data.n_obs(), k));
    for i in 0..data.n_obs() {
        let x = states[i];
        let residual = decisions[i] - (1.0 - pk[x]);
        for col in 0..k {
            let direct = match col {
                0 => -1.0,
                1 => dc[x],
                _ => 0.0,
            };
            scores[[i, col]] = residual * (direct + beta * (w[[0, col]] - w[[x, col]]));
        }
        if n_free > 0 {
            let dx1 = increments[i];
            if penalize {
                if dx1 < n_free {
                    scores[[i, 2 + dx1]] -= 100000.0;
                } else {
                    for j in 0..n_free {
                        scores[[i, 2 + j]] += 100000.0;
                    }
                }
            } else if dx1 < n_free {
                scores[[i, 2 + dx1]] += 1.0 / masses[dx1];
            } else {
                for j in 0..n_free {
                    scores[[i, 2 + j]] -= 1.0 / masses[n_free];
                }
            }
        }
    }
    Ok(scores)
}

/// Mean score `∇ℓ(θ)`, the gradient of the mean log-likelihood.
pub fn gradient(
    lik: &NfxpLikelihood<'_>, theta: &Theta, data: &ReplacementData,
) -> OptResult<Grad> {
    let scores = score_matrix(lik, theta, data)?;
    Ok(scores
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Grad::zeros(theta.len())))
}

/// Outer-product information matrix `sᵀs / N`.
pub fn information(
    lik: &NfxpLikelihood<'_>, theta: &Theta, data: &ReplacementData,
) -> OptResult<Array2<f64>> {
    let scores = score_matrix(lik, theta, data)?;
    let n = data.n_obs() as f64;
    Ok(scores.t().dot(&scores) / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data::Observation;
    use crate::model::params::Params;
    use crate::model::zurcher::Zurcher;
    use crate::optimization::loglik_optimizer::ScoredLikelihood;
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    fn fixture() -> (Zurcher, Params, ReplacementData) {
        let model = Zurcher::with_grid_max(5, 0.95, 4000.0).unwrap();
        let base = Params::new(5.0, 1.0, array![0.65, 0.25]);
        let data = ReplacementData::from_observations(
            &[
                Observation { x: 1, replaced: false, dx1: 0 },
                Observation { x: 2, replaced: false, dx1: 1 },
                Observation { x: 3, replaced: true, dx1: 2 },
                Observation { x: 2, replaced: false, dx1: 1 },
                Observation { x: 4, replaced: false, dx1: 0 },
                Observation { x: 5, replaced: true, dx1: 0 },
                Observation { x: 1, replaced: false, dx1: 2 },
                Observation { x: 3, replaced: false, dx1: 0 },
            ],
            5,
        )
        .unwrap();
        (model, base, data)
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient matches central finite differences of the
    // likelihood value at an interior point, for the full specification.
    fn analytic_gradient_matches_finite_differences() {
        let (model, base, data) = fixture();
        let lik = NfxpLikelihood::new(&model, base, ParamSpec::Full { n_free: 2 });
        let theta: Theta = array![5.0, 1.0, 0.65, 0.25];

        let analytic = gradient(&lik, &theta, &data).unwrap();
        let value_fn = |t: &Theta| lik.value(t, &data).unwrap();
        let numeric = theta.central_diff(&value_fn);

        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_abs_diff_eq!(a, n, epsilon = 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // Same check for the structural specification, where the score has
    // only the RC and c columns.
    fn structural_gradient_matches_finite_differences() {
        let (model, base, data) = fixture();
        let lik = NfxpLikelihood::new(&model, base, ParamSpec::Structural);
        let theta: Theta = array![5.0, 1.0];

        let analytic = gradient(&lik, &theta, &data).unwrap();
        assert_eq!(analytic.len(), 2);
        let value_fn = |t: &Theta| lik.value(t, &data).unwrap();
        let numeric = theta.central_diff(&value_fn);

        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_abs_diff_eq!(a, n, epsilon = 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // The information matrix is symmetric with a nonnegative diagonal, as
    // an outer product of score rows must be.
    fn information_is_symmetric_psd_shaped() {
        let (model, base, data) = fixture();
        let lik = NfxpLikelihood::new(&model, base, ParamSpec::Full { n_free: 2 });
        let theta: Theta = array![5.0, 1.0, 0.65, 0.25];

        let info = information(&lik, &theta, &data).unwrap();
        assert_eq!(info.shape(), &[4, 4]);
        for i in 0..4 {
            assert!(info[[i, i]] >= 0.0);
            for j in 0..4 {
                assert_abs_diff_eq!(info[[i, j]], info[[j, i]], epsilon = 1e-12);
            }
        }
    }
}

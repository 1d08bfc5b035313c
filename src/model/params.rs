//! Structural parameters and the bijection to flat optimizer vectors.
//!
//! Purpose
//! -------
//! Keep the estimated quantities in a structured record ([`Params`]) and make
//! the mapping to the optimizer's flat `θ` explicit through a tagged
//! descriptor ([`ParamSpec`]). The descriptor says *which* fields a given
//! optimization run estimates; packing and unpacking fail fast on any length
//! mismatch instead of silently misassigning values.
//!
//! Conventions
//! -----------
//! - `θ[0] = RC`, `θ[1] = c` always; when transition probabilities are
//!   estimated jointly, `θ[2..]` holds the first `n_free` masses and the
//!   last category is derived as the complement `1 − Σp`.
//! - The outer optimizer runs unconstrained, so unpacking folds the mass
//!   entries through `abs()`. The fold keeps the likelihood defined for
//!   small sign excursions; it is not smooth at zero, and the analytic
//!   score treats the folded masses as the evaluation point.
use crate::model::errors::{ModelError, ModelResult};
use ndarray::Array1;

/// Structural parameters of the renewal model.
///
/// `p` holds the free transition masses (all categories but the last); the
/// last category is always the complement. An empty `p` means degenerate
/// transitions (a single category).
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Replacement cost.
    pub rc: f64,
    /// Marginal cost slope.
    pub c: f64,
    /// Free transition-probability masses, one per increment category
    /// except the last.
    pub p: Array1<f64>,
}

impl Params {
    pub fn new(rc: f64, c: f64, p: Array1<f64>) -> Self {
        Self { rc, c, p }
    }

    /// Number of free transition masses.
    pub fn n_free(&self) -> usize {
        self.p.len()
    }

    /// Full category masses, appending the derived complement `1 − Σp`.
    ///
    /// Entries can be non-positive when the free masses stray outside the
    /// simplex; the likelihood penalizes that region rather than erroring.
    pub fn full_masses(&self) -> Array1<f64> {
        let mut out = Array1::zeros(self.p.len() + 1);
        let mut sum = 0.0;
        for (i, &pi) in self.p.iter().enumerate() {
            out[i] = pi;
            sum += pi;
        }
        out[self.p.len()] = 1.0 - sum;
        out
    }
}

/// Which structural quantities a given optimization run estimates.
///
/// - `Structural`: `θ = [RC, c]`, transition masses held at their current
///   values.
/// - `Full`: `θ = [RC, c, p₀, …]` with `n_free` jointly estimated masses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpec {
    Structural,
    Full { n_free: usize },
}

impl ParamSpec {
    /// Length of the flat vector this descriptor maps to.
    pub fn theta_len(&self) -> usize {
        match self {
            ParamSpec::Structural => 2,
            ParamSpec::Full { n_free } => 2 + n_free,
        }
    }

    /// Whether transition masses are part of the estimated vector.
    pub fn estimates_transitions(&self) -> bool {
        matches!(self, ParamSpec::Full { .. })
    }

    /// Human-readable labels for each `θ` entry, in order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = vec!["RC".to_string(), "c".to_string()];
        if let ParamSpec::Full { n_free } = self {
            labels.extend((0..*n_free).map(|i| format!("p{i}")));
        }
        labels
    }

    /// Map a flat optimizer vector into a structured record, taking fields
    /// not covered by this descriptor from `base`.
    ///
    /// Transition-mass entries are folded through `abs()` (the optimizer is
    /// unconstrained).
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] when `theta.len()` differs from
    ///   [`theta_len`](ParamSpec::theta_len).
    /// - [`ModelError::NonFiniteTheta`] for NaN or infinite entries.
    pub fn unpack(&self, theta: &Array1<f64>, base: &Params) -> ModelResult<Params> {
        if theta.len() != self.theta_len() {
            return Err(ModelError::ThetaLengthMismatch {
                expected: self.theta_len(),
                actual: theta.len(),
            });
        }
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteTheta { index, value });
            }
        }
        let p = match self {
            ParamSpec::Structural => base.p.clone(),
            ParamSpec::Full { .. } => theta.slice(ndarray::s![2..]).mapv(f64::abs),
        };
        Ok(Params { rc: theta[0], c: theta[1], p })
    }

    /// Inverse of [`unpack`](ParamSpec::unpack): flatten a structured record
    /// into the optimizer vector this descriptor describes.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] when the record carries a
    ///   different number of free masses than the descriptor.
    pub fn pack(&self, params: &Params) -> ModelResult<Array1<f64>> {
        let mut theta = Vec::with_capacity(self.theta_len());
        theta.push(params.rc);
        theta.push(params.c);
        if let ParamSpec::Full { n_free } = self {
            if params.n_free() != *n_free {
                return Err(ModelError::ThetaLengthMismatch {
                    expected: self.theta_len(),
                    actual: 2 + params.n_free(),
                });
            }
            theta.extend(params.p.iter().copied());
        }
        Ok(Array1::from(theta))
    }
}

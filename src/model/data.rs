//! Panel data for the replacement model.
//!
//! Purpose
//! -------
//! Hold a validated panel of (state, decision, increment) triples and expose
//! the derived quantities the likelihood needs: 0-based state indices,
//! decisions as floats, and the empirical transition shares used for the
//! first estimation stage.
//!
//! Conventions
//! -----------
//! - Raw observations carry 1-based state indices, matching how panels are
//!   usually recorded; construction shifts them down and validates the
//!   range once, so downstream code indexes arrays directly.
//! - Decisions are `true` for replace. The likelihood consumes them as
//!   floats, so they are stored that way.
//! - Increment categories are 0-based and bounded by the grid size.
use crate::model::errors::{ModelError, ModelResult};
use ndarray::Array1;

/// One period of the panel, as recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Mileage state, 1-based.
    pub x: usize,
    /// Whether the engine was replaced this period.
    pub replaced: bool,
    /// Mileage increment category realized after the decision.
    pub dx1: usize,
}

/// Validated panel, indices shifted to 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementData {
    states: Array1<usize>,
    decisions: Array1<f64>,
    increments: Array1<usize>,
    n_states: usize,
    n_categories: usize,
}

impl ReplacementData {
    /// Validate and ingest a raw panel observed on a grid of `n_states`
    /// mileage points.
    ///
    /// The number of increment categories is taken from the data as
    /// `max(dx1) + 1`.
    ///
    /// # Errors
    /// - [`ModelError::EmptyPanel`] for a zero-length panel.
    /// - [`ModelError::StateOutOfRange`] when any `x ∉ 1..=n_states`.
    /// - [`ModelError::IncrementOutOfRange`] when any `dx1 ≥ n_states`.
    pub fn from_observations(
        observations: &[Observation],
        n_states: usize,
    ) -> ModelResult<Self> {
        if observations.is_empty() {
            return Err(ModelError::EmptyPanel);
        }
        let mut states = Vec::with_capacity(observations.len());
        let mut decisions = Vec::with_capacity(observations.len());
        let mut increments = Vec::with_capacity(observations.len());
        let mut max_category = 0;
        for (index, obs) in observations.iter().enumerate() {
            if obs.x == 0 || obs.x > n_states {
                return Err(ModelError::StateOutOfRange { index, x: obs.x, n: n_states });
            }
            if obs.dx1 >= n_states {
                return Err(ModelError::IncrementOutOfRange {
                    index,
                    dx1: obs.dx1,
                    n: n_states,
                });
            }
            states.push(obs.x - 1);
            decisions.push(if obs.replaced { 1.0 } else { 0.0 });
            increments.push(obs.dx1);
            max_category = max_category.max(obs.dx1);
        }
        Ok(Self {
            states: Array1::from(states),
            decisions: Array1::from(decisions),
            increments: Array1::from(increments),
            n_states,
            n_categories: max_category + 1,
        })
    }

    /// Number of observations.
    pub fn n_obs(&self) -> usize {
        self.states.len()
    }

    /// Grid size the panel was validated against.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Number of increment categories present in the panel.
    pub fn n_categories(&self) -> usize {
        self.n_categories
    }

    /// 0-based mileage state per observation.
    pub fn states(&self) -> &Array1<usize> {
        &self.states
    }

    /// Replacement decision per observation, 1.0 for replace.
    pub fn decisions(&self) -> &Array1<f64> {
        &self.decisions
    }

    /// Increment category per observation.
    pub fn increments(&self) -> &Array1<usize> {
        &self.increments
    }

    /// Empirical transition shares over all categories present in the panel.
    ///
    /// Shares sum to one; a panel where only category 0 occurs yields the
    /// degenerate `[1.0]`.
    pub fn transition_frequencies(&self) -> Array1<f64> {
        let mut counts = Array1::zeros(self.n_categories);
        for &dx1 in self.increments.iter() {
            counts[dx1] += 1.0;
        }
        counts / self.n_obs() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn obs(x: usize, replaced: bool, dx1: usize) -> Observation {
        Observation { x, replaced, dx1 }
    }

    #[test]
    // Purpose
    // -------
    // Construction shifts 1-based states down and keeps decisions as
    // floats, ready for the likelihood.
    fn ingestion_shifts_indices() {
        let panel = ReplacementData::from_observations(
            &[obs(1, false, 0), obs(3, true, 1), obs(5, false, 2)],
            5,
        )
        .unwrap();
        assert_eq!(panel.states(), &array![0usize, 2, 4]);
        assert_eq!(panel.decisions(), &array![0.0, 1.0, 0.0]);
        assert_eq!(panel.n_categories(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Out-of-range states and increments fail with the offending index.
    fn validation_rejects_bad_rows() {
        let err = ReplacementData::from_observations(&[obs(0, false, 0)], 5).unwrap_err();
        assert_eq!(err, ModelError::StateOutOfRange { index: 0, x: 0, n: 5 });

        let err =
            ReplacementData::from_observations(&[obs(1, false, 0), obs(6, false, 0)], 5)
                .unwrap_err();
        assert_eq!(err, ModelError::StateOutOfRange { index: 1, x: 6, n: 5 });

        let err = ReplacementData::from_observations(&[obs(2, false, 5)], 5).unwrap_err();
        assert_eq!(err, ModelError::IncrementOutOfRange { index: 0, dx1: 5, n: 5 });

        let err = ReplacementData::from_observations(&[], 5).unwrap_err();
        assert_eq!(err, ModelError::EmptyPanel);
    }

    #[test]
    // Purpose
    // -------
    // Transition shares sum to one; a single observed category collapses to
    // the degenerate distribution [1.0].
    fn transition_shares() {
        let panel = ReplacementData::from_observations(
            &[obs(1, false, 0), obs(2, false, 1), obs(3, false, 1), obs(4, false, 0)],
            5,
        )
        .unwrap();
        assert_eq!(panel.transition_frequencies(), array![0.5, 0.5]);

        let degenerate =
            ReplacementData::from_observations(&[obs(1, false, 0), obs(2, true, 0)], 5)
                .unwrap();
        assert_eq!(degenerate.transition_frequencies(), array![1.0]);
    }
}

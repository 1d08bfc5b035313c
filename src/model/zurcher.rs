//! Renewal model primitives: state grid, costs, and the Bellman operator.
//!
//! Purpose
//! -------
//! Define the two-action renewal model on a discrete mileage grid and expose
//! its expected-value Bellman operator as a [`ContractionMap`] so the
//! polyalgorithm solver can find the fixed point without knowing anything
//! about the economics.
//!
//! Key behaviors
//! -------------
//! - `Zurcher` owns the immutable environment: grid size, grid scale, and
//!   the discount factor. Structural parameters stay out of it so one
//!   environment serves every likelihood evaluation.
//! - [`BellmanMap`] binds an environment to a parameter point and implements
//!   the smoothed operator `Γ(ev)(x) = Σⱼ πⱼ · m(min(x+j, n−1))` where `m`
//!   is the recentered log-sum of the keep and replace values.
//! - The operator's auxiliary output is the keep probability vector, which
//!   both the analytic Jacobian and the likelihood reuse.
//!
//! Invariants & assumptions
//! ------------------------
//! - `β ∈ (0, 1)`; the operator is a contraction with modulus `β`.
//! - Replacing resets mileage to state 0 before the increment draws, so the
//!   replace value is a scalar shared by all rows.
//! - Log-sums are recentered on the row maximum, so `apply` is finite for
//!   any finite `ev`.
//!
//! Downstream usage
//! ----------------
//! `estimation::likelihood` builds a [`BellmanMap`] per likelihood
//! evaluation and hands it to [`crate::solver::solve`];
//! `estimation::score` reuses [`BellmanMap::surplus`] and
//! [`Zurcher::transition_matrix`] for the analytic score.
use crate::model::errors::{ModelError, ModelResult};
use crate::model::params::Params;
use crate::solver::ContractionMap;
use ndarray::{Array1, Array2};

/// Immutable model environment: mileage grid and discount factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Zurcher {
    beta: f64,
    grid: Array1<f64>,
}

impl Zurcher {
    /// Environment with the conventional integer grid `0, 1, …, n−1`.
    ///
    /// # Errors
    /// - [`ModelError::GridTooSmall`] when `n < 2`.
    /// - [`ModelError::InvalidBeta`] when `beta ∉ (0, 1)`.
    pub fn new(n: usize, beta: f64) -> ModelResult<Self> {
        Self::with_grid_max(n, beta, (n.max(1) - 1) as f64)
    }

    /// Environment with `n` points spread evenly over `[0, grid_max]`.
    ///
    /// Larger `grid_max` values scale up the maintenance-cost slope per
    /// state and with it the identification of `c` on short grids.
    pub fn with_grid_max(n: usize, beta: f64, grid_max: f64) -> ModelResult<Self> {
        if n < 2 {
            return Err(ModelError::GridTooSmall { n });
        }
        if !(beta > 0.0 && beta < 1.0) || !beta.is_finite() {
            return Err(ModelError::InvalidBeta { value: beta });
        }
        if !(grid_max > 0.0) || !grid_max.is_finite() {
            return Err(ModelError::InvalidGridMax { value: grid_max });
        }
        let step = grid_max / (n - 1) as f64;
        let grid = Array1::from_iter((0..n).map(|i| i as f64 * step));
        Ok(Self { beta, grid })
    }

    /// Number of mileage states.
    pub fn n_states(&self) -> usize {
        self.grid.len()
    }

    /// Discount factor.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Maintenance cost at every state, `0.001 · c · grid[x]`.
    pub fn cost(&self, c: f64) -> Array1<f64> {
        self.grid.mapv(|g| 0.001 * c * g)
    }

    /// Derivative of the maintenance cost in `c`, `0.001 · grid[x]`.
    ///
    /// State 0 always has zero slope because the grid starts at zero.
    pub fn cost_slope(&self) -> Array1<f64> {
        self.grid.mapv(|g| 0.001 * g)
    }

    /// Mileage transition matrix under the keep action.
    ///
    /// Row `x` spreads the category masses over `min(x+j, n−1)`; increments
    /// past the end pile up in the absorbing last state, so every row sums
    /// to the total category mass.
    pub fn transition_matrix(&self, masses: &Array1<f64>) -> Array2<f64> {
        let n = self.n_states();
        let mut matrix = Array2::zeros((n, n));
        for x in 0..n {
            for (j, &mass) in masses.iter().enumerate() {
                matrix[[x, (x + j).min(n - 1)]] += mass;
            }
        }
        matrix
    }

    /// Bind this environment to a parameter point.
    pub fn bellman<'a>(&'a self, params: &Params) -> BellmanMap<'a> {
        BellmanMap {
            model: self,
            rc: params.rc,
            cost: self.cost(params.c),
            masses: params.full_masses(),
        }
    }
}

/// The expected-value Bellman operator at a fixed parameter point.
pub struct BellmanMap<'a> {
    model: &'a Zurcher,
    rc: f64,
    cost: Array1<f64>,
    masses: Array1<f64>,
}

impl<'a> BellmanMap<'a> {
    /// Choice-specific values and the shared replace value at `ev`.
    fn choice_values(&self, ev: &Array1<f64>) -> (Array1<f64>, f64) {
        let beta = self.model.beta;
        let vk = Array1::from_iter(
            ev.iter().zip(self.cost.iter()).map(|(&e, &k)| -k + beta * e),
        );
        let vr = -self.rc - self.cost[0] + beta * ev[0];
        (vk, vr)
    }

    /// Smoothed surplus `m(x) = logsum(vk(x), vr)`, recentered on the row
    /// maximum for overflow safety.
    pub fn surplus(&self, ev: &Array1<f64>) -> Array1<f64> {
        let (vk, vr) = self.choice_values(ev);
        vk.mapv(|v| {
            let top = v.max(vr);
            top + ((v - top).exp() + (vr - top).exp()).ln()
        })
    }

    /// Keep probabilities `pk(x) = 1 / (1 + exp(vr − vk(x)))` at `ev`.
    pub fn keep_probabilities(&self, ev: &Array1<f64>) -> Array1<f64> {
        let (vk, vr) = self.choice_values(ev);
        vk.mapv(|v| 1.0 / (1.0 + (vr - v).exp()))
    }
}

impl<'a> ContractionMap for BellmanMap<'a> {
    fn dim(&self) -> usize {
        self.model.n_states()
    }

    fn modulus(&self) -> f64 {
        self.model.beta
    }

    fn apply(&self, ev: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let n = self.dim();
        let m = self.surplus(ev);
        let mut image = Array1::zeros(n);
        for x in 0..n {
            let mut acc = 0.0;
            for (j, &mass) in self.masses.iter().enumerate() {
                acc += mass * m[(x + j).min(n - 1)];
            }
            image[x] = acc;
        }
        (image, self.keep_probabilities(ev))
    }

    fn jacobian(&self, _ev: &Array1<f64>, pk: &Array1<f64>) -> Array2<f64> {
        let n = self.dim();
        let beta = self.model.beta;
        let mut jac = Array2::zeros((n, n));
        // ∂Γ(ev)(x)/∂ev(y): increments land on xj = min(x+j, n−1); the keep
        // branch depends on ev(xj), the replace branch on ev(0).
        for x in 0..n {
            for (j, &mass) in self.masses.iter().enumerate() {
                let xj = (x + j).min(n - 1);
                jac[[x, xj]] += beta * mass * pk[xj];
                jac[[x, 0]] += beta * mass * (1.0 - pk[xj]);
            }
        }
        jac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{solve, SolverOptions};
    use ndarray::array;

    fn environment() -> Zurcher {
        Zurcher::new(6, 0.9).unwrap()
    }

    fn masses() -> Array1<f64> {
        array![0.6, 0.3, 0.1]
    }

    #[test]
    // Purpose
    // -------
    // Constructor validation rejects degenerate grids and discount factors
    // on the boundary of the unit interval.
    fn constructor_validation() {
        assert!(matches!(Zurcher::new(1, 0.9), Err(ModelError::GridTooSmall { n: 1 })));
        assert!(matches!(Zurcher::new(5, 1.0), Err(ModelError::InvalidBeta { .. })));
        assert!(matches!(Zurcher::new(5, 0.0), Err(ModelError::InvalidBeta { .. })));
        assert!(matches!(
            Zurcher::with_grid_max(5, 0.9, 0.0),
            Err(ModelError::InvalidGridMax { .. }),
        ));
    }

    #[test]
    // Purpose
    // -------
    // Every transition row sums to the total category mass, with overflow
    // increments absorbed in the last state.
    fn transition_rows_sum_to_one() {
        let model = environment();
        let matrix = model.transition_matrix(&masses());
        for row in matrix.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        // Last row is fully absorbing.
        assert!((matrix[[5, 5]] - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With RC = 0 and c = 0 the flow payoffs of both actions vanish, the
    // fixed point is constant across the grid, and the keep probability is
    // exactly one half at every state, not just at state 0 where keep and
    // replace coincide by construction.
    fn zero_parameters_give_even_odds_everywhere() {
        let model = environment();
        let params = Params::new(0.0, 0.0, masses().slice(ndarray::s![..2]).to_owned());
        let map = model.bellman(&params);
        let fp = solve(&map, Array1::zeros(map.dim()), &SolverOptions::default()).unwrap();
        for &pk in fp.aux.iter() {
            assert!((pk - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The analytic Jacobian rows sum to β, the contraction modulus, because
    // the operator spreads a unit of probability mass per row.
    fn jacobian_rows_sum_to_modulus() {
        let model = environment();
        let params = Params::new(8.0, 1.5, masses().slice(ndarray::s![..2]).to_owned());
        let map = model.bellman(&params);
        let ev = Array1::from_iter((0..map.dim()).map(|i| -0.3 * i as f64));
        let pk = map.keep_probabilities(&ev);
        let jac = map.jacobian(&ev, &pk);
        for row in jac.rows() {
            assert!((row.sum() - model.beta()).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The surplus stays finite under extreme value differences thanks to
    // the recentered log-sum.
    fn surplus_is_overflow_safe() {
        let model = environment();
        let params = Params::new(2000.0, 0.0, masses().slice(ndarray::s![..2]).to_owned());
        let map = model.bellman(&params);
        let ev = Array1::zeros(map.dim());
        let m = map.surplus(&ev);
        assert!(m.iter().all(|v| v.is_finite()));
    }
}

//! The operator interface consumed by the fixed-point solver.
use ndarray::{Array1, Array2};

/// A contraction mapping `Γ` on `ℝⁿ` together with its Jacobian.
///
/// Implementors evaluate one application of the operator and, separately, the
/// operator's Jacobian (Fréchet derivative) at a point. `apply` additionally
/// returns an auxiliary per-coordinate vector — for the renewal model this is
/// the conditional keep probability, which both the Jacobian assembly and the
/// likelihood need — so that the solver can hand it back to callers without a
/// recomputation.
///
/// The solver relies on `Γ` being a contraction with modulus
/// [`modulus`](ContractionMap::modulus) `< 1`: successive approximation then
/// converges linearly at that rate, and `I − Γ'` is invertible wherever the
/// Newton-Kantorovich step needs it.
pub trait ContractionMap {
    /// Dimension `n` of the operator's domain.
    fn dim(&self) -> usize;

    /// Contraction modulus (the discount factor for a Bellman operator).
    fn modulus(&self) -> f64;

    /// Evaluate `Γ(v)`, returning the image and the auxiliary vector
    /// produced along the way.
    fn apply(&self, v: &Array1<f64>) -> (Array1<f64>, Array1<f64>);

    /// Jacobian `Γ'(v)` as a dense `n × n` matrix. `aux` is the auxiliary
    /// vector returned by [`apply`](ContractionMap::apply) at the same `v`.
    fn jacobian(&self, v: &Array1<f64>, aux: &Array1<f64>) -> Array2<f64>;
}

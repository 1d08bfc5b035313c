//! Asymptotic covariance from the outer-product information matrix.
//!
//! The estimator's information matrix is the mean outer product of score
//! rows, `H = sᵀs / N`. The asymptotic variance of `θ̂` is the inverse of
//! the *total* information, `Avar(θ̂) = (H · N)⁻¹`; standard errors are the
//! square roots of its diagonal.
use crate::inference::errors::{InferenceError, InferenceResult};
use crate::utils::{from_dmatrix, to_dmatrix};
use ndarray::Array2;

/// Invert the scaled information matrix `H · N`.
///
/// # Errors
/// - [`InferenceError::NotSquare`] / [`InferenceError::NonFiniteInformation`]
///   for malformed input.
/// - [`InferenceError::CovarianceUnavailable`] when the scaled matrix is
///   singular, which happens when some parameter is not identified by the
///   panel.
pub fn asymptotic_covariance(
    information: &Array2<f64>, n_obs: usize,
) -> InferenceResult<Array2<f64>> {
    if information.nrows() != information.ncols() {
        return Err(InferenceError::NotSquare {
            rows: information.nrows(),
            cols: information.ncols(),
        });
    }
    for ((row, col), &value) in information.indexed_iter() {
        if !value.is_finite() {
            return Err(InferenceError::NonFiniteInformation { row, col, value });
        }
    }
    let dim = information.nrows();
    let scaled = information * n_obs as f64;
    match to_dmatrix(&scaled).try_inverse() {
        Some(inverse) => Ok(from_dmatrix(&inverse)),
        None => Err(InferenceError::CovarianceUnavailable {
            dim,
            reason: "scaled information matrix is singular",
        }),
    }
}

/// Standard errors, the square roots of the covariance diagonal.
///
/// Negative diagonal entries (possible only through numerical noise) map
/// to `NaN` rather than panicking.
pub fn standard_errors(covariance: &Array2<f64>) -> ndarray::Array1<f64> {
    covariance.diag().mapv(f64::sqrt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A known 2x2 information matrix inverts to the hand-computed
    // covariance, including the 1/N scaling.
    fn known_inverse() {
        // H = [[2, 1], [1, 2]], N = 10. (H*N)^-1 = (1/30)*[[2, -1], [-1, 2]].
        let info = array![[2.0, 1.0], [1.0, 2.0]];
        let cov = asymptotic_covariance(&info, 10).unwrap();
        assert_abs_diff_eq!(cov[[0, 0]], 2.0 / 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[0, 1]], -1.0 / 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 1]], 2.0 / 30.0, epsilon = 1e-12);

        let se = standard_errors(&cov);
        assert_abs_diff_eq!(se[0], (2.0_f64 / 30.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Singular information surfaces as an explicit unavailability instead
    // of NaN standard errors.
    fn singular_information_is_explicit() {
        let info = array![[1.0, 1.0], [1.0, 1.0]];
        assert!(matches!(
            asymptotic_covariance(&info, 100),
            Err(InferenceError::CovarianceUnavailable { dim: 2, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Malformed matrices are rejected before inversion.
    fn malformed_information_is_rejected() {
        let rect = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            asymptotic_covariance(&rect, 10),
            Err(InferenceError::NotSquare { rows: 2, cols: 3 })
        ));

        let bad = array![[1.0, f64::NAN], [0.0, 1.0]];
        assert!(matches!(
            asymptotic_covariance(&bad, 10),
            Err(InferenceError::NonFiniteInformation { row: 0, col: 1, .. })
        ));
    }
}

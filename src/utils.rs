//! Conversion helpers between `ndarray` and `nalgebra` containers.
//!
//! The estimation path stores vectors and matrices as `ndarray` types, while
//! the linear solves (Newton-Kantorovich step, implicit-function-theorem
//! system, covariance inversion) use `nalgebra`'s LU machinery. These helpers
//! centralize the copies so call sites stay free of shape bookkeeping.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Copy an `ndarray` matrix into a freshly allocated `DMatrix` (row-major read,
/// column-major write).
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy an `ndarray` vector into a freshly allocated `DVector`.
pub fn to_dvector(a: &Array1<f64>) -> DVector<f64> {
    DVector::from_fn(a.len(), |i, _| a[i])
}

/// Copy a `DMatrix` back into an `ndarray` matrix.
pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Copy a `DVector` back into an `ndarray` vector.
pub fn from_dvector(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_shape_fn(v.len(), |i| v[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Round-trip a small matrix through nalgebra and back without changing
    // any entry or the shape.
    fn dmatrix_round_trip_preserves_entries() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = to_dmatrix(&a);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        let back = from_dmatrix(&m);
        assert_eq!(back, a);
    }

    #[test]
    // Purpose
    // -------
    // Round-trip a vector through nalgebra and back unchanged.
    fn dvector_round_trip_preserves_entries() {
        let v = array![1.5, -2.5, 0.0];
        let back = from_dvector(&to_dvector(&v));
        assert_eq!(back, v);
    }
}

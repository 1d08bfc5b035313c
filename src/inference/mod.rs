//! Post-estimation inference: asymptotic covariance and standard errors.
pub mod covariance;
pub mod errors;

pub use covariance::{asymptotic_covariance, standard_errors};
pub use errors::{InferenceError, InferenceResult};

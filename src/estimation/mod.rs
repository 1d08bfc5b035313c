//! estimation — nested fixed-point maximum likelihood.
//!
//! `likelihood` holds the outer objective (inner fixed-point solve plus
//! panel log-likelihood), `score` its exact derivatives via the
//! implicit-function theorem, `driver` the staged estimation entry point,
//! and `errors` the unified error surface across the layers the driver
//! touches.
pub mod driver;
pub mod errors;
pub mod likelihood;
pub mod score;

pub use driver::{estimate, EstimateOptions, Estimation};
pub use errors::{EstimationError, EstimationResult};
pub use likelihood::{LikelihoodParts, NfxpLikelihood};

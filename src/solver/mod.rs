//! Fixed-point solver for Bellman-style contraction operators.
//!
//! The [`contraction::ContractionMap`] trait is the seam between the solver
//! and any concrete model; [`poly::solve`] is the hybrid successive
//! approximation / Newton-Kantorovich algorithm; [`options::SolverOptions`]
//! carries tolerances and iteration caps.

pub mod contraction;
pub mod errors;
pub mod options;
pub mod poly;

pub use self::contraction::ContractionMap;
pub use self::errors::{SolveError, SolveResult};
pub use self::options::SolverOptions;
pub use self::poly::{solve, FixedPoint};

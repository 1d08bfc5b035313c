//! Renewal model layer: environment, parameters, panel data, simulation.
//!
//! `zurcher` defines the grid and the Bellman operator, `params` the
//! structured parameter record and its flat-vector bijection, `data` the
//! validated panel, and `simulate` a seeded panel generator used by the
//! integration tests.
pub mod data;
pub mod errors;
pub mod params;
pub mod simulate;
pub mod zurcher;

pub use data::{Observation, ReplacementData};
pub use errors::{ModelError, ModelResult};
pub use params::{ParamSpec, Params};
pub use simulate::simulate_panel;
pub use zurcher::{BellmanMap, Zurcher};

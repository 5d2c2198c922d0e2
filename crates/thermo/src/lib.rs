//! Equation of state models for nuclear burning zones.

mod error;
mod ideal_gas;

pub use error::PropertyError;
pub use ideal_gas::IdealGas;

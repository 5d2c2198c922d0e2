//! Core types for integrating nuclear reaction networks.
//!
//! This crate defines the shared vocabulary the table and solver crates build on:
//!
//! - [`StateVector`] and [`Jacobian`]: stack-allocated buffers sized to
//!   [`MAX_NEQS`], so kernels never allocate
//! - [`Network`]: species data and the packed `(X_1..X_N, e)` layout
//! - [`BurnState`] and [`IntegrationState`]: the thermodynamic and integrator
//!   views of a zone
//! - [`IntegratorConfig`]: tolerances and switches, passed by reference
//! - [`ReactionRates`], [`EquationOfState`], [`Rhs`]: the external
//!   collaborators the numerical kernels call

mod buffer;
mod config;
mod network;
mod state;
mod traits;

pub mod constants;

pub use buffer::{CapacityError, Jacobian, MAX_NEQS, StateVector};
pub use config::{ConfigError, IntegratorConfig, Tolerances};
pub use network::{Composition, Network, NetworkError, Species};
pub use state::{BurnState, IntegrationState};
pub use traits::{EosDerivatives, EquationOfState, ReactionRates, Rhs};

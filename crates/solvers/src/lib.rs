//! Numerical kernels for implicit integration of reaction networks.
//!
//! - [`jacobian`]: finite-difference Jacobian with respect to mass fractions
//!   and specific internal energy
//! - [`initial_step`]: first step-size estimate for a stiff integration
//! - [`rhs`]: [`ReactionSystem`], the network right-hand side in integrator form
//!
//! All kernels work on the fixed-capacity buffers from `nucleon-core` and do
//! not allocate.

pub mod initial_step;
pub mod jacobian;
pub mod rhs;

pub use initial_step::initial_timestep;
pub use jacobian::{JacobianStatus, numerical_jacobian};
pub use rhs::ReactionSystem;

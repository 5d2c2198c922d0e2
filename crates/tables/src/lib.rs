//! Tabulated nuclear statistical equilibrium.
//!
//! An [`NseTable`] stores the equilibrium state on a regular
//! `(log₁₀ ρ, log₁₀ T, Yₑ)` grid and resolves it at arbitrary points with
//! trilinear or tricubic interpolation. Queries outside the grid are clamped
//! to its boundary.

mod cubic;
mod error;
mod geometry;
mod interp;
mod nse;

pub mod global;

pub use error::TableError;
pub use geometry::{GeometryError, InterpolationMode, LogPoint, TableGeometry};
pub use nse::{NUM_SCALARS, NseField, NseQuery, NseState, NseTable, TableConfig};

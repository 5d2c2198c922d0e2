use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur while building a Jacobian.
///
/// A perturbed temperature outside the valid range is not an error; it is
/// reported as [`JacobianStatus::TemperatureOutOfRange`](super::JacobianStatus).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{what} has length {found}, expected {expected}")]
    Dimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("reaction rate evaluation failed")]
    Rates(#[source] Box<dyn StdError + Send + Sync>),

    #[error("equation of state call failed")]
    Eos(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn rates(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Rates(Box::new(err))
    }

    pub(crate) fn eos(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Eos(Box::new(err))
    }
}

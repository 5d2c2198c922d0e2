use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur while estimating the initial step size.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tout must be finite and positive, got {0}")]
    InvalidDuration(f64),

    #[error("derivative has length {found}, state has length {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("integration state is empty")]
    EmptyState,

    #[error("right-hand side evaluation failed")]
    Rhs(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn rhs(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Rhs(Box::new(err))
    }
}

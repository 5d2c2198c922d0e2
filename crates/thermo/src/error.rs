use thiserror::Error;

/// Errors that may occur when evaluating an equation of state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// The property is undefined at the given state.
    ///
    /// For example, the mean molecular weight of a zone with no matter in it.
    #[error("property `{property}` is undefined at the given state")]
    Undefined {
        property: &'static str,
        context: Option<String>,
    },

    /// The input values are invalid or inconsistent.
    ///
    /// Indicates that the inputs are physically invalid or outside the model's valid domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

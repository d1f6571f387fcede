use thiserror::Error;

/// Precondition violations rejected before a reduction starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("At least one generator is required.")]
    NoGenerators,
    #[error("Determinant is {determinant}, expected 1.")]
    Determinant { determinant: String },
    #[error("{value} is not a prime.")]
    NotPrime { value: String },
    #[error("{count} generators exceed the search limit of {limit}.")]
    TooManyGenerators { count: usize, limit: usize },
    #[error("Invalid reduction settings: {0}")]
    InvalidSettings(String),
}

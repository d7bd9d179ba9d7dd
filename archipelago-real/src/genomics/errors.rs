use thiserror::Error;

/// An error type indicating a failure
/// of a genome operator.
#[derive(Debug, Error, PartialEq)]
pub enum RealOperatorError {
    /// The genome does not have the configured length.
    #[error("genome of length {found} where length {expected} was configured")]
    LengthMismatch { expected: usize, found: usize },
    /// The parents of a crossover have different lengths.
    #[error("crossover between parents of lengths {0} and {1}")]
    ParentLengthMismatch(usize, usize),
}

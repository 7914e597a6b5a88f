//! Error types for budget-zkp

/// Main error types for the library.
///
/// A proof that fails its verification equations is not an error: verifiers
/// report it as `Ok(false)`. Errors are reserved for malformed inputs and
/// precondition violations detected before a protocol runs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid protocol parameters were provided.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// A scalar value is invalid or out of range.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// A group element is invalid or not in the correct subgroup.
    #[error("Invalid group element: {0}")]
    InvalidGroupElement(String),

    /// Generator, witness, statement or matrix lengths disagree.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being sized.
        context: &'static str,
        /// Length required by the parameters.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Proof bytes could not be decoded.
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// Scenario configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn dimension(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}

/// Error type returned by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockResultError {
    /// A required value was supplied as absent.
    #[error("{parameter} must not be null")]
    InvariantViolation {
        /// Name of the rejected parameter.
        parameter: &'static str,
    },
    /// Rows were supplied without row metadata to pair them with.
    #[error("{rows} row(s) supplied without row metadata")]
    MissingRowMetadata { rows: usize },
    /// Operation exists on the result contract but has no mock behavior.
    #[error("{operation} is not supported by MockResult")]
    Unsupported { operation: &'static str },
    /// Fixture decoding or shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}

impl MockResultError {
    pub(crate) fn null(parameter: &'static str) -> Self {
        Self::InvariantViolation { parameter }
    }
}

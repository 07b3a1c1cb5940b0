//! Error types for the Generator

use thiserror::Error;

/// Errors that can occur during generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Completion provider error (non-success response or transport failure)
    #[error("{0}")]
    Completion(String),

    /// The completion parsed into zero test-case candidates
    #[error("No test cases generated")]
    NoTestCases,

    /// Persistence gateway error
    #[error("Store error: {0}")]
    Store(String),
}

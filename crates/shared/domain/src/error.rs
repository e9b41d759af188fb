//! Domain-level errors.
//!
//! These errors represent caller/input defects detected by the identity
//! aggregate and its value objects. They are never transient and never retried.
//! They are independent of infrastructure concerns (HTTP, storage).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required argument was empty
    #[error("{0}")]
    EmptyArgument(String),

    /// A provided value did not equal the expected value
    #[error("{0}")]
    ArgumentMismatch(String),

    /// A new value equals the old one where a change is required
    #[error("{0}")]
    ArgumentUnchanged(String),

    /// A password policy rule rejected the value
    #[error("{0}")]
    PolicyViolation(String),

    /// A value object rejected a malformed or out-of-range value
    #[error("{0}")]
    InvalidArgument(String),

    /// The encryption capability failed
    #[error("Encryption error: {0}")]
    Encryption(String),
}

impl DomainError {
    /// Create an empty-argument error
    pub fn empty_argument(msg: impl Into<String>) -> Self {
        DomainError::EmptyArgument(msg.into())
    }

    /// Create an argument-mismatch error
    pub fn argument_mismatch(msg: impl Into<String>) -> Self {
        DomainError::ArgumentMismatch(msg.into())
    }

    /// Create an argument-unchanged error
    pub fn argument_unchanged(msg: impl Into<String>) -> Self {
        DomainError::ArgumentUnchanged(msg.into())
    }

    /// Create a policy-violation error
    pub fn policy_violation(msg: impl Into<String>) -> Self {
        DomainError::PolicyViolation(msg.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }

    /// Create an encryption error
    pub fn encryption(msg: impl Into<String>) -> Self {
        DomainError::Encryption(msg.into())
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::EmptyArgument(_) => "EMPTY_ARGUMENT",
            DomainError::ArgumentMismatch(_) => "ARGUMENT_MISMATCH",
            DomainError::ArgumentUnchanged(_) => "ARGUMENT_UNCHANGED",
            DomainError::PolicyViolation(_) => "POLICY_VIOLATION",
            DomainError::InvalidArgument(_) => "INVALID_ARGUMENT",
            DomainError::Encryption(_) => "ENCRYPTION_ERROR",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

//! Cart validation errors.

use thiserror::Error;

/// Locally detectable bad input, rejected before any network call.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantities start at one; zero is a removal, not a quantity.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Remote identifiers are never blank.
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    /// Signing in needs both an email and a password.
    #[error("email and password must not be empty")]
    EmptyCredentials,
}

//! Storefront errors.

use std::time::Duration;

use loza::{
    cart::{PriceError, ValidationError},
    gateway::{GatewayError, UserError},
};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the Storefront API.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// An HTTP transport or body decoding error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-2xx status.
    #[error("storefront request failed with status {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, as text.
        body: String,
    },

    /// The response carried top-level GraphQL errors.
    #[error("storefront api errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The cart id does not name a live cart.
    #[error("cart not found")]
    CartNotFound,

    /// The referenced cart line does not exist.
    #[error("cart line not found")]
    LineNotFound,

    /// The mutation was refused.
    #[error("storefront rejected the request")]
    UserErrors(Vec<UserError>),

    /// The response parsed but did not describe a valid cart or customer.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ValidationError> for StorefrontError {
    fn from(error: ValidationError) -> Self {
        Self::Malformed(error.to_string())
    }
}

impl From<PriceError> for StorefrontError {
    fn from(error: PriceError) -> Self {
        Self::Malformed(error.to_string())
    }
}

impl From<StorefrontError> for GatewayError {
    fn from(error: StorefrontError) -> Self {
        match error {
            StorefrontError::CartNotFound => GatewayError::CartNotFound,
            StorefrontError::LineNotFound => GatewayError::LineNotFound,
            StorefrontError::Timeout(limit) => GatewayError::Timeout(limit),
            StorefrontError::UserErrors(errors) => GatewayError::Rejected(errors),
            StorefrontError::Malformed(reason) => GatewayError::UnexpectedResponse(reason),
            StorefrontError::Http(error) if error.is_decode() => {
                GatewayError::UnexpectedResponse(error.to_string())
            }
            error @ (StorefrontError::Http(_)
            | StorefrontError::Status { .. }
            | StorefrontError::GraphQl(_)) => GatewayError::Transport(error.to_string()),
        }
    }
}

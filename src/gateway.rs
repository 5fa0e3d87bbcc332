//! Remote cart gateway.
//!
//! The only seam through which the session talks to the commerce platform.
//! Every successful call returns a complete [`CartSnapshot`]; callers replace
//! their copy wholesale and never patch it.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::cart::{CartId, CartSnapshot, LineId, MerchandiseId, Quantity};

/// A structured rejection attached to an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// Machine-readable code, when the platform supplies one.
    pub code: Option<String>,

    /// Input path the error refers to, e.g. `["lines", "0", "quantity"]`.
    pub field: Vec<String>,

    /// Human-readable explanation.
    pub message: String,
}

/// Gateway call errors.
///
/// `CartNotFound` and `LineNotFound` are routine and drive recovery; every
/// other variant is a failure to surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The cart id no longer names a live cart.
    #[error("cart not found")]
    CartNotFound,

    /// The cart exists, but the referenced line does not.
    #[error("cart line not found")]
    LineNotFound,

    /// The call did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The platform could not be reached or answered with an error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform refused the request (inventory, invalid merchandise, ...).
    #[error("request rejected: {}", format_user_errors(.0))]
    Rejected(Vec<UserError>),

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl GatewayError {
    /// Whether this is a routine not-found rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CartNotFound | Self::LineNotFound)
    }
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Remote cart operations on the commerce platform.
#[automock]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Create a new, empty cart.
    async fn create_cart(&self) -> Result<CartSnapshot, GatewayError>;

    /// Fetch the current state of a cart.
    async fn fetch_cart(&self, cart: &CartId) -> Result<CartSnapshot, GatewayError>;

    /// Add merchandise to a cart, incrementing an existing line for it.
    ///
    /// A dead cart id yields [`GatewayError::CartNotFound`]; a replacement
    /// cart is never created here.
    async fn add_line(
        &self,
        cart: &CartId,
        merchandise: &MerchandiseId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError>;

    /// Set the quantity of an existing line.
    async fn update_line_quantity(
        &self,
        cart: &CartId,
        line: &LineId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError>;

    /// Remove a line.
    async fn remove_line(&self, cart: &CartId, line: &LineId)
    -> Result<CartSnapshot, GatewayError>;
}

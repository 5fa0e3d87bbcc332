//! Session errors.

use thiserror::Error;

use crate::{cart::ValidationError, gateway::GatewayError};

/// Errors surfaced by cart session operations.
///
/// Cart and line not-found conditions are absorbed by the session and only
/// show up here when they defeat cart recovery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Bad input, rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation needs a loaded cart and there is none.
    #[error("no cart loaded")]
    NoCart,

    /// The commerce platform call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The session was closed; results are no longer applied.
    #[error("session closed")]
    Closed,
}

/// What a successful mutation call amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The change was applied and the snapshot replaced.
    Applied,

    /// The line was already gone; the refetched cart stands in for the change.
    AlreadySatisfied,

    /// The cart expired remotely. The session is empty again and the change
    /// had no cart to land in.
    CartExpired,
}

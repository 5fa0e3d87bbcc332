//! Session State

use std::sync::Arc;

use crate::{
    cart::{CartId, CartSnapshot},
    session::errors::SessionError,
};

/// Where the cart session is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Not started yet.
    #[default]
    Uninitialized,

    /// No cart id is known.
    Empty,

    /// Fetching the stored cart.
    Loading {
        /// The cart being fetched.
        cart_id: CartId,
    },

    /// The cart is loaded.
    Ready {
        /// The current contents.
        snapshot: Arc<CartSnapshot>,
    },

    /// A mutation is in flight.
    Mutating {
        /// What the cart looked like before the mutation.
        snapshot: Option<Arc<CartSnapshot>>,
    },

    /// The last call failed.
    Error {
        /// The surfaced failure.
        reason: SessionError,
        /// The previous contents, kept visible.
        last_good: Option<Arc<CartSnapshot>>,
    },
}

impl SessionState {
    /// The snapshot consumers should display, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<CartSnapshot>> {
        match self {
            Self::Ready { snapshot } => Some(snapshot),
            Self::Mutating { snapshot } => snapshot.as_ref(),
            Self::Error { last_good, .. } => last_good.as_ref(),
            Self::Uninitialized | Self::Empty | Self::Loading { .. } => None,
        }
    }

    /// Whether a call is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Loading { .. } | Self::Mutating { .. })
    }

    /// The surfaced failure, if the session is in the error state.
    #[must_use]
    pub fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Error { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Whether a cart is loaded and idle.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Whether no cart is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

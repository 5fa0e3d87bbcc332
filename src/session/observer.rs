//! Session Observer

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::{
    cart::{CartId, LineId},
    gateway::GatewayError,
};

/// The gateway call a session event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// [`CartGateway::fetch_cart`](crate::gateway::CartGateway::fetch_cart).
    FetchCart,

    /// [`CartGateway::create_cart`](crate::gateway::CartGateway::create_cart).
    CreateCart,

    /// [`CartGateway::add_line`](crate::gateway::CartGateway::add_line).
    AddLine,

    /// [`CartGateway::update_line_quantity`](crate::gateway::CartGateway::update_line_quantity).
    UpdateLine,

    /// [`CartGateway::remove_line`](crate::gateway::CartGateway::remove_line).
    RemoveLine,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::FetchCart => "fetch_cart",
            Operation::CreateCart => "create_cart",
            Operation::AddLine => "add_line",
            Operation::UpdateLine => "update_line_quantity",
            Operation::RemoveLine => "remove_line",
        })
    }
}

/// Something that happened inside a cart session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The stored cart was fetched.
    Loaded {
        /// The loaded cart.
        cart_id: CartId,
        /// Server-computed item count.
        total_quantity: u32,
    },

    /// A new remote cart was created and remembered.
    CartCreated {
        /// The new cart.
        cart_id: CartId,
    },

    /// A stored cart id turned out to be dead and was forgotten.
    StaleCartDiscarded {
        /// The forgotten cart.
        cart_id: CartId,
    },

    /// A mutation replaced the snapshot.
    MutationApplied {
        /// The call that produced the snapshot.
        operation: Operation,
        /// The mutated cart.
        cart_id: CartId,
        /// Item count after the mutation.
        total_quantity: u32,
    },

    /// The line a mutation targeted was already gone.
    LineAlreadyGone {
        /// The cart that was searched.
        cart_id: CartId,
        /// The missing line.
        line_id: LineId,
    },

    /// The cart expired underneath an update or removal.
    CartExpired {
        /// The mutation that found the cart dead.
        operation: Operation,
        /// The expired cart.
        cart_id: CartId,
    },

    /// A gateway call failed and the failure was surfaced.
    CallFailed {
        /// The failed call.
        operation: Operation,
        /// What went wrong.
        error: GatewayError,
    },

    /// The identity store could not be updated; the session carries on in memory.
    IdentityWriteFailed {
        /// The storage error, rendered.
        error: String,
    },
}

/// Receives session events.
pub trait SessionObserver: Send + Sync {
    /// Called synchronously, in order, for every event.
    fn on_event(&self, event: &SessionEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&self, _event: &SessionEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Loaded {
                cart_id,
                total_quantity,
            } => info!(%cart_id, total_quantity, "cart loaded"),
            SessionEvent::CartCreated { cart_id } => info!(%cart_id, "cart created"),
            SessionEvent::StaleCartDiscarded { cart_id } => {
                info!(%cart_id, "stored cart no longer exists, discarding");
            }
            SessionEvent::MutationApplied {
                operation,
                cart_id,
                total_quantity,
            } => debug!(%operation, %cart_id, total_quantity, "cart updated"),
            SessionEvent::LineAlreadyGone { cart_id, line_id } => {
                info!(%cart_id, %line_id, "cart line already removed, refetched cart");
            }
            SessionEvent::CartExpired { operation, cart_id } => {
                warn!(%operation, %cart_id, "cart expired during update");
            }
            SessionEvent::CallFailed { operation, error } => {
                error!(%operation, "cart call failed: {error}");
            }
            SessionEvent::IdentityWriteFailed { error } => {
                warn!("failed to persist cart id: {error}");
            }
        }
    }
}

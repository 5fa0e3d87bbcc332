//! Cart session.
//!
//! [`CartSession`] is the state machine sitting between user intent and the
//! remote cart. It owns the only mutable reference to the current
//! [`CartSnapshot`](crate::cart::CartSnapshot) and publishes state changes
//! through a [`tokio::sync::watch`] channel.

pub mod config;
pub mod errors;
pub mod manager;
pub mod observer;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{DEFAULT_CALL_TIMEOUT, SessionConfig};
pub use errors::{MutationOutcome, SessionError};
pub use manager::CartSession;
pub use observer::{NoopObserver, Operation, SessionEvent, SessionObserver, TracingObserver};
pub use state::SessionState;

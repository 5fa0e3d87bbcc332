//! Loza prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartId, CartSnapshot, LineId, LineItem, MerchandiseId, Price, Quantity, ValidationError},
    customer::{AccessToken, Customer, CustomerError, CustomerGateway, CustomerSession, TokenStore},
    gateway::{CartGateway, GatewayError, UserError},
    i18n::{Catalog, Direction, Locale, MessageId, format_price},
    identity::{FileStore, IdentityStore, KeyValueStore, MemoryStore},
    session::{
        CartSession, MutationOutcome, SessionConfig, SessionError, SessionEvent, SessionObserver,
        SessionState, TracingObserver,
    },
};

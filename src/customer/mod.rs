//! Customer accounts.
//!
//! A signed-in customer is mirrored the way the cart is: the access token
//! and its expiry are the only persisted state, kept in the same
//! [`KeyValueStore`](crate::identity::KeyValueStore) as the cart id, and the
//! profile is always refetched from the platform.

pub mod gateway;
pub mod session;
pub mod token;

pub use gateway::{Credentials, Customer, CustomerGateway, CustomerId};
pub use session::{CustomerError, CustomerSession, CustomerState};
pub use token::{AccessToken, TokenStore};

//! Loza
//!
//! Loza keeps a shopper's cart in sync with a remote Shopify cart: it
//! remembers the cart id across restarts, replays user intent against the
//! Storefront API and recovers when the remote cart expires. A signed-in
//! customer is mirrored the same way through [`customer`].

pub mod cart;
pub mod customer;
pub mod gateway;
pub mod i18n;
pub mod identity;
pub mod prelude;
pub mod session;

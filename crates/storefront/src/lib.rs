//! Loza Storefront
//!
//! [`CartGateway`](loza::gateway::CartGateway) implementation against the
//! Shopify Storefront GraphQL API.
//!
//! The same [`StorefrontGateway`] also implements
//! [`CustomerGateway`](loza::customer::CustomerGateway) for customer access
//! tokens.

pub mod client;
pub mod config;
mod customer;
pub mod errors;
pub mod gateway;
pub mod queries;
mod wire;

pub use client::StorefrontClient;
pub use config::StorefrontConfig;
pub use errors::StorefrontError;
pub use gateway::StorefrontGateway;

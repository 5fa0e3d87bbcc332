//! Carts

pub mod checkout;
pub mod errors;
pub mod ids;
pub mod models;
pub mod price;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::ValidationError;
pub use ids::{CartId, LineId, MerchandiseId};
pub use models::{CartSnapshot, LineItem, Quantity};
pub use price::{Price, PriceError};

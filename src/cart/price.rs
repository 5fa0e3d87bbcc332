//! Prices

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

/// Errors raised while reading a server-computed amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount was not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not one the storefront trades in.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A server-computed monetary amount.
///
/// Prices are only ever read from the commerce platform; nothing in this
/// crate adds or multiplies them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    amount: Decimal,
    currency: &'static Currency,
}

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub fn new(amount: Decimal, currency: &'static Currency) -> Self {
        Self { amount, currency }
    }

    /// Parse the wire form: a decimal string and an ISO currency code.
    ///
    /// # Errors
    ///
    /// - [`PriceError::InvalidAmount`]: the amount does not parse as a decimal.
    /// - [`PriceError::UnknownCurrency`]: the code is not supported.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = amount
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| PriceError::InvalidAmount(amount.to_string()))?;

        Ok(Self::new(amount, currency_for_code(currency_code)?))
    }

    /// The decimal amount in major units.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency of the amount.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Look up a supported ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for anything the storefront does not sell in.
pub fn currency_for_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code {
        "ILS" => Ok(iso::ILS),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        "GBP" => Ok(iso::GBP),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}
